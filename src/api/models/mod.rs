// Models module - contains Form, Question, Response, and enums

pub mod common;
pub mod enums;
pub mod form;
pub mod response;

pub use common::{PaginatedResponse, SuccessResponse};
pub use enums::{QuestionType, ResponsePriority, ResponseStatus};
pub use form::{Form, FormListItem, FormUpdate, NewForm, Question};
pub use response::{
    NewResponse, Response, ResponseFilter, ResponseListItem, ResponseStats, ResponseUpdate,
};
