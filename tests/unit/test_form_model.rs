#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use safereport_api::models::{Form, FormListItem, FormUpdate, NewForm, Question, QuestionType};

    fn text_question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            question: "What happened?".to_string(),
            question_type: QuestionType::Text,
            required: true,
            options: None,
            placeholder: None,
            helper_text: None,
        }
    }

    fn sample_form() -> Form {
        Form::from_new(
            NewForm {
                title: "Incident report".to_string(),
                description: Some("Anonymous incident form".to_string()),
                questions: vec![text_question("q1"), text_question("q2")],
                is_active: true,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_form_creation() {
        let form = sample_form();
        assert_eq!(form.title, "Incident report");
        assert_eq!(form.questions.len(), 2);
        assert_eq!(form.version, 1);
        assert!(form.is_active);
        assert_eq!(form.created_at, form.updated_at);
    }

    #[test]
    fn test_duplicate_payload() {
        let form = sample_form();
        let copy = form.duplicate_payload();
        assert_eq!(copy.title, "Incident report (Copy)");
        assert_eq!(copy.description, form.description);
        assert_eq!(copy.questions, form.questions);
        assert!(!copy.is_active);
    }

    #[test]
    fn test_apply_update_partial() {
        let mut form = sample_form();
        let created = form.created_at;
        let later = created + Duration::seconds(5);

        form.apply_update(
            FormUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(form.title, "Renamed");
        assert_eq!(form.questions.len(), 2, "untouched fields survive");
        assert!(form.is_active);
        assert_eq!(form.updated_at, later);
        assert_eq!(form.created_at, created);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(FormUpdate::default().is_empty());
        let update = FormUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_question_serialization_uses_type_key() {
        let question = Question {
            options: Some(vec!["Yes".to_string(), "No".to_string()]),
            question_type: QuestionType::Select,
            ..text_question("q1")
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["options"][1], "No");

        let plain = serde_json::to_value(text_question("q2")).unwrap();
        assert_eq!(plain["type"], "text");
        assert!(plain.get("options").is_none());
    }

    #[test]
    fn test_question_deserialization() {
        let json = r#"{
            "id": "q1",
            "question": "When did it happen?",
            "type": "date",
            "required": false,
            "helper_text": "Approximate dates are fine"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, QuestionType::Date);
        assert!(!question.required);
        assert_eq!(
            question.helper_text.as_deref(),
            Some("Approximate dates are fine")
        );
    }

    #[test]
    fn test_choice_question_kinds() {
        assert!(QuestionType::Select.is_choice());
        assert!(QuestionType::Radio.is_choice());
        assert!(QuestionType::Checkbox.is_choice());
        assert!(!QuestionType::Text.is_choice());
        assert!(!QuestionType::Date.is_choice());
    }

    #[test]
    fn test_form_list_item() {
        let form = sample_form();
        let item = FormListItem::from(&form);
        assert_eq!(item.id, form.id);
        assert_eq!(item.question_count, 2);
        assert_eq!(item.response_count, 0);
        assert!(item.is_active);
    }
}
