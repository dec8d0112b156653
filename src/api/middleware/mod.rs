// Middleware module - CORS and request tracing configuration

pub mod cors;

pub use cors::create_cors_layer;
