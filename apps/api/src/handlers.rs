pub mod anonymization_fields;
pub mod health;
pub mod streams;
