use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid value '{value}' for filter '{field}': expected {expected}")]
    BadFilterValue {
        field: String,
        value: String,
        expected: &'static str,
    },
}
