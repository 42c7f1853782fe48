use thiserror::Error;

/// Fatal normalization errors
///
/// Any of these aborts the call. Writes made to the store before the error
/// are kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Expected an object in the payload at '{path}'")]
    ExpectedObject { path: String },

    #[error("Expected a list in the payload at '{path}'")]
    ExpectedList { path: String },

    #[error("Missing __typename for abstract value at '{path}'")]
    MissingTypename { path: String },

    #[error("Record not found: {data_id}")]
    RecordNotFound { data_id: String },

    #[error("Invalid selection: {message}")]
    InvalidSelection { message: String },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
