use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("Metadata source error: {0}")]
    MetadataSource(String),

    #[error("Schema '{0}' not found")]
    SchemaNotFound(String),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;

impl From<sqlparser::parser::ParserError> for InferenceError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        Self::ParseError(err.to_string())
    }
}
