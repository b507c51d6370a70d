use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unsupported datatype(s): {}", .0.join(", "))]
    UnsupportedDataType(Vec<String>),
}

pub type Result<T> = std::result::Result<T, ModelError>;
