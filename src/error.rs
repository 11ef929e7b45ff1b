use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecastError {
    #[error("Duplicate identifier: {id}")]
    DuplicateIdentifier { id: String },
    #[error("No objects constructed yet")]
    NoConstruct,
    #[error("Format error: {message}{}", .line.map(|l| format!(" (line {l})")).unwrap_or_default())]
    Format { message: String, line: Option<usize> },
    #[error("Data type not registered: {0}")]
    UnknownType(String),
    #[error("Cannot convert {value:?} from {from} to {to}")]
    Conversion { value: String, from: String, to: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecastError>;
