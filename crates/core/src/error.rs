#[derive(Debug, thiserror::Error)]
pub enum BcdError {
    #[error("{0}")]
    Validation(String),
    #[error("unsupported media type: {0} (accepted: JPEG, PNG, DICOM)")]
    UnsupportedMediaType(String),
    #[error("invalid print transition: {event} is not valid in state {from}")]
    InvalidPrintTransition { from: String, event: String },
    #[error("no report is available for patient {0}")]
    ReportUnavailable(String),
    #[error("failed to serialize report: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize report: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to read report file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write document file: {0}")]
    FileWrite(std::io::Error),
}

pub type BcdResult<T> = std::result::Result<T, BcdError>;
