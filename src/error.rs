use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadSheetError {
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    #[error("Statement bucket '{label}' listed in more than one subtotal tier")]
    DuplicateBucket { label: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeadSheetError>;
