use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiveNftError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required config: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data from API is not valid: {message}")]
    ApiDataError { message: String },

    #[error("Chain operation failed: {message}")]
    ChainError { message: String },

    #[error("IPFS upload failed: {message}")]
    UploadError { message: String },

    #[error("Balance of {address} is {balance:.3} {unit}, required more than {required}")]
    InsufficientBalanceError {
        address: String,
        balance: f64,
        unit: String,
        required: f64,
    },

    #[error("Address {address} is not found in the admins of collection {collection_id}")]
    NotCollectionAdminError { address: String, collection_id: u32 },
}

impl LiveNftError {
    /// Exit code reported by the binary when a run aborts with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LiveNftError::MissingConfigError { .. }
            | LiveNftError::InvalidConfigValueError { .. } => 2,
            LiveNftError::InsufficientBalanceError { .. }
            | LiveNftError::NotCollectionAdminError { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, LiveNftError>;
