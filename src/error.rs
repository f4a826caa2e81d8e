pub type CamspriteResult<T> = Result<T, CamspriteError>;

#[derive(thiserror::Error, Debug)]
pub enum CamspriteError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("texture error: {0}")]
    Texture(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("mask error: {0}")]
    Mask(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CamspriteError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn texture(msg: impl Into<String>) -> Self {
        Self::Texture(msg.into())
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    pub fn mask(msg: impl Into<String>) -> Self {
        Self::Mask(msg.into())
    }
}
