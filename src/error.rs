pub type AfficheResult<T> = Result<T, AfficheError>;

#[derive(thiserror::Error, Debug)]
pub enum AfficheError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("composite error: {0}")]
    Composite(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AfficheError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }
}
