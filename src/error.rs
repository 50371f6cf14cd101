use thiserror::Error;

pub type WidgetResult<T> = Result<T, WidgetError>;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("target element not found: {target}")]
    MissingTarget { target: String },

    #[error("unsupported selector: {0}")]
    InvalidSelector(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl WidgetError {
    pub(crate) fn missing(target: impl Into<String>) -> Self {
        Self::MissingTarget {
            target: target.into(),
        }
    }
}
