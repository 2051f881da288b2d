use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Product '{0}' not found")]
    ProductNotFound(String),

    #[error("The search backend is unavailable")]
    SearchUnavailable,

    #[error("{0}")]
    Failed(String),
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Failed(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_failure_displays_message() {
        assert_eq!(Error::from("Failed").to_string(), "Failed");
    }

    #[test]
    fn test_product_not_found_message() {
        assert_eq!(
            Error::ProductNotFound("42".into()).to_string(),
            "Product '42' not found"
        );
    }
}
