use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListErrorCode {
    SizeExceeded,
    EmptyName,
    DuplicateName,
    NotFound,
    InvalidInput,
    Network,
    Io,
    Serde,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListError {
    pub code: ListErrorCode,
    pub message: String,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for ListError {}

impl From<std::io::Error> for ListError {
    fn from(err: std::io::Error) -> Self {
        ListError {
            code: ListErrorCode::Io,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        ListError {
            code: ListErrorCode::Serde,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code_and_message() {
        let err = ListError {
            code: ListErrorCode::DuplicateName,
            message: "This list name is already in use.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "DuplicateName: This list name is already in use."
        );
    }
}
