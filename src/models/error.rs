use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Display, Clone, PartialEq)]
pub enum SError {
    #[display("parse error: {_0}")]
    ParseError(String),
    #[display("io error: {_0}")]
    IOError(String),
    #[display("archive error: {_0}")]
    ArchiveError(String),
    #[display("invalid path: {_0}")]
    InvalidPath(String),
    #[display("file or directory not found: {_0}")]
    FileOrDirectoryNotFound(String),
    #[display("config error: {_0}")]
    ConfigError(String),
    #[display("async runtime error: {_0}")]
    AsyncRuntimeError(String),
    #[display("no game selected")]
    NoSelectedGame,
    #[display("operation cancelled")]
    Cancelled,
    #[display("unexpected error: {_0:?}")]
    Unexpected(Option<String>),
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => SError::FileOrDirectoryNotFound(e.to_string()),
            _ => SError::IOError(e.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for SError {
    fn from(e: zip::result::ZipError) -> Self {
        SError::ArchiveError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<walkdir::Error> for SError {
    fn from(e: walkdir::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<regex::Error> for SError {
    fn from(e: regex::Error) -> Self {
        SError::ParseError(format!("Failed to create regex: {e}"))
    }
}

impl From<toml::de::Error> for SError {
    fn from(e: toml::de::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<toml::ser::Error> for SError {
    fn from(e: toml::ser::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<confy::ConfyError> for SError {
    fn from(e: confy::ConfyError) -> Self {
        SError::ConfigError(e.to_string())
    }
}

impl From<camino::FromPathBufError> for SError {
    fn from(e: camino::FromPathBufError) -> Self {
        SError::InvalidPath(format!("Invalid UTF-8 path: {}", e.as_path().display()))
    }
}

impl From<std::path::StripPrefixError> for SError {
    fn from(e: std::path::StripPrefixError) -> Self {
        SError::InvalidPath(e.to_string())
    }
}

impl From<tokio::task::JoinError> for SError {
    fn from(e: tokio::task::JoinError) -> Self {
        SError::AsyncRuntimeError(e.to_string())
    }
}
