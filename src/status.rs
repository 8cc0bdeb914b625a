use reqwest;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt, num::ParseIntError};

#[derive(Serialize, Deserialize, Default, Debug)]
pub enum Status {
    #[default]
    Ok,

    Internal(String),
    InvalidArgument(String),
    NotFound(String),
}

impl Status {
    pub fn new(msg: &str, err: impl Error) -> Self {
        Status::Internal(format!("{msg}: '{err}'"))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Status::Internal(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status::NotFound(msg.into())
    }
}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Self::new("IO error", err)
    }
}

impl From<reqwest::Error> for Status {
    fn from(err: reqwest::Error) -> Self {
        Self::new("reqwest error", err)
    }
}

impl From<chromiumoxide::error::CdpError> for Status {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::new("browser error", err)
    }
}

impl From<ParseIntError> for Status {
    fn from(err: ParseIntError) -> Self {
        Status::InvalidArgument(format!("not an integer: '{err}'"))
    }
}

impl Error for Status {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "Ok"),
            Status::Internal(msg) => write!(f, "Internal error: {msg}"),
            Status::InvalidArgument(msg) => write!(f, "Invalid argument error: {msg}"),
            Status::NotFound(msg) => write!(f, "Not found error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_error_class() {
        assert_eq!(
            Status::invalid_argument("missing key 'platform'").to_string(),
            "Invalid argument error: missing key 'platform'"
        );
        assert_eq!(
            Status::not_found("only 2 wrapIDs").to_string(),
            "Not found error: only 2 wrapIDs"
        );
    }

    #[test]
    fn parse_int_error_is_invalid_argument() {
        let err: Status = "abc".parse::<usize>().unwrap_err().into();
        assert!(matches!(err, Status::InvalidArgument(_)));
    }
}
