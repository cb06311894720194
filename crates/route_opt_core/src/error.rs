use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unresolved addresses: {}", .0.join("; "))]
    UnresolvedAddresses(Vec<String>),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn unresolved_addresses_lists_every_address() {
        let err = Error::UnresolvedAddresses(vec!["Nowhere 1".into(), "Atlantis".into()]);
        assert_eq!(err.to_string(), "unresolved addresses: Nowhere 1; Atlantis");
    }

    #[test]
    fn io_errors_convert_transparently() {
        let err: Error = std::io::Error::other("disk gone").into();
        assert_eq!(err.to_string(), "disk gone");
    }

    #[test]
    fn json_errors_are_labelled() {
        let err: Error = serde_json::from_str::<Vec<u8>>("{").expect_err("bad json").into();
        assert!(err.to_string().starts_with("malformed json: "));
    }
}
