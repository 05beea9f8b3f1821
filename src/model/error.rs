pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("usage error: {0}")]
    Usage(String),
    #[error("can't parse date `{0}`")]
    DateParse(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("pull request source error: {0}")]
    Source(String),
    #[error("label `{0}` is not part of the report columns")]
    UnknownLabel(String),
    #[error("report error: {0}")]
    Report(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn usage(message: impl ToString) -> Self {
        Self::Usage(message.to_string())
    }

    pub fn config(message: impl ToString) -> Self {
        Self::Config(message.to_string())
    }

    pub fn fetch(message: impl ToString) -> Self {
        Self::Source(message.to_string())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) | Error::DateParse(_) => 2,
            Error::Config(_) | Error::Json(_) => 3,
            Error::Source(_) => 4,
            Error::UnknownLabel(_) => 70,
            Error::Report(_) | Error::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_display() {
        let err = Error::usage("Can't use --since and --start");
        assert_eq!(err.to_string(), "usage error: Can't use --since and --start");
    }

    #[test]
    fn date_parse_error_display() {
        let err = Error::DateParse("tomorrow-ish".to_string());
        assert_eq!(err.to_string(), "can't parse date `tomorrow-ish`");
    }

    #[test]
    fn usage_and_config_errors_exit_differently() {
        assert_ne!(
            Error::usage("x").exit_code(),
            Error::config("x").exit_code()
        );
        assert_eq!(Error::usage("x").exit_code(), 2);
    }
}
