//! CLI-specific error types and exit code mapping

use haproxy2pb_core::error::Haproxy2pbError;
use haproxy2pb_log_parser::LogParserError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from haproxy2pb-core.
    #[error("{0}")]
    Core(#[from] Haproxy2pbError),

    /// Logging setup failure.
    #[error("{0}")]
    Logging(#[from] anyhow::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / command / scan error |
    /// | 2    | Configuration error            |
    /// | 10   | IO error                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(Haproxy2pbError::Config(_)) => 2,
            Self::Io(_) | Self::Core(Haproxy2pbError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Logging(_) => 1,
        }
    }
}

impl From<LogParserError> for CliError {
    fn from(e: LogParserError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haproxy2pb_core::error::{ConfigError, ScanError};

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err = CliError::Core(Haproxy2pbError::Config(ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert_eq!(CliError::Io(io_err).exit_code(), 10);
    }

    #[test]
    fn test_exit_code_scan_error() {
        let err: CliError = Haproxy2pbError::from(ScanError::NoMatch {
            line: "garbage".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "scan error: no match: garbage");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = err.to_string();
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }

    #[test]
    fn test_from_log_parser_error() {
        use haproxy2pb_log_parser::decode_length_delimited;
        let parser_err = decode_length_delimited(&[0x05, 0x0a]).unwrap_err();
        let cli_err: CliError = parser_err.into();
        assert!(matches!(cli_err, CliError::Core(Haproxy2pbError::Codec(_))));
        assert_eq!(cli_err.exit_code(), 1);
    }
}
