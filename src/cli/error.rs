//! CLI-level errors (wraps board errors)

use thiserror::Error;

use crate::exitcode;

/// What a command handler can fail with.  These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Board(#[from] crate::Error),

    #[error("Invalid parameters number!")]
    ArgCount,

    #[error("Invalid command option")]
    UnknownCommand,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to lock the bus: {0}")]
    Lock(crate::Error),
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ArgCount | CliError::UnknownCommand => exitcode::USAGE,
            CliError::Config(_) => exitcode::CONFIG,
            CliError::Lock(_) => exitcode::OSERR,
            CliError::Board(e) => match e {
                e if e.is_user_error() => exitcode::USAGE,
                crate::Error::NotDetected(_)
                | crate::Error::Unsupported { .. }
                | crate::Error::LogEmpty => exitcode::UNAVAILABLE,
                crate::Error::Bus(_)
                | crate::Error::VerifyFailed(_)
                | crate::Error::FrameTooLong(_)
                | crate::Error::Io { .. } => exitcode::IOERR,
                _ => exitcode::FAIL,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;

    #[test]
    fn exit_codes_by_tier() {
        assert_eq!(CliError::ArgCount.exit_code(), exitcode::USAGE);
        assert_eq!(
            CliError::from(crate::Error::InvalidStack(9)).exit_code(),
            exitcode::USAGE
        );
        assert_eq!(
            CliError::from(crate::Error::NotDetected(1)).exit_code(),
            exitcode::UNAVAILABLE
        );
        assert_eq!(
            CliError::from(crate::Error::LogEmpty).exit_code(),
            exitcode::UNAVAILABLE
        );
        assert_eq!(
            CliError::from(crate::Error::Bus(ErrorKind::Other)).exit_code(),
            exitcode::IOERR
        );
        assert_eq!(
            CliError::Lock(crate::Error::io("x", std::io::ErrorKind::Other.into())).exit_code(),
            exitcode::OSERR
        );
    }
}
