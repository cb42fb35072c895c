//! Error type shared by the bus helpers and the board operations.
//!
//! Errors fall into two groups.  Argument errors (`InvalidStack`, `InvalidChannel`, `OutOfRange`,
//! `InvalidValue`) are detected before touching the bus.  Device errors come back from the bus
//! or from the board not behaving as expected.
use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid stack level {0} [0..7]")]
    InvalidStack(i64),

    #[error("{what} channel {channel} out of range [{min}..{max}]")]
    InvalidChannel {
        what: &'static str,
        channel: i64,
        min: u8,
        max: u8,
    },

    #[error("Invalid {what} {value}, must be {min}..{max}")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid {what}: \"{value}\"")]
    InvalidValue { what: &'static str, value: String },

    #[error("Board id {0} not detected")]
    NotDetected(u8),

    #[error("Bus error: {0}")]
    Bus(ErrorKind),

    #[error("Register write not confirmed after {0} attempts")]
    VerifyFailed(u32),

    #[error(
        "This feature is available on hardware versions greater or equal to {required}.0 (found {found})"
    )]
    Unsupported { required: u8, found: u8 },

    #[error("Register frame too long ({0} bytes)")]
    FrameTooLong(usize),

    #[error("Firmware error log is empty")]
    LogEmpty,

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Reduce a bus implementation error to its `ErrorKind`.
    pub fn bus<E: embedded_hal::i2c::Error>(e: E) -> Self {
        Error::Bus(e.kind())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was caused by the caller's input rather than the device.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidStack(_)
                | Error::InvalidChannel { .. }
                | Error::OutOfRange { .. }
                | Error::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
