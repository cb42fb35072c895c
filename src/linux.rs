//! `i2c-dev` backend for Linux hosts.
//!
//! The bus itself is [`linux_embedded_hal::I2cdev`], which submits each
//! [`embedded_hal::i2c::I2c::transaction`] as a single `I2C_RDWR` ioctl, so a register write
//! followed by a read goes out with a repeated start.
use std::path::{Path, PathBuf};

pub use linux_embedded_hal::{Delay, I2cdev};

use crate::{Connector, Error, Result};

/// Opens an `i2c-dev` character device for each command.
#[derive(Debug, Clone)]
pub struct DevConnector {
    path: PathBuf,
}

impl DevConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for DevConnector {
    type Bus = I2cdev;

    fn connect(&mut self) -> Result<I2cdev> {
        tracing::debug!("opening {}", self.path.display());
        I2cdev::new(&self.path).map_err(|e| {
            Error::io(
                format!("opening {}", self.path.display()),
                std::io::Error::from(e),
            )
        })
    }
}
