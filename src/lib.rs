//! Driver and command line front-end for the PLC Pi08 I/O expansion card.
//!
//! Up to eight cards share one I2C bus, each selected by its stack level (`0..=7`).  A card
//! is opened with [`Board::init`] on any [`embedded_hal::i2c::I2c`] implementation and then
//! driven through the relay, opto-input, open-drain and encoder operations on [`Board`].
//!
//! ```no_run
//! use plcpi::linux::DevConnector;
//! use plcpi::{Board, Connector};
//!
//! # fn main() -> plcpi::Result<()> {
//! let bus = DevConnector::new("/dev/i2c-1").connect()?;
//! let mut board = Board::init(bus, 0)?;
//! board.relay_write_verified(3, true)?;
//! let pulses = board.od_pulses_get(1)?;
//! # let _ = pulses;
//! # Ok(())
//! # }
//! ```

mod board;
mod bus;
pub mod cli;
pub mod codec;
pub mod config;
pub mod dev;
mod error;
pub mod exitcode;
pub mod keypress;
pub mod linux;
pub mod lock;
pub mod logging;
pub mod regs;

pub use board::{stack_address, Board, BoardInfo, Revision};
pub use bus::{Connector, I2cExt};
pub use codec::{EdgeMode, MoveProfile};
pub use error::{Error, Result};
