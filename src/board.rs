//! Board context: one stacked PLC Pi08 card on the bus.
use embedded_hal::i2c::I2c;

use crate::regs::{self, Regs};
use crate::{codec, Error, I2cExt, Result};

/// Hardware and firmware revision pair, read once when the board is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revision {
    pub hw_major: u8,
    pub hw_minor: u8,
    pub fw_major: u8,
    pub fw_minor: u8,
}

/// Diagnostic readings of the on-board controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardInfo {
    pub revision: Revision,
    pub temperature: u8,
    pub voltage: f64,
}

/// Bus address of the board at `stack`, rejecting levels outside `0..=7`.
pub fn stack_address(stack: i64) -> Result<u8> {
    if stack < 0 || stack > regs::STACK_LEVEL_MAX as i64 {
        return Err(Error::InvalidStack(stack));
    }
    Ok(regs::BASE_ADDRESS + stack as u8)
}

/// An opened board.
///
/// Carries everything later operations need to know about the card (its address and the
/// revision used for feature gating) so no state lives outside the value.
pub struct Board<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) addr: u8,
    stack: u8,
    revision: Revision,
    pub(crate) retries: u32,
}

impl<I2C: I2c> Board<I2C> {
    /// Open the board at `stack`.
    ///
    /// The stack level is validated before the bus is touched.  A board that does not answer the
    /// revision read is reported as [`Error::NotDetected`].
    pub fn init(mut i2c: I2C, stack: i64) -> Result<Self> {
        let addr = stack_address(stack)?;
        let stack = stack as u8;

        let mut buf = [0u8; 4];
        if let Err(e) = i2c.read_regs(addr, Regs::RevisionHwMajor.into(), &mut buf) {
            tracing::debug!("no answer from stack level {}: {}", stack, e);
            return Err(Error::NotDetected(stack));
        }
        let revision = Revision {
            hw_major: buf[0],
            hw_minor: buf[1],
            fw_major: buf[2],
            fw_minor: buf[3],
        };
        tracing::debug!(
            "board {} at 0x{:02x}: hw {}.{} fw {}.{}",
            stack,
            addr,
            revision.hw_major,
            revision.hw_minor,
            revision.fw_major,
            revision.fw_minor
        );

        Ok(Self {
            i2c,
            addr,
            stack,
            revision,
            retries: 10,
        })
    }

    /// Check whether a board answers at `stack` without opening it.
    pub fn is_present(i2c: &mut I2C, stack: i64) -> bool {
        match stack_address(stack) {
            Ok(addr) => i2c.read_reg(addr, Regs::RevisionMajor.into()).is_ok(),
            Err(_) => false,
        }
    }

    /// Number of write/read-back attempts for verified writes.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn stack(&self) -> u8 {
        self.stack
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn info(&mut self) -> Result<BoardInfo> {
        let mut diag = [0u8; 3];
        self.i2c
            .read_regs(self.addr, Regs::DiagTemperature.into(), &mut diag)?;
        let mv = u16::from_le_bytes([diag[1], diag[2]]);

        let mut rev = [0u8; 4];
        self.i2c
            .read_regs(self.addr, Regs::RevisionHwMajor.into(), &mut rev)?;

        Ok(BoardInfo {
            revision: Revision {
                hw_major: rev[0],
                hw_minor: rev[1],
                fw_major: rev[2],
                fw_minor: rev[3],
            },
            temperature: diag[0],
            voltage: codec::millivolts_to_volts(mv),
        })
    }

    pub(crate) fn require_hw(&self, required: u8) -> Result<()> {
        if self.revision.hw_major < required {
            return Err(Error::Unsupported {
                required,
                found: self.revision.hw_major,
            });
        }
        Ok(())
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Read the firmware error log.
    #[cfg(feature = "hw-debug")]
    pub fn error_log(&mut self) -> Result<Vec<u8>> {
        const FIFO_MAX: usize = 512;

        self.i2c.write_reg(self.addr, Regs::DbgCmd.into(), 1)?;
        let mut size = 0;
        for _ in 0..10 {
            if let Ok(s) = self.i2c.read_u16(self.addr, Regs::DbgFifoSize.into()) {
                size = s as usize;
            }
            if size != 0 {
                break;
            }
        }
        if size == 0 {
            return Err(Error::LogEmpty);
        }
        let mut buf = vec![0u8; size.min(FIFO_MAX)];
        self.i2c
            .read_regs(self.addr, Regs::DbgFifo.into(), &mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn init_reads_revision() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x2a, vec![0x7d], vec![3, 1, 1, 4]),
            mock_i2c::Transaction::write_read(0x2a, vec![0x7a], vec![35, 0xe4, 0x0c]),
            mock_i2c::Transaction::write_read(0x2a, vec![0x7d], vec![3, 1, 1, 4]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut board = Board::init(bus.clone(), 2).unwrap();
        assert_eq!(board.address(), 0x2a);
        assert_eq!(board.stack(), 2);
        assert_eq!(board.revision().hw_major, 3);
        assert_eq!(board.revision().fw_minor, 4);

        let info = board.info().unwrap();
        assert_eq!(info.temperature, 35);
        assert!((info.voltage - 3.3).abs() < 1e-9);

        bus.done();
    }

    #[test]
    fn invalid_stack_never_touches_bus() {
        let mut bus = mock_i2c::Mock::new(&[]);

        for stack in [-1, 8, 100, i64::MIN] {
            assert!(matches!(
                Board::init(bus.clone(), stack),
                Err(Error::InvalidStack(s)) if s == stack
            ));
            assert!(!Board::is_present(&mut bus.clone(), stack));
        }

        bus.done();
    }

    #[test]
    fn hardware_gate() {
        let expectations = [mock_i2c::Transaction::write_read(
            0x28,
            vec![0x7d],
            vec![2, 0, 1, 0],
        )];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let board = Board::init(bus.clone(), 0).unwrap();
        assert!(matches!(
            board.require_hw(3),
            Err(Error::Unsupported {
                required: 3,
                found: 2
            })
        ));
        assert!(board.require_hw(2).is_ok());

        bus.done();
    }

    #[cfg(feature = "hw-debug")]
    fn log_expectations(sizes: &[u16], data: Option<Vec<u8>>) -> Vec<mock_i2c::Transaction> {
        let mut ex = vec![
            mock_i2c::Transaction::write_read(0x28, vec![0x7d], vec![3, 0, 1, 0]),
            mock_i2c::Transaction::write(0x28, vec![0xf0, 0x01]),
        ];
        for size in sizes {
            ex.push(mock_i2c::Transaction::write_read(
                0x28,
                vec![0xf1],
                size.to_le_bytes().to_vec(),
            ));
        }
        if let Some(data) = data {
            ex.push(mock_i2c::Transaction::write_read(0x28, vec![0xf3], data));
        }
        ex
    }

    #[cfg(feature = "hw-debug")]
    #[test]
    fn error_log_waits_for_fifo() {
        let expectations = log_expectations(&[0, 0, 5], Some(b"E0042".to_vec()));
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut board = Board::init(bus.clone(), 0).unwrap();
        assert_eq!(board.error_log().unwrap(), b"E0042");

        bus.done();
    }

    #[cfg(feature = "hw-debug")]
    #[test]
    fn error_log_is_capped() {
        let expectations = log_expectations(&[600], Some(vec![0x41; 512]));
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut board = Board::init(bus.clone(), 0).unwrap();
        assert_eq!(board.error_log().unwrap().len(), 512);

        bus.done();
    }

    #[cfg(feature = "hw-debug")]
    #[test]
    fn empty_error_log() {
        let expectations = log_expectations(&[0; 10], None);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut board = Board::init(bus.clone(), 0).unwrap();
        assert!(matches!(board.error_log(), Err(Error::LogEmpty)));

        bus.done();
    }
}
