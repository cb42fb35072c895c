use embedded_hal::i2c::I2c;

use crate::{Error, Result};

/// Longest payload written in a single register transaction.
pub const MAX_WRITE: usize = 8;

/// Register-oriented access on top of a raw I2C bus.
///
/// Every transaction addresses a register offset first; reads are a write of the offset followed
/// by a repeated-start read.  Multi-byte values are little-endian on the wire.
pub trait I2cExt {
    fn read_regs(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()>;
    fn write_regs(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<()>;

    fn read_reg(&mut self, addr: u8, reg: u8) -> Result<u8> {
        let mut buf = [0x00];
        self.read_regs(addr, reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> Result<()> {
        self.write_regs(addr, reg, &[value])
    }

    fn update_reg(&mut self, addr: u8, reg: u8, mask_set: u8, mask_clear: u8) -> Result<()> {
        let mut value = self.read_reg(addr, reg)?;
        value |= mask_set;
        value &= !mask_clear;
        self.write_reg(addr, reg, value)
    }

    fn read_u16(&mut self, addr: u8, reg: u8) -> Result<u16> {
        let mut buf = [0x00; 2];
        self.read_regs(addr, reg, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write_u16(&mut self, addr: u8, reg: u8, value: u16) -> Result<()> {
        self.write_regs(addr, reg, &value.to_le_bytes())
    }

    fn read_u32(&mut self, addr: u8, reg: u8) -> Result<u32> {
        let mut buf = [0x00; 4];
        self.read_regs(addr, reg, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i32(&mut self, addr: u8, reg: u8) -> Result<i32> {
        let mut buf = [0x00; 4];
        self.read_regs(addr, reg, &mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}

/// Opens bus handles for commands.
pub trait Connector {
    type Bus: I2c;

    fn connect(&mut self) -> Result<Self::Bus>;
}

impl<I2C: I2c> I2cExt for I2C {
    fn read_regs(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        tracing::trace!("read  0x{:02x}[0x{:02x}] x{}", addr, reg, buf.len());
        self.write_read(addr, &[reg], buf).map_err(Error::bus)
    }

    fn write_regs(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<()> {
        let mut frame: heapless::Vec<u8, { MAX_WRITE + 1 }> = heapless::Vec::new();
        frame
            .push(reg)
            .map_err(|_| Error::FrameTooLong(data.len()))?;
        frame
            .extend_from_slice(data)
            .map_err(|_| Error::FrameTooLong(data.len()))?;
        tracing::trace!("write 0x{:02x}[0x{:02x}] {:02x?}", addr, reg, data);
        self.write(addr, &frame).map_err(Error::bus)
    }
}
