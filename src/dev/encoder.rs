//! GPIO quadrature encoder and the encoder thresholds that stop open-drain pulse trains.
use embedded_hal::i2c::I2c;

use crate::regs::{self, Regs};
use crate::{codec, Board, I2cExt, Result};

impl<I2C: I2c> Board<I2C> {
    pub fn gpio_encoder_count_get(&mut self) -> Result<i32> {
        self.i2c.read_i32(self.addr, Regs::GpioEncCount.into())
    }

    pub fn gpio_encoder_count_reset(&mut self) -> Result<()> {
        self.i2c.write_reg(self.addr, Regs::GpioEncCntRst.into(), 1)
    }

    /// Make the firmware reset the pulse counter of open-drain `ch` once the encoder count
    /// reaches `limit`.
    pub fn encoder_threshold_set(&mut self, ch: u8, limit: u32) -> Result<()> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        self.i2c.write_regs(
            self.addr,
            Regs::EncoderLimit.into(),
            &codec::count_record(limit, ch),
        )
    }
}
