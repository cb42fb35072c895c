//! Optocoupled inputs: state, edge counters and the quadrature encoders built on input pairs.
use embedded_hal::i2c::I2c;

use crate::codec::{self, EdgeMode};
use crate::regs::{self, Regs};
use crate::{Board, I2cExt, Result};

impl<I2C: I2c> Board<I2C> {
    pub fn opto_get(&mut self, ch: u8) -> Result<bool> {
        let ch = codec::channel("opto input", ch as i64, regs::OPTO_CH_MAX)?;
        Ok(self.optos_get()? & codec::channel_mask(ch) != 0)
    }

    pub fn optos_get(&mut self) -> Result<u8> {
        self.i2c.read_reg(self.addr, Regs::OptoInVal.into())
    }

    pub fn opto_edge_set(&mut self, ch: u8, mode: EdgeMode) -> Result<()> {
        let ch = codec::channel("opto input", ch as i64, regs::OPTO_CH_MAX)?;
        let mask = codec::channel_mask(ch);
        for (reg, enable) in [
            (Regs::OptoItRising, mode.rising()),
            (Regs::OptoItFalling, mode.falling()),
        ] {
            let (mask_set, mask_clear) = match enable {
                true => (mask, 0),
                false => (0, mask),
            };
            self.i2c
                .update_reg(self.addr, reg.into(), mask_set, mask_clear)?;
        }
        Ok(())
    }

    pub fn opto_edge_get(&mut self, ch: u8) -> Result<EdgeMode> {
        let ch = codec::channel("opto input", ch as i64, regs::OPTO_CH_MAX)?;
        let mask = codec::channel_mask(ch);
        let rising = self.i2c.read_reg(self.addr, Regs::OptoItRising.into())? & mask != 0;
        let falling = self.i2c.read_reg(self.addr, Regs::OptoItFalling.into())? & mask != 0;
        Ok(EdgeMode::from_bits(rising, falling))
    }

    pub fn opto_count_get(&mut self, ch: u8) -> Result<u32> {
        let ch = codec::channel("opto input", ch as i64, regs::OPTO_CH_MAX)?;
        self.i2c.read_u32(self.addr, Regs::OptoEdgeCount.at(ch, 4))
    }

    pub fn opto_count_reset(&mut self, ch: u8) -> Result<()> {
        let ch = codec::channel("opto input", ch as i64, regs::OPTO_CH_MAX)?;
        self.i2c.write_reg(self.addr, Regs::OptoCntRst.into(), ch)
    }

    /// Enable or disable the quadrature decoder on opto inputs `2*enc-1` and `2*enc`.
    pub fn opto_encoder_set(&mut self, enc: u8, enable: bool) -> Result<()> {
        let enc = codec::channel("opto encoder", enc as i64, regs::OPTO_ENC_CH_MAX)?;
        let mask = codec::channel_mask(enc);
        let (mask_set, mask_clear) = match enable {
            true => (mask, 0),
            false => (0, mask),
        };
        self.i2c
            .update_reg(self.addr, Regs::OptoEncEnable.into(), mask_set, mask_clear)
    }

    pub fn opto_encoder_get(&mut self, enc: u8) -> Result<bool> {
        let enc = codec::channel("opto encoder", enc as i64, regs::OPTO_ENC_CH_MAX)?;
        Ok(self.i2c.read_reg(self.addr, Regs::OptoEncEnable.into())? & codec::channel_mask(enc) != 0)
    }

    pub fn opto_encoder_count_get(&mut self, enc: u8) -> Result<i32> {
        let enc = codec::channel("opto encoder", enc as i64, regs::OPTO_ENC_CH_MAX)?;
        self.i2c.read_i32(self.addr, Regs::OptoEncCount.at(enc, 4))
    }

    pub fn opto_encoder_count_reset(&mut self, enc: u8) -> Result<()> {
        let enc = codec::channel("opto encoder", enc as i64, regs::OPTO_ENC_CH_MAX)?;
        self.i2c.write_reg(self.addr, Regs::OptoEncCntRst.into(), enc)
    }

    /// Arm open-drain `od_ch` to emit `count` pulses on every rising edge of opto `in_ch`.
    pub fn opto_pulse_trigger_set(&mut self, in_ch: u8, od_ch: u8, count: u32) -> Result<()> {
        let in_ch = codec::channel("opto input", in_ch as i64, regs::OPTO_CH_MAX)?;
        let od_ch = codec::channel("open drain", od_ch as i64, regs::OD_PULSE_CH_MAX)?;
        self.i2c.write_regs(
            self.addr,
            Regs::OptoOdCmd.into(),
            &codec::input_cmd_record(count, od_ch, in_ch),
        )
    }
}
