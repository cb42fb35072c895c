//! Open-drain outputs: PWM duty cycle, PWM frequency, pulse trains and motion profiles.
//!
//! Pulse trains support a two-phase protocol: a count can be staged per channel and later
//! started with a one-byte execute command, so several channels can be loaded ahead of a
//! synchronized start.  Motion profiles use the same pattern (parameters first, then a command
//! byte selecting the channel).
use embedded_hal::i2c::I2c;

use crate::codec::{self, MoveProfile};
use crate::regs::{self, Regs};
use crate::{Board, I2cExt, Result};

impl<I2C: I2c> Board<I2C> {
    /// Set the PWM duty cycle of `ch` in percent.  Values outside `[0, 100]` are clamped.
    pub fn od_pwm_set(&mut self, ch: u8, percent: f64) -> Result<()> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        let raw = codec::percent_to_raw(percent);
        tracing::debug!("od {} pwm {}% -> raw {}", ch, percent, raw);
        self.i2c
            .write_u16(self.addr, Regs::OdPwmValRaw.at(ch, 2), raw)
    }

    pub fn od_pwm_get(&mut self, ch: u8) -> Result<f64> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        let raw = self.i2c.read_u16(self.addr, Regs::OdPwmValRaw.at(ch, 2))?;
        Ok(codec::raw_to_percent(raw))
    }

    /// Start `count` pulses on pulse channel `ch` (1..=8) right away.
    pub fn od_pulses_set(&mut self, ch: u8, count: u32) -> Result<()> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_PULSE_CH_MAX)?;
        self.i2c.write_regs(
            self.addr,
            Regs::OdPulseSetValue.into(),
            &codec::count_record(count, ch),
        )
    }

    /// Stage `count` pulses for `ch` without starting them.
    pub fn od_pulses_save(&mut self, ch: u8, count: u32) -> Result<()> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_PULSE_CH_MAX)?;
        self.i2c.write_regs(
            self.addr,
            Regs::OdPulseSetValue.into(),
            &codec::count_record(count, codec::pulse_save_tag(ch)),
        )
    }

    /// Start the pulses previously staged for `ch`.
    pub fn od_pulses_exec(&mut self, ch: u8) -> Result<()> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_PULSE_CH_MAX)?;
        self.i2c
            .write_reg(self.addr, Regs::OdPulseSetCmd.into(), codec::pulse_exec_cmd(ch))
    }

    pub fn od_pulses_reset(&mut self, ch: u8) -> Result<()> {
        self.od_pulses_set(ch, 0)
    }

    /// Pulses still to be emitted on output `ch` (1..=4).
    pub fn od_pulses_get(&mut self, ch: u8) -> Result<u32> {
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        self.i2c.read_u32(self.addr, Regs::OdPulseCount.at(ch, 4))
    }

    pub fn pwm_freq_get(&mut self) -> Result<u16> {
        self.require_hw(regs::HW_VERSION_PWM_FREQ)?;
        self.i2c.read_u16(self.addr, Regs::OdPwmFrequency.into())
    }

    /// Set the PWM frequency of all outputs, clamped to `[10, 65500]` Hz.
    pub fn pwm_freq_set(&mut self, hz: i64) -> Result<()> {
        self.require_hw(regs::HW_VERSION_PWM_FREQ)?;
        let hz = codec::clamp_pwm_freq(hz);
        self.i2c
            .write_u16(self.addr, Regs::OdPwmFrequency.into(), hz)
    }

    /// Set the PWM frequency of a single output, clamped to `[10, 65500]` Hz.
    pub fn pwm_ch_freq_set(&mut self, ch: u8, hz: i64) -> Result<()> {
        self.require_hw(regs::HW_VERSION_PWM_FREQ)?;
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        let hz = codec::clamp_pwm_freq(hz);
        self.i2c
            .write_u16(self.addr, Regs::OdPwmFrequencyCh1.at(ch, 2), hz)
    }

    /// Load a motion profile and apply it to output `ch`.
    pub fn od_profile_set(&mut self, ch: u8, profile: &MoveProfile) -> Result<()> {
        self.require_hw(regs::HW_VERSION_PWM_FREQ)?;
        let ch = codec::channel("open drain", ch as i64, regs::OD_CH_MAX)?;
        self.i2c
            .write_regs(self.addr, Regs::OdProfileAcc.into(), &profile.to_bytes())?;
        self.i2c.write_reg(self.addr, Regs::OdProfileCmd.into(), ch)
    }
}
