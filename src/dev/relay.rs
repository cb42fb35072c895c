//! Relay outputs: one bitmask register, bit `n-1` drives relay `n`.
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::regs::{self, Regs};
use crate::{codec, Board, Error, I2cExt, Result};

/// Relays switched in this order by the self-test sweep.
const TEST_ORDER: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

impl<I2C: I2c> Board<I2C> {
    pub fn relay_set(&mut self, ch: u8, on: bool) -> Result<()> {
        let ch = codec::channel("relay", ch as i64, regs::RELAY_CH_MAX)?;
        let mask = codec::channel_mask(ch);
        let (mask_set, mask_clear) = match on {
            true => (mask, 0),
            false => (0, mask),
        };
        self.i2c
            .update_reg(self.addr, Regs::RelayVal.into(), mask_set, mask_clear)
    }

    pub fn relay_get(&mut self, ch: u8) -> Result<bool> {
        let ch = codec::channel("relay", ch as i64, regs::RELAY_CH_MAX)?;
        Ok(self.relays_get()? & codec::channel_mask(ch) != 0)
    }

    pub fn relays_set(&mut self, value: u8) -> Result<()> {
        self.i2c.write_reg(self.addr, Regs::RelayVal.into(), value)
    }

    pub fn relays_get(&mut self) -> Result<u8> {
        self.i2c.read_reg(self.addr, Regs::RelayVal.into())
    }

    /// Switch one relay and confirm the new state by reading it back.
    ///
    /// Bus failures are returned immediately; only a read-back mismatch is retried.
    pub fn relay_write_verified(&mut self, ch: u8, on: bool) -> Result<()> {
        for attempt in 1..=self.retries {
            self.relay_set(ch, on)?;
            if self.relay_get(ch)? == on {
                if attempt > 1 {
                    tracing::debug!("relay {} confirmed after {} attempts", ch, attempt);
                }
                return Ok(());
            }
        }
        Err(Error::VerifyFailed(self.retries))
    }

    /// Write the whole relay register and confirm it by reading it back.
    pub fn relays_write_verified(&mut self, value: u8) -> Result<()> {
        for attempt in 1..=self.retries {
            self.relays_set(value)?;
            if self.relays_get()? == value {
                if attempt > 1 {
                    tracing::debug!("relays 0x{:02x} confirmed after {} attempts", value, attempt);
                }
                return Ok(());
            }
        }
        Err(Error::VerifyFailed(self.retries))
    }

    /// Sweep all relays on, then off, until `answer` yields a verdict.
    ///
    /// `answer` is polled before every step.  All relays are switched off once the sweep stops.
    pub fn relay_test<D: DelayNs>(
        &mut self,
        delay: &mut D,
        step_ms: u32,
        mut answer: impl FnMut() -> Option<bool>,
    ) -> Result<bool> {
        let verdict = 'sweep: loop {
            for on in [true, false] {
                for &ch in TEST_ORDER.iter() {
                    if let Some(v) = answer() {
                        break 'sweep v;
                    }
                    self.relay_step(ch, on)?;
                    delay.delay_ms(step_ms);
                }
            }
        };
        self.relays_set(0)?;
        Ok(verdict)
    }

    fn relay_step(&mut self, ch: u8, on: bool) -> Result<()> {
        let mask = codec::channel_mask(ch);
        for _ in 0..self.retries {
            self.relay_set(ch, on)?;
            if (self.relays_get()? & mask != 0) == on {
                return Ok(());
            }
        }
        Err(Error::VerifyFailed(self.retries))
    }
}
