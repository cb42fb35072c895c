//! Conversions between engineering units and raw register contents.
//!
//! Everything here is pure; the board methods in [`crate::dev`] put the results on the bus.
use crate::regs;
use crate::{Error, Result};

/// Validate a 1-based channel number against `1..=max`.
pub fn channel(what: &'static str, ch: i64, max: u8) -> Result<u8> {
    if ch < 1 || ch > max as i64 {
        return Err(Error::InvalidChannel {
            what,
            channel: ch,
            min: 1,
            max,
        });
    }
    Ok(ch as u8)
}

/// Bit of `channel` in an 8-channel bitmask register.
pub fn channel_mask(ch: u8) -> u8 {
    1 << (ch - 1)
}

/// PWM duty cycle in percent to raw count, clamped to `[0, 100]` first.
pub fn percent_to_raw(percent: f64) -> u16 {
    let percent = percent.clamp(0.0, 100.0);
    (regs::OD_PWM_VAL_MAX as f64 * percent / 100.0).ceil() as u16
}

pub fn raw_to_percent(raw: u16) -> f64 {
    100.0 * raw as f64 / regs::OD_PWM_VAL_MAX as f64
}

/// PWM frequency in Hz, clamped to what the firmware accepts.
pub fn clamp_pwm_freq(hz: i64) -> u16 {
    hz.clamp(regs::PWM_FREQ_MIN as i64, regs::PWM_FREQ_MAX as i64) as u16
}

pub fn millivolts_to_volts(mv: u16) -> f64 {
    mv as f64 / 1000.0
}

/// `u32` value followed by a channel/command byte, as used by the pulse and threshold registers.
pub fn count_record(count: u32, tag: u8) -> [u8; 5] {
    let mut buf = [0u8; 5];
    buf[..4].copy_from_slice(&count.to_le_bytes());
    buf[4] = tag;
    buf
}

/// Channel byte marking a pulse record as staged rather than started.
pub fn pulse_save_tag(ch: u8) -> u8 {
    ch | regs::PULSE_SAVE_MASK
}

/// Command byte starting the staged pulses of `ch`.
pub fn pulse_exec_cmd(ch: u8) -> u8 {
    (ch & 0x0f) | regs::PULSE_EXEC_MASK
}

/// Record arming `count` pulses on open-drain `od_ch` for every rising edge of opto `in_ch`.
pub fn input_cmd_record(count: u32, od_ch: u8, in_ch: u8) -> [u8; 6] {
    let mut buf = [0u8; 6];
    buf[..4].copy_from_slice(&count.to_le_bytes());
    buf[4] = od_ch;
    buf[5] = in_ch;
    buf
}

/// Which edges an optocoupled input counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    None = 0,
    Rising = 1,
    Falling = 2,
    Both = 3,
}

impl EdgeMode {
    pub fn from_bits(rising: bool, falling: bool) -> Self {
        match (rising, falling) {
            (false, false) => EdgeMode::None,
            (true, false) => EdgeMode::Rising,
            (false, true) => EdgeMode::Falling,
            (true, true) => EdgeMode::Both,
        }
    }

    pub fn rising(self) -> bool {
        matches!(self, EdgeMode::Rising | EdgeMode::Both)
    }

    pub fn falling(self) -> bool {
        matches!(self, EdgeMode::Falling | EdgeMode::Both)
    }
}

impl TryFrom<i64> for EdgeMode {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self> {
        match v {
            0 => Ok(EdgeMode::None),
            1 => Ok(EdgeMode::Rising),
            2 => Ok(EdgeMode::Falling),
            3 => Ok(EdgeMode::Both),
            _ => Err(Error::OutOfRange {
                what: "edge mode",
                value: v as f64,
                min: 0.0,
                max: 3.0,
            }),
        }
    }
}

/// Acceleration/speed profile applied to an open-drain pulse output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProfile {
    pub acc: u16,
    pub dec: u16,
    pub min_speed: u16,
    pub max_speed: u16,
}

impl MoveProfile {
    pub fn new(acc: i64, dec: i64, min_speed: i64, max_speed: i64) -> Result<Self> {
        let acc = in_range("acceleration", acc, 0, regs::MOVE_ACC_MAX)?;
        let dec = in_range("deceleration", dec, 0, regs::MOVE_ACC_MAX)?;
        let max_speed = in_range(
            "max speed",
            max_speed,
            regs::MOVE_SPEED_MIN,
            regs::MOVE_SPEED_MAX,
        )?;
        let min_speed = in_range("min speed", min_speed, regs::MOVE_SPEED_MIN, max_speed)?;
        Ok(Self {
            acc,
            dec,
            min_speed,
            max_speed,
        })
    }

    /// Wire layout: acceleration, deceleration, max speed, min speed.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..2].copy_from_slice(&self.acc.to_le_bytes());
        buf[2..4].copy_from_slice(&self.dec.to_le_bytes());
        buf[4..6].copy_from_slice(&self.max_speed.to_le_bytes());
        buf[6..8].copy_from_slice(&self.min_speed.to_le_bytes());
        buf
    }
}

fn in_range(what: &'static str, v: i64, min: u16, max: u16) -> Result<u16> {
    if v < min as i64 || v > max as i64 {
        return Err(Error::OutOfRange {
            what,
            value: v as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(v as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(12.5, 1250)]
    #[case(33.333, 3334)]
    #[case(100.0, 10000)]
    #[case(150.0, 10000)]
    #[case(-5.0, 0)]
    fn percent_is_clamped_then_rounded_up(#[case] percent: f64, #[case] raw: u16) {
        assert_eq!(percent_to_raw(percent), raw);
    }

    #[test]
    fn raw_back_to_percent() {
        assert_eq!(raw_to_percent(1250), 12.5);
        assert_eq!(raw_to_percent(regs::OD_PWM_VAL_MAX), 100.0);
    }

    #[rstest]
    #[case(0, 10)]
    #[case(9, 10)]
    #[case(10, 10)]
    #[case(200, 200)]
    #[case(65500, 65500)]
    #[case(70000, 65500)]
    #[case(-3, 10)]
    fn pwm_frequency_clamps(#[case] hz: i64, #[case] expected: u16) {
        assert_eq!(clamp_pwm_freq(hz), expected);
    }

    #[test]
    fn channel_bounds() {
        assert_eq!(channel("relay", 1, 8).unwrap(), 1);
        assert_eq!(channel("relay", 8, 8).unwrap(), 8);
        assert!(matches!(
            channel("relay", 0, 8),
            Err(Error::InvalidChannel { channel: 0, .. })
        ));
        assert!(channel("relay", 9, 8).is_err());
        assert!(channel("relay", -1, 8).is_err());
    }

    #[test]
    fn pulse_records() {
        assert_eq!(count_record(100, 2), [100, 0, 0, 0, 2]);
        assert_eq!(
            count_record(0x12345678, pulse_save_tag(6)),
            [0x78, 0x56, 0x34, 0x12, 0x16]
        );
        assert_eq!(pulse_exec_cmd(2), 0x22);
        assert_eq!(pulse_exec_cmd(8), 0x28);
        assert_eq!(input_cmd_record(1000, 1, 2), [0xe8, 0x03, 0, 0, 1, 2]);
    }

    #[test]
    fn move_profile_layout() {
        let p = MoveProfile::new(1000, 500, 1000, 20000).unwrap();
        assert_eq!(
            p.to_bytes(),
            [0xe8, 0x03, 0xf4, 0x01, 0x20, 0x4e, 0xe8, 0x03]
        );
    }

    #[rstest]
    #[case(-1, 0, 10, 100)]
    #[case(60001, 0, 10, 100)]
    #[case(0, 60001, 10, 100)]
    #[case(0, 0, 10, 9)]
    #[case(0, 0, 10, 60001)]
    #[case(0, 0, 200, 100)]
    #[case(0, 0, 5, 100)]
    fn move_profile_rejects(
        #[case] acc: i64,
        #[case] dec: i64,
        #[case] min: i64,
        #[case] max: i64,
    ) {
        assert!(matches!(
            MoveProfile::new(acc, dec, min, max),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn edge_modes() {
        for v in 0..4 {
            let m = EdgeMode::try_from(v).unwrap();
            assert_eq!(EdgeMode::from_bits(m.rising(), m.falling()), m);
            assert_eq!(m as i64, v);
        }
        assert!(EdgeMode::try_from(4).is_err());
    }
}
