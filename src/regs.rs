//! Memory map of the PLC Pi08 board.

/// Address of the board at stack level 0; level `n` answers at `BASE_ADDRESS + n`.
pub const BASE_ADDRESS: u8 = 0x28;
pub const STACK_LEVEL_MAX: u8 = 7;

pub const RELAY_CH_MAX: u8 = 8;
pub const OPTO_CH_MAX: u8 = 8;
pub const OPTO_ENC_CH_MAX: u8 = 4;
pub const OD_CH_MAX: u8 = 4;
/// Pulse channels 5..8 drive open-drain outputs 1..4 in the opposite direction.
pub const OD_PULSE_CH_MAX: u8 = 2 * OD_CH_MAX;

/// Full-scale raw PWM count (100%).
pub const OD_PWM_VAL_MAX: u16 = 10000;

pub const PWM_FREQ_MIN: u16 = 10;
pub const PWM_FREQ_MAX: u16 = 65500;

pub const MOVE_ACC_MAX: u16 = 60000;
pub const MOVE_SPEED_MIN: u16 = 10;
pub const MOVE_SPEED_MAX: u16 = 60000;

/// Minimum hardware major revision carrying the frequency and motion-profile registers.
pub const HW_VERSION_PWM_FREQ: u8 = 3;

pub const PULSE_SAVE_MASK: u8 = 0x10;
pub const PULSE_EXEC_MASK: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regs {
    RelayVal = 0x00,
    OptoInVal = 0x03,
    OptoItRising = 0x04,
    OptoItFalling = 0x05,
    OptoEncEnable = 0x06,
    OptoCntRst = 0x07,
    OptoEncCntRst = 0x08,
    GpioEncCntRst = 0x09,
    OdPwmValRaw = 0x0a,
    OdPwmFrequency = 0x12,
    OdPwmFrequencyCh1 = 0x14,
    OdPulseSetValue = 0x1c,
    OdPulseSetCmd = 0x21,
    OdPulseCount = 0x22,
    OdProfileAcc = 0x32,
    OdProfileCmd = 0x3a,
    EncoderLimit = 0x3b,
    OptoOdCmd = 0x40,
    OptoEdgeCount = 0x46,
    OptoEncCount = 0x66,
    GpioEncCount = 0x76,
    DiagTemperature = 0x7a,
    Diag3v3Mv = 0x7b,
    RevisionHwMajor = 0x7d,
    RevisionHwMinor = 0x7e,
    RevisionMajor = 0x7f,
    RevisionMinor = 0x80,
    DbgCmd = 0xf0,
    DbgFifoSize = 0xf1,
    DbgFifo = 0xf3,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

impl Regs {
    /// Offset of the `channel`-th (1-based) element of a register array starting at `self`.
    pub fn at(self, channel: u8, width: u8) -> u8 {
        u8::from(self) + width * (channel - 1)
    }
}
