//! Command handlers
//!
//! Handlers check the argument count and parse every value before the board is opened, so a
//! usage error never reaches the bus.
use std::fs::File;
use std::io::Write;

use super::{CliError, CliResult, Shell};
use crate::codec::{self, EdgeMode, MoveProfile};
use crate::regs;
use crate::{Board, Connector, Error, Result};

const WARRANTY: &str = "\
This program is distributed under the terms of the MIT or Apache-2.0 license, at your option.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.";

pub(super) fn int(what: &'static str, arg: &str) -> Result<i64> {
    arg.trim().parse().map_err(|_| Error::InvalidValue {
        what,
        value: arg.to_string(),
    })
}

fn count(what: &'static str, arg: &str) -> Result<u32> {
    arg.trim().parse().map_err(|_| Error::InvalidValue {
        what,
        value: arg.to_string(),
    })
}

fn float(what: &'static str, arg: &str) -> Result<f64> {
    match arg.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidValue {
            what,
            value: arg.to_string(),
        }),
    }
}

fn channel(what: &'static str, arg: &str, max: u8) -> Result<u8> {
    codec::channel(what, int(what, arg)?, max)
}

fn on_off(arg: &str) -> Result<bool> {
    match arg.trim().to_ascii_lowercase().as_str() {
        "1" | "on" | "up" => Ok(true),
        "0" | "off" | "down" => Ok(false),
        _ => Err(Error::InvalidValue {
            what: "relay state",
            value: arg.to_string(),
        }),
    }
}

fn in_range(what: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value < min || value > max {
        return Err(Error::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn arg_count(argv: &[String], n: usize) -> CliResult<()> {
    match argv.len() == n {
        true => Ok(()),
        false => Err(CliError::ArgCount),
    }
}

pub(super) fn version<C: Connector>(sh: &mut Shell<C>, _argv: &[String]) -> CliResult<()> {
    sh.line(format_args!("plcpi v{}", env!("CARGO_PKG_VERSION")))?;
    sh.line("")?;
    sh.line("This is free software with ABSOLUTELY NO WARRANTY.")?;
    sh.line("For details type: plcpi -warranty")
}

pub(super) fn warranty<C: Connector>(sh: &mut Shell<C>, _argv: &[String]) -> CliResult<()> {
    sh.line(WARRANTY)
}

pub(super) fn help<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    let table = sh.table().to_vec();
    if let Some(name) = argv.get(2) {
        match table.iter().find(|cmd| cmd.name.eq_ignore_ascii_case(name)) {
            Some(cmd) => {
                sh.text(cmd.help)?;
                sh.text(cmd.usage1)?;
                sh.text(cmd.usage2)?;
                sh.text(cmd.example)?;
            }
            None => {
                sh.line(format_args!("Option \"{}\" not found", name))?;
                if let Some(first) = table.first() {
                    sh.text(first.help)?;
                }
            }
        }
    } else {
        for cmd in &table {
            sh.text(cmd.help)?;
        }
    }
    Ok(())
}

pub(super) fn list<C: Connector>(sh: &mut Shell<C>, _argv: &[String]) -> CliResult<()> {
    let mut bus = sh.bus()?;
    let ids: Vec<u8> = (0..=regs::STACK_LEVEL_MAX)
        .filter(|&stack| Board::is_present(&mut bus, stack as i64))
        .collect();

    sh.line(format_args!("{} board(s) detected", ids.len()))?;
    if !ids.is_empty() {
        let levels: Vec<String> = ids.iter().rev().map(|id| id.to_string()).collect();
        sh.line(format_args!("Id: {}", levels.join(" ")))?;
    }
    Ok(())
}

pub(super) fn board<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 3)?;
    let info = sh.board(argv)?.info()?;
    let rev = info.revision;
    sh.line(format_args!(
        "Hardware {:02}.{:02}, Firmware {:02}.{:02}, CPU temperature {} C, voltage {:.2} V",
        rev.hw_major, rev.hw_minor, rev.fw_major, rev.fw_minor, info.temperature, info.voltage
    ))
}

#[cfg(feature = "hw-debug")]
pub(super) fn error_log<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 3)?;
    let log = sh.board(argv)?.error_log()?;
    sh.line(String::from_utf8_lossy(&log))?;
    for row in log.chunks(16) {
        let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
        sh.line(hex.join(" "))?;
    }
    Ok(())
}

pub(super) fn relay_write<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    match argv.len() {
        5 => {
            let ch = channel("relay", &argv[3], regs::RELAY_CH_MAX)?;
            let on = on_off(&argv[4])?;
            sh.board(argv)?.relay_write_verified(ch, on)?;
        }
        4 => {
            let value = int("relays value", &argv[3])?;
            let value = in_range("relays value", value as f64, 0.0, 255.0)? as u8;
            sh.board(argv)?.relays_write_verified(value)?;
        }
        _ => return Err(CliError::ArgCount),
    }
    Ok(())
}

pub(super) fn relay_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    match argv.len() {
        4 => {
            let ch = channel("relay", &argv[3], regs::RELAY_CH_MAX)?;
            let on = sh.board(argv)?.relay_get(ch)?;
            sh.line(on as u8)
        }
        3 => {
            let value = sh.board(argv)?.relays_get()?;
            sh.line(value)
        }
        _ => Err(CliError::ArgCount),
    }
}

pub(super) fn relay_test<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    if argv.len() != 3 && argv.len() != 4 {
        return Err(CliError::ArgCount);
    }
    let mut board = sh.board(argv)?;

    let mut report = match argv.get(3) {
        Some(path) => match File::create(path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("cannot create {}: {}", path, e);
                sh.line("Fail to open result file")?;
                None
            }
        },
        None => None,
    };

    sh.line("Are all relays and LEDs turning on and off in sequence?")?;
    sh.text("Press y for Yes or any key for No....")?;

    let keys = (sh.keys)()?;
    let step_ms = sh.settings().test_step_ms;
    let mut delay = sh.delay.as_mut();
    let passed = board.relay_test(&mut delay, step_ms, || keys.poll())?;
    drop(keys);
    sh.line("")?;

    let verdict = match passed {
        true => "Relay Test ............................ PASS",
        false => "Relay Test ............................ FAIL!",
    };
    match report.as_mut() {
        Some(file) => {
            writeln!(file, "{}", verdict).map_err(|e| Error::io("writing result file", e))?
        }
        None => sh.line(verdict)?,
    }
    Ok(())
}

pub(super) fn opto_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    match argv.len() {
        4 => {
            let ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
            let on = sh.board(argv)?.opto_get(ch)?;
            sh.line(on as u8)
        }
        3 => {
            let value = sh.board(argv)?.optos_get()?;
            sh.line(value)
        }
        _ => Err(CliError::ArgCount),
    }
}

pub(super) fn opto_edge_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
    let mode = sh.board(argv)?.opto_edge_get(ch)?;
    sh.line(mode as u8)
}

pub(super) fn opto_edge_write<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 5)?;
    let ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
    let mode = EdgeMode::try_from(int("edge mode", &argv[4])?)?;
    sh.board(argv)?.opto_edge_set(ch, mode)?;
    sh.line("done")
}

pub(super) fn opto_count_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
    let count = sh.board(argv)?.opto_count_get(ch)?;
    sh.line(count)
}

pub(super) fn opto_count_reset<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
    sh.board(argv)?.opto_count_reset(ch)?;
    sh.line("done")
}

pub(super) fn opto_encoder_write<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 5)?;
    let enc = channel("opto encoder", &argv[3], regs::OPTO_ENC_CH_MAX)?;
    let enable = match int("encoder state", &argv[4])? {
        0 => false,
        1 => true,
        v => {
            return Err(Error::OutOfRange {
                what: "encoder state",
                value: v as f64,
                min: 0.0,
                max: 1.0,
            }
            .into())
        }
    };
    sh.board(argv)?.opto_encoder_set(enc, enable)?;
    sh.line("done")
}

pub(super) fn opto_encoder_read<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 4)?;
    let enc = channel("opto encoder", &argv[3], regs::OPTO_ENC_CH_MAX)?;
    let enabled = sh.board(argv)?.opto_encoder_get(enc)?;
    sh.line(enabled as u8)
}

pub(super) fn opto_encoder_count_read<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 4)?;
    let enc = channel("opto encoder", &argv[3], regs::OPTO_ENC_CH_MAX)?;
    let count = sh.board(argv)?.opto_encoder_count_get(enc)?;
    sh.line(count)
}

pub(super) fn opto_encoder_count_reset<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 4)?;
    let enc = channel("opto encoder", &argv[3], regs::OPTO_ENC_CH_MAX)?;
    sh.board(argv)?.opto_encoder_count_reset(enc)?;
    sh.line("done")
}

pub(super) fn encoder_count_read<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 3)?;
    let count = sh.board(argv)?.gpio_encoder_count_get()?;
    sh.line(count)
}

pub(super) fn encoder_count_reset<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 3)?;
    sh.board(argv)?.gpio_encoder_count_reset()?;
    sh.line("done")
}

pub(super) fn encoder_threshold_write<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 5)?;
    let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
    let limit = count("encoder limit", &argv[4])?;
    sh.board(argv)?.encoder_threshold_set(ch, limit)?;
    sh.line("done")
}

pub(super) fn input_command<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 6)?;
    let in_ch = channel("opto input", &argv[3], regs::OPTO_CH_MAX)?;
    let od_ch = channel("open drain", &argv[4], regs::OD_PULSE_CH_MAX)?;
    let pulses = count("pulse count", &argv[5])?;
    sh.board(argv)?.opto_pulse_trigger_set(in_ch, od_ch, pulses)?;
    sh.line("done")
}

pub(super) fn od_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
    let percent = sh.board(argv)?.od_pwm_get(ch)?;
    sh.line(format_args!("{:.2}", percent))
}

pub(super) fn od_write<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 5)?;
    let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
    let percent = in_range("pwm value", float("pwm value", &argv[4])?, 0.0, 100.0)?;
    sh.board(argv)?.od_pwm_set(ch, percent)?;
    sh.line("done")
}

pub(super) fn od_count_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
    let pulses = sh.board(argv)?.od_pulses_get(ch)?;
    sh.line(pulses)
}

pub(super) fn od_count_write<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 5)?;
    let ch = channel("open drain", &argv[3], regs::OD_PULSE_CH_MAX)?;
    let pulses = count("pulse count", &argv[4])?;
    sh.board(argv)?.od_pulses_set(ch, pulses)?;
    sh.line("done")
}

pub(super) fn od_count_save<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 5)?;
    let ch = channel("open drain", &argv[3], regs::OD_PULSE_CH_MAX)?;
    let pulses = count("pulse count", &argv[4])?;
    sh.board(argv)?.od_pulses_save(ch, pulses)?;
    sh.line("done")
}

pub(super) fn od_count_exec<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("open drain", &argv[3], regs::OD_PULSE_CH_MAX)?;
    sh.board(argv)?.od_pulses_exec(ch)?;
    sh.line("done")
}

pub(super) fn od_count_reset<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 4)?;
    let ch = channel("open drain", &argv[3], regs::OD_PULSE_CH_MAX)?;
    sh.board(argv)?.od_pulses_reset(ch)?;
    sh.line("done")
}

pub(super) fn pwm_freq_read<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    arg_count(argv, 3)?;
    let hz = sh.board(argv)?.pwm_freq_get()?;
    sh.line(format_args!("{} Hz", hz))
}

pub(super) fn pwm_freq_write<C: Connector>(sh: &mut Shell<C>, argv: &[String]) -> CliResult<()> {
    let freq = |arg: &str| -> Result<i64> {
        let hz = float("pwm frequency", arg)?;
        let hz = in_range(
            "pwm frequency",
            hz,
            regs::PWM_FREQ_MIN as f64,
            regs::PWM_FREQ_MAX as f64,
        )?;
        Ok(hz as i64)
    };

    match argv.len() {
        4 => {
            let hz = freq(&argv[3])?;
            sh.board(argv)?.pwm_freq_set(hz)?;
        }
        5 => {
            let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
            let hz = freq(&argv[4])?;
            sh.board(argv)?.pwm_ch_freq_set(ch, hz)?;
        }
        _ => return Err(CliError::ArgCount),
    }
    sh.line("done")
}

pub(super) fn move_profile_write<C: Connector>(
    sh: &mut Shell<C>,
    argv: &[String],
) -> CliResult<()> {
    arg_count(argv, 8)?;
    let ch = channel("open drain", &argv[3], regs::OD_CH_MAX)?;
    let profile = MoveProfile::new(
        int("acceleration", &argv[4])?,
        int("deceleration", &argv[5])?,
        int("min speed", &argv[6])?,
        int("max speed", &argv[7])?,
    )?;
    sh.board(argv)?.od_profile_set(ch, &profile)?;
    sh.line("done")
}
