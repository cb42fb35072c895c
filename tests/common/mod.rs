//! Simulated card stack for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use plcpi::cli::Shell;
use plcpi::config::Settings;
use plcpi::{Connector, Result};

pub const RELAY_VAL: u8 = 0x00;
pub const OD_PULSE_SET_VALUE: u8 = 0x1c;
pub const OD_PULSE_SET_CMD: u8 = 0x21;
pub const OD_PULSE_COUNT: u8 = 0x22;
pub const OPTO_CNT_RST: u8 = 0x07;
pub const OPTO_EDGE_COUNT: u8 = 0x46;

/// Register file of one card, with the few registers the firmware acts on.
pub struct SimCard {
    pub regs: [u8; 256],
    staged: [u32; 8],
    pub stuck_relays: bool,
}

impl SimCard {
    pub fn new(hw_major: u8) -> Self {
        let mut regs = [0u8; 256];
        regs[0x7a] = 35;
        regs[0x7b..0x7d].copy_from_slice(&3300u16.to_le_bytes());
        regs[0x7d] = hw_major;
        regs[0x7e] = 0;
        regs[0x7f] = 1;
        regs[0x80] = 4;
        Self {
            regs,
            staged: [0; 8],
            stuck_relays: false,
        }
    }

    fn write(&mut self, reg: u8, data: &[u8]) {
        match reg {
            RELAY_VAL if self.stuck_relays => {}
            OD_PULSE_SET_VALUE if data.len() == 5 => {
                let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
                let tag = data[4];
                let ch = (tag & 0x0f) as usize;
                if !(1..=8).contains(&ch) {
                    return;
                }
                if tag & 0x10 != 0 {
                    self.staged[ch - 1] = count;
                } else {
                    self.set_active(ch, count);
                }
            }
            OD_PULSE_SET_CMD if data.len() == 1 => {
                if data[0] & 0x20 != 0 {
                    let ch = (data[0] & 0x0f) as usize;
                    if (1..=8).contains(&ch) {
                        self.set_active(ch, self.staged[ch - 1]);
                    }
                }
            }
            OPTO_CNT_RST if data.len() == 1 => {
                let ch = data[0] as usize;
                if (1..=8).contains(&ch) {
                    let at = OPTO_EDGE_COUNT as usize + (ch - 1) * 4;
                    self.regs[at..at + 4].fill(0);
                }
            }
            _ => {
                for (i, b) in data.iter().enumerate() {
                    self.regs[(reg as usize + i) % 256] = *b;
                }
            }
        }
    }

    fn set_active(&mut self, ch: usize, count: u32) {
        // only outputs 1..4 report their remaining count
        if ch <= 4 {
            let at = OD_PULSE_COUNT as usize + (ch - 1) * 4;
            self.regs[at..at + 4].copy_from_slice(&count.to_le_bytes());
        }
    }
}

#[derive(Default)]
struct SimState {
    cards: BTreeMap<u8, SimCard>,
    transactions: usize,
}

/// Shared handle to the simulated bus.  Clones see the same cards.
#[derive(Clone, Default)]
pub struct SimBus(Rc<RefCell<SimState>>);

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a card at `stack` with the given hardware major revision.
    pub fn with_card(self, stack: u8, hw_major: u8) -> Self {
        self.0
            .borrow_mut()
            .cards
            .insert(0x28 + stack, SimCard::new(hw_major));
        self
    }

    pub fn card<T>(&self, stack: u8, f: impl FnOnce(&mut SimCard) -> T) -> T {
        let mut state = self.0.borrow_mut();
        let card = state.cards.get_mut(&(0x28 + stack)).unwrap();
        f(card)
    }

    pub fn reg(&self, stack: u8, reg: u8) -> u8 {
        self.card(stack, |c| c.regs[reg as usize])
    }

    pub fn regs(&self, stack: u8, reg: u8, len: usize) -> Vec<u8> {
        self.card(stack, |c| c.regs[reg as usize..reg as usize + len].to_vec())
    }

    pub fn transactions(&self) -> usize {
        self.0.borrow().transactions
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> std::result::Result<(), ErrorKind> {
        let mut state = self.0.borrow_mut();
        state.transactions += 1;
        let card = state
            .cards
            .get_mut(&address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;

        let mut ptr = 0usize;
        for op in operations {
            match op {
                Operation::Write(data) => {
                    if let Some((&reg, rest)) = data.split_first() {
                        ptr = reg as usize;
                        if !rest.is_empty() {
                            card.write(reg, rest);
                            ptr += rest.len();
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = card.regs[ptr % 256];
                        ptr += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct SimConnector(pub SimBus);

impl Connector for SimConnector {
    type Bus = SimBus;

    fn connect(&mut self) -> Result<SimBus> {
        Ok(self.0.clone())
    }
}

/// Captured command output.
#[derive(Clone, Default)]
pub struct Output(Rc<RefCell<Vec<u8>>>);

impl Output {
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8(bytes).unwrap()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn shell(bus: &SimBus) -> (Shell<SimConnector>, Output) {
    shell_with(bus, Settings::default())
}

pub fn shell_with(bus: &SimBus, settings: Settings) -> (Shell<SimConnector>, Output) {
    let out = Output::default();
    let shell = Shell::new(SimConnector(bus.clone()), settings, Box::new(out.clone()))
        .with_delay(embedded_hal_mock::eh1::delay::NoopDelay::new());
    (shell, out)
}

pub fn argv(line: &str) -> Vec<String> {
    std::iter::once("plcpi")
        .chain(line.split_whitespace())
        .map(str::to_string)
        .collect()
}
