//! Background key-press watcher for the interactive relay test.
//!
//! A helper thread blocks on a single byte of input and reports it over a channel; the caller
//! polls the channel between relay steps.
use std::io::{IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use nix::sys::termios::{self, LocalFlags, SetArg, Termios};

use crate::{Error, Result};

pub struct KeyWatcher {
    rx: Receiver<u8>,
    saved: Option<Termios>,
}

impl KeyWatcher {
    /// Watch standard input.  A terminal is switched to unbuffered, no-echo input until the key
    /// arrives or the watcher is dropped.
    pub fn spawn() -> Result<Self> {
        let saved = if std::io::stdin().is_terminal() {
            Some(raw_mode()?)
        } else {
            None
        };
        let mut watcher = Self::spawn_with(std::io::stdin())?;
        watcher.saved = saved;
        Ok(watcher)
    }

    /// Watch an arbitrary byte source.
    pub fn spawn_with<R: Read + Send + 'static>(mut input: R) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("keypress".into())
            .spawn(move || {
                let mut key = [0u8; 1];
                let key = match input.read(&mut key) {
                    Ok(1) => key[0],
                    _ => 0,
                };
                // receiver may already be gone
                let _ = tx.send(key);
            })
            .map_err(|e| Error::io("spawning key watcher", e))?;
        Ok(Self { rx, saved: None })
    }

    /// `None` while no key was pressed, then whether the answer was yes.
    pub fn poll(&self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(key) => Some(key == b'y' || key == b'Y'),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(false),
        }
    }
}

impl Drop for KeyWatcher {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if let Err(e) = termios::tcsetattr(std::io::stdin(), SetArg::TCSANOW, &saved) {
                tracing::warn!("failed to restore terminal mode: {}", e);
            }
        }
    }
}

fn raw_mode() -> Result<Termios> {
    let saved = termios::tcgetattr(std::io::stdin())
        .map_err(|e| Error::io("reading terminal mode", e.into()))?;
    let mut raw = saved.clone();
    raw.local_flags.remove(LocalFlags::ICANON | LocalFlags::ECHO);
    termios::tcsetattr(std::io::stdin(), SetArg::TCSANOW, &raw)
        .map_err(|e| Error::io("setting terminal mode", e.into()))?;
    Ok(saved)
}
