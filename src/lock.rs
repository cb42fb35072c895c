//! System-wide lock serializing bus access between concurrent invocations.
use std::fs::{File, OpenOptions, Permissions};
use std::io;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};

use crate::{Error, Result};

const LOCK_MODE: u32 = 0o666;

/// Exclusive advisory lock on a well-known file, held until dropped.
pub struct BusLock {
    _lock: Flock<File>,
    path: PathBuf,
}

impl BusLock {
    /// Block until no other process holds the lock.
    ///
    /// `flock` only needs a readable descriptor, so a lock file created by another user can
    /// be shared.  A file created here gets mode 0666 regardless of the umask.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)
            .map_err(|e| Error::io(format!("opening lock file {}", path.display()), e))?;
        let lock = Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| {
            Error::io(format!("locking {}", path.display()), errno.into())
        })?;
        tracing::trace!("acquired {}", path.display());
        Ok(Self {
            _lock: lock,
            path: path.to_path_buf(),
        })
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    match File::open(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        other => return other,
    }
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(LOCK_MODE)
        .open(path)
    {
        Ok(file) => {
            if let Err(e) = file.set_permissions(Permissions::from_mode(LOCK_MODE)) {
                tracing::warn!("cannot set mode of {}: {}", path.display(), e);
            }
            Ok(file)
        }
        // lost the race against another invocation
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => File::open(path),
        Err(e) => Err(e),
    }
}

impl Drop for BusLock {
    fn drop(&mut self) {
        tracing::trace!("released {}", self.path.display());
    }
}
