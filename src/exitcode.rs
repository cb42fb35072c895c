//! Process exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Generic failure
pub const FAIL: i32 = 1;

/// Command line usage error: argument count, bad value, unknown command
pub const USAGE: i32 = 64;

/// Board not detected or hardware revision too old
pub const UNAVAILABLE: i32 = 69;

/// System error (lock file, terminal)
pub const OSERR: i32 = 71;

/// Bus input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
