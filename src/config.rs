//! Layered settings
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. System config: `/etc/plcpi/plcpi.toml`
//! 3. User config: `$XDG_CONFIG_HOME/plcpi/plcpi.toml`
//! 4. Environment variables: `PLCPI_*` prefix
//! 5. Command-line flags (applied by the caller)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const SYSTEM_CONFIG: &str = "/etc/plcpi/plcpi.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// I2C adapter the boards are attached to
    pub bus: PathBuf,
    /// File locked while a command runs
    pub lock_file: PathBuf,
    /// Attempts for write/read-back verified relay writes
    pub retries: u32,
    /// Delay between relay test steps
    pub test_step_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bus: PathBuf::from("/dev/i2c-1"),
            lock_file: PathBuf::from("/tmp/plcpi-i2c.lock"),
            retries: 10,
            test_step_ms: 150,
        }
    }
}

impl Settings {
    /// Load from the system and user config files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut files = vec![PathBuf::from(SYSTEM_CONFIG)];
        if let Some(dirs) = ProjectDirs::from("", "", "plcpi") {
            files.push(dirs.config_dir().join("plcpi.toml"));
        }
        Self::load_from(&files, true)
    }

    /// Load from `files` in order, later files overriding earlier ones.  Missing files are
    /// skipped.
    pub fn load_from(files: &[PathBuf], with_env: bool) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("bus", path_str(&defaults.bus))?
            .set_default("lock_file", path_str(&defaults.lock_file))?
            .set_default("retries", defaults.retries as i64)?
            .set_default("test_step_ms", defaults.test_step_ms as i64)?;

        for file in files {
            tracing::trace!("config source {}", file.display());
            builder = builder.add_source(File::from(file.as_path()).required(false));
        }
        if with_env {
            builder = builder.add_source(Environment::with_prefix("PLCPI").try_parsing(true));
        }

        builder.build()?.try_deserialize()
    }
}

fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_files() {
        let settings = Settings::load_from(&[PathBuf::from("/nonexistent/plcpi.toml")], false)
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn later_files_override() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.toml");
        let user = dir.path().join("user.toml");
        fs::write(&system, "bus = \"/dev/i2c-3\"\nretries = 5\n").unwrap();
        fs::write(&user, "retries = 2\n").unwrap();

        let settings = Settings::load_from(&[system, user], false).unwrap();
        assert_eq!(settings.bus, PathBuf::from("/dev/i2c-3"));
        assert_eq!(settings.retries, 2);
        assert_eq!(settings.test_step_ms, 150);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.toml");
        fs::write(&file, "retries = \"many\"\n").unwrap();

        assert!(Settings::load_from(&[file], false).is_err());
    }
}
