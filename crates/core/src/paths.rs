//! Filesystem roots the emulator keeps its virtual storage under.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the user root under a frontend's base directory.
pub const USER_DIR_NAME: &str = "cytrus";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaths {
    /// Root for everything below
    pub user: PathBuf,
    /// Virtual NAND
    pub nand: PathBuf,
    /// Virtual SD card
    pub sdmc: PathBuf,
    /// Shared system archives and fonts
    pub sysdata: PathBuf,
}

impl UserPaths {
    /// Lay the standard roots out under `<base>/cytrus`.
    pub fn under(base: &Path) -> Self {
        let user = base.join(USER_DIR_NAME);
        Self {
            nand: user.join("nand"),
            sdmc: user.join("sdmc"),
            sysdata: user.join("sysdata"),
            user,
        }
    }

    /// Create every root that does not exist yet.
    pub fn create_all(&self) -> io::Result<()> {
        for dir in [&self.user, &self.nand, &self.sdmc, &self.sysdata] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn config_file(&self) -> PathBuf {
        self.user.join("config.json")
    }
}
