//! Session directory layout.
//!
//! `<base>/<YYYY-MM-DD_HH-MM-SS>/<5-digit-iter>/<tool-name>/…` — each
//! iteration directory holds the generated Verilog; each tool subdirectory
//! is owned entirely by its backend.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::SessionError;

/// One timestamped fuzzing session on disk.
#[derive(Debug)]
pub struct Session {
    root: PathBuf,
}

impl Session {
    /// Creates `<base>/<timestamp>/` and returns the handle.
    pub fn create(base: &Path) -> Result<Self, SessionError> {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let root = base.join(stamp);
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The session root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates and returns the directory for iteration `idx`.
    pub fn iter_dir(&self, idx: u32) -> Result<PathBuf, SessionError> {
        let dir = self.root.join(format!("{idx:05}"));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
