//! The running process's own pid file.

use std::path::{Path, PathBuf};

use mazebeam_supervisor::{remove_pid, write_pid};

use crate::MazebeamError;

/// Writes this process's pid to `<run_dir>/mazebeam-<module>.pid` and
/// removes the file again when dropped.
#[derive(Debug)]
pub struct PidFile {
    run_dir: PathBuf,
    module: String,
    path: PathBuf,
}

impl PidFile {
    pub fn create(run_dir: &Path, module: &str) -> Result<Self, MazebeamError> {
        let path = write_pid(run_dir, module, std::process::id())?;
        tracing::debug!(path = %path.display(), "pid file written");
        Ok(Self {
            run_dir: run_dir.to_path_buf(),
            module: module.to_owned(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = remove_pid(&self.run_dir, &self.module) {
            tracing::warn!(error = %e, "could not remove pid file");
        }
    }
}
