//! Per-module pid files.
//!
//! Each module's process id lives in `<run_dir>/mazebeam-<module>.pid`.
//! Both the module itself and the supervisor write it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::SupervisorError;

/// Where the pid file for `module` lives.
pub fn pid_file_path(run_dir: &Path, module: &str) -> PathBuf {
    run_dir.join(format!("mazebeam-{module}.pid"))
}

/// Writes `pid` to the module's pid file, creating `run_dir` if needed.
pub fn write_pid(run_dir: &Path, module: &str, pid: u32) -> Result<PathBuf, SupervisorError> {
    let path = pid_file_path(run_dir, module);
    fs::create_dir_all(run_dir)
        .and_then(|()| fs::write(&path, pid.to_string()))
        .map_err(|source| SupervisorError::PidFile {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Reads a module's pid file. `None` if it is missing or garbled.
pub fn read_pid(run_dir: &Path, module: &str) -> Option<u32> {
    fs::read_to_string(pid_file_path(run_dir, module))
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Removes a module's pid file. A file that is already gone is fine.
pub fn remove_pid(run_dir: &Path, module: &str) -> Result<(), SupervisorError> {
    let path = pid_file_path(run_dir, module);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SupervisorError::PidFile { path, source }),
    }
}
