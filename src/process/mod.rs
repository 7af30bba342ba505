//! Process execution utilities.
//!
//! All external commands (`gsettings`, custom scripts) run synchronously with
//! the captured session environment, and a non-zero exit status is an error.

use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::desktop::env::session_environment;
use crate::error::ProcessError;
use crate::schedule::ThemeMode;

/// Run a command to completion and return its stdout.
///
/// Arguments are passed directly to the program, never through a shell.
pub fn run_checked<I, S>(program: &str, args: I) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .envs(session_environment().iter())
        .stdin(Stdio::null());

    debug!("Running command: {:?}", command);

    let output = command.output().map_err(|source| ProcessError::SpawnFailed {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check whether `program` can be found on the session's `PATH`.
pub fn command_exists(program: &str) -> bool {
    let Some(path) = session_environment().get("PATH") else {
        return false;
    };
    std::env::split_paths(path)
        .map(|dir| dir.join(program))
        .any(|candidate| candidate.is_file() && is_executable(&candidate))
}

/// Run the user's custom script with the new mode as its only argument.
pub fn run_custom_script(script: &str, mode: ThemeMode) -> Result<(), ProcessError> {
    let path = expand_tilde(script);
    check_script(&path)?;

    info!("Running custom script: {:?} {}", path, mode);
    let output = run_checked(&path.to_string_lossy(), [mode.as_str()])?;
    if !output.trim().is_empty() {
        debug!("Custom script output: {}", output.trim());
    }
    Ok(())
}

/// Verify that a script exists and is executable by the current user.
pub fn check_script(path: &Path) -> Result<(), ProcessError> {
    if !path.is_file() {
        return Err(ProcessError::ScriptNotFound(path.to_path_buf()));
    }
    if !is_executable(path) {
        return Err(ProcessError::ScriptNotExecutable(path.to_path_buf()));
    }
    Ok(())
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

fn is_executable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: access() only reads the NUL-terminated path, which outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}
