use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn '{}': {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' exited with {status}: {detail}", binary.display())]
    NonZeroExit {
        binary: PathBuf,
        status: ExitStatus,
        detail: String,
    },
}

/// Run an external tool to completion and return its stdout.
///
/// A non-zero exit aborts with whatever the tool reported; some of the
/// invoked tools print failures to stdout rather than stderr, so the error
/// carries whichever stream is non-empty.
pub async fn run_captured<I, S>(binary: &Path, args: I) -> Result<String, CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| CommandError::Spawn {
            binary: binary.to_path_buf(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_owned()
        } else {
            stderr.trim().to_owned()
        };
        return Err(CommandError::NonZeroExit {
            binary: binary.to_path_buf(),
            status: output.status,
            detail,
        });
    }

    if !stderr.trim().is_empty() {
        debug!(binary = %binary.display(), stderr = %stderr.trim(), "tool wrote to stderr");
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_spawn_error() {
        let err = run_captured(Path::new("/no/such/wallet-harness-binary"), ["--version"])
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[tokio::test]
    async fn failing_command_carries_its_output() {
        // `false` exits 1 without output; the detail is empty but the status
        // is preserved.
        let err = run_captured(Path::new("/bin/false"), Vec::<&str>::new())
            .await
            .unwrap_err();
        match err {
            CommandError::NonZeroExit { status, .. } => assert!(!status.success()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn successful_command_returns_stdout() {
        let out = run_captured(Path::new("/bin/echo"), ["round", "trip"])
            .await
            .unwrap();
        assert_eq!(out.trim(), "round trip");
    }
}
