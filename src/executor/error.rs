//! Installer error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The installer step an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Usage,
    Extract,
    Patch,
    Marker,
    Rename,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Usage => "usage",
            Step::Extract => "extract",
            Step::Patch => "patch",
            Step::Marker => "marker",
            Step::Rename => "rename",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while installing an archive.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("extract failed for {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    #[error("patch failed for {}: {reason}", patch.display())]
    Patch { patch: PathBuf, reason: String },

    #[error("patch tool failed: {cmd} (exit code: {code:?})")]
    PatchCommand { cmd: String, code: Option<i32> },

    #[error("marker update failed for {}: {source}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("marker not found: {}", path.display())]
    MarkerMissing { path: PathBuf },

    #[error("rename source not found: {}", from.display())]
    RenameSourceMissing { from: PathBuf },

    #[error("rename failed: {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn extraction(archive: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        InstallError::Extraction {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }

    /// The step that failed.
    pub fn step(&self) -> Step {
        match self {
            InstallError::Usage(_) => Step::Usage,
            InstallError::Extraction { .. } => Step::Extract,
            InstallError::Patch { .. } | InstallError::PatchCommand { .. } => Step::Patch,
            InstallError::Marker { .. } | InstallError::MarkerMissing { .. } => Step::Marker,
            InstallError::RenameSourceMissing { .. } | InstallError::Rename { .. } => Step::Rename,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self.step() {
            Step::Usage => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        let err = InstallError::MarkerMissing {
            path: PathBuf::from("/build/php/configure"),
        };
        assert_eq!(err.step(), Step::Marker);
        assert_eq!(err.step().to_string(), "marker");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_usage_exit_code() {
        let err = InstallError::Usage("expected 3 or 5 arguments, got 2".into());
        assert_eq!(err.step(), Step::Usage);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_patch_command_message() {
        let err = InstallError::PatchCommand {
            cmd: "patch -p0 -N -i php.tar.gz.patch".into(),
            code: Some(1),
        };
        assert_eq!(err.step(), Step::Patch);
        let msg = err.to_string();
        assert!(msg.contains("patch -p0"), "got: {msg}");
        assert!(msg.contains("Some(1)"), "got: {msg}");
    }
}
