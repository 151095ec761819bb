//! Execution context and the request describing one installer run.

use std::path::{Path, PathBuf};

/// Execution context providing configuration for an installer run.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// If true, print the planned steps without touching the file system
    pub dry_run: bool,
    /// If true, print per-step details
    pub verbose: bool,
}

impl Context {
    /// Set dry run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set verbose mode.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Directory to move after extraction, both sides relative to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenamePair {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Everything one installer run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// The `.tar.gz` to extract
    pub archive: PathBuf,
    /// Directory the archive is extracted into
    pub dest: PathBuf,
    /// Marker file, relative to `dest`
    pub marker: PathBuf,
    /// Optional post-extraction rename
    pub rename: Option<RenamePair>,
}

impl InstallRequest {
    pub fn new(
        archive: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        marker: impl Into<PathBuf>,
    ) -> Self {
        Self {
            archive: archive.into(),
            dest: dest.into(),
            marker: marker.into(),
            rename: None,
        }
    }

    /// Set the post-extraction rename.
    pub fn rename(mut self, pair: RenamePair) -> Self {
        self.rename = Some(pair);
        self
    }

    /// Patch file that belongs to `archive`: the archive path with `.patch` appended.
    pub fn patch_path(archive: &Path) -> PathBuf {
        let mut name = archive.as_os_str().to_os_string();
        name.push(".patch");
        PathBuf::from(name)
    }
}
