//! Archive installer - runs extract, patch, marker and rename in order.

mod context;
mod error;
mod extract;
mod marker;
mod patch;
mod paths;
mod rename;

pub use context::{Context, InstallRequest, RenamePair};
pub use error::{InstallError, Step};
pub use patch::{CommandPatcher, PatchApplier, STRIP_LEVEL};
pub use paths::normalize_lexical;

use std::path::PathBuf;

use crate::core::output;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Absolute archive path
    pub archive: PathBuf,
    /// Absolute destination directory
    pub dest: PathBuf,
    /// Number of archive entries written
    pub entries: usize,
    /// Patch that was applied, if any
    pub patch: Option<PathBuf>,
    /// Marker whose timestamps were updated
    pub marker: PathBuf,
    /// `(from, to)` if a rename was performed
    pub renamed: Option<(PathBuf, PathBuf)>,
}

/// Installer that extracts an archive and finishes it off for the build system.
pub struct Installer {
    ctx: Context,
    patcher: Box<dyn PatchApplier>,
}

impl Installer {
    /// Create an installer that patches with the system `patch` tool.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            patcher: Box::new(CommandPatcher::default()),
        }
    }

    /// Use a different patch applier.
    pub fn with_patcher(mut self, patcher: impl PatchApplier + 'static) -> Self {
        self.patcher = Box::new(patcher);
        self
    }

    /// Run every step for `request`, stopping at the first failure.
    pub fn run(&self, request: &InstallRequest) -> Result<InstallReport, InstallError> {
        let archive = paths::absolute(&request.archive).map_err(|e| {
            InstallError::extraction(&request.archive, format!("cannot resolve path: {}", e))
        })?;
        let dest = paths::absolute(&request.dest).map_err(|e| {
            InstallError::extraction(&request.archive, format!("cannot resolve destination: {}", e))
        })?;

        output::action(&format!("Extracting {} to {}", archive.display(), dest.display()));
        let entries = extract::extract(&self.ctx, &archive, &dest)?;

        let patch = patch::apply_archive_patch(&self.ctx, self.patcher.as_ref(), &archive, &dest)?;

        let marker = dest.join(&request.marker);
        marker::touch_marker(&self.ctx, &marker)?;

        let renamed = match &request.rename {
            Some(pair) => {
                let from = dest.join(&pair.from);
                let to = dest.join(&pair.to);
                rename::replace(&self.ctx, &from, &to)?;
                Some((from, to))
            }
            None => None,
        };

        Ok(InstallReport {
            archive,
            dest,
            entries,
            patch,
            marker,
            renamed,
        })
    }
}
