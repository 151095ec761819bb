//! Patch step - applies `<archive>.patch` to the freshly extracted tree.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::output;

use super::context::{Context, InstallRequest};
use super::error::InstallError;

/// Strip level used for archive patches: paths inside the patch are taken as-is.
pub const STRIP_LEVEL: u32 = 0;

/// Something that can apply a unified/context diff to a directory tree.
pub trait PatchApplier {
    /// Apply `patch` to the tree rooted at `target_root`, stripping `strip`
    /// leading components from the paths it names.
    fn apply(&self, patch: &Path, target_root: &Path, strip: u32) -> Result<(), InstallError>;

    /// Name shown in progress output.
    fn name(&self) -> &str {
        "patch"
    }
}

/// Applies patches by running an external `patch`-compatible tool.
#[derive(Debug, Clone)]
pub struct CommandPatcher {
    program: String,
}

impl Default for CommandPatcher {
    fn default() -> Self {
        Self::new("patch")
    }
}

impl CommandPatcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PatchApplier for CommandPatcher {
    fn name(&self) -> &str {
        &self.program
    }

    fn apply(&self, patch: &Path, target_root: &Path, strip: u32) -> Result<(), InstallError> {
        let tool = which::which(&self.program).map_err(|e| InstallError::Patch {
            patch: patch.to_path_buf(),
            reason: format!("cannot find patch tool '{}': {}", self.program, e),
        })?;

        // -N: an already-applied patch fails instead of prompting to reverse it.
        let status = Command::new(&tool)
            .current_dir(target_root)
            .arg(format!("-p{}", strip))
            .arg("-N")
            .arg("-i")
            .arg(patch)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| InstallError::Patch {
                patch: patch.to_path_buf(),
                reason: format!("cannot run {}: {}", tool.display(), e),
            })?;

        if !status.success() {
            return Err(InstallError::PatchCommand {
                cmd: format!("{} -p{} -N -i {}", self.program, strip, patch.display()),
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Apply the patch that sits next to `archive`, if there is one.
///
/// Returns the patch path when a patch was applied (or would be, in dry-run).
pub fn apply_archive_patch(
    ctx: &Context,
    patcher: &dyn PatchApplier,
    archive: &Path,
    dest: &Path,
) -> Result<Option<PathBuf>, InstallError> {
    let patch_path = InstallRequest::patch_path(archive);
    if !patch_path.is_file() {
        if ctx.verbose {
            output::detail(&format!("no patch at {}", patch_path.display()));
        }
        return Ok(None);
    }

    let name = patch_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "patch".to_string());
    output::sub_action(&format!("patch {}", name));
    if ctx.verbose || ctx.dry_run {
        output::detail(&format!(
            "{}{} -p{} -N -i {}",
            if ctx.dry_run { "[dry-run] " } else { "" },
            patcher.name(),
            STRIP_LEVEL,
            patch_path.display()
        ));
    }

    if !ctx.dry_run {
        patcher.apply(&patch_path, dest, STRIP_LEVEL)?;
    }

    Ok(Some(patch_path))
}
