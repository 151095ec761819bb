//! Rename step - moves an extracted directory into its final place.

use std::path::Path;

use crate::core::output;

use super::context::Context;
use super::error::InstallError;

/// Remove whatever lives at `path`. Failures only warn; absence is silent.
fn remove_any(path: &Path) {
    let Ok(md) = std::fs::symlink_metadata(path) else {
        return;
    };
    let result = if md.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(e) = result {
        output::warning(&format!("cannot remove {}: {}", path.display(), e));
    }
}

/// Replace `to` with `from`.
///
/// The existing `to` is removed first, so a failure after that point
/// leaves neither in place.
pub fn replace(ctx: &Context, from: &Path, to: &Path) -> Result<(), InstallError> {
    output::action(&format!("Renaming {} to {}", from.display(), to.display()));

    if ctx.dry_run {
        output::detail(&format!("[dry-run] rm -rf {}", to.display()));
        return Ok(());
    }

    remove_any(to);

    if std::fs::symlink_metadata(from).is_err() {
        return Err(InstallError::RenameSourceMissing {
            from: from.to_path_buf(),
        });
    }

    std::fs::rename(from, to).map_err(|source| InstallError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    if ctx.verbose {
        output::detail(&format!("moved {} -> {}", from.display(), to.display()));
    }
    Ok(())
}
