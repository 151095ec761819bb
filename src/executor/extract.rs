//! Extract step - unpacks a gzip-compressed tarball into the destination.
//!
//! Entries keep their archive-relative paths and overwrite whatever is
//! already on disk. Paths that would land outside the destination are
//! rejected before anything is written for them.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path};

use crate::core::output;

use super::context::Context;
use super::error::InstallError;
use super::paths::normalize_lexical;

/// Render an error with its full source chain.
fn with_causes(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

/// Reject entries that would write through a symlink resolving outside `dest`.
///
/// Symlinks that stay inside `dest` (usually created by the archive itself) are allowed.
fn ensure_symlinks_stay_within_dest(
    archive: &Path,
    dest: &Path,
    full_path: &Path,
) -> Result<(), InstallError> {
    let rel = full_path.strip_prefix(dest).map_err(|_| {
        InstallError::extraction(
            archive,
            format!("tar contains path outside destination: {}", full_path.display()),
        )
    })?;

    let mut cur = dest.to_path_buf();
    for comp in rel.components() {
        cur.push(comp);
        let is_symlink = std::fs::symlink_metadata(&cur)
            .map(|md| md.file_type().is_symlink())
            .unwrap_or(false);
        if !is_symlink {
            continue;
        }

        let blocked = || {
            InstallError::extraction(
                archive,
                format!(
                    "tar extraction blocked: symlink in path component escapes destination: {}",
                    cur.display()
                ),
            )
        };
        let resolved = std::fs::canonicalize(&cur).map_err(|_| blocked())?;
        let root = std::fs::canonicalize(dest).map_err(|e| {
            InstallError::extraction(
                archive,
                format!("cannot resolve destination {}: {}", dest.display(), e),
            )
        })?;
        if !resolved.starts_with(&root) {
            return Err(blocked());
        }
    }

    Ok(())
}

/// Remove an existing non-directory at `path` so the entry can replace it.
fn clear_leaf(archive: &Path, path: &Path) -> Result<(), InstallError> {
    match std::fs::symlink_metadata(path) {
        Ok(md) if !md.is_dir() => std::fs::remove_file(path).map_err(|e| {
            InstallError::extraction(
                archive,
                format!("cannot replace {}: {}", path.display(), with_causes(&e)),
            )
        }),
        _ => Ok(()),
    }
}

fn ensure_link_target_within_dest(
    archive: &Path,
    dest: &Path,
    link_parent: &Path,
    link_name: &Path,
) -> Result<(), InstallError> {
    if link_name.is_absolute()
        || link_name
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    {
        return Err(InstallError::extraction(
            archive,
            format!("tar contains unsafe link target (absolute): {}", link_name.display()),
        ));
    }

    let candidate = normalize_lexical(&link_parent.join(link_name));
    let norm_dest = normalize_lexical(dest);
    if candidate.strip_prefix(&norm_dest).is_err() {
        return Err(InstallError::extraction(
            archive,
            format!(
                "tar contains unsafe link target (escapes dest): {} -> {}",
                link_parent.display(),
                link_name.display()
            ),
        ));
    }

    Ok(())
}

/// Unpack every entry of a tar stream under `dest`, returning how many were written.
fn extract_tar<R: Read>(
    reader: R,
    archive_path: &Path,
    dest: &Path,
) -> Result<usize, InstallError> {
    let err = |msg: String| InstallError::extraction(archive_path, msg);

    let mut archive = tar::Archive::new(reader);
    archive.set_overwrite(true);
    archive.set_preserve_mtime(true);

    let mut count = 0;
    for entry in archive
        .entries()
        .map_err(|e| err(format!("tar read error: {}", with_causes(&e))))?
    {
        let mut entry =
            entry.map_err(|e| err(format!("tar entry error: {}", with_causes(&e))))?;

        let path = entry
            .path()
            .map_err(|e| err(format!("tar path error: {}", with_causes(&e))))?
            .into_owned();

        if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
            return Err(err(format!("tar contains unsafe path: {}", path.display())));
        }

        // Some archives contain a "." entry; treat it as a no-op.
        if path.as_os_str().is_empty() || path == Path::new(".") {
            continue;
        }

        let full_path = dest.join(&path);

        // The leaf itself may be an old symlink from a previous run; it is cleared below.
        if let Some(parent) = full_path.parent()
            && parent.starts_with(dest)
        {
            ensure_symlinks_stay_within_dest(archive_path, dest, parent)?;
        }

        let entry_type = entry.header().entry_type();
        if entry_type == tar::EntryType::Symlink || entry_type == tar::EntryType::Link {
            let link_name = entry
                .link_name()
                .map_err(|e| err(format!("tar link_name error: {}", with_causes(&e))))?;
            match link_name {
                Some(link_name) => {
                    // Hardlink targets are archive-relative, symlink targets are link-relative.
                    let link_parent = if entry_type == tar::EntryType::Link {
                        dest
                    } else {
                        full_path.parent().unwrap_or(dest)
                    };
                    ensure_link_target_within_dest(archive_path, dest, link_parent, &link_name)?;
                }
                None => {
                    return Err(err(format!(
                        "tar contains {} without link target: {}",
                        if entry_type == tar::EntryType::Symlink {
                            "symlink"
                        } else {
                            "hardlink"
                        },
                        path.display()
                    )));
                }
            }
        }

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                err(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    with_causes(&e)
                ))
            })?;
        }

        if entry_type != tar::EntryType::Directory {
            clear_leaf(archive_path, &full_path)?;
        }

        // unpack_in resolves hardlink sources against dest rather than the cwd.
        let unpacked = entry.unpack_in(dest).map_err(|e| {
            err(format!("unpack error for {}: {}", path.display(), with_causes(&e)))
        })?;
        if unpacked {
            count += 1;
        }
    }

    Ok(count)
}

/// Extract a tar.gz archive
fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<usize, InstallError> {
    let file = File::open(archive_path).map_err(|e| {
        InstallError::extraction(archive_path, format!("cannot open archive: {}", with_causes(&e)))
    })?;
    let reader = BufReader::new(file);
    let decoder = flate2::read::GzDecoder::new(reader);
    extract_tar(decoder, archive_path, dest)
}

/// Extract `archive` into `dest`, creating `dest` if needed.
///
/// Both paths are expected to be absolute. Returns the number of entries written.
pub fn extract(ctx: &Context, archive: &Path, dest: &Path) -> Result<usize, InstallError> {
    if ctx.dry_run {
        output::detail(&format!(
            "[dry-run] extract {} into {}",
            archive.display(),
            dest.display()
        ));
        return Ok(0);
    }

    std::fs::create_dir_all(dest).map_err(|e| {
        InstallError::extraction(
            archive,
            format!(
                "cannot create destination directory {}: {}",
                dest.display(),
                with_causes(&e)
            ),
        )
    })?;

    let filename = archive
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());

    let pb = output::spinner(&format!("extracting {}", filename));
    let result = extract_tar_gz(archive, dest);
    output::progress_done(pb);

    let count = result?;
    if ctx.verbose {
        output::detail(&format!("extracted {} entries from {}", count, filename));
    }
    Ok(count)
}
