//! Marker step - bumps the timestamps of the build system's completion sentinel.

use std::io;
use std::path::Path;

use filetime::FileTime;

use crate::core::output;

use super::context::Context;
use super::error::InstallError;

/// Set access and modification time of `path` to now.
///
/// Unlike `touch`, a missing marker is an error and is never created.
pub fn touch_marker(ctx: &Context, path: &Path) -> Result<(), InstallError> {
    if ctx.dry_run {
        output::detail(&format!("[dry-run] touch {}", path.display()));
        return Ok(());
    }

    match std::fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(InstallError::MarkerMissing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(InstallError::Marker {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let now = FileTime::now();
    filetime::set_file_times(path, now, now).map_err(|source| InstallError::Marker {
        path: path.to_path_buf(),
        source,
    })?;

    if ctx.verbose {
        output::detail(&format!("touched {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_touch_updates_mtime() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("configure");
        std::fs::write(&marker, "#!/bin/sh\n").unwrap();
        let old_time = SystemTime::now() - Duration::from_secs(3 * 24 * 3600);
        filetime::set_file_mtime(&marker, FileTime::from_system_time(old_time)).unwrap();

        touch_marker(&Context::default(), &marker).unwrap();

        let modified = std::fs::metadata(&marker).unwrap().modified().unwrap();
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        assert!(age < Duration::from_secs(60), "marker still old: {age:?}");
    }

    #[test]
    fn test_missing_marker_is_not_created() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("php/configure");

        let err = touch_marker(&Context::default(), &marker).unwrap_err();

        assert!(matches!(err, InstallError::MarkerMissing { .. }), "got: {err}");
        assert!(!marker.exists());
    }

    #[test]
    fn test_marker_may_be_directory() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("php-src");
        std::fs::create_dir(&marker).unwrap();

        touch_marker(&Context::default(), &marker).unwrap();
    }
}
