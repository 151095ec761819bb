//! Source tarball installer for build systems
//!
//! Extracts a `.tar.gz` into a destination directory, applies an optional
//! `<archive>.patch` next to it, touches a marker file the build system
//! watches, and optionally renames the unpacked directory.
//!
//! # Example
//!
//! ```no_run
//! use archive_install::{Context, InstallRequest, Installer, RenamePair};
//!
//! let request = InstallRequest::new("deps/php-7.0.tar.gz", "build/deps", "php-7.0/configure")
//!     .rename(RenamePair::new("php-7.0", "php"));
//!
//! let report = Installer::new(Context::default()).run(&request)?;
//! println!("extracted {} entries", report.entries);
//! # Ok::<(), archive_install::InstallError>(())
//! ```
//!
//! # Steps
//!
//! 1. Resolve the archive and destination to absolute paths
//! 2. Extract every archive entry under the destination
//! 3. Apply `<archive>.patch` with strip level 0, if present
//! 4. Update the marker's timestamps (it must already exist)
//! 5. Replace `dest/<to>` with `dest/<from>`, if a rename pair was given
//!
//! Each step aborts the run on failure; nothing is rolled back.

pub mod core;
pub mod executor;

pub use crate::core::output;
pub use executor::{
    CommandPatcher, Context, InstallError, InstallReport, InstallRequest, Installer, PatchApplier,
    RenamePair, Step,
};
