//! archive-install - unpack a source tarball for a build system
//!
//! Usage:
//!   archive-install <ARCHIVE> <DEST> <MARKER>
//!   archive-install <ARCHIVE> <DEST> <MARKER> <RENAME_FROM> <RENAME_TO>
//!
//! MARKER, RENAME_FROM and RENAME_TO are relative to DEST. If
//! `<ARCHIVE>.patch` exists it is applied inside DEST with `-p0`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use archive_install::{
    CommandPatcher, Context, InstallError, InstallRequest, Installer, RenamePair, output,
};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "archive-install")]
#[command(about = "Extract a .tar.gz, apply its patch, and touch a build marker")]
#[command(version)]
struct Cli {
    /// Gzip-compressed tarball to extract
    archive: PathBuf,

    /// Directory to extract into (created if missing)
    dest: PathBuf,

    /// Existing file under DEST whose timestamps mark completion
    marker: PathBuf,

    /// Optional RENAME_FROM RENAME_TO pair, relative to DEST
    #[arg(value_name = "RENAME")]
    rename: Vec<PathBuf>,

    /// Patch program used for <ARCHIVE>.patch
    #[arg(long, env = "ARCHIVE_INSTALL_PATCH", default_value = "patch")]
    patch_tool: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show steps without touching the file system
    #[arg(short = 'n', long)]
    dry_run: bool,
}

impl Cli {
    fn rename_pair(&self) -> Result<Option<RenamePair>, InstallError> {
        match self.rename.as_slice() {
            [] => Ok(None),
            [from, to] => Ok(Some(RenamePair::new(from, to))),
            rest => Err(InstallError::Usage(format!(
                "expected 3 or 5 arguments, got {}",
                3 + rest.len()
            ))),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let rename = match cli.rename_pair() {
        Ok(rename) => rename,
        Err(e) => Cli::command()
            .error(ErrorKind::WrongNumberOfValues, e.to_string())
            .exit(),
    };

    let mut request = InstallRequest::new(cli.archive, cli.dest, cli.marker);
    if let Some(pair) = rename {
        request = request.rename(pair);
    }

    let ctx = Context::default().dry_run(cli.dry_run).verbose(cli.verbose);
    let installer = Installer::new(ctx).with_patcher(CommandPatcher::new(cli.patch_tool));

    let report = installer.run(&request).map_err(|e| {
        let step = e.step();
        anyhow::Error::new(e).context(format!("{} step failed", step))
    })?;

    if cli.dry_run {
        output::skip("dry run, nothing changed");
    } else {
        output::success(&format!("{} ready", report.dest.display()));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            let code = e
                .downcast_ref::<InstallError>()
                .map(InstallError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_three_arguments() {
        let cli = Cli::try_parse_from(["archive-install", "php.tar.gz", "deps", "php/configure"])
            .unwrap();
        assert_eq!(cli.rename_pair().unwrap(), None);
        assert_eq!(cli.patch_tool, "patch");
    }

    #[test]
    fn test_five_arguments() {
        let cli = Cli::try_parse_from([
            "archive-install",
            "php.tar.gz",
            "deps",
            "php-7.0/configure",
            "php-7.0",
            "php",
        ])
        .unwrap();
        assert_eq!(
            cli.rename_pair().unwrap(),
            Some(RenamePair::new("php-7.0", "php"))
        );
    }

    #[test]
    fn test_four_arguments_is_usage_error() {
        let cli = Cli::try_parse_from([
            "archive-install",
            "php.tar.gz",
            "deps",
            "php/configure",
            "php-7.0",
        ])
        .unwrap();
        let err = cli.rename_pair().unwrap_err();
        assert!(matches!(err, InstallError::Usage(_)));
        assert!(err.to_string().contains("got 4"), "got: {err}");
    }

    #[test]
    fn test_two_arguments_rejected_by_parser() {
        assert!(Cli::try_parse_from(["archive-install", "php.tar.gz", "deps"]).is_err());
    }
}
