//! Core infrastructure shared by the installer and the CLI.

pub mod output;
