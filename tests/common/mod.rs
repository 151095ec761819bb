//! Shared fixtures for installer tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One entry of a fixture archive.
pub enum Entry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

/// Write a gzip-compressed tarball containing `entries`.
pub fn write_tar_gz(path: &Path, entries: &[Entry<'_>]) {
    let file = File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        match entry {
            Entry::File(name, content) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(content.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, name, *content).unwrap();
            }
            Entry::Dir(name) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder
                    .append_data(&mut header, name, std::io::empty())
                    .unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap();
}

/// Relative path -> file contents (`None` for directories) for everything under `root`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let content = if e.file_type().is_dir() {
                None
            } else {
                Some(std::fs::read(e.path()).unwrap())
            };
            (rel, content)
        })
        .collect()
}

/// A small source tree in the shape of an upstream release tarball.
pub fn source_tarball(path: &Path) {
    write_tar_gz(
        path,
        &[
            Entry::Dir("libfoo-1.2/"),
            Entry::File("libfoo-1.2/configure", b"#!/bin/sh\necho configuring\n"),
            Entry::File("libfoo-1.2/src/foo.c", b"int foo(void) { return 1; }\n"),
            Entry::File("libfoo-1.2/include/foo.h", b"int foo(void);\n"),
            Entry::File("libfoo-1.2/README", b"libfoo\n"),
        ],
    );
}

pub fn has_patch_tool() -> bool {
    which::which("patch").is_ok()
}
