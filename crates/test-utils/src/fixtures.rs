//! Common test fixtures for upload and extraction tests.
//!
//! Archives are built in memory so tests never depend on checked-in
//! binaries.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Content used by the round-trip scenarios.
pub const SAMPLE_CONTENT: &str = "Sample content";

/// A single entry to place in a generated archive.
#[derive(Debug, Clone, Copy)]
pub enum ZipEntrySpec<'a> {
    /// Regular file with contents.
    File(&'a str, &'a [u8]),
    /// Explicit directory marker.
    Dir(&'a str),
    /// Symbolic link pointing at a target.
    Symlink(&'a str, &'a str),
}

/// Build a zip archive in memory from the given entries, in order.
pub fn zip_bytes(entries: &[ZipEntrySpec<'_>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in entries {
        match *entry {
            ZipEntrySpec::File(name, data) => {
                zip.start_file(name, options).expect("Failed to start zip entry");
                zip.write_all(data).expect("Failed to write zip entry");
            }
            ZipEntrySpec::Dir(name) => {
                zip.add_directory(name, options)
                    .expect("Failed to add zip directory");
            }
            ZipEntrySpec::Symlink(name, target) => {
                zip.add_symlink(name, target, options)
                    .expect("Failed to add zip symlink");
            }
        }
    }

    zip.finish().expect("Failed to finish zip").into_inner()
}

/// Archive with a single `test.txt` holding [`SAMPLE_CONTENT`].
pub fn sample_zip() -> Vec<u8> {
    zip_bytes(&[ZipEntrySpec::File("test.txt", SAMPLE_CONTENT.as_bytes())])
}

/// Archive with nested directories and explicit directory markers.
pub fn nested_zip() -> Vec<u8> {
    zip_bytes(&[
        ZipEntrySpec::Dir("docs/"),
        ZipEntrySpec::File("docs/readme.md", b"# readme"),
        ZipEntrySpec::File("src/main/App.java", b"class App {}"),
        ZipEntrySpec::Dir("empty/"),
    ])
}

/// Archive whose second entry escapes the extraction root.
pub fn zip_slip_zip() -> Vec<u8> {
    zip_bytes(&[
        ZipEntrySpec::File("safe.txt", b"safe"),
        ZipEntrySpec::File("../../etc/passwd", b"root:x:0:0"),
    ])
}

/// Archive containing a symbolic link entry.
pub fn symlink_zip() -> Vec<u8> {
    zip_bytes(&[
        ZipEntrySpec::File("safe.txt", b"safe"),
        ZipEntrySpec::Symlink("link", "/etc/passwd"),
    ])
}

/// Populate `dir` with a small project tree:
/// `file1.txt`, `nested/file2.txt`, `nested/deeper/file3.txt`.
pub fn write_sample_tree(dir: &Path) {
    fs::create_dir_all(dir.join("nested/deeper")).expect("Failed to create sample tree");
    fs::write(dir.join("file1.txt"), SAMPLE_CONTENT).expect("Failed to write file1.txt");
    fs::write(dir.join("nested/file2.txt"), "second").expect("Failed to write file2.txt");
    fs::write(dir.join("nested/deeper/file3.txt"), "third").expect("Failed to write file3.txt");
}

/// Relative paths written by [`write_sample_tree`], forward-slash separated.
pub const SAMPLE_TREE_FILES: [&str; 3] = ["file1.txt", "nested/deeper/file3.txt", "nested/file2.txt"];
