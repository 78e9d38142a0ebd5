//! Low-level fsync operations for durable state writes.
//!
//! A rename is only crash-safe if both the file contents and the directory
//! entry are synced; on POSIX systems the directory entry needs its own
//! fsync or the rename may not survive power loss.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Syncs a file's contents and metadata to disk.
pub fn fsync_file(file: &File) -> io::Result<()> {
    file.sync_all()
}

/// Syncs a directory, making renames and creations within it durable.
pub fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(dir_path)?;
    dir.sync_all()
}
