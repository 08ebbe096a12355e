//! Atomic write primitives
//!
//! Uses temp→rename so a reader never observes a partial file

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{io_read, io_write, Result};

/// Sibling temp path, unique per call so concurrent writers never share one
fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

fn create_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_write(parent, e))?;
    }
    Ok(())
}

/// Atomically replace `target` with `content`
///
/// The temp file lives in the target's directory so the rename stays on
/// one file system.
///
/// # Errors
///
/// `CmsError::WriteFailed` naming the path that failed.
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    create_parent(target)?;
    let temp = temp_path(target);

    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(io_write(&temp, e));
    }

    if let Err(e) = fs::rename(&temp, target) {
        let _ = fs::remove_file(&temp);
        return Err(io_write(target, e));
    }

    debug!(path = %target.display(), bytes = content.len(), "atomic write");
    Ok(())
}

/// Read `target` as text; `None` when the file does not exist
///
/// # Errors
///
/// `CmsError::ReadFailed` for any other I/O failure.
pub fn read_if_exists(target: &Path) -> Result<Option<String>> {
    match fs::read_to_string(target) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_read(target, e)),
    }
}

/// Read `target` as newline-separated lines; empty when the file does not exist
///
/// Lines are decoded one at a time, so bytes that are not UTF-8 only spoil
/// the line they sit on.
///
/// # Errors
///
/// `CmsError::ReadFailed` for any I/O failure other than a missing file.
pub fn read_lines_lossy(target: &Path) -> Result<Vec<String>> {
    let bytes = match fs::read(target) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_read(target, e)),
    };
    let mut lines = Vec::new();
    for raw in bytes.split(|b| *b == b'\n') {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            continue;
        }
        match std::str::from_utf8(raw) {
            Ok(line) => lines.push(line.to_string()),
            Err(e) => {
                debug!(path = %target.display(), valid_up_to = e.valid_up_to(), "line is not utf-8");
                lines.push(String::from_utf8_lossy(raw).into_owned());
            }
        }
    }
    Ok(lines)
}

/// Append `line` plus a newline to `target`, creating it if needed
///
/// A file whose last byte is not a newline (a torn earlier append) gets one
/// first, so the new line never merges into the broken one.
///
/// # Errors
///
/// `CmsError::WriteFailed` on any I/O failure.
pub fn append_line(target: &Path, line: &str) -> Result<()> {
    create_parent(target)?;
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(target)
        .map_err(|e| io_write(target, e))?;
    let mut record = String::with_capacity(line.len() + 2);
    if !ends_with_newline(&mut file).map_err(|e| io_write(target, e))? {
        debug!(path = %target.display(), "repairing unterminated last line");
        record.push('\n');
    }
    record.push_str(line);
    record.push('\n');
    file.write_all(record.as_bytes())
        .map_err(|e| io_write(target, e))?;

    debug!(path = %target.display(), "appended line");
    Ok(())
}

/// `true` for an empty file, otherwise whether the last byte is `\n`
fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
