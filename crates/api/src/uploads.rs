// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staging of uploaded files.
//!
//! An upload is written to the staging directory under a sanitized, unique
//! name and removed again when the `StagedUpload` is dropped, whether or not
//! processing succeeded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{debug, warn};

/// Longest file stem kept from the client-supplied name.
const MAX_STEM_CHARS: usize = 64;

/// An uploaded file held on disk for the duration of one request.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    client_filename: String,
}

impl StagedUpload {
    /// Writes `bytes` into `upload_dir` under a name derived from
    /// `client_filename`.
    ///
    /// The client name is never trusted: path components and anything outside
    /// `[A-Za-z0-9._-]` are removed, and a unique prefix is added.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created or the file
    /// cannot be written.
    pub fn stage(upload_dir: &Path, client_filename: &str, bytes: &[u8]) -> io::Result<Self> {
        fs::create_dir_all(upload_dir)?;

        let unique: String = format!(
            "{}_{:08x}",
            OffsetDateTime::now_utc().unix_timestamp_nanos(),
            rand::random::<u32>()
        );
        let path: PathBuf = upload_dir.join(format!(
            "{unique}_{}",
            sanitize_filename(client_filename)
        ));

        fs::write(&path, bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "Upload staged");

        Ok(Self {
            path,
            client_filename: client_filename.to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    /// Reads the staged bytes back.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Staged upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "Failed to remove staged upload: {e}"),
        }
    }
}

/// Reduces a client-supplied filename to a safe single path component.
///
/// Keeps only the final path segment and ASCII alphanumerics, `.`, `-` and
/// `_`. Leading dots are stripped. Returns `"upload"` if nothing survives.
#[must_use]
pub fn sanitize_filename(client_filename: &str) -> String {
    let last_segment: &str = client_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(client_filename);

    let cleaned: String = last_segment
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let cleaned: &str = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return String::from("upload");
    }

    let (stem, extension): (&str, Option<&str>) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (cleaned, None),
    };
    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();

    match extension {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}
