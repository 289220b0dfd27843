//! Logo asset store: a directory of image files keyed by generated names.

use std::path::{Path, PathBuf};

use history_db::{Database, LogoAsset};
use qr_engine::LogoKind;
use sha2::{Digest, Sha256};

pub const MAX_LOGO_SIZE: usize = 5 * 1024 * 1024; // 5MB
const VALID_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg"];
const MAX_KEY_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("Logo not found: {0}")]
    NotFound(String),
    #[error("Invalid logo name: {0}")]
    InvalidName(String),
    #[error("Unsupported logo format (only PNG/JPEG/SVG)")]
    UnsupportedFormat,
    #[error("Logo file too large (max 5MB)")]
    FileTooLarge,
    #[error("Logo file is not a valid image: {0}")]
    InvalidImage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Db(#[from] history_db::DbError),
}

impl LogoError {
    /// Whether the caller sent something unacceptable, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_) | Self::UnsupportedFormat | Self::FileTooLarge | Self::InvalidImage(_)
        )
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::FileTooLarge => 413,
            e if e.is_client_error() => 400,
            _ => 500,
        }
    }
}

#[derive(Clone)]
pub struct LogoService {
    dir: PathBuf,
    db: Database,
}

impl LogoService {
    pub fn new(dir: PathBuf, db: Database) -> Self {
        Self { dir, db }
    }

    /// Storage keys of every servable logo, sorted by name.
    pub fn list_keys(&self) -> Result<Vec<String>, LogoError> {
        let mut keys: Vec<String> = std::fs::read_dir(&self.dir)?
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_valid_key(name))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Store an uploaded logo under a content-derived key.
    ///
    /// The client-supplied name is only recorded as display metadata.
    pub fn save_upload(&self, original_name: &str, data: &[u8]) -> Result<LogoAsset, LogoError> {
        if data.len() > MAX_LOGO_SIZE {
            return Err(LogoError::FileTooLarge);
        }
        let ext = extension_of(original_name).ok_or(LogoError::UnsupportedFormat)?;
        let kind = LogoKind::from_extension(&ext).ok_or(LogoError::UnsupportedFormat)?;

        qr_engine::load_logo(kind, data, 16).map_err(|e| LogoError::InvalidImage(e.to_string()))?;

        let digest = Sha256::digest(data);
        let key = format!("{}.{ext}", hex::encode(&digest[..16]));
        let path = self.dir.join(&key);

        if let Some(existing) = self.db.get_logo_asset(&key)? {
            if path.is_file() {
                tracing::debug!(key = %key, "Logo already stored");
                return Ok(LogoAsset {
                    original_name: display_name(original_name),
                    ..existing
                });
            }
        }

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, data)?;

        let asset = LogoAsset {
            storage_key: key.clone(),
            original_name: display_name(original_name),
            byte_size: data.len() as i64,
            uploaded_at: crate::services::timestamp_now(),
        };
        self.db.upsert_logo_asset(&asset)?;

        tracing::info!(key = %key, name = %asset.original_name, "Logo uploaded");
        Ok(asset)
    }

    /// Read a stored logo given any reference to it (bare key, path or URL).
    pub fn read_reference(&self, reference: &str) -> Result<(LogoKind, Vec<u8>), LogoError> {
        let key = reference_to_key(reference);
        if !is_valid_key(key) {
            return Err(LogoError::InvalidName(key.to_string()));
        }
        let kind = extension_of(key)
            .and_then(|ext| LogoKind::from_extension(&ext))
            .ok_or(LogoError::UnsupportedFormat)?;

        let path = self.dir.join(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok((kind, bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LogoError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write bundled logos that are not yet present. Returns how many were written.
    pub fn seed_defaults<'a>(
        &self,
        files: impl IntoIterator<Item = (String, std::borrow::Cow<'a, [u8]>)>,
    ) -> Result<usize, LogoError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut written = 0;
        for (name, data) in files {
            if !is_valid_key(&name) {
                tracing::warn!(name = %name, "Skipping bundled logo with invalid name");
                continue;
            }
            let path = self.dir.join(&name);
            if path.exists() {
                continue;
            }
            std::fs::write(&path, data.as_ref())?;
            written += 1;
        }
        if written > 0 {
            tracing::info!(count = written, "Seeded default logos");
        }
        Ok(written)
    }
}

/// Last path segment of a logo reference, without query or fragment.
pub fn reference_to_key(reference: &str) -> &str {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// A key is a plain file name with an allowed image extension.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        && extension_of(key).is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Strip any directory part a browser may have sent along with the file name.
fn display_name(original: &str) -> String {
    let name = reference_to_key(original).trim();
    if name.is_empty() { "logo".to_string() } else { name.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_to_key_takes_last_segment() {
        assert_eq!(reference_to_key("http://localhost:4000/logos/a.png"), "a.png");
        assert_eq!(reference_to_key("/logos/a.svg?v=2#top"), "a.svg");
        assert_eq!(reference_to_key("a.jpg"), "a.jpg");
        assert_eq!(reference_to_key("..\\..\\secret.png"), "secret.png");
    }

    #[test]
    fn key_validation() {
        assert!(is_valid_key("0123abcd.png"));
        assert!(is_valid_key("brand-mark_2.SVG"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(".."));
        assert!(!is_valid_key(".hidden.png"));
        assert!(!is_valid_key("passwd"));
        assert!(!is_valid_key("logo.gif"));
        assert!(!is_valid_key("my logo.png"));
        assert!(!is_valid_key("a/b.png"));
    }

    #[test]
    fn oversized_upload_is_payload_too_large() {
        assert_eq!(LogoError::FileTooLarge.status_code(), 413);
        assert_eq!(LogoError::UnsupportedFormat.status_code(), 400);
        assert_eq!(LogoError::NotFound("a.png".into()).status_code(), 500);
    }

    #[test]
    fn display_name_drops_directories() {
        assert_eq!(display_name("C:\\Users\\me\\logo.png"), "logo.png");
        assert_eq!(display_name("   "), "logo");
    }
}
