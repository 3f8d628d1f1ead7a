//! Upload storage: files parked in the upload folder under opaque tokens.
//!
//! A token is `<uuid-hex>_<original-filename>`. Tokens stand in for the
//! web upload session: a later `report --token` run resolves the token
//! back to the stored file, and an unknown token reads as an expired
//! session.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use uuid::Uuid;

use crate::error::{SalesError, SalesResult};

/// Copies `source` into `upload_folder` under a fresh token and returns
/// the token. Missing or empty source files are rejected up front.
pub fn store(source: &Path, upload_folder: &Path) -> SalesResult<String> {
    let size = fs::metadata(source).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(SalesError::NoFileProvided);
    }
    let original = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(SalesError::NoFileProvided)?;
    let token = format!("{}_{original}", Uuid::new_v4().simple());
    let destination = upload_folder.join(&token);
    fs::copy(source, &destination)
        .map_err(|err| SalesError::UnreadableFile(format!("{}: {err}", source.display())))?;
    info!("Stored upload as {token}");
    Ok(token)
}

/// Resolves a token to its stored file. The token is reduced to its base
/// name so it can never escape the upload folder.
pub fn resolve(token: &str, upload_folder: &Path) -> SalesResult<PathBuf> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(SalesError::SessionExpired(String::new()));
    }
    let safe_name = Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SalesError::SessionExpired(trimmed.to_string()))?;
    let path = upload_folder.join(safe_name);
    if !path.is_file() {
        return Err(SalesError::SessionExpired(trimmed.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn store_and_resolve_round_trip() {
        let dir = tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        let source = dir.path().join("sales.csv");
        fs::write(&source, "product,total\nA,1\n").unwrap();

        let token = store(&source, &uploads).unwrap();
        assert!(token.ends_with("_sales.csv"));
        let resolved = resolve(&token, &uploads).unwrap();
        assert_eq!(fs::read_to_string(resolved).unwrap(), "product,total\nA,1\n");
    }

    #[test]
    fn store_rejects_empty_or_missing_source() {
        let dir = tempdir().unwrap();
        let uploads = dir.path().to_path_buf();
        let empty = dir.path().join("empty.csv");
        fs::write(&empty, "").unwrap();
        assert_eq!(
            store(&empty, &uploads).unwrap_err(),
            SalesError::NoFileProvided
        );
        assert_eq!(
            store(&dir.path().join("absent.csv"), &uploads).unwrap_err(),
            SalesError::NoFileProvided
        );
    }

    #[test]
    fn resolve_rejects_unknown_blank_and_traversal_tokens() {
        let dir = tempdir().unwrap();
        let uploads = dir.path().to_path_buf();
        assert!(matches!(
            resolve("deadbeef_gone.csv", &uploads),
            Err(SalesError::SessionExpired(_))
        ));
        assert!(matches!(
            resolve("  ", &uploads),
            Err(SalesError::SessionExpired(_))
        ));
        // Same basename resolution the web layer applied to its tokens.
        let source = dir.path().join("real.csv");
        fs::write(&source, "x").unwrap();
        let resolved = resolve("../real.csv", &uploads).unwrap();
        assert_eq!(resolved, uploads.join("real.csv"));
    }
}
