//! Blob reference naming.
//!
//! References must differ across repeated uploads for the same module key so
//! a replacement never reuses the URL of the blob it supersedes.

use sha2::{Digest, Sha256};

/// Replace anything outside `[A-Za-z0-9_-]` (dots, spaces, path separators,
/// parentheses, non-ASCII letters) with `_`.
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Lowercased extension of `file_name`, if it has a usable one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 8 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Build a blob reference: `{sanitized key}_{unix millis}[.{ext}]`.
///
/// ```
/// use folio_core::naming::blob_reference;
///
/// assert_eq!(
///     blob_reference("1-MODULO DE (ORDENES)", 1_700_000_000_000, Some("png")),
///     "1-MODULO_DE__ORDENES__1700000000000.png"
/// );
/// assert_eq!(blob_reference("4-main", 5, None), "4-main_5");
/// ```
pub fn blob_reference(suggested_key: &str, unix_millis: i64, extension: Option<&str>) -> String {
    let mut reference = sanitize_component(suggested_key);
    if reference.is_empty() {
        reference.push_str("upload");
    }
    reference.push('_');
    reference.push_str(&unix_millis.to_string());
    if let Some(ext) = extension {
        reference.push('.');
        reference.push_str(ext);
    }
    reference
}

/// Whether `reference` is safe to join onto a local directory.
pub fn is_safe_reference(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.starts_with('.')
        && !reference.contains(['/', '\\'])
        && !reference.contains("..")
}

/// Signature for a signed blob-provider request.
///
/// Parameters are sorted by name, joined as `k=v` with `&`, the secret is
/// appended, and the result is hashed with SHA-256 (hex).
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let hash = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_component("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_component("1-DESEMPEÑO"), "1-DESEMPE_O");
    }

    #[test]
    fn extension_parsing() {
        assert_eq!(file_extension("proof.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("weird.p/ng"), None);
    }

    #[test]
    fn references_differ_across_uploads() {
        let a = blob_reference("1-A", 1000, Some("png"));
        let b = blob_reference("1-A", 1001, Some("png"));
        assert_ne!(a, b);
    }

    #[test]
    fn generated_references_are_safe() {
        let r = blob_reference("../../1-A", 1, Some("jpg"));
        assert!(is_safe_reference(&r), "{r}");
        assert!(!is_safe_reference("../x"));
        assert!(!is_safe_reference("a/b"));
        assert!(!is_safe_reference(""));
    }

    #[test]
    fn signature_sorts_parameters() {
        let a = sign_params(&[("timestamp", "1"), ("public_id", "x")], "secret");
        let b = sign_params(&[("public_id", "x"), ("timestamp", "1")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sign_params(&[("public_id", "x"), ("timestamp", "1")], "other"));
    }
}
