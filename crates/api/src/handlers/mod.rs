pub mod completion;
pub mod project;
pub mod upload;

use folio_core::error::CoreError;
use folio_core::module_key::ModuleKey;

/// Reject a malformed module key. The key comes back exactly as sent, so
/// records are stored under the same spelling the client later looks up
/// and deletes by.
pub(crate) fn checked_module_key(raw: String) -> Result<String, CoreError> {
    ModuleKey::parse(&raw)?;
    Ok(raw)
}
