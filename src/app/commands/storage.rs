use crate::core::storage::{resolve_kind, translate_storage, Storage};
use crate::domain::model::StorageKind;
use crate::utils::error::{ArkError, Result};
use std::path::Path;

/// List a storage's ids, or every recorded version with `versions`.
pub fn run_storage_list(
    root: Option<&Path>,
    name: Option<&str>,
    kind: Option<StorageKind>,
    versions: bool,
) -> Result<String> {
    let name = name.ok_or(ArkError::MissingArgument { name: "Storage" })?;
    let (path, known) = translate_storage(root, name)?;
    let kind = resolve_kind(&path, kind, known);
    let storage = Storage::open(path, kind)?;
    Ok(storage.list(versions))
}
