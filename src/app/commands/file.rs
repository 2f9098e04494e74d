use crate::core::storage::{read_storage_value, resolve_kind, translate_storage, Storage};
use crate::domain::model::{ResourceId, StorageKind, ValueFormat};
use crate::utils::error::Result;
use std::path::Path;

pub fn run_file_append(
    root: &Path,
    name: &str,
    id: &str,
    content: &str,
    format: Option<ValueFormat>,
    kind: Option<StorageKind>,
) -> Result<()> {
    let id: ResourceId = id.parse()?;
    let format = format.unwrap_or(ValueFormat::Raw);
    let mut storage = open_storage(root, name, kind)?;
    storage.append(id, content, format)?;
    tracing::info!("Appended to {} for {}", storage.path().display(), id);
    Ok(())
}

pub fn run_file_insert(
    root: &Path,
    name: &str,
    id: &str,
    content: &str,
    format: Option<ValueFormat>,
    kind: Option<StorageKind>,
) -> Result<()> {
    let id: ResourceId = id.parse()?;
    let format = format.unwrap_or(ValueFormat::Raw);
    let mut storage = open_storage(root, name, kind)?;
    storage.insert(id, content, format)?;
    tracing::info!("Inserted into {} for {}", storage.path().display(), id);
    Ok(())
}

pub fn run_file_read(
    root: &Path,
    name: &str,
    id: &str,
    kind: Option<StorageKind>,
) -> Result<String> {
    let id: ResourceId = id.parse()?;
    read_storage_value(root, name, id, kind)
}

fn open_storage(root: &Path, name: &str, kind: Option<StorageKind>) -> Result<Storage> {
    let (path, known) = translate_storage(Some(root), name)?;
    let kind = resolve_kind(&path, kind, known);
    Storage::open(path, kind)
}
