use crate::config::ARK_FOLDER;
use crate::domain::model::{ResourceId, StorageKind, ValueFormat};
use crate::utils::error::{ArkError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// 內建儲存區：名稱 → 形態
pub const KNOWN_STORAGES: [(&str, StorageKind); 4] = [
    ("tags", StorageKind::File),
    ("scores", StorageKind::File),
    ("properties", StorageKind::Folder),
    ("previews", StorageKind::Folder),
];

/// One recorded value for a resource. File storages keep the full history,
/// folder storages only the current file.
pub struct VersionEntry {
    pub ts_ms: u64,
    pub value: String,
}

/// A single storage on disk, loaded into memory for reads.
pub struct Storage {
    path: PathBuf,
    kind: StorageKind,
    entries: BTreeMap<ResourceId, Vec<VersionEntry>>,
}

impl Storage {
    /// Open a storage at the given path. Missing files/folders are treated as
    /// empty and only created on first write.
    pub fn open(path: PathBuf, kind: StorageKind) -> Result<Self> {
        let entries = load_entries(&path, kind)?;
        Ok(Self {
            path,
            kind,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Latest value for the id, if any.
    pub fn read(&self, id: ResourceId) -> Option<&str> {
        self.entries
            .get(&id)
            .and_then(|versions| versions.last())
            .map(|version| version.value.as_str())
    }

    /// Merge the incoming value into the current one and record the result.
    pub fn append(&mut self, id: ResourceId, value: &str, format: ValueFormat) -> Result<()> {
        ensure_single_line(value)?;
        let rendered = render_value(self.read(id), value, format, true)?;
        self.record(id, rendered)
    }

    /// Record the incoming value as-is, replacing the current one.
    pub fn insert(&mut self, id: ResourceId, value: &str, format: ValueFormat) -> Result<()> {
        ensure_single_line(value)?;
        let rendered = render_value(None, value, format, false)?;
        self.record(id, rendered)
    }

    /// Ids one per line, or every recorded version with its timestamp.
    pub fn list(&self, versions: bool) -> String {
        let mut out = String::new();
        if versions {
            for (id, entries) in &self.entries {
                for version in entries {
                    out.push_str(&format!(
                        "{} {} {}\n",
                        id,
                        format_ts(version.ts_ms),
                        version.value
                    ));
                }
            }
        } else {
            for id in self.entries.keys() {
                out.push_str(&format!("{}\n", id));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, id: ResourceId, value: String) -> Result<()> {
        let ts_ms = now_ms();
        match self.kind {
            StorageKind::File => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut file = fs::OpenOptions::new().create(true).append(true).open(&self.path)?;
                writeln!(file, "{} {} {}", ts_ms, id, value)?;
            }
            StorageKind::Folder => {
                fs::create_dir_all(&self.path)?;
                fs::write(self.path.join(id.to_string()), &value)?;
            }
        }

        let versions = self.entries.entry(id).or_default();
        if self.kind == StorageKind::Folder {
            versions.clear();
        }
        versions.push(VersionEntry { ts_ms, value });
        Ok(())
    }
}

/// Resolve a storage argument to a path. An existing path wins; otherwise the
/// name must be a storage under the root's `.ark` folder.
pub fn translate_storage(
    root: Option<&Path>,
    name: &str,
) -> Result<(PathBuf, Option<StorageKind>)> {
    let as_path = Path::new(name);
    if as_path.exists() {
        return Ok((as_path.to_path_buf(), None));
    }

    if let Some(root) = root {
        let label = name.to_lowercase();
        for (known, kind) in KNOWN_STORAGES {
            if label == known {
                return Ok((root.join(ARK_FOLDER).join(known), Some(kind)));
            }
        }
        let custom = root.join(ARK_FOLDER).join(name);
        if custom.exists() {
            return Ok((custom, None));
        }
    }

    Err(ArkError::StorageNotFound {
        name: name.to_string(),
    })
}

/// Pick the storage kind: the built-in table wins, then the explicit flag,
/// then what the filesystem says.
pub fn resolve_kind(
    path: &Path,
    explicit: Option<StorageKind>,
    known: Option<StorageKind>,
) -> StorageKind {
    known.or(explicit).unwrap_or_else(|| {
        if path.is_dir() {
            StorageKind::Folder
        } else {
            StorageKind::File
        }
    })
}

/// 讀取單一資源目前的值
pub fn read_storage_value(
    root: &Path,
    name: &str,
    id: ResourceId,
    kind: Option<StorageKind>,
) -> Result<String> {
    let (path, known) = translate_storage(Some(root), name)?;
    let kind = resolve_kind(&path, kind, known);
    let storage = Storage::open(path, kind)?;
    storage
        .read(id)
        .map(str::to_string)
        .ok_or_else(|| ArkError::StorageError {
            message: format!("no value stored for {}", id),
        })
}

fn load_entries(path: &Path, kind: StorageKind) -> Result<BTreeMap<ResourceId, Vec<VersionEntry>>> {
    let mut entries: BTreeMap<ResourceId, Vec<VersionEntry>> = BTreeMap::new();
    if !path.exists() {
        return Ok(entries);
    }

    match kind {
        StorageKind::File => {
            let contents = fs::read_to_string(path)?;
            for line in contents.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let Some((ts_ms, id, value)) = parse_log_line(line) else {
                    tracing::warn!("Skipping malformed line in {}: {}", path.display(), line);
                    continue;
                };
                entries.entry(id).or_default().push(VersionEntry { ts_ms, value });
            }
            for versions in entries.values_mut() {
                versions.sort_by_key(|version| version.ts_ms);
            }
        }
        StorageKind::Folder => {
            for dir_entry in fs::read_dir(path)? {
                let dir_entry = dir_entry?;
                if !dir_entry.file_type()?.is_file() {
                    continue;
                }
                let entry_path = dir_entry.path();
                let Some(id) = entry_path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse::<ResourceId>().ok())
                else {
                    continue;
                };
                let ts_ms = dir_entry.metadata()?.modified().map(system_time_ms).unwrap_or(0);
                // previews 可能是二進位，寬鬆轉成文字
                let value = String::from_utf8_lossy(&fs::read(&entry_path)?).into_owned();
                entries.insert(id, vec![VersionEntry { ts_ms, value }]);
            }
        }
    }

    Ok(entries)
}

/// Merge or replace, in the requested format. `kv` values are `key=value`
/// pairs and come out as a canonical JSON object.
fn render_value(
    existing: Option<&str>,
    incoming: &str,
    format: ValueFormat,
    merge: bool,
) -> Result<String> {
    match format {
        ValueFormat::Raw => Ok(match existing.filter(|_| merge) {
            Some(prev) => format!("{},{}", prev, incoming),
            None => incoming.to_string(),
        }),
        ValueFormat::KeyValue => {
            let mut map: BTreeMap<String, serde_json::Value> = match existing.filter(|_| merge) {
                Some(prev) => serde_json::from_str(prev)?,
                None => BTreeMap::new(),
            };
            for pair in incoming.split(',') {
                let (key, value) = pair.split_once('=').ok_or_else(|| ArkError::StorageError {
                    message: format!("expected key=value pairs, got '{}'", pair),
                })?;
                map.insert(
                    key.trim().to_string(),
                    serde_json::Value::String(value.trim().to_string()),
                );
            }
            Ok(serde_json::to_string(&map)?)
        }
    }
}

fn ensure_single_line(value: &str) -> Result<()> {
    if value.contains('\n') {
        return Err(ArkError::StorageError {
            message: "values must be single-line".to_string(),
        });
    }
    Ok(())
}

fn parse_log_line(line: &str) -> Option<(u64, ResourceId, String)> {
    let mut parts = line.splitn(3, ' ');
    let ts_ms: u64 = parts.next()?.parse().ok()?;
    let id: ResourceId = parts.next()?.parse().ok()?;
    let value = parts.next()?;
    Some((ts_ms, id, value.to_string()))
}

fn format_ts(ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn system_time_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn now_ms() -> u64 {
    system_time_ms(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_raw_insert_keeps_value() {
        let out = render_value(Some("old"), "new", ValueFormat::Raw, false).unwrap();
        assert_eq!(out, "new");
    }

    #[test]
    fn test_render_raw_append_joins_with_comma() {
        let out = render_value(Some("red,blue"), "green", ValueFormat::Raw, true).unwrap();
        assert_eq!(out, "red,blue,green");

        // no previous value: nothing to join
        let out = render_value(None, "green", ValueFormat::Raw, true).unwrap();
        assert_eq!(out, "green");
    }

    #[test]
    fn test_render_kv_builds_json_object() {
        let out = render_value(None, "year=2023, title=Ark", ValueFormat::KeyValue, false).unwrap();
        assert_eq!(out, r#"{"title":"Ark","year":"2023"}"#);
    }

    #[test]
    fn test_render_kv_append_merges_and_overwrites() {
        let prev = r#"{"title":"Ark","year":"2023"}"#;
        let out = render_value(Some(prev), "year=2024,author=me", ValueFormat::KeyValue, true)
            .unwrap();
        assert_eq!(out, r#"{"author":"me","title":"Ark","year":"2024"}"#);
    }

    #[test]
    fn test_render_kv_rejects_pairs_without_equals() {
        let result = render_value(None, "just-a-value", ValueFormat::KeyValue, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_single_line_guard() {
        assert!(ensure_single_line("fine value").is_ok());
        assert!(ensure_single_line("bad\nvalue").is_err());
    }

    #[test]
    fn test_parse_log_line_keeps_spaces_in_value() {
        let id = ResourceId::compute_bytes(b"x");
        let line = format!("1700000000000 {} a value with spaces", id);
        let (ts, parsed_id, value) = parse_log_line(&line).unwrap();
        assert_eq!(ts, 1_700_000_000_000);
        assert_eq!(parsed_id, id);
        assert_eq!(value, "a value with spaces");
    }

    #[test]
    fn test_parse_log_line_rejects_short_lines() {
        assert!(parse_log_line("1700000000000 1-2").is_none());
        assert!(parse_log_line("nope 1-2 value").is_none());
    }
}
