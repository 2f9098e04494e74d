use crate::config::{ARK_FOLDER, INDEX_FILE};
use crate::domain::model::{IndexEntry, ResourceId};
use crate::utils::error::{ArkError, Result};
use ignore::WalkBuilder;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 根目錄的資源索引：相對路徑 ↔ 資源識別碼
pub struct ResourceIndex {
    root: PathBuf,
    path2id: BTreeMap<PathBuf, IndexEntry>,
    collisions: HashMap<ResourceId, usize>,
}

#[derive(Debug, Default)]
pub struct IndexUpdate {
    pub added: Vec<(PathBuf, ResourceId)>,
    pub deleted: Vec<(PathBuf, ResourceId)>,
}

impl IndexUpdate {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

impl ResourceIndex {
    /// Walk the root and hash every indexable file.
    pub fn build(root: &Path) -> Result<Self> {
        let root = root.to_path_buf();
        let mut path2id = BTreeMap::new();

        for file in scan_root(&root)? {
            let id = ResourceId::from_path(&root.join(&file.rel))?;
            path2id.insert(
                file.rel,
                IndexEntry {
                    id,
                    modified: file.modified,
                },
            );
        }

        let collisions = count_collisions(&path2id);
        Ok(Self {
            root,
            path2id,
            collisions,
        })
    }

    /// Read a previously stored index without checking freshness.
    pub fn load(root: &Path) -> Result<Self> {
        let index_path = root.join(ARK_FOLDER).join(INDEX_FILE);
        let contents = fs::read_to_string(&index_path)?;
        let mut path2id = BTreeMap::new();

        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (path, entry) = parse_index_line(line).ok_or_else(|| ArkError::IndexError {
                message: format!("malformed line {} in {}", lineno + 1, index_path.display()),
            })?;
            path2id.insert(path, entry);
        }

        let collisions = count_collisions(&path2id);
        Ok(Self {
            root: root.to_path_buf(),
            path2id,
            collisions,
        })
    }

    /// Stored index brought up to date, or a fresh build. Re-persists when stale.
    pub fn provide(root: &Path) -> Result<Self> {
        let index_path = root.join(ARK_FOLDER).join(INDEX_FILE);

        if index_path.exists() {
            let mut index = Self::load(root)?;
            let update = index.update_all()?;
            if !update.is_empty() {
                index.store()?;
            }
            tracing::debug!(
                "Index provided from {} ({} entries, {} added, {} deleted)",
                index_path.display(),
                index.len(),
                update.added.len(),
                update.deleted.len()
            );
            Ok(index)
        } else {
            let index = Self::build(root)?;
            index.store()?;
            tracing::debug!("Index built fresh ({} entries)", index.len());
            Ok(index)
        }
    }

    /// Rescan the root and diff against the known entries. A file only gets
    /// rehashed when its size or mtime changed; a content change shows up as
    /// deleted + added under the same path.
    pub fn update_all(&mut self) -> Result<IndexUpdate> {
        let mut added = Vec::new();
        let mut deleted = Vec::new();
        let mut fresh: BTreeMap<PathBuf, IndexEntry> = BTreeMap::new();

        for file in scan_root(&self.root)? {
            let known = self.path2id.get(&file.rel);

            if let Some(entry) = known {
                let same_size = entry.id.data_size == file.size;
                let same_mtime =
                    system_time_to_ms(entry.modified) == system_time_to_ms(file.modified);
                if same_size && same_mtime {
                    fresh.insert(file.rel, *entry);
                    continue;
                }
            }

            let id = ResourceId::from_path(&self.root.join(&file.rel))?;
            match known {
                Some(entry) if entry.id == id => {
                    // touch 而已，內容沒變
                }
                Some(entry) => {
                    deleted.push((file.rel.clone(), entry.id));
                    added.push((file.rel.clone(), id));
                }
                None => {
                    added.push((file.rel.clone(), id));
                }
            }
            fresh.insert(
                file.rel,
                IndexEntry {
                    id,
                    modified: file.modified,
                },
            );
        }

        for (path, entry) in &self.path2id {
            if !fresh.contains_key(path) {
                deleted.push((path.clone(), entry.id));
            }
        }

        self.path2id = fresh;
        self.collisions = count_collisions(&self.path2id);
        Ok(IndexUpdate { added, deleted })
    }

    pub fn store(&self) -> Result<()> {
        let ark_dir = self.root.join(ARK_FOLDER);
        fs::create_dir_all(&ark_dir)?;

        let mut out = String::new();
        for (path, entry) in &self.path2id {
            out.push_str(&format!(
                "{} {} {}\n",
                system_time_to_ms(entry.modified),
                entry.id,
                path.display()
            ));
        }

        fs::write(ark_dir.join(INDEX_FILE), out)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.path2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path2id.is_empty()
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &IndexEntry)> {
        self.path2id.iter()
    }

    /// Ids mapped by more than one path, with the number of paths.
    pub fn collisions(&self) -> &HashMap<ResourceId, usize> {
        &self.collisions
    }

    /// First path (in path order) carrying the given id.
    pub fn path_of(&self, id: ResourceId) -> Option<&Path> {
        self.path2id
            .iter()
            .find(|(_, entry)| entry.id == id)
            .map(|(path, _)| path.as_path())
    }
}

struct ScannedFile {
    rel: PathBuf,
    modified: SystemTime,
    size: u64,
}

/// 掃描根目錄：只收一般檔案，跳過隱藏項目與空檔案
fn scan_root(root: &Path) -> Result<Vec<ScannedFile>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ArkError::IndexError {
            message: format!("walk failed under {}: {}", root.display(), e),
        })?;

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let meta = entry.metadata().map_err(|e| ArkError::IndexError {
            message: format!("stat failed for {}: {}", entry.path().display(), e),
        })?;
        if meta.len() == 0 {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ArkError::IndexError {
                message: format!("{} escapes root {}", entry.path().display(), root.display()),
            })?
            .to_path_buf();

        files.push(ScannedFile {
            rel,
            modified: meta.modified()?,
            size: meta.len(),
        });
    }

    Ok(files)
}

fn count_collisions(path2id: &BTreeMap<PathBuf, IndexEntry>) -> HashMap<ResourceId, usize> {
    let mut counts: HashMap<ResourceId, usize> = HashMap::new();
    for entry in path2id.values() {
        *counts.entry(entry.id).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

// index 以毫秒為單位保存 mtime
fn parse_index_line(line: &str) -> Option<(PathBuf, IndexEntry)> {
    let mut parts = line.splitn(3, ' ');
    let ms: u64 = parts.next()?.parse().ok()?;
    let id: ResourceId = parts.next()?.parse().ok()?;
    let path = parts.next()?;
    if path.is_empty() {
        return None;
    }

    Some((
        PathBuf::from(path),
        IndexEntry {
            id,
            modified: ms_to_system_time(ms),
        },
    ))
}

fn system_time_to_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn ms_to_system_time(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}
