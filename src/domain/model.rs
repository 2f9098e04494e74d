use crate::utils::error::{ArkError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;
use twox_hash::XxHash32;

const HASH_SEED: u32 = 0;
const HASH_BUF_SIZE: usize = 8192;

/// 以內容定址的資源識別碼：檔案大小 + 內容雜湊
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub data_size: u64,
    pub hash: u32,
}

impl ResourceId {
    pub fn compute<R: Read>(data_size: u64, mut reader: R) -> Result<Self> {
        let mut hasher = XxHash32::with_seed(HASH_SEED);
        let mut buf = [0u8; HASH_BUF_SIZE];

        loop {
            let read = reader.read(&mut buf)?;
            if read == 0 {
                break;
            }
            hasher.write(&buf[..read]);
        }

        Ok(Self {
            data_size,
            hash: hasher.finish() as u32,
        })
    }

    pub fn compute_bytes(bytes: &[u8]) -> Self {
        let mut hasher = XxHash32::with_seed(HASH_SEED);
        hasher.write(bytes);
        Self {
            data_size: bytes.len() as u64,
            hash: hasher.finish() as u32,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let file = std::fs::File::open(path)?;
        Self::compute(size, file)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.data_size, self.hash)
    }
}

impl FromStr for ResourceId {
    type Err = ArkError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ArkError::InvalidResourceId {
            value: s.to_string(),
        };

        let (size, hash) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            data_size: size.parse().map_err(|_| invalid())?,
            hash: hash.parse().map_err(|_| invalid())?,
        })
    }
}

/// 索引中單一資源的狀態
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    pub id: ResourceId,
    pub modified: SystemTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EntryOutput {
    Link,
    Id,
    Path,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StorageKind {
    File,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ValueFormat {
    Raw,
    #[cfg_attr(feature = "cli", value(name = "kv"))]
    KeyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_display_parse_round_trip() {
        let id = ResourceId::compute_bytes(b"hello world");
        let text = id.to_string();
        let parsed: ResourceId = text.parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.data_size, 11);
    }

    #[test]
    fn test_resource_id_rejects_malformed_input() {
        assert!("".parse::<ResourceId>().is_err());
        assert!("12".parse::<ResourceId>().is_err());
        assert!("12-".parse::<ResourceId>().is_err());
        assert!("-34".parse::<ResourceId>().is_err());
        assert!("12-34-56".parse::<ResourceId>().is_err());
        assert!("size-hash".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_equal_content_gives_equal_ids() {
        assert_eq!(
            ResourceId::compute_bytes(b"same bytes"),
            ResourceId::compute_bytes(b"same bytes")
        );
        assert_ne!(
            ResourceId::compute_bytes(b"some bytes"),
            ResourceId::compute_bytes(b"other bytes")
        );
    }

    #[test]
    fn test_streamed_compute_matches_oneshot() {
        let data = b"a slightly longer payload that still fits one buffer";
        let streamed =
            ResourceId::compute(data.len() as u64, std::io::Cursor::new(data.to_vec())).unwrap();
        assert_eq!(streamed, ResourceId::compute_bytes(data));
    }
}
