pub mod backup;
pub mod index;
pub mod link;
pub mod storage;

pub use crate::domain::model::{IndexEntry, LinkData, ResourceId};
pub use crate::domain::ports::PageFetcher;
pub use crate::utils::error::Result;
