pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use crate::core::index::ResourceIndex;
pub use crate::core::link::{create_link, load_link, HttpPageFetcher};
pub use crate::core::storage::{translate_storage, Storage};
pub use config::ArkPaths;
pub use domain::model::{IndexEntry, LinkData, ResourceId};
pub use domain::ports::PageFetcher;
pub use utils::error::{ArkError, Result};
