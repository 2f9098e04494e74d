use crate::utils::error::Result;
use async_trait::async_trait;

/// 連結預覽抓取的出口埠，方便在測試中替換
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
