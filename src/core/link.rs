use crate::config::{ARK_FOLDER, PREVIEWS_DIR};
use crate::core::index::ResourceIndex;
use crate::domain::model::{LinkData, ResourceId};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{ArkError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::fs;
use std::path::Path;

/// reqwest-backed fetcher used outside tests.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Write a `.link` resource under the root. The id comes from the URL bytes,
/// so the same URL always lands in the same file. Preview download is
/// best-effort and never fails the command.
pub async fn create_link<F: PageFetcher + ?Sized>(
    root: &Path,
    fetcher: &F,
    url: &str,
    title: &str,
    desc: Option<&str>,
) -> Result<ResourceId> {
    validate_url("url", url)?;

    let id = ResourceId::compute_bytes(url.as_bytes());
    let data = LinkData {
        url: url.to_string(),
        title: title.to_string(),
        desc: desc.map(str::to_string),
        created_at: Utc::now(),
    };

    let file_path = root.join(format!("{}.link", id));
    fs::write(&file_path, serde_json::to_string_pretty(&data)?)?;
    tracing::debug!("Link written to {}", file_path.display());

    if let Err(e) = fetch_preview(root, fetcher, url, id).await {
        tracing::warn!("Could not fetch a preview for {}: {}", url, e);
    }

    Ok(id)
}

/// Read link data back, either from an explicit file or by id via the index.
pub fn load_link(root: &Path, file_path: Option<&Path>, id: Option<&str>) -> Result<LinkData> {
    let path = match (file_path, id) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(id)) => {
            let id: ResourceId = id.parse()?;
            let index = ResourceIndex::provide(root)?;
            let rel = index.path_of(id).ok_or_else(|| ArkError::IndexError {
                message: format!("no resource with id {}", id),
            })?;
            root.join(rel)
        }
        (None, None) => {
            return Err(ArkError::MissingArgument {
                name: "file_path or id",
            })
        }
    };

    let contents = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
}

async fn fetch_preview<F: PageFetcher + ?Sized>(
    root: &Path,
    fetcher: &F,
    url: &str,
    id: ResourceId,
) -> Result<()> {
    let html = fetcher.fetch_text(url).await?;

    let Some(image_url) = extract_og_image(&html) else {
        tracing::debug!("No og:image found for {}", url);
        return Ok(());
    };
    let Some(absolute) = resolve_image_url(url, &image_url) else {
        tracing::debug!("Unusable og:image URL for {}: {}", url, image_url);
        return Ok(());
    };

    let bytes = fetcher.fetch_bytes(absolute.as_str()).await?;
    let previews_dir = root.join(ARK_FOLDER).join(PREVIEWS_DIR);
    fs::create_dir_all(&previews_dir)?;
    fs::write(previews_dir.join(format!("{}.png", id)), bytes)?;
    tracing::debug!("Preview stored for {}", id);
    Ok(())
}

/// og:image content, either attribute order.
pub fn extract_og_image(html: &str) -> Option<String> {
    let property_first = Regex::new(
        r#"<meta[^>]*property\s*=\s*["']og:image["'][^>]*content\s*=\s*["']([^"']+)["']"#,
    )
    .ok()?;
    if let Some(caps) = property_first.captures(html) {
        return Some(caps[1].to_string());
    }

    let content_first = Regex::new(
        r#"<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:image["']"#,
    )
    .ok()?;
    content_first.captures(html).map(|caps| caps[1].to_string())
}

// 相對的 og:image 以頁面 URL 為基底
fn resolve_image_url(page_url: &str, image_url: &str) -> Option<url::Url> {
    url::Url::parse(image_url)
        .ok()
        .or_else(|| url::Url::parse(page_url).ok()?.join(image_url).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_og_image_property_first() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://cdn.example.com/pic.png" />
        </head></html>"#;
        assert_eq!(
            extract_og_image(html),
            Some("https://cdn.example.com/pic.png".to_string())
        );
    }

    #[test]
    fn test_extract_og_image_content_first() {
        let html = r#"<meta content="/images/cover.jpg" property="og:image">"#;
        assert_eq!(extract_og_image(html), Some("/images/cover.jpg".to_string()));
    }

    #[test]
    fn test_extract_og_image_missing() {
        let html = r#"<meta property="og:title" content="Just a title">"#;
        assert_eq!(extract_og_image(html), None);
    }

    #[test]
    fn test_resolve_image_url_handles_relative() {
        let absolute = resolve_image_url("https://example.com/post/1", "/img/a.png").unwrap();
        assert_eq!(absolute.as_str(), "https://example.com/img/a.png");

        let already_absolute =
            resolve_image_url("https://example.com", "https://cdn.example.com/b.png").unwrap();
        assert_eq!(already_absolute.as_str(), "https://cdn.example.com/b.png");
    }
}
