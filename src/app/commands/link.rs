use crate::core::link::{create_link, load_link, HttpPageFetcher};
use crate::domain::model::LinkData;
use crate::utils::error::{ArkError, Result};
use std::path::Path;

pub async fn run_link_create(
    root: &Path,
    url: Option<&str>,
    title: Option<&str>,
    desc: Option<&str>,
) -> Result<()> {
    let url = url.ok_or(ArkError::MissingArgument { name: "Url" })?;
    let title = title.ok_or(ArkError::MissingArgument { name: "Title" })?;

    println!("Saving link...");
    let fetcher = HttpPageFetcher::new();
    let id = create_link(root, &fetcher, url, title, desc).await?;
    tracing::info!("Link {} saved under {}", id, root.display());
    println!("Link saved successfully!");
    Ok(())
}

pub fn run_link_load(root: &Path, file_path: Option<&Path>, id: Option<&str>) -> Result<LinkData> {
    load_link(root, file_path, id)
}
