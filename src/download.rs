use crate::site;
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use std::fs;
use std::path::Path;
use url::Url;

/// Download every page image of a chapter into `dir`, one request at a time,
/// in ascending page order. Pages the site reports as missing are skipped;
/// a page without an image element is an error.
pub async fn download_pages(
    client: &Client,
    chapter_url: &str,
    dir: &Path,
    page_count: usize,
) -> Result<()> {
    for index in 1..=page_count {
        let page_url = format!("{}/{}", chapter_url, index);
        let Some(page) = site::fetch_page(client, &page_url).await? else {
            debug!("No page at {}, skipping", page_url);
            continue;
        };
        let image_src = site::image_src(&page)
            .with_context(|| format!("no image element on {}", page_url))?;
        let image_url = Url::parse(&image_src)
            .with_context(|| format!("bad image url on {}", page_url))?;

        let filename = dir.join(format!("{}.jpg", index));
        info!("Downloading {} to {}", image_url, filename.display());
        let bytes = client.get(image_url).send().await?.bytes().await?;
        fs::write(&filename, &bytes)?;
    }
    Ok(())
}
