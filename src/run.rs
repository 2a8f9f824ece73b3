use crate::cbz;
use crate::cli::Cli;
use crate::download;
use crate::site::{self, ChapterNameCache};
use anyhow::Result;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Walk chapters from the requested start, downloading and archiving each
/// one, until the range is exhausted or the site has no page for a chapter.
pub async fn run(cli: Cli) -> Result<()> {
    let (start, end) = cli.chapter_range();
    let manga_url = site::manga_url(&cli.manga_name);
    info!("Url: {}", manga_url);

    let client = reqwest::Client::new();
    let mut names = ChapterNameCache::default();
    let manga_dir = Path::new(".").join(&cli.manga_name);
    let temp_dir = manga_dir.join("temp");

    let mut chapter = start;
    while end.map_or(true, |end| chapter <= end) {
        let chapter_url = format!("{}{}", manga_url, chapter);
        let Some(page) = site::fetch_page(&client, &chapter_url).await? else {
            info!("No chapter page at {}", chapter_url);
            break;
        };

        let chapter_name = names.chapter_name(&client, &page, chapter).await?;
        let page_count = site::page_count(&page)?;
        info!("Chapter {} has {} pages", chapter, page_count);

        fs::create_dir_all(&temp_dir)?;
        download::download_pages(&client, &chapter_url, &temp_dir, page_count).await?;

        // Remove the temp directory whether or not archiving worked.
        let archive = cbz::write_cbz(&manga_dir, &temp_dir, chapter, &chapter_name);
        if let Err(e) = fs::remove_dir_all(&temp_dir) {
            warn!("Failed to remove {}: {}", temp_dir.display(), e);
        }
        info!("Wrote {}", archive?.display());

        chapter += 1;
    }

    info!("Finished!");
    Ok(())
}
