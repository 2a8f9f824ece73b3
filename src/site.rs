use anyhow::{anyhow, Context, Result};
use log::info;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;

pub const URL_BASE: &str = "http://www.mangapanda.com/";

/// Canonical listing URL for a manga display name: lowercased, with every
/// run of spaces and hyphens collapsed to a single hyphen.
pub fn manga_url(manga_name: &str) -> String {
    let lowered = manga_name.to_lowercase();
    let parts: Vec<&str> = lowered
        .split([' ', '-'])
        .filter(|part| !part.is_empty())
        .collect();
    format!("{}{}/", URL_BASE, parts.join("-"))
}

/// Fetch a page and parse it as HTML. `None` means the site served its
/// "404 Not Found" error page, i.e. the chapter or page does not exist.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Option<Html>> {
    info!("Fetching {}", url);
    let body = client.get(url).send().await?.text().await?;
    if body.contains("404 Not Found") {
        return Ok(None);
    }
    Ok(Some(Html::parse_document(&body)))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("bad selector {:?}: {}", css, e))
}

/// Number of image pages in a chapter, read off the page-selector dropdown.
pub fn page_count(page: &Html) -> Result<usize> {
    let control = page
        .select(&selector("#selectpage")?)
        .next()
        .context("page selector control not found")?;
    Ok(control.select(&selector("option")?).count())
}

/// Manga identifier embedded as a script-level assignment in the page source.
pub fn manga_id(page: &Html) -> Option<String> {
    let re = Regex::new(r"document\['mangaid'\] = (.+);").ok()?;
    re.captures(&page.html()).map(|caps| caps[1].to_string())
}

/// Source URL of the chapter image element, if present.
pub fn image_src(page: &Html) -> Option<String> {
    let img = Selector::parse("img#img").ok()?;
    page.select(&img)
        .next()?
        .value()
        .attr("src")
        .map(str::to_owned)
}

#[derive(Debug, Deserialize)]
struct ChapterListing {
    chapter: String,
    chapter_name: String,
}

/// Per-run cache of the site's chapter-name listing. The listing is fetched
/// at most once, the first time a chapter page exposes a manga id.
#[derive(Default)]
pub struct ChapterNameCache {
    listing: Option<Vec<ChapterListing>>,
}

impl ChapterNameCache {
    /// Display name for a chapter. Missing manga id or a chapter number
    /// absent from the listing both resolve to an empty name.
    pub async fn chapter_name(
        &mut self,
        client: &Client,
        page: &Html,
        chapter: u32,
    ) -> Result<String> {
        let Some(id) = manga_id(page) else {
            return Ok(String::new());
        };
        if self.listing.is_none() {
            let url = format!("{}actions/selector/?id={}&which=0", URL_BASE, id);
            info!("Fetching chapter names from {}", url);
            let body = client.get(&url).send().await?.text().await?;
            let listing = serde_json::from_str(&body).context("malformed chapter listing")?;
            self.listing = Some(listing);
        }
        Ok(name_for(self.listing.as_deref().unwrap_or(&[]), chapter))
    }
}

fn name_for(listing: &[ChapterListing], chapter: u32) -> String {
    listing
        .iter()
        .find(|entry| entry.chapter.parse::<u32>().ok() == Some(chapter))
        .map(|entry| entry.chapter_name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manga_url_lowercases_and_hyphenates() {
        assert_eq!(manga_url("One Piece"), "http://www.mangapanda.com/one-piece/");
    }

    #[test]
    fn manga_url_collapses_space_and_hyphen_runs() {
        assert_eq!(
            manga_url("Blame - Master  Edition"),
            "http://www.mangapanda.com/blame-master-edition/"
        );
    }

    #[test]
    fn page_count_equals_selector_options() {
        let page = Html::parse_document(
            r#"<html><body>
                <div id="selectpage">
                    <select>
                        <option>1</option>
                        <option>2</option>
                        <option>3</option>
                    </select>
                </div>
            </body></html>"#,
        );
        assert_eq!(page_count(&page).unwrap(), 3);
    }

    #[test]
    fn page_count_fails_without_selector_control() {
        let page = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert!(page_count(&page).is_err());
    }

    #[test]
    fn manga_id_is_parsed_from_script() {
        let page = Html::parse_document(
            "<html><head><script>document['mangaid'] = 103;</script></head></html>",
        );
        assert_eq!(manga_id(&page).as_deref(), Some("103"));
    }

    #[test]
    fn manga_id_is_none_when_absent() {
        let page = Html::parse_document("<html><body></body></html>");
        assert_eq!(manga_id(&page), None);
    }

    #[test]
    fn image_src_reads_the_img_element() {
        let page = Html::parse_document(
            r#"<html><body><img id="img" src="http://i.example.com/1.jpg"></body></html>"#,
        );
        assert_eq!(
            image_src(&page).as_deref(),
            Some("http://i.example.com/1.jpg")
        );
    }

    #[test]
    fn image_src_is_none_when_missing() {
        let page = Html::parse_document("<html><body></body></html>");
        assert_eq!(image_src(&page), None);
    }

    #[test]
    fn name_lookup_matches_on_integer_chapter() {
        let listing: Vec<ChapterListing> = serde_json::from_str(
            r#"[{"chapter":"5","chapter_name":"Arrival"},
                {"chapter":"6","chapter_name":"Departure"}]"#,
        )
        .unwrap();
        assert_eq!(name_for(&listing, 5), "Arrival");
        assert_eq!(name_for(&listing, 99), "");
    }
}
