use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::model::RawScrapedBag;

const BLOCK_TAGS: &[&str] = &["p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "tr", "table"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not find wanted person information on {0}")]
    NotAWantedPage(String),
    #[error("invalid base URL {0}")]
    BaseUrl(String),
}

struct PageSelectors {
    wrapper: Selector,
    heading: Selector,
    summary: Selector,
    description_rows: Selector,
    cell: Selector,
    mugshot: Selector,
    thumbnails: Selector,
    details: Selector,
}

impl PageSelectors {
    fn new() -> Self {
        let parse = |css: &str| Selector::parse(css).unwrap();
        Self {
            wrapper: parse(".wanted-person-wrapper"),
            heading: parse(".documentFirstHeading"),
            summary: parse(".summary"),
            description_rows: parse(".wanted-person-description table tr"),
            cell: parse("td"),
            mugshot: parse(".wanted-person-mug img"),
            thumbnails: parse(".wanted-person-images .thumbnail-container img"),
            details: parse(".wanted-person-details p"),
        }
    }
}

/// Pull the raw field bag out of a wanted-person page.
///
/// `base_url` is the site origin used for relative image paths; `page_url`
/// is recorded on the bag as-is.
pub fn extract_bag(html: &str, page_url: &str, base_url: &str) -> Result<RawScrapedBag, ExtractError> {
    let base = Url::parse(base_url).map_err(|_| ExtractError::BaseUrl(base_url.to_string()))?;
    let document = Html::parse_document(html);
    let sel = PageSelectors::new();

    if document.select(&sel.wrapper).next().is_none() {
        return Err(ExtractError::NotAWantedPage(page_url.to_string()));
    }

    let name = document
        .select(&sel.heading)
        .map(|el| squash(&el.text().collect::<String>()))
        .collect::<Vec<_>>()
        .join(" ");

    let summary = document
        .select(&sel.summary)
        .map(block_text)
        .collect::<Vec<_>>()
        .join("\n");

    let mut description = BTreeMap::new();
    for row in document.select(&sel.description_rows) {
        let cells: Vec<ElementRef> = row.select(&sel.cell).collect();
        if let [key, value] = cells.as_slice() {
            description.insert(
                squash(&key.text().collect::<String>()),
                squash(&value.text().collect::<String>()),
            );
        }
    }

    let mut images: Vec<String> = Vec::new();
    let mugshot = document
        .select(&sel.mugshot)
        .find_map(|img| img.value().attr("src"))
        .and_then(|src| absolutize(&base, src));
    if let Some(src) = mugshot {
        images.push(src);
    }
    for img in document.select(&sel.thumbnails) {
        let Some(src) = img.value().attr("src") else { continue };
        if !src.contains("thumb") {
            continue;
        }
        let Some(full) = absolutize(&base, &src.replacen("/thumb", "/large", 1)) else { continue };
        if !images.contains(&full) {
            images.push(full);
        }
    }

    let details = document
        .select(&sel.details)
        .map(|el| squash(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(RawScrapedBag {
        name,
        summary,
        description,
        images,
        details,
        url: page_url.to_string(),
    })
}

fn absolutize(base: &Url, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    base.join(src).ok().map(|u| u.to_string())
}

/// Text of an element with `<br>` and block boundaries kept as line breaks.
fn block_text(el: ElementRef) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    raw.lines()
        .map(squash)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            // source newlines are layout, not content
            out.push_str(&text.replace(['\n', '\r'], " "));
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let tag = child_el.value().name();
            if tag == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&tag);
            if block {
                out.push('\n');
            }
            push_text(child_el, out);
            if block {
                out.push('\n');
            }
        }
    }
}

/// Collapse runs of whitespace to single spaces and trim.
fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
