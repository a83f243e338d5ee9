use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use nh_core::ArticleRecord;

/// Per-source rules applied to a listing page.
pub struct ListingRules {
    pub source_name: String,
    pub base_url: Url,
    /// Path fragments a href must contain to count as a news item.
    pub link_patterns: &'static [&'static str],
    pub min_title_length: usize,
    pub max_articles: usize,
}

/// Walk every anchor on the listing page and turn the accepted ones into
/// article records, stopping once `max_articles` have been taken.
///
/// Candidates that fail URL resolution are skipped; nothing here can fail
/// the caller.
pub fn extract_articles(rules: &ListingRules, html: &str) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut articles = Vec::new();
    for link in document.select(&link_selector) {
        if articles.len() >= rules.max_articles {
            break;
        }

        let href = match link.value().attr("href") {
            Some(href) if !href.is_empty() && !href.starts_with('#') => href,
            _ => continue,
        };
        if !rules.link_patterns.iter().any(|p| href.contains(p)) {
            continue;
        }

        let title = link.text().collect::<String>();
        let title = title.trim();
        if title.chars().count() < rules.min_title_length {
            continue;
        }

        let full_url = match rules.base_url.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!(href, error = %e, "skipping link with unresolvable href");
                continue;
            }
        };

        let published_date = extract_published_date(&link);
        let summary = extract_summary(&link);

        articles.push(ArticleRecord::new(
            title,
            &full_url,
            &rules.source_name,
            published_date,
            summary,
            None,
        ));
    }
    articles
}

/// Best-effort publication date: a `<time>` element under the link's
/// parent, preferring its `datetime` attribute over its text.
fn extract_published_date(link: &ElementRef) -> Option<String> {
    let time_selector = Selector::parse("time").unwrap();
    let parent = link.parent().and_then(ElementRef::wrap)?;
    let time = parent.select(&time_selector).next()?;
    if let Some(datetime) = time.value().attr("datetime") {
        return Some(datetime.to_string());
    }
    let text = time.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Best-effort summary snippet: a sibling paragraph or div whose class
/// names it a summary/description.
fn extract_summary(link: &ElementRef) -> Option<String> {
    let summary_selector = Selector::parse(concat!(
        "p[class*=\"summary\"], div[class*=\"summary\"], ",
        "p[class*=\"resumo\"], div[class*=\"resumo\"], ",
        "p[class*=\"desc\"], div[class*=\"desc\"]"
    ))
    .unwrap();
    let parent = link.parent().and_then(ElementRef::wrap)?;
    let element = parent.select(&summary_selector).next()?;
    let text = clean_text(&element.text().collect::<String>());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Collapse whitespace runs and strip characters that are neither word
/// characters, whitespace nor basic punctuation.
pub fn clean_text(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '.' | ',' | '!' | '?')
        })
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
