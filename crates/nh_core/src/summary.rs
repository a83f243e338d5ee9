use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::article::ArticleRecord;

/// Words at or below this length are ignored when ranking title keywords.
const MIN_KEYWORD_CHARS: usize = 3;
const TOP_KEYWORDS: usize = 10;
const RECENT_ARTICLES: usize = 5;

/// Aggregate statistics over one collection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub total_articles: usize,
    pub sources: Vec<SourceCount>,
    pub top_keywords: Vec<KeywordCount>,
    pub recent_articles: Vec<ArticleRecord>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

impl DailySummary {
    /// Compute per-source counts, title keyword ranking and the most
    /// recently collected articles.
    ///
    /// Keyword ranking considers lowercased title words longer than
    /// [`MIN_KEYWORD_CHARS`], ordered by descending count; ties keep the
    /// order in which the words were first encountered.
    pub fn from_records(articles: &[ArticleRecord]) -> Self {
        let mut sources: Vec<SourceCount> = Vec::new();
        for article in articles {
            match sources.iter_mut().find(|s| s.source == article.source) {
                Some(entry) => entry.count += 1,
                None => sources.push(SourceCount {
                    source: article.source.clone(),
                    count: 1,
                }),
            }
        }

        let mut keywords: Vec<KeywordCount> = Vec::new();
        for article in articles {
            let title = article.title.to_lowercase();
            for word in title.split(|c: char| !c.is_alphanumeric()) {
                if word.chars().count() <= MIN_KEYWORD_CHARS {
                    continue;
                }
                match keywords.iter_mut().find(|k| k.word == word) {
                    Some(entry) => entry.count += 1,
                    None => keywords.push(KeywordCount {
                        word: word.to_string(),
                        count: 1,
                    }),
                }
            }
        }
        // stable sort keeps first-encountered order for equal counts
        keywords.sort_by(|a, b| b.count.cmp(&a.count));
        keywords.truncate(TOP_KEYWORDS);

        let mut recent = articles.to_vec();
        recent.sort_by(|a, b| b.collected_at.cmp(&a.collected_at));
        recent.truncate(RECENT_ARTICLES);

        Self {
            total_articles: articles.len(),
            sources,
            top_keywords: keywords,
            recent_articles: recent,
            generated_at: Utc::now(),
        }
    }
}
