use nh_core::ArticleRecord;

const HEADER: &str = "title,url,source,published_date,summary,content,collected_at,fingerprint";

/// Render records as CSV with RFC 4180 quoting.
pub fn to_csv(articles: &[ArticleRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for article in articles {
        let collected_at = article.collected_at.to_rfc3339();
        let fields = [
            article.title.as_str(),
            article.url.as_str(),
            article.source.as_str(),
            article.published_date.as_deref().unwrap_or(""),
            article.summary.as_deref().unwrap_or(""),
            article.content.as_deref().unwrap_or(""),
            collected_at.as_str(),
            article.fingerprint.as_str(),
        ];
        let row = fields
            .iter()
            .map(|f| escape_field(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
