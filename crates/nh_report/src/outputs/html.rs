use chrono::Local;

use nh_core::{ArticleRecord, DailySummary};

/// Render a collection run as a standalone HTML report.
pub fn render_collection(articles: &[ArticleRecord]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<div class=\"stats\"><h3>Estatísticas da Coleta</h3>\
         <p><strong>Total de notícias:</strong> {}</p></div>\n",
        articles.len()
    ));
    body.push_str("<h2>Notícias Coletadas</h2>\n");
    for (i, article) in articles.iter().enumerate() {
        let summary = article
            .summary
            .as_deref()
            .unwrap_or("Resumo não disponível");
        body.push_str(&format!(
            "<div class=\"article\">\
             <div class=\"source\">Fonte: {}</div>\
             <h3>{}. {}</h3>\
             <p>{}</p>\
             <a href=\"{}\">Ler notícia completa</a>\
             </div>\n",
            escape(&article.source),
            i + 1,
            escape(&article.title),
            escape(summary),
            escape(&article.url),
        ));
    }
    page("Relatório de Notícias de Tecnologia", &body)
}

/// Render a daily summary as the report body handed to the transport.
pub fn render_summary(summary: &DailySummary) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<div class=\"stats\"><h3>Resumo Diário</h3>\
         <p><strong>Total de notícias:</strong> {}</p></div>\n",
        summary.total_articles
    ));

    body.push_str("<h2>Por fonte</h2>\n<ul>\n");
    for entry in &summary.sources {
        body.push_str(&format!(
            "<li>{}: {}</li>\n",
            escape(&entry.source),
            entry.count
        ));
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Palavras mais frequentes</h2>\n<ol>\n");
    for keyword in &summary.top_keywords {
        body.push_str(&format!(
            "<li>{} ({})</li>\n",
            escape(&keyword.word),
            keyword.count
        ));
    }
    body.push_str("</ol>\n");

    body.push_str("<h2>Mais recentes</h2>\n");
    for article in &summary.recent_articles {
        body.push_str(&format!(
            "<div class=\"article\"><h3>{}</h3>\
             <div class=\"source\">Fonte: {}</div>\
             <a href=\"{}\">Ler notícia completa</a></div>\n",
            escape(&article.title),
            escape(&article.source),
            escape(&article.url),
        ));
    }

    page("Resumo Diário de Tecnologia", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n\
         <meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body>\n\
         <div class=\"header\"><h1>{}</h1>\
         <div class=\"timestamp\">Gerado em: {}</div></div>\n\
         {}\n</body>\n</html>\n",
        escape(title),
        escape(title),
        Local::now().format("%d/%m/%Y %H:%M:%S"),
        body
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
