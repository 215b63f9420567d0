use readability::extractor;
use scraper::{Html, Selector};
use url::Url;

use crate::extractor::model::{ReadabilityResult, normalize_whitespace};

/// Run the readability transform over `html`, resolved against `url`.
///
/// Returns `None` only if the document cannot be processed at all; an
/// article with an empty body still comes back for the caller to judge.
pub fn extract(html: &str, url: &Url) -> Option<ReadabilityResult> {
    let article = extractor::extract(&mut html.as_bytes(), url).ok()?;

    let title = match article.title.trim() {
        "" => fallback_title(html).unwrap_or_default(),
        title => title.to_string(),
    };

    Some(ReadabilityResult {
        title: normalize_whitespace(&title),
        text: normalize_whitespace(&article.text),
    })
}

fn fallback_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in ["meta[property='og:title']", "meta[name='twitter:title']"] {
        if let Ok(selector) = Selector::parse(selector)
            && let Some(content) = document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
        {
            return Some(content.to_string());
        }
    }

    for selector in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector)
            && let Some(text) = document
                .select(&selector)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .find(|text| !text.is_empty())
        {
            return Some(text);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_title_prefers_og_title() {
        let html = r#"<html><head><meta property="og:title" content="OG 제목"><title>문서 제목</title></head><body></body></html>"#;
        assert_eq!(fallback_title(html), Some("OG 제목".to_string()));
    }

    #[test]
    fn test_fallback_title_uses_h1_last() {
        let html = "<html><body><h1> 헤드라인 </h1></body></html>";
        assert_eq!(fallback_title(html), Some("헤드라인".to_string()));
    }

    #[test]
    fn test_fallback_title_none() {
        assert_eq!(fallback_title("<html><body><p>x</p></body></html>"), None);
    }
}
