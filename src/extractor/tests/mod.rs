use reqwest::StatusCode;
use std::fs;
use url::Url;

use crate::extractor::{ExtractError, ExtractOptions, extract_from_page};
use crate::fetcher::types::{Charset, PageResponse};

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let url = "https://www.hani.co.kr/arti/economy/1.html";
    let response = create_test_response(html, url);
    let article = extract_from_page(&response, url, &ExtractOptions::full()).unwrap();

    assert!(article.title.contains("반도체 수출"));
    assert!(article.text.contains("인공지능 서버 수요"));
    assert!(article.text.contains("하반기 흐름이 관건"));
    assert!(!article.text.contains("window.dataLayer"));
    assert!(!article.text.contains("font-family"));
    assert_eq!(article.source_host, "www.hani.co.kr");
    assert_eq!(article.url, url);
    assert_eq!(article.text_length, article.text.chars().count());
    assert!(!article.truncated);
    assert_eq!(article.text, article.text.trim());
}

#[test]
fn test_truncation_keeps_full_length() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let url = "https://www.hani.co.kr/arti/economy/1.html";
    let response = create_test_response(html, url);
    let full = extract_from_page(&response, url, &ExtractOptions::full()).unwrap();
    let cut = extract_from_page(&response, url, &ExtractOptions::truncated(40)).unwrap();

    assert!(cut.truncated);
    assert!(cut.text.chars().count() <= 40);
    assert!(full.text.starts_with(&cut.text));
    assert_eq!(cut.text_length, full.text_length);
}

#[test]
fn test_reject_navigation_page() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/nav_only.html")
        .expect("Failed to read test fixture");

    let url = "https://www.hani.co.kr/";
    let response = create_test_response(html, url);
    let result = extract_from_page(&response, url, &ExtractOptions::full());

    assert!(matches!(result, Err(ExtractError::NoContent)));
}

#[test]
fn test_reject_publisher_front_page() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/front_page.html")
        .expect("Failed to read test fixture");

    let url = "https://www.hani.co.kr/";
    let response = create_test_response(html, url);
    let result = extract_from_page(&response, url, &ExtractOptions::full());

    assert!(matches!(result, Err(ExtractError::NoContent)));
}

#[test]
fn test_reject_empty_page() {
    let url = "https://example.com/empty";
    let response = create_test_response("<html><body></body></html>".to_string(), url);
    let result = extract_from_page(&response, url, &ExtractOptions::full());

    assert!(matches!(result, Err(ExtractError::NoContent)));
}

#[test]
fn test_minimal_valid_content() {
    let html = format!(
        r#"<!DOCTYPE html><html><head><title>Valid Article</title></head><body><article><h1>Valid Article</h1><p>{}</p></article></body></html>"#,
        "This is a valid article with enough content to pass the minimum requirements, for extraction. ".repeat(5)
    );

    let url = "https://example.com/valid";
    let response = create_test_response(html, url);
    let article = extract_from_page(&response, url, &ExtractOptions::full()).unwrap();

    assert_eq!(article.title, "Valid Article");
    assert!(article.text.contains("minimum requirements"));
    assert_eq!(article.source_host, "example.com");
}

#[test]
fn test_malformed_html() {
    let html = format!(
        "<html><head><title>Broken</title><body><p>{}<div>More content",
        "Unclosed tags, still readable paragraph text. ".repeat(4)
    );

    let url = "https://example.com/broken";
    let response = create_test_response(html, url);

    // Should handle malformed HTML gracefully
    if let Ok(article) = extract_from_page(&response, url, &ExtractOptions::full()) {
        assert_eq!(article.title, "Broken");
        assert!(article.text.contains("Unclosed tags"));
    }
}

fn create_test_response(html: String, url: &str) -> PageResponse {
    PageResponse {
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        content_type: "text/html; charset=utf-8".to_string(),
        charset: Charset::Utf8,
        body_utf8: html,
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/.*"
        ) {
            let response = create_test_response(html, &url);
            let _ = extract_from_page(&response, &url, &ExtractOptions::full());
        }

        #[test]
        fn test_text_length_counts_untruncated_chars(
            body in "[가-힣 ,.]{300,500}",
            max in 1usize..100,
        ) {
            let html = format!("<html><body><article><p>{}</p></article></body></html>", body);
            let url = "https://example.com/a";
            let response = create_test_response(html, url);
            if let Ok(article) = extract_from_page(&response, url, &ExtractOptions::truncated(max)) {
                prop_assert!(article.text.chars().count() <= max);
                prop_assert!(article.text_length >= article.text.chars().count());
            }
        }
    }
}
