use crate::fetcher::types::{Charset, PageResponse};
use bytes::Bytes;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Sniff the charset and decode the body. Undecodable sequences become U+FFFD;
/// a handful of broken bytes should not cost the reader the whole article.
pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: Bytes,
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset);

    PageResponse {
        url_final,
        status,
        content_type: content_type.to_string(),
        charset,
        body_utf8,
    }
}

fn label_to_charset(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = label_to_charset(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> / http-equiv in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = label_to_charset(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = label_to_charset(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    // 3. Heuristic detection, biased towards Korean pages
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    Charset::from_encoding(detector.guess(Some(b"kr".as_slice()), true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "page contained malformed byte sequences"
        );
    }

    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let content_type = "text/html; charset=utf-8";
        let body = b"<html><head><title>Test</title></head></html>";

        assert_eq!(detect_charset(content_type, body), Charset::Utf8);
    }

    #[test]
    fn test_detect_euc_kr_from_meta_tag() {
        let content_type = "text/html";
        let body = b"<html><head><meta charset=\"euc-kr\"><title>Test</title></head></html>";

        assert_eq!(detect_charset(content_type, body), Charset::EucKr);
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let content_type = "text/html";
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=ks_c_5601-1987\"><title>Test</title></head></html>";

        assert_eq!(detect_charset(content_type, body), Charset::EucKr);
    }

    #[test]
    fn test_decode_euc_kr() {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode("반도체 수출");
        let decoded = decode_to_utf8(&encoded, &Charset::EucKr);
        assert_eq!(decoded, "반도체 수출");
    }

    #[test]
    fn test_undecodable_bytes_are_replaced() {
        let body = [b'a', 0xFF, b'b'];
        let decoded = decode_to_utf8(&body, &Charset::Utf8);
        assert_eq!(decoded, "a\u{FFFD}b");
    }

    #[test]
    fn test_process_response_keeps_final_url() {
        let url = Url::parse("https://www.hani.co.kr/arti/1.html").unwrap();
        let page = process_response(
            url.clone(),
            StatusCode::OK,
            Bytes::from_static("<p>안녕하세요</p>".as_bytes()),
            "text/html; charset=UTF-8",
        );
        assert_eq!(page.url_final, url);
        assert_eq!(page.charset, Charset::Utf8);
        assert!(page.body_utf8.contains("안녕하세요"));
    }
}
