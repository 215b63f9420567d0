use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Decode the handful of entities search APIs emit, remove markup, and
/// collapse whitespace runs to single spaces.
///
/// Escaped markup (`&lt;b&gt;`) decodes into tags, so decoding and stripping
/// repeat until neither changes the text. Every pass that changes anything
/// shortens it, so the loop ends.
pub fn strip_tags(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let decoded = decode_entities(&current);
        let stripped = TAG_REGEX.replace_all(&decoded, "").into_owned();
        if stripped == current {
            break;
        }
        current = stripped;
    }
    collapse_whitespace(&current)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Deduplication key for a link: trimmed, trailing slashes removed.
pub fn normalize_link(link: &str) -> String {
    link.trim().trim_end_matches('/').to_string()
}

/// Hostname of `link` without a leading `www.`, or empty if it doesn't parse.
pub fn display_host(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|h| h.strip_prefix("www.").unwrap_or(h).to_string())
        })
        .unwrap_or_default()
}

/// Best-effort timestamp parsing for the formats the two backends emit:
/// RFC 3339 (Google metatags), RFC 2822 (Naver `pubDate`), and bare dates.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Publishers often drop the offset or use a `+0900` form without a colon
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y.%m.%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strips_naver_highlight_markup() {
        assert_eq!(
            strip_tags("<b>반도체</b>  수출\n 호조 &quot;역대 최대&quot;"),
            "반도체 수출 호조 \"역대 최대\""
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let once = strip_tags("  <b>a</b>   b <i>c</i> ");
        assert_eq!(strip_tags(&once), once);
    }

    #[test]
    fn escaped_markup_is_stripped() {
        let once = strip_tags("&lt;b&gt;반도체&lt;/b&gt; 수출");
        assert_eq!(once, "반도체 수출");
        assert_eq!(strip_tags(&once), once);
    }

    #[test]
    fn double_escaped_entities_settle() {
        let once = strip_tags("&amp;quot;인용&amp;quot; &amp;lt;i&amp;gt;기울임");
        assert_eq!(once, "\"인용\" 기울임");
        assert_eq!(strip_tags(&once), once);
    }

    #[test]
    fn normalize_link_drops_trailing_slash() {
        assert_eq!(normalize_link("https://chosun.com/a/"), "https://chosun.com/a");
        assert_eq!(normalize_link("https://chosun.com/a"), "https://chosun.com/a");
    }

    #[test]
    fn normalize_link_is_idempotent() {
        for link in ["https://chosun.com/a//", " https://hani.co.kr/ ", ""] {
            let once = normalize_link(link);
            assert_eq!(normalize_link(&once), once);
        }
    }

    #[test]
    fn display_host_strips_www() {
        assert_eq!(display_host("https://www.hani.co.kr/arti/1"), "hani.co.kr");
        assert_eq!(display_host("https://news.kbs.co.kr/x"), "news.kbs.co.kr");
        assert_eq!(display_host("nope"), "");
    }

    #[test]
    fn parses_rfc2822_pub_date() {
        let parsed = parse_published_at("Tue, 02 Jan 2024 09:30:00 +0900").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_and_offset_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap();
        assert_eq!(parse_published_at("2024-01-02T09:30:00+09:00"), Some(expected));
        assert_eq!(parse_published_at("2024-01-02T09:30:00+0900"), Some(expected));
    }

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        assert_eq!(
            parse_published_at("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn unparsable_dates_are_unknown() {
        assert_eq!(parse_published_at(""), None);
        assert_eq!(parse_published_at("yesterday"), None);
        assert_eq!(parse_published_at("2024-13-45"), None);
    }

    #[cfg(feature = "fuzz")]
    mod properties {
        use super::*;
        use crate::search::allowlist::is_recognized_news_link;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strip_tags_is_idempotent(
                fragments in prop::collection::vec(
                    prop_oneof![
                        "[가-힣a-z \\n\\t]{0,8}",
                        Just("<b>".to_string()),
                        Just("</b>".to_string()),
                        Just("&lt;".to_string()),
                        Just("&gt;".to_string()),
                        Just("&amp;".to_string()),
                        Just("&quot;".to_string()),
                        Just("&nbsp;".to_string()),
                    ],
                    0..12,
                ),
            ) {
                let once = strip_tags(&fragments.concat());
                prop_assert_eq!(strip_tags(&once), once);
            }

            #[test]
            fn link_normalization_is_idempotent(link in "https?://[a-z.]{1,20}(/[a-z0-9]{0,8}){0,3}/{0,3}") {
                let once = normalize_link(&link);
                prop_assert_eq!(normalize_link(&once), once.clone());
                prop_assert!(!once.ends_with('/'));
            }

            #[test]
            fn allowlist_never_panics_and_is_stable(url in ".*") {
                prop_assert_eq!(is_recognized_news_link(&url), is_recognized_news_link(&url));
            }
        }
    }
}
