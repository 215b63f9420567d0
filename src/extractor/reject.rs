use tracing::debug;

/// Readable bodies with fewer non-whitespace characters than this are not
/// articles. Korean prose is dense; two short paragraphs clear it easily.
pub const MIN_USABLE_CHARS: usize = 150;
const MAX_BOILERPLATE_RATIO: f64 = 0.3;

/// Phrases that make up site chrome: footers, legal notices, account menus.
const BOILERPLATE_KEYWORDS: &[&str] = &[
    "회사소개",
    "광고안내",
    "광고문의",
    "제휴문의",
    "고충처리",
    "개인정보",
    "처리방침",
    "청소년보호",
    "이용약관",
    "무단",
    "재배포",
    "저작권",
    "사업자등록",
    "등록번호",
    "발행인",
    "편집인",
    "대표전화",
    "구독신청",
    "로그인",
    "회원가입",
    "copyright",
    "all rights reserved",
    "privacy",
    "terms of",
    "cookie",
    "subscribe",
    "newsletter",
    "sign up",
    "login",
    "javascript",
];

/// True when the readability output is navigation or footer text rather than
/// an article body.
pub fn should_reject(text: &str) -> bool {
    let chars = text.chars().filter(|c| !c.is_whitespace()).count();
    if chars < MIN_USABLE_CHARS {
        debug!(chars, "too short to be an article");
        return true;
    }

    let ratio = boilerplate_ratio(text);
    if ratio > MAX_BOILERPLATE_RATIO {
        debug!(ratio, "mostly boilerplate");
        return true;
    }

    false
}

fn boilerplate_ratio(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }

    let lower = text.to_lowercase();
    let hits: usize = BOILERPLATE_KEYWORDS
        .iter()
        .map(|keyword| lower.matches(keyword).count())
        .sum();

    hits as f64 / words as f64
}
