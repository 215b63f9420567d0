//! Recognized Korean news publishers.
//!
//! The table is data: a deployment may swap in its own list without touching
//! [`is_recognized_news_link`].

use url::Url;

pub const NEWS_DOMAINS: &[&str] = &[
    "yna.co.kr",
    "yonhapnews.co.kr",
    "joongang.co.kr",
    "joins.com",
    "chosun.com",
    "donga.com",
    "hani.co.kr",
    "khan.co.kr",
    "hankookilbo.com",
    "mk.co.kr",
    "sedaily.com",
    "edaily.co.kr",
    "biz.chosun.com",
    "heraldcorp.com",
    "news.jtbc.co.kr",
    "mbn.co.kr",
    "ytn.co.kr",
    "news.kbs.co.kr",
    "imnews.imbc.com",
    "news.sbs.co.kr",
    "hankyung.com",
    "wowtv.co.kr",
    "ohmynews.com",
    "pressian.com",
    "sisain.co.kr",
    "kyunghyang.com",
    "news.mt.co.kr",
    "moneys.co.kr",
    "magazine.hankyung.com",
];

/// True when `url` parses and its host is one of [`NEWS_DOMAINS`] or a
/// subdomain of one. Never fails; garbage input is simply not news.
pub fn is_recognized_news_link(url: &str) -> bool {
    is_allowed_by(url, NEWS_DOMAINS)
}

pub fn is_allowed_by(url: &str, domains: &[&str]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.strip_prefix("www.").unwrap_or(host);

    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
