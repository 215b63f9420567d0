#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use reqwest::StatusCode;
use url::Url;

use newstype::extractor::{ExtractOptions, extract_from_page};
use newstype::fetcher::pipeline::process_response;

const PAGE_URL: &str = "https://www.hani.co.kr/arti/1.html";

fuzz_target!(|data: &[u8]| {
    let Ok(url) = Url::parse(PAGE_URL) else {
        return;
    };

    // Raw bytes take the same charset sniffing path as a fetched page.
    let page = process_response(
        url,
        StatusCode::OK,
        Bytes::copy_from_slice(data),
        "text/html",
    );

    let _ = extract_from_page(&page, PAGE_URL, &ExtractOptions::truncated(200));
});
