pub mod errors;
pub mod model;
pub mod reader;
pub mod reject;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;
pub use model::{ExtractOptions, ExtractedArticle};

use tracing::{info, instrument, warn};
use url::Url;

use crate::fetcher::{Fetcher, PageResponse};

/// Fetch `url` and reduce it to its readable body. One attempt; failures are
/// final for this call.
#[instrument(skip(fetcher, options), fields(url = %url))]
pub async fn extract(
    fetcher: &Fetcher,
    url: &str,
    options: &ExtractOptions,
) -> Result<ExtractedArticle, ExtractError> {
    let page = fetcher.fetch(url).await?;
    let article = extract_from_page(&page, url, options)?;
    info!(
        source = %article.source_host,
        text_length = article.text_length,
        truncated = article.truncated,
        "extracted article"
    );
    Ok(article)
}

/// Readability pass over an already-fetched page. `original_url` scopes the
/// document and is echoed back in the result.
pub fn extract_from_page(
    page: &PageResponse,
    original_url: &str,
    options: &ExtractOptions,
) -> Result<ExtractedArticle, ExtractError> {
    let base = Url::parse(original_url).unwrap_or_else(|_| page.url_final.clone());

    let Some(result) = reader::extract(&page.body_utf8, &base) else {
        warn!("readability could not process document");
        return Err(ExtractError::NoContent);
    };

    let text = result.text.trim();
    if reject::should_reject(text) {
        warn!(chars = text.chars().count(), "no usable article text");
        return Err(ExtractError::NoContent);
    }

    let text_length = text.chars().count();
    let (text, truncated) = match options.max_chars {
        Some(max_chars) => model::truncate_chars(text, max_chars),
        None => (text.to_string(), false),
    };

    Ok(ExtractedArticle {
        title: result.title,
        text,
        text_length,
        source_host: base.host_str().unwrap_or_default().to_string(),
        url: original_url.to_string(),
        truncated,
    })
}
