//! Headline search and article extraction for Korean news typing practice.
//!
//! A query fans out to Google Custom Search and Naver News; the merged,
//! recency-ordered list lets a reader pick an article, whose readable body is
//! then extracted as plain text for retyping.

pub mod api;
pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod search;
