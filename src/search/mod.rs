pub mod aggregator;
pub mod allowlist;
pub mod backend;
pub mod errors;
pub mod google;
pub mod naver;
pub mod normalize;
pub mod types;

pub use aggregator::{AggregateError, AggregatedResultSet, Aggregator, BackendReport};
pub use allowlist::is_recognized_news_link;
pub use backend::SearchBackend;
pub use errors::BackendError;
pub use google::GoogleBackend;
pub use naver::NaverBackend;
pub use types::{BackendDebug, BackendOutcome, SearchResult, SourceType};
