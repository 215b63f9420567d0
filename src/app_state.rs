use std::sync::Arc;

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::search::{
    Aggregator, GoogleBackend, NaverBackend, SearchBackend, SourceType, backend::api_client,
};

/// Read-only, process-wide state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub google: Arc<dyn SearchBackend>,
    pub naver: Arc<dyn SearchBackend>,
    pub aggregator: Aggregator,
    pub fetcher: Fetcher,
    pub extract_max_chars: Option<usize>,
    pub configured_backends: Vec<SourceType>,
}

impl AppState {
    pub fn new(
        google: Arc<dyn SearchBackend>,
        naver: Arc<dyn SearchBackend>,
        fetcher: Fetcher,
        result_cap: usize,
    ) -> Self {
        let aggregator =
            Aggregator::new(google.clone(), naver.clone()).with_result_cap(result_cap);
        Self {
            google,
            naver,
            aggregator,
            fetcher,
            extract_max_chars: None,
            configured_backends: SourceType::all().to_vec(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = api_client()?;
        let google: Arc<dyn SearchBackend> =
            Arc::new(GoogleBackend::from_config(client.clone(), config));
        let naver: Arc<dyn SearchBackend> = Arc::new(NaverBackend::from_config(client, config));

        let configured_backends = [
            (SourceType::Google, config.google().is_some()),
            (SourceType::Naver, config.naver().is_some()),
        ]
        .into_iter()
        .filter_map(|(source, configured)| configured.then_some(source))
        .collect();

        Ok(Self {
            extract_max_chars: config.extract_max_chars(),
            configured_backends,
            ..Self::new(google, naver, Fetcher::new()?, config.result_cap())
        })
    }

    pub fn backend(&self, source: SourceType) -> Arc<dyn SearchBackend> {
        match source {
            SourceType::Google => self.google.clone(),
            SourceType::Naver => self.naver.clone(),
        }
    }
}
