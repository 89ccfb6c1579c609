use std::sync::Arc;

use np_core::ArticleStore;
use np_ingest::NewsIngestor;

pub struct AppState {
    pub global_store: Arc<dyn ArticleStore>,
    pub local_store: Arc<dyn ArticleStore>,
    pub ingestor: Arc<NewsIngestor>,
}
