pub mod gate;
pub mod ingestor;
pub mod pipeline;
pub mod providers;
pub mod resolver;

pub use gate::{Clock, RefreshGate, SystemClock, DEFAULT_TTL};
pub use ingestor::{IngestReport, IngestorConfig, NewsIngestor, FALLBACK_LOCAL_QUERY};
pub use pipeline::{run_global_cycle, run_local_cycle, run_retention_sweep, CycleReport};
pub use providers::{GeoProvider, NewsProvider, PlaceComponents, RawHeadline};
pub use resolver::GeoResolver;

pub mod prelude {
    pub use super::{NewsIngestor, RefreshGate};
    pub use np_core::{Article, ArticleStore, Result};
}
