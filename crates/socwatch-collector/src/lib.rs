pub mod audit;
pub mod error;
pub mod orchestrator;
pub mod scraper;
pub mod store;
pub mod upsert;

pub use error::{CollectError, ProfileError};
pub use orchestrator::{CollectRequest, Collector, CollectorOptions, ProfileResult};
pub use scraper::ProfileScraper;
pub use store::{CollectionStore, PgStore};
pub use upsert::{upsert_record, UpsertCounts, UpsertOutcome};
