pub mod client;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod types;

pub use client::ApifyClient;
pub use error::ScraperError;
pub use normalize::{normalize_item, normalize_items};
pub use types::ProfileScraperInput;
