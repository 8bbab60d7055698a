pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod norm;
pub mod result;
pub mod sitemap;

pub use crawler::{Crawler, ProgressCallback};
pub use error::CrawlError;
pub use extract::{PageDocument, PageMetadata};
pub use fetch::{FetchOutcome, Fetcher};
pub use result::{BrokenLinkResult, BrokenReason, CrawlOutput, PageResult};
