pub mod builder;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod sources;

pub use builder::CodingMapBuilder;
pub use cache::{CodingCache, JsonFileCache, MemoryCache};
pub use error::CodingError;
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use sources::candidate_urls;
