pub mod extract;
pub mod fetcher;
pub mod storage;

pub use fetcher::{HttpFetcher, WebFetcher};
pub use storage::{LocalStorage, S3Storage, Storage};
