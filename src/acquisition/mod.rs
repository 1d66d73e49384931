//! Outbound content acquisition.

pub mod http_client;

pub use http_client::{FetchError, HttpClient, PageFetcher};
