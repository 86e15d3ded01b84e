// Adapters layer: concrete clients for the upstream services.

pub mod census;
pub mod http;
pub mod nws;
pub mod ollama;

pub use census::CensusGeocoder;
pub use http::{HttpClient, HttpSettings};
pub use nws::NwsClient;
pub use ollama::OllamaSummarizer;
