pub mod fetch;
pub mod pipeline;

pub use fetch::{HttpFetcher, PageFetch};
pub use pipeline::{FetchPipeline, PipelineConfig};
