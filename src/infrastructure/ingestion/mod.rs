//! Document ingestion infrastructure
//!
//! Parsers, the recursive chunker and the pipeline that feeds the vector index.

pub mod chunkers;
pub mod parsers;
pub mod pipeline;

pub use chunkers::RecursiveChunker;
pub use parsers::{PdfParser, PlainTextParser};
pub use pipeline::IngestionPipeline;
