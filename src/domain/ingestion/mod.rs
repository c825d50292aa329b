//! Document ingestion domain types and traits

pub mod chunker;
pub mod cleaning;
pub mod outcome;
pub mod parser;

pub use chunker::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use cleaning::clean_text;
pub use outcome::{IngestionMode, IngestionOutcome};
pub use parser::{DocumentParser, StagedUpload, UploadedFile};
