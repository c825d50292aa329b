//! Web search tool implementations

mod google;

pub use google::{GoogleCustomSearchTool, GOOGLE_SEARCH_URL};
