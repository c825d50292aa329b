//! Vector index, retriever and retriever registry implementations

mod in_memory;
mod index_retriever;
mod registry;

pub use in_memory::InMemoryVectorIndex;
pub use index_retriever::IndexRetriever;
pub use registry::RetrieverRegistry;
