//! Adapters for the external services the gateway fronts.
//!
//! Each adapter sits behind an async trait so the HTTP layer can be driven with substituted
//! implementations in tests.

pub mod extraction;
pub mod knowledge_base;
pub mod store;

pub use extraction::{DocumentExtractor, PdfExtractionClient};
pub use knowledge_base::{KnowledgeBase, KnowledgeBaseClient, KnowledgeBaseQuery};
pub use store::{NOT_FOUND_CODE, RecordStore, RestRecordStore, StoreError};
