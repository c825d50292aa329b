//! Infrastructure services

mod document_service;
mod study_service;

pub use document_service::{DocumentService, DocumentServiceTrait, StoragePaths};
pub use study_service::{StudyService, StudyServiceTrait, NO_DOCUMENTS};

#[cfg(test)]
pub use document_service::MockDocumentServiceTrait;
#[cfg(test)]
pub use study_service::MockStudyServiceTrait;
