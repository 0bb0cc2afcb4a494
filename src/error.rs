use std::path::PathBuf;

use crate::model::SectionKey;

#[derive(thiserror::Error, Debug)]
pub enum SectionError {
    #[error("could not extract selectable text from {}: {reason}", path.display())]
    ExtractionFailure { path: PathBuf, reason: String },
    #[error("none of the target sections were found in the document")]
    NoSectionsFound,
    #[error("webhook rejected chunk {chunk} of {section} with status {status}: {body}")]
    DeliveryFailure {
        section: SectionKey,
        chunk: usize,
        status: u16,
        body: String,
    },
    #[error("failed to send chunk {chunk} of {section}: {reason}")]
    DeliveryTransport {
        section: SectionKey,
        chunk: usize,
        reason: String,
    },
}
