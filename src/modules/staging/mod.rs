//! Upload staging module
//!
//! Attachments are written to a local directory before being forwarded to
//! the upstream service. A staged file is deleted as soon as its handle is
//! dropped, whatever the outcome of the request.

mod upload_store;

pub use upload_store::{StagedUpload, StagingError, StagingWriter, UploadStagingStore};
