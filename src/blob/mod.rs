mod storage;
mod validate;

pub use storage::BlobStorage;
pub use validate::{UploadKind, sniff_mime, validate_upload};
