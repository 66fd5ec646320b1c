//! Uploaded postcode tables.

mod error;
mod table;

pub use error::UploadError;
pub use table::UploadTable;
