pub mod errors;
pub mod parse;
pub mod types;

pub use errors::RecordError;
pub use parse::{flatten_object, parse_document, parse_timestamp};
pub use types::{Batch, Record, ServerId, Status};
