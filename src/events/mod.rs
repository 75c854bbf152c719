mod decoder;
mod types;

pub use decoder::{Decoded, EventDecoder, HEADER_LEN, MAX_RECORD_LEN};
pub use types::{EventMask, FilesystemEvent, WatchHandle};
