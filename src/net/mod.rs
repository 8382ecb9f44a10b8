//! Model acquisition over the network.
//!
//! * [`fetch`] - progressive chunked download with live progress reporting
//! * [`decompress`] - gzip inflation of the assembled payload

pub mod decompress;
pub mod fetch;

pub use decompress::decompress_gzip;
pub use fetch::{DownloadProgress, StreamFetcher};
