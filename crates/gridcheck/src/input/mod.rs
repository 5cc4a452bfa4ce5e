//! File ingestion: loading, delimiter sniffing and header location.

mod frame;
mod header;
mod loader;
mod sniffer;
mod source;

pub use frame::TypedFrame;
pub use header::{DEFAULT_MAX_SCAN_ROWS, find_header_row};
pub use loader::{DEFAULT_EXTENSIONS, Loader, LoaderConfig, TEXT_SHEET_NAME};
pub use sniffer::{CANDIDATE_DELIMITERS, DEFAULT_DELIMITER, Sniffer};
pub use source::{Cell, Sheet, SourceMetadata, Workbook};
