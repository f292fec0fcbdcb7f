//! Platform detection for URLs and CSV header rows.
//!
//! Detection is a pure, ordered list of predicates; the first match wins
//! and "unknown" is an ordinary result rather than an error.

mod headers;
mod url;

pub use self::headers::{
    CsvLayout, detect_csv, detect_csv_headers, detect_csv_layout, normalize_header,
};
pub use self::url::{UrlDetection, detect_url};
