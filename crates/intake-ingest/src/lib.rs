//! File intake: parses uploaded tabular files into headers, a row preview and
//! per-column hints.

pub mod csv_intake;
pub mod error;
pub mod file;

pub use csv_intake::{
    CsvIntake, DEFAULT_PREVIEW_ROWS, FileIntake, TabularPreview, build_column_hints,
    parse_numeric,
};
pub use error::{IngestError, Result};
pub use file::{FileRef, infer_display_name, sha256_hex};
