/// Fallback values applied when a source element is missing a field.

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNCATEGORIZED: &str = "Uncategorized";

// Supported input file extensions
pub const JSON_EXT: &str = "json";
pub const DELIMITED_EXT: &str = "csv";

// Subdirectory of the input dir that consumed files are moved into
pub const ARCHIVE_DIR: &str = "archive";

/// Identity assigned to a source element that carries no usable id of its own.
pub fn synthetic_id(index: usize) -> String {
    format!("row_{index}")
}
