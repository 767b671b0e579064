//! File name and extension helpers.

use std::path::Path;

/// Extracts the file name from a path.
///
/// # Examples
///
/// ```
/// use cutil::fs::file_name;
///
/// assert_eq!(file_name("/path/to/file.txt"), "file.txt");
/// assert_eq!(file_name("/path/to/directory/"), "directory");
/// ```
pub fn file_name(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Returns the lowercase extension of a path, if it has one.
///
/// # Examples
///
/// ```
/// use cutil::fs::file_extension;
///
/// assert_eq!(file_extension("photo.JPG"), Some("jpg".to_string()));
/// assert_eq!(file_extension("/tmp/README"), None);
/// ```
pub fn file_extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
