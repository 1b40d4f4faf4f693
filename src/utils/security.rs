use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Filename is empty")]
    Empty,

    #[error("Filename contains null byte")]
    NullByte,

    #[error("Filename contains parent directory (..)")]
    ContainsParentDir,

    #[error("Filename contains directory separator")]
    ContainsDirectorySeparator,
}

/// Validate a client-supplied filename before it touches the upload directory.
///
/// The name becomes the suffix of the stored temp file, so anything that could
/// escape the directory or truncate the path is rejected outright.
pub fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.is_empty() {
        return Err(ValidationError::Empty);
    }

    // rust hands paths to C-style APIs, \0 can end the string early
    if filename.contains('\0') {
        return Err(ValidationError::NullByte);
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::ContainsDirectorySeparator);
    }

    for component in Path::new(filename).components() {
        if matches!(component, Component::ParentDir) {
            return Err(ValidationError::ContainsParentDir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("file.txt").is_ok());
        assert!(validate_filename("file-with-dashes_and_underscores.tar.gz").is_ok());
        assert!(validate_filename("my file.txt").is_ok());
        assert!(validate_filename(".gitignore").is_ok());
    }

    #[test]
    fn test_validate_filename_rejects_directory_separators() {
        assert!(matches!(
            validate_filename("dir/file.txt"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
        assert!(matches!(
            validate_filename("dir\\file.txt"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
        assert!(matches!(
            validate_filename("/etc/passwd"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
        assert!(matches!(
            validate_filename("../etc/passwd"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
    }

    #[test]
    fn test_validate_filename_rejects_bare_parent_dir() {
        assert!(matches!(
            validate_filename(".."),
            Err(ValidationError::ContainsParentDir)
        ));
    }

    #[test]
    fn test_validate_filename_rejects_null_byte() {
        assert!(matches!(
            validate_filename("file\0.txt"),
            Err(ValidationError::NullByte)
        ));
        assert!(matches!(
            validate_filename("file.txt\0"),
            Err(ValidationError::NullByte)
        ));
    }

    #[test]
    fn test_validate_filename_rejects_empty() {
        assert!(matches!(validate_filename(""), Err(ValidationError::Empty)));
    }
}
