//! Upload validation utilities.

use std::path::Path;

use crate::types::{Error, Result};

/// Image extensions accepted by the prediction backend.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Maximum crop label length forwarded to the backend.
pub const MAX_CROP_CHARS: usize = 50;

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.trim().is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Validate that an image file name carries an accepted extension.
pub fn validate_image_name(file_name: &str) -> Result<()> {
    validate_non_empty(file_name, "image file name")?;
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::validation(format!("{} has no file extension", file_name)))?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::validation(format!(
            "unsupported image type .{}; expected one of {}",
            extension,
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// MIME type for an accepted image extension.
pub fn image_mime(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Truncate a crop label to `MAX_CROP_CHARS` characters.
pub fn normalize_crop(crop: &str) -> String {
    crop.trim().chars().take(MAX_CROP_CHARS).collect()
}

/// Validate an upload form; returns the crop label as it will be sent.
pub fn validate_upload(file_name: &str, location: &str, crop: &str) -> Result<String> {
    validate_image_name(file_name)?;
    validate_non_empty(location, "location")?;
    Ok(normalize_crop(crop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_extensions_case_insensitive() {
        for name in ["leaf.png", "leaf.JPG", "leaf.jpeg", "a.b.bmp", "x.Gif"] {
            assert!(validate_image_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_rejects_unknown_or_missing_extension() {
        assert!(validate_image_name("leaf.tiff").is_err());
        assert!(validate_image_name("leaf").is_err());
        assert!(validate_image_name("").is_err());
    }

    #[test]
    fn test_upload_requires_location() {
        let err = validate_upload("leaf.png", "   ", "banana").unwrap_err();
        assert!(err.to_string().contains("location cannot be empty"));
    }

    #[test]
    fn test_crop_is_truncated() {
        let long = "b".repeat(80);
        let crop = validate_upload("leaf.png", "Colombo", &long).unwrap();
        assert_eq!(crop.chars().count(), MAX_CROP_CHARS);
        assert_eq!(validate_upload("leaf.png", "Colombo", "").unwrap(), "");
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("a.JPEG"), "image/jpeg");
        assert_eq!(image_mime("a.png"), "image/png");
        assert_eq!(image_mime("a"), "application/octet-stream");
    }
}
