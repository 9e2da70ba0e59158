//! Upload validation. Nothing here touches storage.

use crate::ValidationError;

/// Image extensions accepted by the upload endpoint, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Return the lowercased extension of `filename` if it is an accepted image
/// type.
///
/// The extension is the suffix after the last `.`; a name without a `.` has
/// none and is rejected.
pub fn image_extension(filename: &str) -> Result<String, ValidationError> {
  filename
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    .ok_or_else(|| ValidationError::UnsupportedExtension(filename.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_allowed_extensions_case_insensitively() {
    assert_eq!(image_extension("leaf.jpg").unwrap(), "jpg");
    assert_eq!(image_extension("leaf.JPEG").unwrap(), "jpeg");
    assert_eq!(image_extension("leaf.Png").unwrap(), "png");
    assert_eq!(image_extension("leaf.bmp").unwrap(), "bmp");
  }

  #[test]
  fn uses_suffix_after_last_dot() {
    assert_eq!(image_extension("capture.2024.01.png").unwrap(), "png");
    assert!(image_extension("leaf.png.exe").is_err());
  }

  #[test]
  fn rejects_unsupported_or_missing_extension() {
    for name in ["leaf.gif", "leaf.txt", "leaf", "jpg", "leaf.", ""] {
      assert_eq!(
        image_extension(name),
        Err(ValidationError::UnsupportedExtension(name.to_owned())),
        "{name:?} should be rejected"
      );
    }
  }
}
