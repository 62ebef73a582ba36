//! String handling utilities
//!
//! Opera character fields are fixed-width and NUL-padded ASCII.

/// Trim trailing NUL bytes from byte slice
///
/// Only padding is removed: interior NULs and trailing spaces are kept.
pub fn trim_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    &bytes[..end]
}

/// Split a slash-separated path into segments, dropping empty ones
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_ironman() {
        let mut field = [0u8; 32];
        field[..11].copy_from_slice(b"IRONMANDATA");
        assert_eq!(trim_trailing_nuls(&field), b"IRONMANDATA");
    }

    #[test]
    fn test_trim_keeps_spaces_and_interior_nuls() {
        assert_eq!(trim_trailing_nuls(b"AB \0\0"), b"AB ");
        assert_eq!(trim_trailing_nuls(b"\0A\0B\0"), b"\0A\0B");
        assert_eq!(trim_trailing_nuls(b"\0\0\0"), b"");
        assert_eq!(trim_trailing_nuls(b""), b"");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/IronManData/QT/"), vec!["IronManData", "QT"]);
        assert_eq!(split_path("IronManData//QT"), vec!["IronManData", "QT"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
    }
}
