//! Local file name derivation.

use crate::error::FetchError;
use url::Url;

/// Parses `url` as an absolute URL.
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|reason| FetchError::InvalidUrl {
        url: url.to_string(),
        reason,
    })
}

/// Returns the last segment of the URL path, percent-decoded.
///
/// Trailing slashes are ignored, so `https://host/dir/` yields `dir`. Names
/// that would not stay inside the current directory are rejected.
///
/// # Example
///
/// ```
/// use refetch::{derive_filename, parse_url};
///
/// let url = parse_url("https://example.com/data/file.bin").unwrap();
/// assert_eq!(derive_filename(&url).unwrap(), "file.bin");
/// ```
pub fn derive_filename(url: &Url) -> Result<String, FetchError> {
    let segment = url
        .path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let name = urlencoding::decode(segment)
        .map_err(|_| FetchError::NoFilename(url.to_string()))?
        .into_owned();

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FetchError::NoFilename(url.to_string()));
    }
    Ok(name)
}
