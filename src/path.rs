//! Path normalization and location decoding
//!
//! Every path that enters the router goes through [`normalize`]: registered
//! templates, navigation targets and the location read at startup. Decoding of
//! percent-escapes happens exactly once, in [`decode_location_path`], when the
//! path is first taken from the browser location.

use percent_encoding::percent_decode_str;

/// Collapse runs of `/` into one and strip a single trailing `/`.
///
/// The root path `/` is kept as is. The function is idempotent.
///
/// # Example
///
/// ```
/// use path_navigator::normalize;
///
/// assert_eq!(normalize("/a//b/"), "/a/b");
/// assert_eq!(normalize("//"), "/");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;

    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }

    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }

    out
}

/// Percent-decode a raw location path one segment at a time.
///
/// Segments are decoded independently so that an encoded separator (`%2F`)
/// becomes part of its segment text rather than splitting it. Byte sequences
/// that are not valid UTF-8 after decoding are replaced with `U+FFFD`.
///
/// # Example
///
/// ```
/// use path_navigator::decode_location_path;
///
/// assert_eq!(decode_location_path("/caf%C3%A9/a%20b"), "/café/a b");
/// ```
pub fn decode_location_path(raw: &str) -> String {
    raw.split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
