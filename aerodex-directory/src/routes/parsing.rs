//! Percent-encoding of path segments.

/// Maximum decoded length of a single path segment (4KB).
pub const MAX_SEGMENT_LEN: usize = 4 * 1024;

/// Error returned when a path segment cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Decoded output would exceed [`MAX_SEGMENT_LEN`].
    TooLong,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong => write!(
                f,
                "path segment exceeds maximum length ({}KB limit)",
                MAX_SEGMENT_LEN / 1024
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode `%XX` escapes in one path segment.
///
/// Unlike form decoding, `+` is kept as-is. Malformed escapes are kept
/// verbatim and invalid UTF-8 is replaced.
///
/// # Examples
///
/// ```
/// use aerodex_directory::routes::percent_decode;
///
/// assert_eq!(percent_decode("new%20york").unwrap(), "new york");
/// assert_eq!(percent_decode("c++").unwrap(), "c++");
/// assert_eq!(percent_decode("s%C3%A3o").unwrap(), "são");
/// ```
pub fn percent_decode(segment: &str) -> Result<String, DecodeError> {
    let mut bytes = Vec::with_capacity(segment.len());
    let mut input = segment.bytes();

    while let Some(b) = input.next() {
        if bytes.len() >= MAX_SEGMENT_LEN {
            return Err(DecodeError::TooLong);
        }

        if b != b'%' {
            bytes.push(b);
            continue;
        }
        let h1 = input.next();
        let h2 = input.next();
        match (h1, h2) {
            (Some(h1), Some(h2)) => {
                if let (Some(hi), Some(lo)) = (hex_value(h1), hex_value(h2)) {
                    bytes.push((hi << 4) | lo);
                } else {
                    bytes.extend_from_slice(&[b'%', h1, h2]);
                }
            },
            (Some(h1), None) => bytes.extend_from_slice(&[b'%', h1]),
            _ => bytes.push(b'%'),
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Encode one path segment so it survives [`percent_decode`].
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; every other
/// byte becomes `%XX`.
///
/// ```
/// use aerodex_directory::routes::percent_encode;
///
/// assert_eq!(percent_encode("new york"), "new%20york");
/// assert_eq!(percent_encode("a/b"), "a%2Fb");
/// ```
pub fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("hello%20world").unwrap(), "hello world");
        assert_eq!(percent_decode("a%2Fb").unwrap(), "a/b");
        assert_eq!(percent_decode("plain").unwrap(), "plain");
        assert_eq!(percent_decode("a+b").unwrap(), "a+b");
    }

    #[test]
    fn test_percent_decode_utf8() {
        assert_eq!(percent_decode("caf%C3%A9").unwrap(), "café");
        assert_eq!(percent_decode("%E4%B8%AD%E6%96%87").unwrap(), "中文");
    }

    #[test]
    fn test_percent_decode_malformed() {
        assert_eq!(percent_decode("100%").unwrap(), "100%");
        assert_eq!(percent_decode("%4").unwrap(), "%4");
        assert_eq!(percent_decode("%zz").unwrap(), "%zz");
    }

    #[test]
    fn test_percent_decode_too_long() {
        let long = "a".repeat(MAX_SEGMENT_LEN + 1);
        assert_eq!(percent_decode(&long), Err(DecodeError::TooLong));
        let limit = "a".repeat(MAX_SEGMENT_LEN);
        assert_eq!(percent_decode(&limit).unwrap().len(), MAX_SEGMENT_LEN);
    }

    #[test]
    fn test_percent_encode_reserved() {
        assert_eq!(percent_encode("São Paulo"), "S%C3%A3o%20Paulo");
        assert_eq!(percent_encode("a|b"), "a%7Cb");
        assert_eq!(percent_encode("safe-._~"), "safe-._~");
    }

    #[test]
    fn test_encode_then_decode() {
        for text in ["", "new york", "^ber", "a/b?c#d", "100%", "中文"] {
            assert_eq!(percent_decode(&percent_encode(text)).unwrap(), text);
        }
    }
}
