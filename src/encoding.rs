use percent_encoding::{AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use std::fmt;

/// Everything but ASCII alphanumerics, `-`, `_` and `.`.
///
/// This is the set used by `application/x-www-form-urlencoded` serializers.
const URLENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Percent-encode a cookie name or value with the proper encoding set.
///
/// Spaces are rendered as `+`.
pub(crate) fn encode(string: &str) -> impl fmt::Display + '_ {
    UrlEncode(percent_encoding::utf8_percent_encode(string, URLENCODE))
}

struct UrlEncode<'a>(PercentEncode<'a>);

impl fmt::Display for UrlEncode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Every escaped byte is yielded as its own `%XX` chunk.
        for chunk in self.0.clone() {
            if chunk == "%20" {
                f.write_str("+")?;
            } else {
                f.write_str(chunk)?;
            }
        }
        Ok(())
    }
}
