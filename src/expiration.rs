use anyhow::Context;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::format_description::FormatItem;
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// The date format used by the `Expires` attribute (IMF-fixdate), from
/// http://tools.ietf.org/html/rfc2616#section-3.3.1.
pub(crate) static IMF_FIXDATE: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT"
);

// RFC 6265 only knows about years between 1601 and 9999.
static MIN_DATETIME: OffsetDateTime = datetime!(1601-01-01 00:00:00 UTC);
static MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

/// A cookie's expiration: either a date-time or session.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(OffsetDateTime)` or `OffsetDateTime` -> `Expiration::DateTime`
///   * `SystemTime` -> `Expiration::DateTime`
///   * `0` -> `Expiration::Session`
///   * any other integer -> `Expiration::DateTime`, interpreted as seconds since the Unix epoch
///
/// Date-times are reduced to their Unix timestamp in the same way, so the Unix epoch
/// itself (`OffsetDateTime::UNIX_EPOCH`, `SystemTime::UNIX_EPOCH`) also yields
/// `Expiration::Session`.
///
/// Strings go through [`str::parse`] (or `TryFrom`), since they might not contain a date:
///
///   * `""` -> `Expiration::Session`
///   * `"Wed, 13 Jan 2021 22:23:01 GMT"` (IMF-fixdate, the format used on the wire)
///   * `"Wed, 13 Jan 2021 22:23:01 +0000"` (RFC 2822)
///   * `"2021-01-13T22:23:01Z"` (RFC 3339)
///   * `"@1610576581"` (seconds since the Unix epoch)
///
/// Date-times are converted to UTC and clamped to the range RFC 6265 allows
/// (years 1601 to 9999).
///
/// ```rust
/// use set_cookie::{Expiration, time::OffsetDateTime};
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let expires = Expiration::from(0);
/// assert_eq!(expires, Expiration::Session);
///
/// let expires = Expiration::from(1610576581);
/// let parsed: Expiration = "Wed, 13 Jan 2021 22:23:01 GMT".parse().unwrap();
/// assert_eq!(expires, parsed);
///
/// let now = OffsetDateTime::now_utc();
/// let expires = Expiration::from(Some(now));
/// assert_eq!(expires, Expiration::DateTime(now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Expiration {
    /// Expiration for a "permanent" cookie at a specific date-time.
    DateTime(OffsetDateTime),
    /// Expiration for a "session" cookie. Browsers define the notion of a
    /// "session" and will automatically expire session cookies when they deem
    /// the "session" to be over. This is typically, but need not be, when the
    /// browser is closed.
    ///
    /// No `Expires` attribute is rendered for session cookies.
    #[default]
    Session,
}

impl Expiration {
    /// Returns `true` if `self` is an `Expiration::DateTime`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::{Expiration, time::OffsetDateTime};
    ///
    /// let expires = Expiration::from(None);
    /// assert!(!expires.is_datetime());
    ///
    /// let expires = Expiration::from(OffsetDateTime::now_utc());
    /// assert!(expires.is_datetime());
    /// ```
    pub fn is_datetime(&self) -> bool {
        match self {
            Expiration::DateTime(_) => true,
            Expiration::Session => false,
        }
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::{Expiration, time::OffsetDateTime};
    ///
    /// let expires = Expiration::from(None);
    /// assert!(expires.is_session());
    ///
    /// let expires = Expiration::from(OffsetDateTime::now_utc());
    /// assert!(!expires.is_session());
    /// ```
    pub fn is_session(&self) -> bool {
        match self {
            Expiration::DateTime(_) => false,
            Expiration::Session => true,
        }
    }

    /// Returns the inner [`OffsetDateTime`] value if `self` is a `DateTime`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::{Expiration, time::OffsetDateTime};
    ///
    /// let expires = Expiration::from(None);
    /// assert!(expires.datetime().is_none());
    ///
    /// let now = OffsetDateTime::now_utc();
    /// let expires = Expiration::from(now);
    /// assert_eq!(expires.datetime(), Some(now));
    /// ```
    pub fn datetime(self) -> Option<OffsetDateTime> {
        match self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(v),
        }
    }

    /// Returns the expiration as seconds since the Unix epoch if `self` is a `DateTime`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::Expiration;
    ///
    /// assert_eq!(Expiration::from(1610576581).unix_timestamp(), Some(1610576581));
    /// assert_eq!(Expiration::Session.unix_timestamp(), None);
    /// ```
    pub fn unix_timestamp(self) -> Option<i64> {
        self.datetime().map(|t| t.unix_timestamp())
    }
}

/// Convert to UTC, within the range of dates a cookie can carry.
fn normalize(datetime: OffsetDateTime) -> OffsetDateTime {
    datetime
        .clamp(MIN_DATETIME, MAX_DATETIME)
        .to_offset(UtcOffset::UTC)
}

fn from_unix_seconds(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap_or(if seconds > 0 {
        MAX_DATETIME
    } else {
        MIN_DATETIME
    })
}

impl From<OffsetDateTime> for Expiration {
    /// A date-time that falls within the first second of the Unix epoch has a
    /// timestamp of `0`: like the integer `0`, it means "no expiration".
    fn from(datetime: OffsetDateTime) -> Self {
        if datetime.unix_timestamp() == 0 {
            return Expiration::Session;
        }
        Expiration::DateTime(normalize(datetime))
    }
}

impl From<Option<OffsetDateTime>> for Expiration {
    fn from(option: Option<OffsetDateTime>) -> Self {
        match option {
            Some(value) => value.into(),
            None => Expiration::Session,
        }
    }
}

impl From<SystemTime> for Expiration {
    fn from(system_time: SystemTime) -> Self {
        let seconds = match system_time.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
        };
        from_unix_seconds(seconds).into()
    }
}

impl From<i64> for Expiration {
    /// `0` means "no expiration"; any other value is a number of seconds
    /// since the Unix epoch.
    fn from(seconds: i64) -> Self {
        if seconds == 0 {
            return Expiration::Session;
        }
        from_unix_seconds(seconds).into()
    }
}

impl From<i32> for Expiration {
    fn from(seconds: i32) -> Self {
        i64::from(seconds).into()
    }
}

impl From<u32> for Expiration {
    fn from(seconds: u32) -> Self {
        i64::from(seconds).into()
    }
}

impl From<u64> for Expiration {
    fn from(seconds: u64) -> Self {
        i64::try_from(seconds).unwrap_or(i64::MAX).into()
    }
}

impl FromStr for Expiration {
    type Err = ParseExpirationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Ok(Expiration::Session);
        }

        let outcome = if let Some(seconds) = input.strip_prefix('@') {
            seconds
                .parse::<i64>()
                .map(Expiration::from)
                .context("Expected an integer number of seconds after `@`")
        } else {
            PrimitiveDateTime::parse(input, IMF_FIXDATE)
                .map(PrimitiveDateTime::assume_utc)
                .or_else(|_| OffsetDateTime::parse(input, &Rfc2822))
                .or_else(|_| OffsetDateTime::parse(input, &Rfc3339))
                .map(Expiration::from)
                .context("Expected an IMF-fixdate, RFC 2822 or RFC 3339 date-time")
        };

        outcome.map_err(|e| {
            tracing::debug!(raw_value = s, "Failed to parse a cookie expiration");
            ParseExpirationError {
                raw_value: s.to_owned(),
                source: e,
            }
        })
    }
}

impl TryFrom<&str> for Expiration {
    type Error = ParseExpirationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Expiration {
    type Error = ParseExpirationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&String> for Expiration {
    type Error = ParseExpirationError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug)]
/// An error that occurred while parsing a string into an [`Expiration`].
///
/// This error is returned by [`Expiration::from_str`] and [`SetCookie::try_with_expires`].
///
/// [`SetCookie::try_with_expires`]: crate::SetCookie::try_with_expires
pub struct ParseExpirationError {
    raw_value: String,
    source: anyhow::Error,
}

impl ParseExpirationError {
    /// The string that could not be parsed.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}

impl fmt::Display for ParseExpirationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to parse `{}` as a cookie expiration date",
            self.raw_value
        )
    }
}

impl std::error::Error for ParseExpirationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}
