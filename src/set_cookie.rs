use crate::encoding::encode;
use crate::expiration::IMF_FIXDATE;
use crate::name::InvalidNameError;
use crate::response::{AddHeader, SET_COOKIE};
use crate::Expiration;
use std::borrow::Cow;
use std::fmt;
use time::OffsetDateTime;

/// A cookie set by a server in an HTTP response using the `Set-Cookie` header.
///
/// `SetCookie` is immutable: its `with_*` methods leave `self` untouched and return
/// a copy with a single attribute changed.
///
/// ## Constructing a `SetCookie`
///
/// A cookie needs a valid name. Use [`SetCookie::new()`]:
///
/// ```rust
/// use set_cookie::SetCookie;
///
/// let cookie = SetCookie::new("name").unwrap();
/// assert_eq!(cookie.to_string(), "name=");
///
/// // Names can't be empty, nor contain `=`, `,`, `;` or whitespace.
/// assert!(SetCookie::new("").is_err());
/// assert!(SetCookie::new("a name").is_err());
/// ```
///
/// ## Building a `SetCookie`
///
/// To construct more elaborate cookies, chain `SetCookie`'s `with_*` methods.
///
/// ```rust
/// use set_cookie::SetCookie;
///
/// let cookie = SetCookie::new("Foo")
///     .unwrap()
///     .with_value("Bar/Baz")
///     .with_domain(".foo.com")
///     .with_path("/quux")
///     .with_expires(1610576581)
///     .with_secure(true)
///     .with_http_only(true);
/// assert_eq!(
///     cookie.to_string(),
///     "Foo=Bar%2FBaz; Domain=.foo.com; Path=/quux; Expires=Wed, 13 Jan 2021 22:23:01 GMT; Secure; HttpOnly"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SetCookie<'c> {
    /// The cookie's name. Always valid.
    name: Cow<'c, str>,
    /// The cookie's value, if any.
    value: Option<Cow<'c, str>>,
    expires: Expiration,
    path: Option<Cow<'c, str>>,
    domain: Option<Cow<'c, str>>,
    secure: bool,
    http_only: bool,
}

impl<'c> SetCookie<'c> {
    /// Creates a new [`SetCookie`] with the given name and no other attribute.
    ///
    /// It fails if `name` is empty or contains any of `=`, `,`, `;`, space, tab,
    /// carriage return, line feed, vertical tab or form feed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::SetCookie;
    ///
    /// let cookie = SetCookie::new("name").unwrap();
    /// assert_eq!(cookie.name(), "name");
    /// assert_eq!(cookie.value(), None);
    /// assert!(!cookie.secure());
    ///
    /// let e = SetCookie::new("=name").unwrap_err();
    /// assert_eq!(e.to_string(), "The cookie name `=name` contains a forbidden character: '='");
    /// ```
    pub fn new<N>(name: N) -> Result<Self, InvalidNameError>
    where
        N: Into<Cow<'c, str>>,
    {
        let name = name.into();
        crate::name::validate(&name)?;
        Ok(SetCookie {
            name,
            value: None,
            expires: Expiration::Session,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
        })
    }

    /// Converts `self` into a [`SetCookie`] with a static lifetime with as few
    /// allocations as possible.
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("a").unwrap().with_value("b");
    /// let owned_cookie = c.into_owned();
    /// assert_eq!(owned_cookie.name(), "a");
    /// assert_eq!(owned_cookie.value(), Some("b"));
    /// ```
    pub fn into_owned(self) -> SetCookie<'static> {
        let to_owned = |s: Cow<'c, str>| match s {
            Cow::Borrowed(s) => Cow::Owned(s.to_owned()),
            Cow::Owned(s) => Cow::Owned(s),
        };
        SetCookie {
            name: to_owned(self.name),
            value: self.value.map(to_owned),
            expires: self.expires,
            path: self.path.map(to_owned),
            domain: self.domain.map(to_owned),
            secure: self.secure,
            http_only: self.http_only,
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the value of `self`, if one was set.
    ///
    /// A cookie without a value is rendered with an empty value (`name=`).
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("name").unwrap();
    /// assert_eq!(c.value(), None);
    ///
    /// let c = c.with_value("value");
    /// assert_eq!(c.value(), Some("value"));
    /// ```
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the [`Expiration`] of the cookie.
    ///
    /// It's [`Expiration::Session`] unless an expiration date was set.
    #[inline]
    pub fn expires(&self) -> Expiration {
        self.expires
    }

    /// Returns the expiration date-time of the cookie, if it has one.
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("name").unwrap();
    /// assert_eq!(c.expires_datetime(), None);
    ///
    /// let c = c.with_expires(1610576581);
    /// assert_eq!(c.expires_datetime().map(|t| t.year()), Some(2021));
    /// ```
    #[inline]
    pub fn expires_datetime(&self) -> Option<OffsetDateTime> {
        self.expires.datetime()
    }

    /// Returns the `Path` of the cookie if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` of the cookie if one was specified.
    ///
    /// The domain is returned, and rendered, exactly as it was given: a leading `.`
    /// is preserved.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns whether this cookie is marked `Secure`.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns whether this cookie is marked `HttpOnly`.
    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns a copy of `self` with its value set to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let original = SetCookie::new("name").unwrap();
    /// let c = original.with_value("bar");
    /// assert_eq!(c.value(), Some("bar"));
    /// assert_eq!(original.value(), None);
    /// ```
    pub fn with_value<V: Into<Cow<'c, str>>>(&self, value: V) -> Self {
        let mut c = self.clone();
        c.value = Some(value.into());
        c
    }

    /// Returns a copy of `self` without a value.
    pub fn without_value(&self) -> Self {
        let mut c = self.clone();
        c.value = None;
        c
    }

    /// Returns a copy of `self` with its expiration set to `expires`.
    ///
    /// `expires` can be anything that converts into an [`Expiration`]: an
    /// [`OffsetDateTime`], a [`SystemTime`], a Unix timestamp, or `None`.
    /// A timestamp of `0` means "no expiration".
    ///
    /// To set the expiration from a string, use [`SetCookie::try_with_expires()`].
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    /// use set_cookie::time::macros::datetime;
    ///
    /// let c = SetCookie::new("foo").unwrap();
    ///
    /// let from_timestamp = c.with_expires(1610576581);
    /// let from_datetime = c.with_expires(datetime!(2021-01-13 22:23:01 UTC));
    /// assert_eq!(from_timestamp, from_datetime);
    /// assert_eq!(
    ///     from_timestamp.to_string(),
    ///     "foo=; Expires=Wed, 13 Jan 2021 22:23:01 GMT"
    /// );
    ///
    /// assert_eq!(c.with_expires(0).to_string(), "foo=");
    /// ```
    ///
    /// [`SystemTime`]: std::time::SystemTime
    pub fn with_expires<T: Into<Expiration>>(&self, expires: T) -> Self {
        let mut c = self.clone();
        c.expires = expires.into();
        c
    }

    /// Returns a copy of `self` with its expiration set to `expires`, for inputs
    /// whose conversion into an [`Expiration`] can fail. Strings, in particular.
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("foo").unwrap();
    ///
    /// let expiring = c.try_with_expires("Wed, 13 Jan 2021 22:23:01 GMT").unwrap();
    /// assert_eq!(
    ///     expiring.to_string(),
    ///     "foo=; Expires=Wed, 13 Jan 2021 22:23:01 GMT"
    /// );
    ///
    /// // An empty string means "no expiration".
    /// assert_eq!(c.try_with_expires("").unwrap().to_string(), "foo=");
    ///
    /// assert!(c.try_with_expires("next tuesday").is_err());
    /// ```
    pub fn try_with_expires<T: TryInto<Expiration>>(&self, expires: T) -> Result<Self, T::Error> {
        let expires = expires.try_into()?;
        Ok(self.with_expires(expires))
    }

    /// Returns a copy of `self` without an expiration, i.e. a session cookie.
    pub fn without_expires(&self) -> Self {
        self.with_expires(Expiration::Session)
    }

    /// Returns a copy of `self` with its `Path` set to `path`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("name").unwrap().with_path("/");
    /// assert_eq!(c.path(), Some("/"));
    /// assert_eq!(c.without_path().path(), None);
    /// ```
    pub fn with_path<P: Into<Cow<'c, str>>>(&self, path: P) -> Self {
        let mut c = self.clone();
        c.path = Some(path.into());
        c
    }

    /// Returns a copy of `self` without a `Path`.
    pub fn without_path(&self) -> Self {
        let mut c = self.clone();
        c.path = None;
        c
    }

    /// Returns a copy of `self` with its `Domain` set to `domain`.
    ///
    /// # Example
    ///
    /// ```
    /// use set_cookie::SetCookie;
    ///
    /// let c = SetCookie::new("name").unwrap().with_domain(".rust-lang.org");
    /// assert_eq!(c.domain(), Some(".rust-lang.org"));
    /// assert_eq!(c.to_string(), "name=; Domain=.rust-lang.org");
    /// ```
    pub fn with_domain<D: Into<Cow<'c, str>>>(&self, domain: D) -> Self {
        let mut c = self.clone();
        c.domain = Some(domain.into());
        c
    }

    /// Returns a copy of `self` without a `Domain`.
    pub fn without_domain(&self) -> Self {
        let mut c = self.clone();
        c.domain = None;
        c
    }

    /// Returns a copy of `self` with the `Secure` flag set to `secure`.
    pub fn with_secure(&self, secure: bool) -> Self {
        let mut c = self.clone();
        c.secure = secure;
        c
    }

    /// Returns a copy of `self` with the `HttpOnly` flag set to `http_only`.
    pub fn with_http_only(&self, http_only: bool) -> Self {
        let mut c = self.clone();
        c.http_only = http_only;
        c
    }

    /// Returns the value of the `Set-Cookie` header for `self`.
    ///
    /// It's the same string you get from `self.to_string()`.
    pub fn header_value(&self) -> String {
        self.to_string()
    }

    /// Adds a `Set-Cookie` header for `self` to `response`.
    ///
    /// It returns whatever [`AddHeader::add_header`] returns for `response`: a new response,
    /// for immutable response types, or the outcome of the operation.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "http")]
    /// # {
    /// use set_cookie::SetCookie;
    ///
    /// let response = http::Response::new(());
    /// let cookie = SetCookie::new("foo").unwrap().with_value("bar");
    /// let response = cookie.apply(response).unwrap();
    /// assert_eq!(response.headers()["set-cookie"], "foo=bar");
    /// # }
    /// ```
    pub fn apply<R: AddHeader>(&self, response: R) -> R::Output {
        tracing::trace!(cookie.name = self.name(), "Adding a cookie to the response");
        response.add_header(SET_COOKIE, self.header_value())
    }
}

impl<'c> fmt::Display for SetCookie<'c> {
    /// Formats the cookie `self` as a `Set-Cookie` header value.
    ///
    /// Attributes are always written in the same order: `Domain`, `Path`, `Expires`,
    /// `Secure`, `HttpOnly`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use set_cookie::SetCookie;
    ///
    /// let cookie = SetCookie::new("foo").unwrap().with_value("bar").with_path("/");
    /// assert_eq!(cookie.to_string(), "foo=bar; Path=/");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}={}",
            encode(self.name()),
            encode(self.value().unwrap_or_default())
        )?;

        if let Some(domain) = self.domain().filter(|d| !d.is_empty()) {
            write!(f, "; Domain={}", domain)?;
        }

        if let Some(path) = self.path().filter(|p| !p.is_empty()) {
            write!(f, "; Path={}", path)?;
        }

        if let Some(time) = self.expires_datetime() {
            write!(
                f,
                "; Expires={}",
                time.format(IMF_FIXDATE).map_err(|_| fmt::Error)?
            )?;
        }

        if self.secure() {
            write!(f, "; Secure")?;
        }

        if self.http_only() {
            write!(f, "; HttpOnly")?;
        }

        Ok(())
    }
}

impl<'a, 'b> PartialEq<SetCookie<'b>> for SetCookie<'a> {
    fn eq(&self, other: &SetCookie<'b>) -> bool {
        self.name() == other.name()
            && self.value() == other.value()
            && self.expires() == other.expires()
            && self.path() == other.path()
            && self.domain() == other.domain()
            && self.secure() == other.secure()
            && self.http_only() == other.http_only()
    }
}

impl<'a, N, V> TryFrom<(N, V)> for SetCookie<'a>
where
    N: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    type Error = InvalidNameError;

    fn try_from((name, value): (N, V)) -> Result<Self, Self::Error> {
        let mut c = SetCookie::new(name)?;
        c.value = Some(value.into());
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::InvalidNameError;
    use crate::response::AddHeader;
    use crate::{Expiration, SetCookie};
    use googletest::prelude::*;
    use std::time::{Duration, SystemTime};
    use time::macros::datetime;
    use time::OffsetDateTime;

    const TIMESTAMP: i64 = 1610576581;
    const EXPIRES: &str = "Wed, 13 Jan 2021 22:23:01 GMT";

    fn cookie(name: &str) -> SetCookie<'_> {
        SetCookie::new(name).unwrap()
    }

    #[test]
    fn format() {
        assert_eq!(cookie("foo").to_string(), "foo=");
        assert_eq!(cookie("foo").with_value("bar").to_string(), "foo=bar");
        assert_eq!(
            cookie("Foo")
                .with_value("Bar/Baz")
                .with_expires(TIMESTAMP)
                .to_string(),
            "Foo=Bar%2FBaz; Expires=Wed, 13 Jan 2021 22:23:01 GMT"
        );
        assert_eq!(
            cookie("Foo")
                .with_value("Bar/Baz")
                .with_expires(TIMESTAMP)
                .with_path("/quux")
                .with_domain(".foo.com")
                .with_secure(true)
                .with_http_only(true)
                .to_string(),
            "Foo=Bar%2FBaz; Domain=.foo.com; Path=/quux; Expires=Wed, 13 Jan 2021 22:23:01 GMT; Secure; HttpOnly"
        );

        assert_eq!(cookie("foo").with_secure(true).to_string(), "foo=; Secure");
        assert_eq!(
            cookie("foo").with_http_only(true).to_string(),
            "foo=; HttpOnly"
        );
        assert_eq!(cookie("foo").with_path("/").to_string(), "foo=; Path=/");
        assert_eq!(
            cookie("foo").with_domain("www.rust-lang.org").to_string(),
            "foo=; Domain=www.rust-lang.org"
        );
    }

    #[test]
    fn attributes_are_rendered_in_a_fixed_order() {
        let c = cookie("Foo")
            .with_http_only(true)
            .with_value("Bar/Baz")
            .with_path("/")
            .with_secure(true)
            .try_with_expires(EXPIRES)
            .unwrap()
            .with_domain(".foo.com");
        assert_eq!(
            c.to_string(),
            "Foo=Bar%2FBaz; Domain=.foo.com; Path=/; Expires=Wed, 13 Jan 2021 22:23:01 GMT; Secure; HttpOnly"
        );
    }

    #[test]
    fn names_and_values_are_percent_encoded() {
        assert_eq!(
            cookie("a/b").with_value("c d;e").to_string(),
            "a%2Fb=c+d%3Be"
        );
        assert_eq!(cookie("ß").with_value("€").to_string(), "%C3%9F=%E2%82%AC");
        assert_eq!(cookie("foo").with_value("a b*~").to_string(), "foo=a+b%2A%7E");
    }

    #[test]
    fn path_and_domain_are_not_encoded() {
        assert_eq!(
            cookie("a").with_path("/a b").to_string(),
            "a=; Path=/a b"
        );
    }

    #[test]
    fn empty_path_and_domain_are_omitted() {
        let c = cookie("a").with_path("").with_domain("");
        assert_eq!(c.to_string(), "a=");
        assert_eq!(c.path(), Some(""));
        assert_eq!(c.domain(), Some(""));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let cases = [
            "", "=foo", " foo", ",foo", ";foo", "\tfoo", "\rfoo", "\nfoo", "\x0Bfoo", "\x0Cfoo",
        ];
        for name in cases {
            assert_that!(SetCookie::new(name), err(anything()));
        }
        assert_that!(SetCookie::new(""), err(eq(InvalidNameError::Empty)));
        assert_that!(
            SetCookie::try_from(("a b", "value")),
            err(displays_as(eq(
                "The cookie name `a b` contains a forbidden character: ' '"
            )))
        );
    }

    #[test]
    fn from_name_value_pair() {
        let c = SetCookie::try_from(("foo", "bar")).unwrap();
        assert_eq!(c, cookie("foo").with_value("bar"));
    }

    #[test]
    fn derivations_leave_the_original_untouched() {
        let original = cookie("foo");
        let derived = [
            original.with_value("bar"),
            original.with_expires(TIMESTAMP),
            original.try_with_expires(EXPIRES).unwrap(),
            original.with_path("/foo"),
            original.with_domain(".foo.com"),
            original.with_secure(true),
            original.with_http_only(true),
        ];
        for c in derived {
            assert_ne!(c, original);
        }
        assert_eq!(original, cookie("foo"));
        assert_eq!(original.to_string(), "foo=");
    }

    #[test]
    fn derivations_change_a_single_field() {
        let original = cookie("foo")
            .with_value("bar")
            .with_path("/")
            .with_domain("foo.com")
            .with_expires(TIMESTAMP)
            .with_secure(true);

        let c = original.with_value("baz");
        assert_eq!(c.value(), Some("baz"));
        assert_eq!(c.name(), original.name());
        assert_eq!(c.path(), original.path());
        assert_eq!(c.domain(), original.domain());
        assert_eq!(c.expires(), original.expires());
        assert_eq!(c.secure(), original.secure());
        assert_eq!(c.http_only(), original.http_only());

        assert_eq!(original.without_value().value(), None);
        assert_eq!(original.without_path().path(), None);
        assert_eq!(original.without_domain().domain(), None);
        assert_eq!(original.without_expires().expires(), Expiration::Session);
        assert_eq!(
            original.without_value().with_value("bar"),
            original
        );
    }

    #[test]
    fn flags_are_idempotent() {
        let c = cookie("foo");
        assert_eq!(
            c.with_secure(true).with_secure(true).to_string(),
            c.with_secure(true).to_string()
        );
        assert_eq!(
            c.with_http_only(true).with_http_only(true).to_string(),
            c.with_http_only(true).to_string()
        );
        assert_eq!(c.with_secure(true).with_secure(false), c);
    }

    #[test]
    fn expires_accepts_multiple_time_types() {
        let expected = "foo=; Expires=Wed, 13 Jan 2021 22:23:01 GMT";
        let c = cookie("foo");

        assert_eq!(c.with_expires(None).to_string(), "foo=");
        assert_eq!(c.with_expires(0).to_string(), "foo=");
        assert_eq!(c.try_with_expires("").unwrap().to_string(), "foo=");

        assert_eq!(c.with_expires(TIMESTAMP).to_string(), expected);
        assert_eq!(c.try_with_expires(EXPIRES).unwrap().to_string(), expected);
        assert_eq!(
            c.try_with_expires(EXPIRES.to_string()).unwrap().to_string(),
            expected
        );
        assert_eq!(
            c.with_expires(datetime!(2021-01-13 22:23:01 UTC))
                .to_string(),
            expected
        );
        assert_eq!(
            c.with_expires(datetime!(2021-01-13 17:23:01 -5))
                .to_string(),
            expected
        );
        assert_eq!(
            c.with_expires(SystemTime::UNIX_EPOCH + Duration::from_secs(TIMESTAMP as u64))
                .to_string(),
            expected
        );
    }

    #[test]
    fn an_expiry_at_the_epoch_is_a_session_cookie() {
        let c = cookie("foo");
        assert_eq!(c.with_expires(0).to_string(), "foo=");
        assert_eq!(c.with_expires(SystemTime::UNIX_EPOCH).to_string(), "foo=");
        assert_eq!(c.with_expires(OffsetDateTime::UNIX_EPOCH).to_string(), "foo=");
        assert_eq!(
            c.with_expires(SystemTime::UNIX_EPOCH + Duration::from_secs(1))
                .to_string(),
            "foo=; Expires=Thu, 01 Jan 1970 00:00:01 GMT"
        );
    }

    #[test]
    fn unparseable_expires_is_an_error() {
        let c = cookie("foo");
        assert_that!(
            c.try_with_expires("whenever"),
            err(displays_as(eq(
                "Failed to parse `whenever` as a cookie expiration date"
            )))
        );
    }

    #[test]
    fn expires_is_clamped_to_the_cookie_date_range() {
        let c = cookie("foo")
            .with_expires(OffsetDateTime::UNIX_EPOCH - time::Duration::days(365 * 500));
        assert_eq!(c.to_string(), "foo=; Expires=Mon, 01 Jan 1601 00:00:00 GMT");
    }

    #[test]
    fn into_owned_preserves_everything() {
        let owned: SetCookie<'static> = {
            let name = String::from("foo");
            let c = cookie(&name)
                .with_value("bar")
                .with_path("/")
                .with_domain("foo.com")
                .with_expires(TIMESTAMP)
                .with_secure(true)
                .with_http_only(true);
            c.into_owned()
        };
        assert_eq!(
            owned.to_string(),
            "foo=bar; Domain=foo.com; Path=/; Expires=Wed, 13 Jan 2021 22:23:01 GMT; Secure; HttpOnly"
        );
    }

    #[derive(Debug, Default)]
    struct ResponseSpy {
        headers: Vec<(String, String)>,
    }

    impl AddHeader for ResponseSpy {
        type Output = ResponseSpy;

        fn add_header(mut self, name: &str, value: String) -> ResponseSpy {
            self.headers.push((name.to_owned(), value));
            self
        }
    }

    impl AddHeader for &mut ResponseSpy {
        type Output = usize;

        fn add_header(self, name: &str, value: String) -> usize {
            self.headers.push((name.to_owned(), value));
            self.headers.len()
        }
    }

    #[test]
    fn apply_adds_a_set_cookie_header() {
        let c = cookie("foo").with_value("bar");

        let response = c.apply(ResponseSpy::default());
        assert_eq!(
            response.headers,
            vec![("Set-Cookie".to_string(), "foo=bar".to_string())]
        );
    }

    #[test]
    fn apply_returns_what_the_response_returns() {
        let mut response = ResponseSpy::default();
        assert_eq!(cookie("foo").with_value("bar").apply(&mut response), 1);
        assert_eq!(cookie("baz").apply(&mut response), 2);
        assert_eq!(
            response.headers,
            vec![
                ("Set-Cookie".to_string(), "foo=bar".to_string()),
                ("Set-Cookie".to_string(), "baz=".to_string()),
            ]
        );
    }
}
