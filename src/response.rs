//! Attach [`SetCookie`]s to outgoing responses.
//!
//! This crate doesn't depend on a specific HTTP framework. Any response type can receive
//! cookies, via [`SetCookie::apply`], as long as it implements [`AddHeader`].
//!
//! Implementations for the types in the [`http`](https://docs.rs/http) crate are provided
//! when the `http` feature is enabled (it is by default).
//!
//! [`SetCookie`]: crate::SetCookie
//! [`SetCookie::apply`]: crate::SetCookie::apply

/// The name of the header used to send cookies to the client.
pub const SET_COOKIE: &str = "Set-Cookie";

/// A response, or a part of it, that can have headers added to it.
///
/// `add_header` takes `self` by value so that both mutable and immutable response
/// designs can be supported:
///
/// - Immutable responses return a new response with the extra header.
/// - Mutable responses implement the trait for `&mut Response` and return the outcome
///   of the operation.
///
/// Implementations must **add** the header, preserving any existing header with the
/// same name: a response can carry many `Set-Cookie` headers.
///
/// # Example
///
/// ```rust
/// use set_cookie::response::AddHeader;
/// use set_cookie::SetCookie;
///
/// /// An immutable response.
/// #[derive(Default)]
/// struct Response {
///     headers: Vec<(String, String)>,
/// }
///
/// impl AddHeader for Response {
///     type Output = Response;
///
///     fn add_header(self, name: &str, value: String) -> Response {
///         let mut headers = self.headers;
///         headers.push((name.to_string(), value));
///         Response { headers }
///     }
/// }
///
/// let cookie = SetCookie::new("foo").unwrap().with_value("bar");
/// let response = cookie.apply(Response::default());
/// assert_eq!(response.headers, vec![("Set-Cookie".to_string(), "foo=bar".to_string())]);
/// ```
pub trait AddHeader {
    /// What `add_header` returns.
    type Output;

    /// Add a header called `name`, with value `value`.
    fn add_header(self, name: &str, value: String) -> Self::Output;
}

#[cfg(feature = "http")]
mod http_adapters {
    use super::AddHeader;
    use http::header::{HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
    use http::{HeaderMap, Response};
    use std::fmt;

    impl AddHeader for &mut HeaderMap {
        type Output = Result<(), InjectHeaderError>;

        fn add_header(self, name: &str, value: String) -> Self::Output {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                InjectHeaderError::InvalidName {
                    name: name.to_owned(),
                    source: e,
                }
            })?;
            let header_value = match HeaderValue::from_str(&value) {
                Ok(v) => v,
                Err(e) => return Err(InjectHeaderError::InvalidValue { value, source: e }),
            };
            self.append(header_name, header_value);
            Ok(())
        }
    }

    impl<B> AddHeader for Response<B> {
        type Output = Result<Response<B>, InjectHeaderError>;

        fn add_header(mut self, name: &str, value: String) -> Self::Output {
            AddHeader::add_header(self.headers_mut(), name, value)?;
            Ok(self)
        }
    }

    impl AddHeader for http::response::Builder {
        /// Invalid headers are reported by the builder when the response is built.
        type Output = http::response::Builder;

        fn add_header(self, name: &str, value: String) -> Self::Output {
            self.header(name, value)
        }
    }

    #[derive(Debug)]
    #[non_exhaustive]
    /// The error returned when adding a header to one of the response types
    /// in the `http` crate fails.
    pub enum InjectHeaderError {
        /// The header name is not a valid HTTP header name.
        InvalidName {
            /// The rejected header name.
            name: String,
            /// Why `http` rejected it.
            source: InvalidHeaderName,
        },
        /// The header value is not a valid HTTP header value.
        ///
        /// Cookie names and values are always percent-encoded, but the `Path` and
        /// `Domain` attributes are not: they might contain forbidden characters,
        /// e.g. a line feed.
        InvalidValue {
            /// The rejected header value, i.e. the rendered `Set-Cookie` string.
            value: String,
            /// Why `http` rejected it.
            source: InvalidHeaderValue,
        },
    }

    impl fmt::Display for InjectHeaderError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                InjectHeaderError::InvalidName { name, .. } => {
                    write!(f, "`{}` is not a valid header name", name.escape_debug())
                }
                InjectHeaderError::InvalidValue { value, .. } => write!(
                    f,
                    "`{}` is not a valid header value",
                    value.escape_debug()
                ),
            }
        }
    }

    impl std::error::Error for InjectHeaderError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                InjectHeaderError::InvalidName { source, .. } => Some(source),
                InjectHeaderError::InvalidValue { source, .. } => Some(source),
            }
        }
    }
}

#[cfg(feature = "http")]
pub use http_adapters::InjectHeaderError;
