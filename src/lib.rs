//! A crate to build the `Set-Cookie` header of an HTTP response.
//!
//! # Overview
//!
//! [`SetCookie`] is an immutable value that holds a cookie's name, value, and
//! attributes (`Expires`, `Path`, `Domain`, `Secure`, `HttpOnly`).
//!
//! - Names are validated when the cookie is created
//! - Names and values are percent-encoded when the cookie is rendered
//! - Attributes are always rendered in the same order
//! - Expiration dates can be given as a timestamp, a date-time or a string
//!
//! # Non-goals
//!
//! This crate is not designed to handle cookies on the client side.
//! It doesn't provide any logic to parse `Cookie` or `Set-Cookie` headers.
//!
//! # Quickstart
//!
//! ```rust
//! use set_cookie::SetCookie;
//!
//! // A cookie needs a valid name...
//! let cookie = SetCookie::new("Foo").unwrap();
//! assert_eq!(cookie.to_string(), "Foo=");
//!
//! // ...and you can derive new cookies from it, one attribute at a time.
//! // The original cookie is never modified.
//! let session = cookie
//!     .with_value("Bar/Baz")
//!     .with_path("/quux")
//!     .with_domain(".foo.com")
//!     .try_with_expires("Wed, 13 Jan 2021 22:23:01 GMT")
//!     .unwrap()
//!     .with_secure(true)
//!     .with_http_only(true);
//! assert_eq!(
//!     session.to_string(),
//!     "Foo=Bar%2FBaz; Domain=.foo.com; Path=/quux; Expires=Wed, 13 Jan 2021 22:23:01 GMT; Secure; HttpOnly"
//! );
//! assert_eq!(cookie.to_string(), "Foo=");
//! ```
//!
//! ## Sending cookies
//!
//! Use [`SetCookie::apply`] to add the `Set-Cookie` header to a response.
//! It works with any type that implements [`AddHeader`], including the response
//! types of the [`http`](https://docs.rs/http) crate (behind the `http` feature).
//!
//! ```rust
//! # #[cfg(feature = "http")]
//! # {
//! use set_cookie::SetCookie;
//!
//! let response = http::Response::builder().status(200);
//! let response = SetCookie::new("name")
//!     .unwrap()
//!     .with_value("a value")
//!     .apply(response)
//!     .body(())
//!     .unwrap();
//! assert_eq!(response.headers()["set-cookie"], "name=a+value");
//! # }
//! ```
//!
//! [`AddHeader`]: crate::response::AddHeader

pub mod config;
mod encoding;
mod expiration;
mod name;
mod set_cookie;

pub mod response;

pub use crate::expiration::Expiration;
pub use crate::set_cookie::SetCookie;
pub use response::SET_COOKIE;
pub use time;

/// Errors that can occur when using `set_cookie`.
pub mod errors {
    pub use crate::expiration::ParseExpirationError;
    pub use crate::name::InvalidNameError;
    #[cfg(feature = "http")]
    pub use crate::response::InjectHeaderError;
}
