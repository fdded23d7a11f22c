//! Default attributes for the cookies set by an application.
//!
//! Check out the [`Config`] struct for more information.
use crate::errors::InvalidNameError;
use crate::SetCookie;

/// `Config` specifies the attributes that every cookie built via [`Config::cookie`]
/// starts with.
///
/// You'll usually load it from your application's configuration (it implements
/// `serde::Deserialize` when the `serde` feature is enabled) and use it to make sure
/// all your cookies are scoped and secured consistently.
///
/// ```rust
/// use set_cookie::config::Config;
///
/// let mut config = Config::default();
/// config.path = Some("/".to_string());
/// config.secure = true;
/// config.http_only = true;
///
/// let cookie = config.cookie("session").unwrap().with_value("abc");
/// assert_eq!(cookie.to_string(), "session=abc; Path=/; Secure; HttpOnly");
///
/// // The defaults can still be overridden for a specific cookie.
/// let cookie = config.cookie("theme").unwrap().with_http_only(false);
/// assert_eq!(cookie.to_string(), "theme=; Path=/; Secure");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The `Path` attribute of new cookies.
    ///
    /// By default, this field is `None`: the attribute is omitted.
    pub path: Option<String>,
    /// The `Domain` attribute of new cookies.
    ///
    /// By default, this field is `None`: the attribute is omitted.
    pub domain: Option<String>,
    /// If `true`, new cookies are marked `Secure`.
    ///
    /// By default, this field is `false`.
    pub secure: bool,
    /// If `true`, new cookies are marked `HttpOnly`.
    ///
    /// By default, this field is `false`.
    pub http_only: bool,
}

impl Config {
    /// Creates a new [`SetCookie`] named `name`, with the attributes specified in `self`.
    ///
    /// It fails if `name` is not a valid cookie name. See [`SetCookie::new`].
    pub fn cookie<'c, N>(&self, name: N) -> Result<SetCookie<'c>, InvalidNameError>
    where
        N: Into<std::borrow::Cow<'c, str>>,
    {
        let mut cookie = SetCookie::new(name)?
            .with_secure(self.secure)
            .with_http_only(self.http_only);
        if let Some(path) = &self.path {
            cookie = cookie.with_path(path.clone());
        }
        if let Some(domain) = &self.domain {
            cookie = cookie.with_domain(domain.clone());
        }
        Ok(cookie)
    }
}
