use std::fmt;

/// Characters that can never appear in a cookie name.
const FORBIDDEN: [char; 9] = ['=', ',', ';', ' ', '\t', '\r', '\n', '\x0B', '\x0C'];

/// Check that `name` can be used as the name of a cookie.
pub(crate) fn validate(name: &str) -> Result<(), InvalidNameError> {
    if name.is_empty() {
        tracing::debug!("Rejected a cookie with an empty name");
        return Err(InvalidNameError::Empty);
    }
    if let Some(character) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        tracing::debug!(cookie.name = name, "Rejected a cookie name with a forbidden character");
        return Err(InvalidNameError::ForbiddenCharacter {
            name: name.to_owned(),
            character,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// The error returned by [`SetCookie::new()`] when the cookie name is not valid.
///
/// A cookie name must not be empty, and it must not contain any of `=`, `,`, `;`,
/// space, tab, carriage return, line feed, vertical tab or form feed.
///
/// [`SetCookie::new()`]: crate::SetCookie::new
pub enum InvalidNameError {
    /// The name is an empty string.
    Empty,
    /// The name contains a character that is not allowed in cookie names.
    ForbiddenCharacter {
        /// The rejected name.
        name: String,
        /// The first forbidden character found in `name`.
        character: char,
    },
}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidNameError::Empty => write!(f, "The name of a cookie cannot be empty"),
            InvalidNameError::ForbiddenCharacter { name, character } => write!(
                f,
                "The cookie name `{}` contains a forbidden character: {:?}",
                name.escape_debug(),
                character
            ),
        }
    }
}

impl std::error::Error for InvalidNameError {}
