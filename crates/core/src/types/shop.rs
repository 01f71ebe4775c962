//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty or only whitespace.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The tenant a wishlist entry belongs to, as forwarded by the App Proxy
/// in the `shop` parameter (e.g. `a.myshopify.com`).
///
/// The value is stored as received, minus surrounding whitespace. No attempt
/// is made to check it against a hostname grammar: the signature already
/// vouches for it, and the platform owns the format.
///
/// ## Examples
///
/// ```
/// use wishlist_proxy_core::ShopDomain;
///
/// let shop = ShopDomain::parse(" a.myshopify.com ").unwrap();
/// assert_eq!(shop.as_str(), "a.myshopify.com");
///
/// assert!(ShopDomain::parse("").is_err());
/// assert!(ShopDomain::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a DNS name.
    pub const MAX_LENGTH: usize = 253;

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ShopDomainError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let shop = ShopDomain::parse("  b.myshopify.com\n").unwrap();
        assert_eq!(shop.as_str(), "b.myshopify.com");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ShopDomain::parse(""), Err(ShopDomainError::Empty));
        assert_eq!(ShopDomain::parse(" \t "), Err(ShopDomainError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(ShopDomain::MAX_LENGTH + 1);
        assert_eq!(
            ShopDomain::parse(&long),
            Err(ShopDomainError::TooLong {
                max: ShopDomain::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_display_matches_input() {
        let shop = ShopDomain::parse("c.myshopify.com").unwrap();
        assert_eq!(shop.to_string(), "c.myshopify.com");
    }
}
