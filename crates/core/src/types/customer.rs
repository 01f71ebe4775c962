//! Storefront customer identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CustomerId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdError {
    /// The input contains something other than ASCII digits.
    #[error("customer id must contain only digits")]
    NotNumeric,
    /// The value does not fit into a signed 64-bit column.
    #[error("customer id is out of range")]
    OutOfRange,
}

/// The numeric id of a logged-in storefront customer.
///
/// Parsed from the App Proxy's `logged_in_customer_id` parameter. Only plain
/// decimal digits are accepted (no sign, no whitespace), and the value must
/// fit in an `i64` so it can be stored as an SQLite `INTEGER`.
///
/// ```
/// use wishlist_proxy_core::CustomerId;
///
/// assert_eq!(CustomerId::parse("7").unwrap().as_i64(), 7);
/// assert!(CustomerId::parse("-7").is_err());
/// assert!(CustomerId::parse("7a").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Parse a customer id from its decimal representation.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerIdError::NotNumeric`] for empty input or any
    /// non-digit character, and [`CustomerIdError::OutOfRange`] when the
    /// number exceeds `i64::MAX`.
    pub fn parse(s: &str) -> Result<Self, CustomerIdError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CustomerIdError::NotNumeric);
        }
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| CustomerIdError::OutOfRange)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for CustomerId {
    type Err = CustomerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

#[cfg(feature = "sqlite")]
impl ::sqlx::Type<::sqlx::Sqlite> for CustomerId {
    fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
        <i64 as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &::sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as ::sqlx::Type<::sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Sqlite> for CustomerId {
    fn decode(
        value: ::sqlx::sqlite::SqliteValueRef<'r>,
    ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
        let id = <i64 as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> ::sqlx::Encode<'q, ::sqlx::Sqlite> for CustomerId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<::sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <i64 as ::sqlx::Encode<'q, ::sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_digits() {
        assert_eq!(CustomerId::parse("0").unwrap().as_i64(), 0);
        assert_eq!(
            CustomerId::parse("6207829311").unwrap().as_i64(),
            6_207_829_311
        );
    }

    #[test]
    fn test_parse_rejects_signs_and_whitespace() {
        assert_eq!(CustomerId::parse("+7"), Err(CustomerIdError::NotNumeric));
        assert_eq!(CustomerId::parse("-7"), Err(CustomerIdError::NotNumeric));
        assert_eq!(CustomerId::parse(" 7"), Err(CustomerIdError::NotNumeric));
        assert_eq!(CustomerId::parse("7.0"), Err(CustomerIdError::NotNumeric));
        assert_eq!(CustomerId::parse(""), Err(CustomerIdError::NotNumeric));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(
            CustomerId::parse("9223372036854775808"),
            Err(CustomerIdError::OutOfRange)
        );
        assert!(CustomerId::parse("9223372036854775807").is_ok());
    }
}
