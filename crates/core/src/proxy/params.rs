//! App Proxy query parameters and their canonical signing form.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Name of the parameter carrying the request signature.
pub const SIGNATURE_PARAM: &str = "signature";

/// Name of the parameter carrying the shop domain.
pub const SHOP_PARAM: &str = "shop";

/// Name of the parameter carrying the logged-in customer's id.
pub const CUSTOMER_ID_PARAM: &str = "logged_in_customer_id";

/// Separator used to collapse a repeated parameter into one value.
const MULTI_VALUE_SEPARATOR: char = ',';

/// The parameter set attached to a proxied request.
///
/// Keys are held in a `BTreeMap`, so iteration is always in ascending byte
/// order regardless of the order they arrived in. A key that appears more
/// than once is collapsed into a single value joined with `,`, in arrival
/// order (`a=1&a=2` becomes `a` → `"1,2"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyParams {
    params: BTreeMap<String, String>,
}

impl ProxyParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `application/x-www-form-urlencoded` query string.
    ///
    /// ```
    /// use wishlist_proxy_core::ProxyParams;
    ///
    /// let params = ProxyParams::from_query("shop=a.myshopify.com&ids=1&ids=2&q=a+b");
    /// assert_eq!(params.get("shop"), Some("a.myshopify.com"));
    /// assert_eq!(params.get("ids"), Some("1,2"));
    /// assert_eq!(params.get("q"), Some("a b"));
    /// ```
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Add a value for `key`, appending to any existing value with `,`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.params.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.push(MULTI_VALUE_SEPARATOR);
                existing.push_str(&value);
            }
        }
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    /// Remove `key` and return its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The message that gets signed.
    ///
    /// Every key except `signature`, in ascending byte order, rendered as
    /// `key=value` and concatenated with no separator between pairs.
    ///
    /// ```
    /// use wishlist_proxy_core::ProxyParams;
    ///
    /// let params = ProxyParams::from_query("shop=a.myshopify.com&signature=abc&logged_in_customer_id=7");
    /// assert_eq!(params.canonical_string(), "logged_in_customer_id=7shop=a.myshopify.com");
    /// ```
    #[must_use]
    pub fn canonical_string(&self) -> String {
        let capacity = self
            .params
            .iter()
            .map(|(k, v)| k.len() + v.len() + 1)
            .sum();
        let mut out = String::with_capacity(capacity);
        for (key, value) in self.iter().filter(|(key, _)| *key != SIGNATURE_PARAM) {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Re-encode as a form-urlencoded query string (keys in ascending order).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for ProxyParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}
