//! App Proxy request authentication.
//!
//! # Modules
//!
//! - [`params`] - Parameter set and its canonical signing string
//! - [`signature`] - Digest schemes and the [`ProxySigner`]
//! - [`identity`] - Shop/customer resolution into a [`VerifiedRequest`]
//! - [`pipeline`] - Typestate chain tying the steps together in order

pub mod error;
pub mod identity;
pub mod params;
pub mod pipeline;
pub mod signature;

pub use error::ProxyAuthError;
pub use identity::VerifiedRequest;
pub use params::{CUSTOMER_ID_PARAM, ProxyParams, SHOP_PARAM, SIGNATURE_PARAM};
pub use pipeline::{ProxyRequest, SignatureChecked, Unverified, authenticate};
pub use signature::{ProxySigner, SignatureMode, UnknownSignatureMode, compute_digest};
