//! Wishlist Proxy Core - request authentication and shared types.
//!
//! This crate provides what the wishlist service needs to trust a request
//! forwarded by the storefront's App Proxy. It is shared by:
//! - `server` - HTTP service storing per-customer wishlists
//! - `cli` - Command-line tools for migrations and request signing
//!
//! # Architecture
//!
//! The core crate is pure: no I/O, no database access, no HTTP. Signing and
//! verification are deterministic functions of the parameters and the
//! shared secret, which keeps them easy to test exhaustively.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for shop domains and customer ids
//! - [`proxy`] - Canonical encoding, signature verification, identity resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod proxy;
pub mod types;

pub use proxy::{
    ProxyAuthError, ProxyParams, ProxyRequest, ProxySigner, SignatureMode, VerifiedRequest,
    authenticate,
};
pub use types::*;
