//! Core types for the wishlist service.
//!
//! This module provides type-safe wrappers for the identity carried by
//! proxied requests.

pub mod customer;
pub mod shop;

pub use customer::{CustomerId, CustomerIdError};
pub use shop::{ShopDomain, ShopDomainError};
