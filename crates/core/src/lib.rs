//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by all RocketShoes components:
//! - `cart` - Cart state management library (catalog client, durable stores)
//! - `cli` - Command-line host driving the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O,
//! no HTTP clients, no persistence. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog products and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
