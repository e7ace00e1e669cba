//! # libgolioth - Rust bindings for the Golioth device SDK
//!
//! Safe wrappers over the C ABI of the Golioth firmware SDK. The native
//! library does all of the protocol work (TLS with PSK or PKI credentials,
//! CoAP, retries, connection management); this crate marshals arguments into
//! the layouts the SDK expects, forwards each call, and turns native result
//! codes into typed errors.
//!
//! ## Features
//!
//! - **Client**: create a client from PSK or PKI credentials and wait for it
//!   to connect
//! - **LightDB**: typed writes (`int`, `bool`, `float`, string, JSON),
//!   serde-serialized structured values, reads and deletes when the SDK
//!   exports them
//! - **Loader**: load the SDK shared library once per process from a
//!   configurable path
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libgolioth::{Client, NativeLibrary, Options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Reading {
//!     key0: i32,
//!     array: [u8; 4],
//! }
//!
//! # fn main() -> Result<(), libgolioth::Error> {
//! let sdk = NativeLibrary::global_from_env()?;
//! let client = Client::connect_psk(sdk, b"device@project", b"secret", Options::default())?;
//!
//! let lightdb = client.lightdb();
//! lightdb.set("counter", 0)?;
//! lightdb.set_structured("structured_data", &Reading { key0: 14, array: [5, 6, 7, 8] })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `std` (default): dynamic loading of the SDK through `libloading`,
//!   environment configuration, [`SharedClient`], `tracing` logs, structured
//!   values of any size through `serde_json`
//! - `tracing`: log through `tracing` without the rest of `std`
//! - `defmt`: log through `defmt` and implement `defmt::Format` for errors
//!
//! Without `std` the crate is `no_std`; supply an [`Sdk`] implementation
//! backed by a statically linked SDK.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
mod fmt;

/// Raw C ABI of the SDK and the [`Sdk`] trait that abstracts it.
pub mod sys;

/// Error and status types.
pub mod error;

/// TLS credentials and their native layout.
pub mod credentials;

/// Timeouts, client options and environment configuration.
pub mod config;

/// Native client lifecycle.
pub mod client;

pub mod lightdb;

/// Shared-library loader.
#[cfg(feature = "std")]
pub mod library;

pub use client::Client;
#[cfg(feature = "std")]
pub use client::SharedClient;
pub use config::{Options, Timeout};
pub use credentials::{AuthType, Credentials};
pub use error::{EncodingError, Error, Status};
#[cfg(feature = "std")]
pub use library::NativeLibrary;
pub use lightdb::{LightDb, Path, Value};
pub use sys::{ClientHandle, Sdk};
