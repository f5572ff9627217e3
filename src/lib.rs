//! Client for the [Xolphin](https://www.xolphin.com/) certificate management REST API.
//!
//! The API is used to order, renew and download SSL/TLS certificates and to look up products and
//! domain information.
//!
//! # Usage
//!
//! All calls go through a [`Client`], which holds the API credentials and picks the production or
//! test deployment once at construction.
//!
//! ```no_run
//! use xolphin::{certificate::CertificateFormat, Client};
//!
//! # async fn run() -> xolphin::Result<()> {
//! let client = Client::new("user", "password", false)?;
//!
//! let products = client.support().products(1).await?;
//! for product in &products {
//!     println!("{}: {} {}", product.id, product.brand, product.name);
//! }
//!
//! let cert = client
//!     .certificate()
//!     .download(960000031, CertificateFormat::Crt)
//!     .await?
//!     .bytes()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Resources not covered by a typed facade can be reached with [`Client::get()`],
//! [`Client::post()`] and [`Client::download()`]. Pass the returned [`RawPayload`] to
//! [`decode_record()`] or [`ListEnvelope::decode()`] to get typed records.
//!
//! # Errors
//!
//! Every call returns a single [`Error`]. Errors reported by the server, whether as a non-2xx
//! status or as an `errorCode` inside a successful response, carry an [`ApiError`] with the
//! server's code and message. Nothing is retried automatically.
//!
//! # Rate Limits
//!
//! The API reports a request quota on every response. The client mirrors the last reported
//! values; see [`Client::rate_state()`]. Until the first call completes, the quota is assumed to
//! be `1/1`.
//!
//! ## Use The Test Environment For Development!
//!
//! Orders placed against the test API are never issued or invoiced. See [`Environment::Test`].

#![deny(rust_2018_idioms, nonstandard_style, future_incompatible)]

mod client;
mod config;
mod envelope;
mod error;
mod rate;

pub mod api;
pub mod certificate;
pub mod multipart;
pub mod request;
pub mod support;


pub use crate::{
    client::{Client, Download},
    config::{ClientConfig, Environment, ProxyConfig, API_VERSION, TEST_PROXY_ENV},
    envelope::{check, decode_record, ListEnvelope, RawPayload},
    error::{ApiError, Error, ErrorCode, Result, TransportError},
    rate::RateState,
};
