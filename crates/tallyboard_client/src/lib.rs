//! HTTP transport, configuration and fetch control for the Tallyboard grid client.
//!
//! [`FetchController`] owns the asynchronous side of a grid: at most one
//! logically current page request, the total-row-count lookup keyed by
//! content hash, and the [`GridData`] snapshot observers subscribe to.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod http;

pub use config::{CONFIG_ENV_BASE_URL, ClientConfig, ClientConfigBuilder, ClientConfigBuilderError};
pub use controller::{FetchController, FetchOutcome, FetchPhase, GridData};
pub use http::HttpCollectionSource;
