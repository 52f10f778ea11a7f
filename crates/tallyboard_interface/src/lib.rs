//! Trait definitions for the Tallyboard grid client.
//!
//! The grid talks to the outside world through two seams: a
//! [`CollectionSource`] that serves pages, counts and filter options, and an
//! [`AddressBar`] that holds the bookmarkable query string.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod address_bar;
mod collection_source;

pub use address_bar::AddressBar;
pub use collection_source::CollectionSource;
