//! DNS blacklist (RBL) lookups.
//!
//! [`RblSearch`] asks a set of DNSBL zones about one address concurrently and
//! returns the per-zone listing, implementing [`ts3rbl_core::BlacklistLookup`].

mod error;
pub mod lists;
pub mod query_name;
pub mod resolver;
mod search;

pub use error::{RblError, RblResult};
pub use lists::DEFAULT_LISTS;
pub use resolver::{Answer, HickoryResolver, ZoneResolver};
pub use search::{is_listing_code, RblSearch, DEFAULT_QUERY_TIMEOUT};
