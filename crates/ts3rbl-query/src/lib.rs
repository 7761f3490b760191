//! TeamSpeak 3 ServerQuery client.
//!
//! This crate provides [`QueryClient`], a line protocol client for the
//! ServerQuery interface, and implements [`ts3rbl_core::QuerySession`] for it.

mod client;
mod config;
mod error;
mod session;
pub mod codec;

pub use client::{QueryClient, QueryClientBuilder};
pub use codec::Command;
pub use config::*;
pub use error::{QueryError, QueryResult};
