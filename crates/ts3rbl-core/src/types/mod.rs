mod blacklist;
mod client;
mod event;
mod moderation;

pub use blacklist::*;
pub use client::*;
pub use event::*;
pub use moderation::*;
