//! Trait definitions for Status.io operations.
//!
//! Entity types implement the traits their endpoints support. Every
//! implementation is a thin call into [`StatusioClient::invoke`].
//!
//! [`StatusioClient::invoke`]: crate::StatusioClient::invoke

mod get;
mod list;
mod update;

pub use get::Get;
pub use list::List;
pub use update::Update;
