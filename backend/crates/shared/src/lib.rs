//! Shared Kernel - vocabulary shared by every crate in the blog backend
//!
//! This crate contains the "smallest core":
//! - The unified client-facing error type and result alias
//! - Typed identifiers for submissions, posts and accounts
//!
//! Only things whose meaning is stable across the whole platform belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
