//! Infrastructure Layer
//!
//! Storage, sanitizing and mail delivery.

pub mod memory;
pub mod notifier;
pub mod postgres;
pub mod sanitizer;
