//! Domain Services

pub mod anchor;
pub mod content_policy;
