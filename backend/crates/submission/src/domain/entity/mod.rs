//! Entity Module

pub mod canonical_post;
pub mod submission;
