//! Application Layer - Use Cases
//!
//! Orchestrates domain logic and infrastructure.

pub mod account_token;
pub mod authorize;
pub mod config;
pub mod delete;
pub mod edit_token;
pub mod notify;
pub mod publish;
pub mod query;
pub mod reconcile;
pub mod revise_content;
pub mod submit;
pub mod transition_status;
