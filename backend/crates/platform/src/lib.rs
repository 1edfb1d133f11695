//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random secrets and base64 secret decoding
//! - Signed, expiring claim tokens (HS256 JWT)
//! - Client IP extraction
//! - URL slug generation
//! - SMTP mail transport

pub mod client;
pub mod crypto;
pub mod mail;
pub mod slug;
pub mod token;
