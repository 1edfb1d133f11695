//! Value Object Module

pub mod credential;
pub mod email;
pub mod locale;
pub mod post_payload;
pub mod submission_kind;
pub mod submission_status;
pub mod submitter_profile;
