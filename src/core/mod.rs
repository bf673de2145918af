//! Core library components.
//!
//! Credential definitions, their persisted form, and the fetch-then-decrypt
//! pipeline that resolves a password.

pub mod binding;
pub mod client;
pub mod config;
pub mod constants;
pub mod decrypt;
pub mod domain;
pub mod fetch;
pub mod record;
