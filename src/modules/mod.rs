//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the upstream assistants client and the local upload staging store.

pub mod openai;
pub mod staging;
