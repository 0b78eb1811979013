//! These models represent the objects passed to and from the provider adapters
//!
//! There are a few related formats we need to interact with:
//! - openai-style messages/tools, sent over the wire to openai-compatible endpoints
//! - anthropic messages/tools, sent over the wire to the anthropic messages API
//! - the caller-facing generic conversation and tool descriptors
//!
//! The wire formats are produced on demand by the conversion helpers in
//! `providers::utils`; the structs here are the internal representation and
//! deliberately match neither provider exactly.
pub mod message;
pub mod tool;
