//! concierge-api: wire types and HTTP client for the assistant backend
//!
//! The backend routes each request to a specialized agent and answers with
//! agent-tagged text, cited sources and metadata. This crate models those
//! payloads and talks to the `/chat`, `/upload`, `/agents` and
//! `/quick-actions` endpoints.

pub mod client;
pub mod document;
pub mod error;
pub mod types;

pub use client::{ChatClient, ClientConfig, DEFAULT_BASE_URL};
pub use document::{DocumentKind, FileUpload};
pub use error::{Error, Result};
pub use types::*;
