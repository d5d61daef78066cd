//! In-memory document tree
//!
//! A small arena-backed stand-in for a browser's document: element lookup,
//! content and style mutation, class lists, form values, listener
//! registration and parent/child/sibling navigation.
//!
//! ## Core Design
//!
//! ```text
//! JSON fixture → DocumentLoader → DomArena (owned) ← Document trait ← callers
//!                                     ↓
//!                              NodeId (u32 handle)
//! ```
//!
//! No HTML parsing, layout or event propagation. Inner content is text.

pub mod arena;
pub mod document;
pub mod error;
pub mod loader;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::Document;
pub use error::{DomError, Result};
pub use loader::DocumentLoader;
pub use serializer::{DomSerializer, SerializerConfig};
pub use types::*;
