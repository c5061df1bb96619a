//! Image board API client and types.
//!
//! This module provides the interface for talking to a Moebooru-style board.

mod client;
mod error;
mod types;

pub use client::{BooruClient, DEFAULT_SUGGESTION_LIMIT};
pub use error::ApiError;
pub use types::{Post, Tag, TagType};
