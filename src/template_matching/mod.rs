//! Template matching module for locating reference images on screen
//!
//! This module provides:
//! - A template store resolving `{n}.png` names under a templates root
//! - Search regions that constrain a poll to part of the screen
//! - Zero-mean normalized cross-correlation with a fixed confidence threshold
//! - Deterministic tie-breaking between equally good placements
pub mod error;
pub mod matcher;
pub mod region;
pub mod store;
pub mod types;


pub use error::{TemplateError, TemplateResult};
pub use matcher::TemplateMatcher;
pub use region::SearchRegion;
pub use store::TemplateStore;
pub use types::{Match, ScoredPlacement, Template};
