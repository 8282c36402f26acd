//! # scenelink-reflect
//!
//! The generic reflection bridge.
//!
//! - **Selector / resolver**: turn `{names, paths, filter}` into live entity ids
//! - **Property bridge**: read and write named properties with per-kind coercion
//! - **Suggestions**: edit-distance ranking for unknown property names

#![deny(unsafe_code)]

pub mod bridge;
pub mod coerce;
pub mod resolver;
pub mod selector;
pub mod suggest;

pub use bridge::{Access, DEFAULT_SUGGESTION_LIMIT, PropertyBridge, find_property};
pub use resolver::{resolve, resolve_sorted, sort_by_label};
pub use selector::{Filter, PropertyMatch, Selector};
pub use suggest::{Suggestion, edit_distance, suggest};
