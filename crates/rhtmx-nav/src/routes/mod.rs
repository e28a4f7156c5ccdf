//! Route table, patterns and the typed route catalog
//!
//! - `pattern`: `:placeholder` templates, path generation and matching
//! - `table`: (section, name) → path/pattern + metadata
//! - `catalog`: compile-time checked keys for the standard application routes

use std::collections::BTreeMap;

pub mod catalog;
pub mod pattern;
pub mod table;

pub use catalog::{AdminRoute, DynamicRoute, PublicRoute, StaticRoute, UserRoute};
pub use pattern::{PatternError, RoutePattern, Segment, PLACEHOLDER_MARKER};
pub use table::{
    default_static_path, DynamicEntry, ResolvedRoute, RouteKind, RouteMetadata, RouteRef,
    RouteTable, StaticEntry,
};

/// Placeholder name → value
pub type Params = BTreeMap<String, String>;
