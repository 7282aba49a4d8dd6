//! Shared building blocks of every store operation.
//!
//! This module provides the condition algebra, typed attribute handles, the
//! expression builder that turns both into placeholder-based expressions, and
//! the key and table schema types used to address items.

/// Condition algebra for key conditions, filters and conditional writes.
pub mod condition;

/// Compilation of conditions and updates into expression strings.
pub mod expression;

/// Typed attribute handles and the `record!` macro.
pub mod field;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

/// Table and index key layouts, and their per-type cache.
pub mod schema;

/// Encoding of literal values into attribute values.
pub mod value;
