#![deny(missing_docs)]

//! # DynamoDB Mapper
//!
//! A typed object mapper for Amazon DynamoDB with a composable condition algebra.
//!
//! ## Overview
//!
//! Records are plain serde structs bound to a table through [`model::Table`]:
//! - Key attributes are discovered from the table description and cached per record type and table
//! - Conditions are built from typed attribute handles and combined with `&`, `|` and `!`
//! - Expressions, placeholders and value maps are generated for every request
//! - Store failures are mapped onto a small set of [`error::Error`] variants
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_mapper::{common::key::KeyValues, model::{Record, Table}};
//! use serde::{Deserialize, Serialize};
//!
//! dynamodb_mapper::record! {
//!     #[derive(Deserialize, Serialize)]
//!     struct User => UserAttributes {
//!         id: String,
//!         age: u32,
//!     }
//! }
//!
//! # async fn example(client: Client) -> dynamodb_mapper::error::Result<()> {
//! let users: Table<User> = Table::new(client, "users");
//! let attr = User::attr();
//!
//! // Fails with `Error::ConditionCheckFailed` when an adult with this id already exists.
//! users
//!     .save(
//!         &User { id: "1".to_string(), age: 30 },
//!         Some(attr.id().not_exists() | attr.age().lt(18_u32)),
//!     )
//!     .await?;
//! let user = users.get_item(KeyValues::partition("1"), false).await?;
//! assert!(user.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Conditions, attribute handles, expressions, keys and schemas
//! - [`mod@model`] - Record trait, typed table handle and batch writer
//! - [`mod@read`] - Low-level read operations (GetItem, Query)
//! - [`mod@write`] - Low-level write operations (PutItem, UpdateItem, DeleteItem, BatchWriteItem)
//! - [`mod@error`] - Error type shared by every operation

/// Conditions, attribute handles, expression building, keys and schemas.
pub mod common;

/// Error type and store error mapping.
pub mod error;

/// Typed records and the table handle.
pub mod model;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions, one page or all pages
pub mod read;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Setting attributes of existing items
/// - Deleting items by key
/// - Batch writing multiple items
pub mod write;
