//! Typed record façade over a table.
//!
//! A [`Record`] is a serde-mapped struct whose key attributes are found by
//! matching the table's key schema against its storage names. [`Table`] binds a
//! record type to a table and exposes typed CRUD, query and batch operations.
//!
//! ```rust,no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_mapper::{
//!     common::key::KeyValues,
//!     model::{Record, Table, table::QueryOptions},
//!     write::update_item::Updates,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! dynamodb_mapper::record! {
//!     #[derive(Deserialize, Serialize)]
//!     struct Order => OrderAttributes {
//!         user_id: String,
//!         order_id: String,
//!         status: String,
//!     }
//! }
//!
//! # async fn example(client: Client) -> dynamodb_mapper::error::Result<()> {
//! let orders: Table<Order> = Table::new(client, "orders");
//! let attr = Order::attr();
//!
//! orders
//!     .update_item(
//!         KeyValues::composite("user-1", "order-1"),
//!         Updates::new().set(&attr.status(), "shipped"),
//!         Some(attr.status().eq("pending")),
//!     )
//!     .await?;
//!
//! let page = orders
//!     .query(
//!         "user-1",
//!         QueryOptions {
//!             sort_key_condition: Some(attr.order_id().begins_with("order-")),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! println!("{} orders", page.items.len());
//! # Ok(())
//! # }
//! ```

use serde::{Serialize, de::DeserializeOwned};
use std::any;

/// Buffered batch writes of records.
pub mod batch_writer;

/// Table handle bound to a record type.
pub mod table;

pub use table::Table;

/// A struct persisted as one item.
///
/// Serialization goes through `serde_dynamo`, so `#[serde(rename)]` sets the
/// storage name of a field; [`record!`](crate::record) emits it from the
/// field's declared alias. The fields whose storage names match the table's
/// partition and sort key attributes carry the record's key.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Typed attribute accessor, usually generated with [`record!`](crate::record).
    type Attributes: Default;

    /// Attribute accessor of this record type.
    fn attr() -> Self::Attributes {
        Self::Attributes::default()
    }

    /// Name reported in errors, the unqualified type name by default.
    fn model_name() -> &'static str {
        let name = any::type_name::<Self>();
        let path = name.split('<').next().unwrap_or(name);
        path.rsplit("::").next().unwrap_or(path)
    }
}
