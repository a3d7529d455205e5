//! Purchase-order data sources.
//!
//! Storage may hold either a list of records or a map of identifier to
//! record. Records without a usable total are skipped rather than failing
//! the whole load.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::purchase_order::PurchaseOrder;

/// Result type for purchase-order storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for purchase-order data sources.
pub trait PurchaseOrderSource {
    /// Load every purchase order, in storage order.
    fn load(&self) -> Result<Vec<PurchaseOrder>>;
}

/// Purchase orders held in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonPurchaseOrderStore {
    path: PathBuf,
}

impl JsonPurchaseOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PurchaseOrderSource for JsonPurchaseOrderStore {
    fn load(&self) -> Result<Vec<PurchaseOrder>> {
        let content = std::fs::read_to_string(&self.path)?;
        let orders = parse_purchase_orders(&content)?;
        debug!(
            "Loaded {} purchase orders from {}",
            orders.len(),
            self.path.display()
        );
        Ok(orders)
    }
}

/// Purchase orders held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPurchaseOrders {
    orders: Vec<PurchaseOrder>,
}

impl InMemoryPurchaseOrders {
    pub fn new(orders: Vec<PurchaseOrder>) -> Self {
        Self { orders }
    }
}

impl PurchaseOrderSource for InMemoryPurchaseOrders {
    fn load(&self) -> Result<Vec<PurchaseOrder>> {
        Ok(self.orders.clone())
    }
}

/// Parse purchase orders from JSON text.
///
/// A list yields its records in order. A map yields its values in file
/// order, with the key filling in a missing `po_number`. Anything else is a
/// [`StorageError::Format`].
pub fn parse_purchase_orders(json: &str) -> Result<Vec<PurchaseOrder>> {
    let value: Value = serde_json::from_str(json)?;

    let records: Vec<(Option<String>, Value)> = match value {
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        other => return Err(StorageError::Format(json_kind(&other))),
    };

    let mut orders = Vec::with_capacity(records.len());
    for (index, (key, record)) in records.into_iter().enumerate() {
        match PurchaseOrder::from_value(record) {
            Some(mut po) => {
                if po.po_number.is_none() {
                    po.po_number = key;
                }
                orders.push(po);
            }
            None => {
                let id = key.unwrap_or_else(|| format!("#{}", index));
                warn!("Skipping malformed purchase order record {}", id);
            }
        }
    }

    Ok(orders)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
