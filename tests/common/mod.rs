#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use simplesql::prelude::*;

/// In-memory sink for `tracing` output of the current thread.
#[derive(Clone, Default)]
pub struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    /// Route this thread's events up to `debug` into the buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|out| String::from_utf8_lossy(&out).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut out) = self.0.lock() {
            out.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderModel {
    pub order_id: Option<i64>,
    pub name: String,
    pub products: Option<Vec<Value>>,
    pub details: Option<Map<String, Value>>,
}

impl OrderModel {
    pub fn new(name: &str, products: Option<Value>, details: Value) -> Self {
        Self {
            order_id: None,
            name: name.to_string(),
            products: products.and_then(|p| p.as_array().cloned()),
            details: details.as_object().cloned(),
        }
    }
}

impl Record for OrderModel {
    fn table_name() -> &'static str {
        "OrderModel"
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("order_id", ColumnType::integer())
                .not_null()
                .primary_key()
                .auto_increment(),
            FieldDescriptor::new("name", ColumnType::varchar(50)),
            FieldDescriptor::new("products", ColumnType::object()),
            FieldDescriptor::new("details", ColumnType::object()),
        ]
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("order_id", FieldValue::auto(self.order_id)),
            ("name", FieldValue::of(self.name.as_str())),
            ("products", FieldValue::of(self.products.clone())),
            ("details", FieldValue::of(self.details.clone())),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SimpleSqlError> {
        Ok(Self {
            order_id: row.value("order_id")?,
            name: row.value("name")?,
            products: row.value("products")?,
            details: row.value("details")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

impl Product {
    pub fn new(id: i64, name: &str, price: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
        }
    }
}

impl Record for Product {
    fn table_name() -> &'static str {
        "Product"
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", ColumnType::integer())
                .not_null()
                .primary_key(),
            FieldDescriptor::new("name", ColumnType::varchar(50)),
            FieldDescriptor::new("price", ColumnType::integer()),
        ]
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::of(self.id)),
            ("name", FieldValue::of(self.name.as_str())),
            ("price", FieldValue::of(self.price)),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SimpleSqlError> {
        Ok(Self {
            id: row.value("id")?,
            name: row.value("name")?,
            price: row.value("price")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

impl Record for Customer {
    fn table_name() -> &'static str {
        "Customer"
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", ColumnType::integer())
                .not_null()
                .primary_key(),
            FieldDescriptor::new("name", ColumnType::varchar(50)).unique(),
        ]
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::of(self.id)),
            ("name", FieldValue::of(self.name.as_str())),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SimpleSqlError> {
        Ok(Self {
            id: row.value("id")?,
            name: row.value("name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: i64,
    pub customer_id: i64,
    pub item: String,
}

impl Purchase {
    pub fn table_options() -> TableOptions {
        TableOptions::new().foreign_key(
            ForeignKey::new("customer_id", "Customer", "id")
                .on_delete_cascade()
                .on_update_cascade(),
        )
    }
}

impl Record for Purchase {
    fn table_name() -> &'static str {
        "Purchase"
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", ColumnType::integer())
                .not_null()
                .primary_key(),
            FieldDescriptor::new("customer_id", ColumnType::integer()).not_null(),
            FieldDescriptor::new("item", ColumnType::text(40)),
        ]
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::of(self.id)),
            ("customer_id", FieldValue::of(self.customer_id)),
            ("item", FieldValue::of(self.item.as_str())),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SimpleSqlError> {
        Ok(Self {
            id: row.value("id")?,
            customer_id: row.value("customer_id")?,
            item: row.value("item")?,
        })
    }
}
