//! Order-book walkthrough: create a table, insert orders with list and map columns, delete
//! one, update one, and print what comes back.
//!
//! ```text
//! cargo run --example orders -- --backend sqlite --path orders.db
//! cargo run --example orders -- --backend postgres --host localhost --user postgres --database orders
//! ```

use clap::Parser;
use serde_json::{Map, Value, json};
use simplesql::prelude::*;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(about = "Order-book walkthrough over SQLite or PostgreSQL")]
struct Args {
    #[arg(long, value_enum, default_value = "sqlite")]
    backend: DatabaseType,
    /// SQLite database file
    #[arg(long, default_value = "orders.db")]
    path: String,
    #[arg(long, default_value = "localhost")]
    host: String,
    #[arg(long, default_value_t = 5432)]
    port: u16,
    #[arg(long, default_value = "postgres")]
    user: String,
    #[arg(long)]
    password: Option<String>,
    /// PostgreSQL database, created when missing
    #[arg(long, default_value = "orders")]
    database: String,
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone)]
struct OrderModel {
    order_id: Option<i64>,
    name: String,
    products: Option<Vec<Value>>,
    details: Option<Map<String, Value>>,
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

fn order(name: &str, products: Value, details: Value) -> OrderModel {
    OrderModel {
        order_id: None,
        name: name.to_string(),
        products: products.as_array().cloned(),
        details: details.as_object().cloned(),
    }
}

fn options(args: &Args) -> ConnectOptions {
    match args.backend {
        DatabaseType::Sqlite => ConnectOptions::Sqlite(SqliteOptions::new(args.path.clone())),
        DatabaseType::Postgres => {
            let mut opts = PostgresOptions::new(&args.host, &args.user, &args.database);
            opts.port = args.port;
            opts.password.clone_from(&args.password);
            opts.create_and_ignore = true;
            ConnectOptions::Postgres(opts)
        }
    }
}

async fn walkthrough(args: &Args) -> Result<(), SimpleSqlError> {
    let mut db = connect(options(args)).await?;

    db.create_table::<OrderModel>(&TableOptions::default())
        .await?;
    for o in [
        order(
            "myorder",
            json!(["banana", "apple", "milk"]),
            json!({"amount": 3, "price": 100}),
        ),
        order("myorder1", Value::Null, json!({"amount": 0, "price": 0})),
        order(
            "myorder2",
            json!(["meat", "apple", "bread"]),
            json!({"amount": 3, "price": 150}),
        ),
        order(
            "myorder3",
            json!(["kiwi", "cookies"]),
            json!({"amount": 2, "price": 60}),
        ),
    ] {
        db.insert(&o).await?;
    }
    db.commit().await?;

    db.query_delete_by::<OrderModel>("name", "myorder1")
        .await?;

    let orders: Vec<OrderModel> = db.query_all().await?;
    for o in &orders {
        println!("{:?} {}", o.order_id, o.name);
        if let Some(products) = &o.products {
            for p in products {
                println!("  {p}");
            }
        }
        if let Some(price) = o.details.as_ref().and_then(|d| d.get("price")) {
            println!("  price: {price}");
        }
        println!("**********************");
    }

    // The first non-key field (name) selects the row to update.
    if let Some(first) = orders.first() {
        let mut changed = first.clone();
        changed.products = Some(vec![json!("bread")]);
        changed.details = json!({"amount": 1, "price": 5}).as_object().cloned();
        db.update(&changed).await?;
    }

    let found: Option<OrderModel> = db.query_filter_by_first("name", "myorder").await?;
    if let Some(found) = found {
        println!("after update: {:?} {:?}", found.products, found.details);
    }

    db.drop_table(OrderModel::table_name()).await?;
    db.close().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();

    if let Err(err) = walkthrough(&args).await {
        tracing::error!("orders walkthrough failed: {err}");
        std::process::exit(1);
    }
}
