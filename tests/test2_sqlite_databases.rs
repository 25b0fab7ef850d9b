#![cfg(feature = "sqlite")]

mod common;

use common::{Customer, Product, Purchase};
use simplesql::prelude::*;
use tokio::runtime::Runtime;

async fn open_path(path: &std::path::Path) -> Result<SimpleSql, SimpleSqlError> {
    SqliteOptionsBuilder::new(path.to_string_lossy().into_owned())
        .connect()
        .await
        .map(SimpleSql::new)
}

#[test]
fn databases_are_db_files_next_to_the_session() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("notes.txt"), b"not a database")?;

        let mut scratch = open_path(&dir.path().join("scratch.db")).await?;
        scratch
            .create_table::<Product>(&TableOptions::default())
            .await?;
        scratch.close().await?;

        let mut db = open_path(&dir.path().join("main.db")).await?;
        db.create_table::<Product>(&TableOptions::default())
            .await?;
        assert_eq!(db.session().current_database().as_deref(), Some("main"));

        let dbs = db.local_databases().await?;
        assert_eq!(dbs, vec!["main.db".to_string(), "scratch.db".to_string()]);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn database_guards_report_existence() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let mut scratch = open_path(&dir.path().join("scratch.db")).await?;
        scratch
            .create_table::<Product>(&TableOptions::default())
            .await?;
        scratch.close().await?;

        let mut db = open_path(&dir.path().join("main.db")).await?;

        let missing = db.drop_database("never_created").await;
        assert!(matches!(missing, Err(SimpleSqlError::DatabaseNotExist(ref name)) if name == "never_created"));

        let exists = db.create_database("scratch").await;
        assert!(matches!(exists, Err(SimpleSqlError::DatabaseExist(ref name)) if name == "scratch"));
        let message = exists.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("\"scratch\""));

        // a new SQLite database is made by opening its file, not by a statement
        let fresh = db.create_database("fresh").await;
        assert!(matches!(fresh, Err(SimpleSqlError::Unimplemented(_))));
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn dropping_a_database_removes_its_file_and_closes() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scratch.db");
        let mut db = open_path(&path).await?;
        db.create_table::<Product>(&TableOptions::default())
            .await?;
        assert!(path.exists());

        db.drop_database("scratch").await?;
        assert!(!path.exists());
        assert!(!db.session().is_connected());
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn backup_writes_a_copy_with_vacuum_into() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let mut db = open_path(&dir.path().join("shop.db")).await?;
        db.create_table::<Product>(&TableOptions::default())
            .await?;
        db.insert(&Product::new(1, "a", 5)).await?;

        let target = dir.path().join("shop-backup.db");
        db.backup(&target.to_string_lossy(), false).await?;
        assert!(target.exists());

        let diff = db.backup(&target.to_string_lossy(), true).await;
        assert!(matches!(diff, Err(SimpleSqlError::Unimplemented(_))));

        let mut copy = open_path(&target).await?;
        let rows: Vec<Product> = copy.query_all().await?;
        assert_eq!(rows, vec![Product::new(1, "a", 5)]);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn backup_runs_outside_a_manual_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let mut db = open_path(&dir.path().join("shop.db")).await?;
        db.create_table::<Product>(&TableOptions::default())
            .await?;
        db.set_auto_commit(false).await?;
        db.insert(&Product::new(1, "a", 5)).await?;

        let target = dir.path().join("bk.db");
        db.backup(&target.to_string_lossy(), false).await?;

        // pending work was committed before the copy and the session keeps going
        db.insert(&Product::new(2, "b", 6)).await?;
        db.rollback().await?;
        let mut copy = open_path(&target).await?;
        let rows: Vec<Product> = copy.query_all().await?;
        assert_eq!(rows, vec![Product::new(1, "a", 5)]);
        let live: Vec<Product> = db.query_all().await?;
        assert_eq!(live, vec![Product::new(1, "a", 5)]);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn in_memory_session_has_no_database_to_back_up() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = connect(ConnectOptions::Sqlite(SqliteOptions::new(":memory:"))).await?;
        assert_eq!(db.database_type(), DatabaseType::Sqlite);
        let err = db.backup("/tmp/never-written.db", false).await;
        assert!(matches!(err, Err(SimpleSqlError::ConnectionError(_))));
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn foreign_keys_cascade_on_delete() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let mut db = open_path(&dir.path().join("shop.db")).await?;
        db.create_table::<Customer>(&TableOptions::default())
            .await?;
        db.create_table::<Purchase>(&Purchase::table_options())
            .await?;

        db.insert(&Customer {
            id: 1,
            name: "ann".into(),
        })
        .await?;
        db.insert(&Purchase {
            id: 10,
            customer_id: 1,
            item: "tea".into(),
        })
        .await?;

        let orphan = db
            .insert(&Purchase {
                id: 11,
                customer_id: 99,
                item: "coffee".into(),
            })
            .await;
        assert!(orphan.is_err());

        db.query_delete_by::<Customer>("id", 1).await?;
        let left: Vec<Purchase> = db.query_all().await?;
        assert!(left.is_empty());
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn updates_enforce_foreign_keys() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shop.db");
        let mut setup = open_path(&path).await?;
        setup
            .create_table::<Customer>(&TableOptions::default())
            .await?;
        setup
            .create_table::<Purchase>(&Purchase::table_options())
            .await?;
        setup
            .insert(&Customer {
                id: 1,
                name: "ann".into(),
            })
            .await?;
        setup
            .insert(&Purchase {
                id: 10,
                customer_id: 1,
                item: "tea".into(),
            })
            .await?;
        setup.close().await?;

        // a fresh connection starts with enforcement off; the update must switch it on
        let mut db = open_path(&path).await?;
        let dangling = db
            .update_where(
                &Purchase {
                    id: 10,
                    customer_id: 99,
                    item: "tea".into(),
                },
                "id = 10",
            )
            .await;
        assert!(dangling.is_err());

        let left: Vec<Purchase> = db.query_all().await?;
        assert_eq!(left.first().map(|p| p.customer_id), Some(1));
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
