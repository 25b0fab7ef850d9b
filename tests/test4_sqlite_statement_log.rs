#![cfg(feature = "sqlite")]

mod common;

use common::{CapturedLog, Product};
use simplesql::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn every_statement_reaches_the_log() -> Result<(), Box<dyn std::error::Error>> {
    let log = CapturedLog::default();
    let _guard = log.install();

    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shop.db");
        let mut db = SimpleSql::new(
            SqliteOptionsBuilder::new(path.to_string_lossy().into_owned())
                .connect()
                .await?,
        );
        db.create_table::<Product>(&TableOptions::default())
            .await?;

        db.set_auto_commit(false).await?;
        db.insert(&Product::new(1, "a", 5)).await?;
        db.rollback().await?;
        db.insert(&Product::new(2, "b", 6)).await?;
        db.commit().await?;
        db.backup(&dir.path().join("bk.db").to_string_lossy(), false)
            .await?;
        db.close().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    let text = log.contents();
    for sql in [
        "CREATE TABLE IF NOT EXISTS Product",
        "INSERT INTO Product",
        "BEGIN;",
        "ROLLBACK;",
        "COMMIT;",
        "VACUUM INTO",
    ] {
        assert!(text.contains(sql), "{sql} missing from log:\n{text}");
    }
    Ok(())
}
