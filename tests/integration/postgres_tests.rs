//! Integration tests for the PostgreSQL session
//!
//! These tests require the test PostgreSQL database to be running.

use crate::common::{connect_or_skip, test_config, unique_name, write_file};
use tabload::DbError;
use tabload::ImportError;
use tabload::config::Delimiter;
use tabload::db::ddl::quote_ident;
use tabload::db::{Database, Session};

async fn row_count(session: &mut Session, table: &str) -> u64 {
    session
        .execute(&format!("SELECT * FROM {}", quote_ident(table)))
        .await
        .expect("table should exist")
}

async fn column_type_is(
    session: &mut Session,
    table: &str,
    column: &str,
    data_type: &str,
) -> bool {
    let sql = format!(
        "SELECT 1 FROM information_schema.columns \
         WHERE table_name = '{}' AND column_name = '{}' AND data_type = '{}'",
        table, column, data_type
    );
    session.execute(&sql).await.unwrap() == 1
}

async fn drop_table(session: &mut Session, table: &str) {
    let _ = session
        .execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .await;
}

#[tokio::test]
async fn test_connect_to_database() {
    let Some(session) = connect_or_skip().await else {
        return;
    };
    assert_eq!(session.database(), test_config().database);
}

#[tokio::test]
async fn test_connect_unreachable_host_fails() {
    let mut config = test_config();
    config.host = "127.0.0.1".to_string();
    config.port = 1;

    let result = Session::connect(&config).await;
    assert!(matches!(result, Err(DbError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_execute_simple_statement() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };

    let rows = session.execute("SELECT 1").await;
    assert_eq!(rows.unwrap(), 1);
}

#[tokio::test]
async fn test_execute_invalid_statement_fails() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };

    let result = session.execute("SELEC nothing").await;
    assert!(matches!(result, Err(DbError::QueryFailed(_))));

    // The session stays usable after a failed statement
    assert!(session.execute("SELECT 1").await.is_ok());
}

#[tokio::test]
async fn test_ensure_database_is_idempotent() {
    let config = test_config().with_database("postgres");
    let mut admin = match Session::connect(&config).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping test: maintenance database not available - {}", e);
            return;
        }
    };

    let name = unique_name("tabload_db");
    match admin.ensure_database(&name).await {
        Ok(created) => assert!(created),
        Err(e) => {
            eprintln!("Skipping test: cannot create databases - {}", e);
            return;
        }
    }
    assert!(!admin.ensure_database(&name).await.unwrap());

    admin
        .execute(&format!("DROP DATABASE {}", quote_ident(&name)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_load_twice_replaces_content() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "people.csv", "id,name\n1,Alice\n2,Bob\n3,Carol\n");
    let table = unique_name("people");
    let path = dir.path().join("people.csv");

    let first = session
        .load_table(&path, &table, Delimiter::Comma)
        .await
        .unwrap();
    let second = session
        .load_table(&path, &table, Delimiter::Comma)
        .await
        .unwrap();

    assert_eq!(first.rows, 3);
    assert_eq!(second.rows, 3);
    assert_eq!(second.columns, 2);
    assert_eq!(row_count(&mut session, &table).await, 3);

    drop_table(&mut session, &table).await;
}

#[tokio::test]
async fn test_load_infers_column_types() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "typed.csv",
        "id;price;active;day;note\n1;2.5;true;2024-03-01;x\n2;NA;false;2024-03-02;\n",
    );
    let table = unique_name("typed");

    let summary = session
        .load_table(&dir.path().join("typed.csv"), &table, Delimiter::Semicolon)
        .await
        .unwrap();
    assert_eq!(summary.rows, 2);

    assert!(column_type_is(&mut session, &table, "id", "bigint").await);
    assert!(column_type_is(&mut session, &table, "price", "double precision").await);
    assert!(column_type_is(&mut session, &table, "active", "boolean").await);
    assert!(column_type_is(&mut session, &table, "day", "date").await);
    assert!(column_type_is(&mut session, &table, "note", "text").await);

    let nulls = session
        .execute(&format!(
            "SELECT * FROM {} WHERE price IS NULL AND note IS NULL",
            quote_ident(&table)
        ))
        .await
        .unwrap();
    assert_eq!(nulls, 1);

    drop_table(&mut session, &table).await;
}

#[tokio::test]
async fn test_failed_load_leaves_previous_table_intact() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "good.csv", "a,b\n1,2\n3,4\n");
    write_file(dir.path(), "bad.csv", "a,b\n1,2\n3,4,5\n");
    let table = unique_name("intact");

    session
        .load_table(&dir.path().join("good.csv"), &table, Delimiter::Comma)
        .await
        .unwrap();
    let err = session
        .load_table(&dir.path().join("bad.csv"), &table, Delimiter::Comma)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Parse { .. }));
    assert_eq!(row_count(&mut session, &table).await, 2);

    drop_table(&mut session, &table).await;
}

#[tokio::test]
async fn test_wrong_delimiter_loads_single_column() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "semi.csv", "a;b\n1;2\n3;4\n");
    let table = unique_name("semi");

    let summary = session
        .load_table(&dir.path().join("semi.csv"), &table, Delimiter::Comma)
        .await
        .unwrap();

    assert_eq!(summary.columns, 1);
    assert_eq!(row_count(&mut session, &table).await, 2);

    drop_table(&mut session, &table).await;
}
