//! End-to-end directory imports against a live server

use crate::common::{connect_or_skip, unique_name, write_file};
use tabload::ImportError;
use tabload::config::Delimiter;
use tabload::db::Database;
use tabload::db::ddl::quote_ident;
use tabload::importer::DirectoryImporter;

#[tokio::test]
async fn test_import_directory_creates_lowercased_tables() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let a = unique_name("a");
    let b = unique_name("b");
    write_file(dir.path(), &format!("{}.csv", a), "id\n1\n2\n");
    write_file(dir.path(), &format!("{}.CSV", b.to_uppercase()), "id\n1\n");
    write_file(dir.path(), "notes.txt", "ignored");

    let report = DirectoryImporter::new(dir.path(), "csv", Delimiter::Comma)
        .import_all(&mut session)
        .await
        .unwrap();

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
    assert!(!report.has_failures());

    for (table, rows) in [(&a, 2u64), (&b, 1)] {
        let count = session
            .execute(&format!("SELECT * FROM {}", quote_ident(table)))
            .await
            .unwrap();
        assert_eq!(count, rows);
        session
            .execute(&format!("DROP TABLE {}", quote_ident(table)))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_import_missing_directory_creates_nothing() {
    let Some(mut session) = connect_or_skip().await else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();

    let result = DirectoryImporter::new(dir.path().join("missing"), "csv", Delimiter::Comma)
        .import_all(&mut session)
        .await;

    assert!(matches!(result, Err(ImportError::DirectoryNotFound(_))));
}
