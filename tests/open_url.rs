use dbx::database::traits::{DatabaseType, columns, tables};
use dbx::{DbxError, open, open_with_schema};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::Path;

fn sqlite_url(path: &Path, query: &str) -> String {
    format!("sqlite://{}{}", path.display(), query)
}

/// Create a database with a plain rollback journal, outside of dbx.
async fn seed(path: &Path) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::query("CREATE TABLE regions (id INTEGER NOT NULL, name TEXT)")
        .execute(&mut conn)
        .await
        .unwrap();
    sqlx::query("INSERT INTO regions VALUES (1, 'north')")
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
}

#[test]
fn test_open_creates_file_database() {
    smol::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        let mut conn = open(&sqlite_url(&path, "")).await.unwrap();
        assert_eq!(conn.database_type(), DatabaseType::SQLite);
        assert_eq!(conn.display_name(), path.display().to_string());

        conn.execute("CREATE TABLE t (x INTEGER)", &[]).await.unwrap();
        conn.disconnect().await.unwrap();
        assert!(path.exists());
    });
}

#[test]
fn test_read_only_url() {
    smol::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.db");
        seed(&path).await;

        let conn = open(&sqlite_url(&path, "?mode=ro")).await.unwrap();
        assert!(conn.connection_config().params.is_read_only());

        let name = conn
            .fetch_scalar_string("SELECT name FROM regions WHERE id = ?1", &[1_i64.into()])
            .await
            .unwrap();
        assert_eq!(name, "north");

        assert!(
            conn.execute("INSERT INTO regions VALUES (2, 'south')", &[])
                .await
                .is_err()
        );
    });
}

#[test]
fn test_schema_listing_from_url() {
    smol::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.db");
        seed(&path).await;

        let conn = open_with_schema(&sqlite_url(&path, "")).await.unwrap();

        let names: Vec<_> = tables(conn.as_ref())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.table_name)
            .collect();
        assert_eq!(names, vec!["regions"]);

        let cols = columns(conn.as_ref(), "regions").await.unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].column_name, "id");
        assert!(!cols[0].nullable());
        assert_eq!(cols[1].data_type, "TEXT");

        assert!(conn.get_columns("missing").await.unwrap().is_empty());
    });
}

#[test]
fn test_unrecognized_protocol() {
    smol::block_on(async {
        for url in ["oracle://scott:tiger@db/orcl", "Postgres://u@h/db", "no-scheme"] {
            let Err(err) = open(url).await else {
                panic!("{url} should not open");
            };
            assert!(
                matches!(
                    err.downcast_ref::<DbxError>(),
                    Some(DbxError::UnrecognizedProtocol(_))
                ),
                "{url}: {err:#}"
            );
            assert!(!format!("{err}").contains("tiger"));
        }
    });
}
