#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::migrations::{get_db_version, init_with_migrations, needs_migration, MigrationManager};
    use curtain::libs::config::DatabaseConfig;
    use rusqlite::Connection;

    #[test]
    fn test_fresh_connection_needs_migration() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE migrations (id INTEGER PRIMARY KEY, version INTEGER NOT NULL UNIQUE, name TEXT NOT NULL, applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)")
            .unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());

        init_with_migrations(&mut conn).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_history_is_in_version_order() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_with_migrations(&mut conn).unwrap();

        let manager = MigrationManager::new();
        let history = manager.get_migration_history(&conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(version, _, _)| *version).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
        assert_eq!(history[0].1, "create_people_and_venues");
        assert!(history.iter().all(|(_, _, applied_at)| !applied_at.is_empty()));
        assert!(manager.is_migration_applied(&conn, 5).unwrap());
        assert!(!manager.is_migration_applied(&conn, 6).unwrap());
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_with_migrations(&mut conn).unwrap();
        init_with_migrations(&mut conn).unwrap();

        let rows: i64 = conn.query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 5);
    }

    #[tokio::test]
    async fn test_reopening_a_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::at(dir.path().join("data").join("curtain.db"));

        let db = Db::open(&config).unwrap();
        db.execute("INSERT INTO theatre (name) VALUES ('Globe')", &[]).await.unwrap();
        db.close().await.unwrap();

        let db = Db::open(&config).unwrap();
        let version = db.with_conn(|conn| get_db_version(conn)).await.unwrap();
        assert_eq!(version, 5);
        assert_eq!(db.scalar("SELECT COUNT(*) FROM theatre", &[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unmigrated_open_reports_pending_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::at(dir.path().join("curtain.db"));

        let raw = Db::open_unmigrated(&config).unwrap();
        let (version, pending) = raw
            .with_conn(|conn| Ok((get_db_version(conn)?, needs_migration(conn)?)))
            .await
            .unwrap();
        assert_eq!(version, 0);
        assert!(pending);
        let history = raw.with_conn(|conn| MigrationManager::new().get_migration_history(conn)).await.unwrap();
        assert!(history.is_empty());
        raw.close().await.unwrap();

        Db::open(&config).unwrap().close().await.unwrap();

        let raw = Db::open_unmigrated(&config).unwrap();
        assert!(!raw.with_conn(|conn| needs_migration(conn)).await.unwrap());
        assert_eq!(raw.with_conn(|conn| get_db_version(conn)).await.unwrap(), 5);
    }

    #[test]
    fn test_schema_enforces_foreign_keys_when_enabled() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        init_with_migrations(&mut conn).unwrap();

        let result = conn.execute("INSERT INTO location (theatre_id, hall_name) VALUES (42, 'Main Hall')", []);
        assert!(result.is_err());
    }
}
