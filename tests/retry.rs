#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::error::DbError;
    use curtain::libs::config::DatabaseConfig;
    use rusqlite::ffi;
    use std::time::Duration;
    use tokio::time::Instant;

    const DELAY_MS: u64 = 20;

    fn retrying_db(attempts: u32) -> Db {
        let config = DatabaseConfig {
            retry_attempts: attempts,
            retry_delay_ms: DELAY_MS,
            ..DatabaseConfig::in_memory()
        };
        Db::open(&config).unwrap()
    }

    fn failure(code: i32) -> DbError {
        DbError::Store(rusqlite::Error::SqliteFailure(ffi::Error::new(code), None))
    }

    #[tokio::test]
    async fn test_busy_error_returned_after_all_attempts() {
        let db = retrying_db(3);
        let mut calls = 0;
        let started = Instant::now();

        let err = db
            .with_conn(|_| {
                calls += 1;
                Err::<(), _>(failure(ffi::SQLITE_BUSY))
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 3);
        assert!(err.is_transient());
        assert!(matches!(err, DbError::Store(rusqlite::Error::SqliteFailure(ref cause, _)) if cause.code == rusqlite::ErrorCode::DatabaseBusy));
        assert!(started.elapsed() >= Duration::from_millis(2 * DELAY_MS));
    }

    #[tokio::test]
    async fn test_locked_error_recovers_on_last_attempt() {
        let db = retrying_db(3);
        let mut calls = 0;

        let value = db
            .with_conn(|_| {
                calls += 1;
                if calls < 3 {
                    Err(failure(ffi::SQLITE_LOCKED))
                } else {
                    Ok("stored")
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "stored");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let db = retrying_db(3);
        let mut calls = 0;

        let err = db
            .with_conn(|_| {
                calls += 1;
                Err::<(), _>(DbError::Integrity("FOREIGN KEY constraint failed".to_string()))
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(!err.is_transient());
        assert!(err.is_integrity());
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_retry() {
        let db = retrying_db(1);
        let mut calls = 0;

        let err = db
            .with_conn(|_| {
                calls += 1;
                Err::<(), _>(failure(ffi::SQLITE_BUSY))
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_retries_leave_connection_usable() {
        let db = retrying_db(2);
        let mut calls = 0;
        db.with_conn(|_| {
            calls += 1;
            Err::<(), _>(failure(ffi::SQLITE_BUSY))
        })
        .await
        .unwrap_err();

        assert_eq!(calls, 2);
        assert_eq!(db.scalar("SELECT COUNT(*) FROM theatre", &[]).await.unwrap(), 0);
    }
}
