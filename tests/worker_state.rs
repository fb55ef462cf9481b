#[cfg(test)]
mod tests {
    use curtain::db::db::Db;
    use curtain::db::people::Director;
    use curtain::db::stats::{DashboardFilters, Period};
    use curtain::libs::state::AppState;
    use curtain::libs::worker::DbWorker;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::oneshot;

    struct WorkerTestContext {
        db: Db,
        worker: DbWorker,
    }

    impl AsyncTestContext for WorkerTestContext {
        async fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            let worker = DbWorker::spawn(db.clone());
            WorkerTestContext { db, worker }
        }
    }

    impl WorkerTestContext {
        /// Occupies the worker until the returned sender fires.
        fn block_worker(&self) -> oneshot::Sender<()> {
            let (release, gate) = oneshot::channel::<()>();
            let _ = self.worker.submit(move |_db| async move {
                let _ = gate.await;
            });
            release
        }
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_jobs_run_in_submission_order(ctx: &mut WorkerTestContext) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut pending = Vec::new();
        for index in 0..5 {
            let seen = Arc::clone(&seen);
            pending.push(ctx.worker.submit(move |_db| async move {
                tokio::time::sleep(Duration::from_millis(5 * (5 - index))).await;
                seen.lock().push(index);
            }));
        }
        for job in pending {
            job.wait().await.unwrap();
        }
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_jobs_see_the_same_database(ctx: &mut WorkerTestContext) {
        let id = ctx
            .worker
            .submit(|db| async move { db.add(&Director::new("Peter Brook", None)).await })
            .wait()
            .await
            .unwrap()
            .unwrap();
        let stored = ctx.db.get::<Director>(id).await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Peter Brook");
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_wait_timeout_is_soft(ctx: &mut WorkerTestContext) {
        let release = ctx.block_worker();
        let mut pending = ctx.worker.submit(|_db| async { 42 });

        assert_eq!(pending.wait_timeout(Duration::from_millis(20)).await.unwrap(), None);
        assert_eq!(pending.try_take().unwrap(), None);

        release.send(()).unwrap();
        assert_eq!(pending.wait_timeout(Duration::from_secs(5)).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let db = Db::open_in_memory().unwrap();
        let worker = DbWorker::spawn(db);
        assert!(worker.is_running());

        let pending = worker.submit(|db| async move { db.scalar("SELECT 7", &[]).await });
        worker.shutdown().await.unwrap();
        assert_eq!(pending.wait().await.unwrap().unwrap(), 7);
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_refresh_runs_once_at_a_time(ctx: &mut WorkerTestContext) {
        let state = Arc::new(AppState::default());
        let release = ctx.block_worker();

        let pending = state.refresh(&ctx.worker).unwrap();
        assert!(state.is_refreshing());
        assert!(state.refresh(&ctx.worker).is_none());

        release.send(()).unwrap();
        pending.wait().await.unwrap().unwrap();

        assert!(!state.is_refreshing());
        let metrics = state.metrics().unwrap();
        assert_eq!(metrics.rehearsals_count, 0);
        assert!(state.refresh(&ctx.worker).is_some());
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_refresh_discards_stale_metrics(ctx: &mut WorkerTestContext) {
        let state = Arc::new(AppState::new(DashboardFilters::default()));
        let release = ctx.block_worker();
        let pending = state.refresh(&ctx.worker).unwrap();

        let changed = DashboardFilters {
            period: Period::Week,
            ..DashboardFilters::default()
        };
        state.set_filters(changed.clone());
        release.send(()).unwrap();
        pending.wait().await.unwrap().unwrap();

        assert!(state.metrics().is_none());
        assert_eq!(state.filters(), changed);
        assert!(!state.is_refreshing());
    }

    #[test_context(WorkerTestContext)]
    #[tokio::test]
    async fn test_new_filters_drop_old_metrics(ctx: &mut WorkerTestContext) {
        let state = Arc::new(AppState::default());
        state.refresh(&ctx.worker).unwrap().wait().await.unwrap().unwrap();
        assert!(state.metrics().is_some());

        state.set_filters(DashboardFilters {
            director: Some("Peter Brook".to_string()),
            ..DashboardFilters::default()
        });
        assert!(state.metrics().is_none());
    }
}
