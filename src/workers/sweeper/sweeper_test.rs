#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use crate::db::store::Store;
    use crate::model::Data;
    use crate::sid::RandomKeyGenerator;
    use crate::workers::{ExpiryBackend, Sweeper, SweeperConfig, SweeperState};

    const TTL: Duration = Duration::from_secs(5);
    const PERIOD: Duration = Duration::from_secs(1);

    fn cfg(max_in_flight: usize) -> SweeperConfig {
        // stats logger effectively off so counters are not reset under the test
        SweeperConfig::new(true, TTL, PERIOD, max_in_flight, Duration::from_secs(3600))
    }

    fn new_store() -> Arc<Store> {
        Arc::new(Store::new(Arc::new(RandomKeyGenerator)))
    }

    fn new_sweeper(token: CancellationToken, backend: Arc<dyn ExpiryBackend>, max_in_flight: usize) -> Arc<Sweeper> {
        Sweeper::new(token, "test-sweeper".to_string(), cfg(max_in_flight), backend)
    }

    /// Lets every task spawned so far run to completion on the paused runtime.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    /// Refreshes every record right after handing out the snapshot, the way a
    /// client update racing the sweep would.
    struct RefreshingBackend {
        store: Arc<Store>,
    }

    impl ExpiryBackend for RefreshingBackend {
        fn len(&self) -> usize {
            self.store.len()
        }

        fn keys(&self) -> Vec<String> {
            let keys = self.store.keys();
            for key in &keys {
                let mut data = Data::new();
                data.insert("refreshed".to_string(), json!(true));
                self.store.update(key, data).unwrap();
            }
            keys
        }

        fn expire_if_stale(&self, key: &str, ttl: Duration) -> bool {
            self.store.expire_if_stale(key, ttl)
        }
    }

    /// Tracks how many staleness checks run at the same time.
    struct TrackingBackend {
        store: Arc<Store>,
        current: AtomicUsize,
        max: AtomicUsize,
    }

    impl ExpiryBackend for TrackingBackend {
        fn len(&self) -> usize {
            self.store.len()
        }

        fn keys(&self) -> Vec<String> {
            self.store.keys()
        }

        fn expire_if_stale(&self, key: &str, ttl: Duration) -> bool {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            let removed = self.store.expire_if_stale(key, ttl);
            self.current.fetch_sub(1, Ordering::SeqCst);
            removed
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_only_stale_records() {
        let store = new_store();
        let old = store.create().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        let young = store.create().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;

        let sweeper = new_sweeper(CancellationToken::new(), store.clone(), 0);
        assert_eq!(sweeper.sweep(), 2);
        // the cycle is over even though its checks have not run yet
        assert_eq!(sweeper.state(), SweeperState::Idle);

        settle().await;

        assert!(store.read(&old).unwrap_err().is_not_found());
        assert!(store.read(&young).is_ok());

        let (cycles, scanned, evicted) = sweeper.counters().reset();
        assert_eq!((cycles, scanned, evicted), (1, 2, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_on_empty_store_is_noop() {
        let store = new_store();
        let sweeper = new_sweeper(CancellationToken::new(), store.clone(), 0);

        assert_eq!(sweeper.sweep(), 0);
        settle().await;
        assert_eq!(sweeper.counters().reset(), (1, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_after_snapshot_is_not_lost() {
        let store = new_store();
        let key = store.create().unwrap();
        tokio::time::advance(TTL + PERIOD).await;

        let backend = Arc::new(RefreshingBackend { store: store.clone() });
        let sweeper = new_sweeper(CancellationToken::new(), backend, 0);

        assert_eq!(sweeper.sweep(), 1);
        settle().await;

        let data = store.read(&key).expect("refreshed record must survive the cycle");
        assert_eq!(data.get("refreshed"), Some(&json!(true)));
        assert_eq!(sweeper.counters().evicted.load(Ordering::Relaxed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_serve_evicts_within_ttl_plus_period() {
        let store = new_store();
        let token = CancellationToken::new();
        let sweeper = new_sweeper(token.clone(), store.clone(), 0);
        assert!(sweeper.serve());
        assert!(sweeper.is_serving());

        let key = store.create().unwrap();

        tokio::time::sleep(TTL - Duration::from_millis(500)).await;
        assert!(store.read(&key).is_ok(), "must survive until ttl");

        tokio::time::sleep(PERIOD + Duration::from_millis(1000)).await;
        assert!(store.read(&key).unwrap_err().is_not_found(), "must be gone by ttl + period");

        assert!(sweeper.counters().cycles.load(Ordering::Relaxed) >= 5);
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_serve_twice_is_rejected() {
        let token = CancellationToken::new();
        let sweeper = new_sweeper(token.clone(), new_store(), 0);

        assert!(sweeper.serve());
        assert!(!sweeper.serve());
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_sweeper_stops_sweeping() {
        let store = new_store();
        let token = CancellationToken::new();
        let sweeper = new_sweeper(token.clone(), store.clone(), 0);
        sweeper.serve();
        settle().await;

        token.cancel();
        settle().await;

        let key = store.create().unwrap();
        tokio::time::sleep(TTL * 3).await;

        assert!(store.read(&key).is_ok());
        assert_eq!(sweeper.counters().cycles.load(Ordering::Relaxed), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_bounded_fan_out_still_evicts_everything() {
        let store = new_store();
        for _ in 0..64 {
            store.create().unwrap();
        }

        let backend = Arc::new(TrackingBackend {
            store: store.clone(),
            current: AtomicUsize::new(0),
            max: AtomicUsize::new(0),
        });
        // zero ttl: every record is stale as soon as any time has passed
        let sweeper = Sweeper::new(
            CancellationToken::new(),
            "bounded".to_string(),
            SweeperConfig::new(true, Duration::ZERO, PERIOD, 2, Duration::from_secs(3600)),
            backend.clone(),
        );
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(sweeper.sweep(), 64);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        while !store.is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(store.is_empty());
        assert!(backend.max.load(Ordering::SeqCst) <= 2);
    }
}
