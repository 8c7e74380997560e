    use super::*;
    use std::time::Duration;

    use crate::config::WorkerConfig;
    use crate::error::WorkerState;
    use crate::log::MemorySink;

    fn daemon_worker() -> (Arc<Worker>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = WorkerConfig::with_name("signal-test")
            .with_time_unit(Duration::from_millis(10));
        let worker = Arc::new(Worker::new(config, sink.clone()).unwrap());
        (worker, sink)
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(WorkerSignal::Shutdown.to_string(), "SHUTDOWN");
    }

    #[test]
    fn test_signal_handler_new() {
        let handler = SignalHandler::new();
        assert!(!handler.is_shutdown_requested());
    }

    #[test]
    fn test_request_shutdown() {
        let handler = SignalHandler::new();
        handler.request_shutdown();
        assert!(handler.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_signal_subscription() {
        let handler = SignalHandler::new();
        let mut rx = handler.subscribe();

        handler.send(WorkerSignal::Shutdown);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, WorkerSignal::Shutdown);
    }

    #[test]
    fn test_handler_clone() {
        let handler = SignalHandler::new();
        let cloned = handler.clone();

        handler.request_shutdown();
        // Cloned handler shares the same state
        assert!(cloned.is_shutdown_requested());
    }

    async fn wait_until_stopped(worker: &Worker) -> bool {
        for _ in 0..100 {
            if worker.state() == WorkerState::Stopped && !worker.has_worker_thread() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_stop_worker_on_shutdown() {
        let (worker, sink) = daemon_worker();
        worker.start_daemon().unwrap();

        let handler = SignalHandler::new();
        let watcher = handler.stop_worker_on_shutdown(worker.clone());

        tokio::time::sleep(Duration::from_millis(25)).await;
        handler.request_shutdown();

        assert!(wait_until_stopped(&worker).await);
        assert_eq!(sink.count_containing("signal-test stopped"), 1);
        watcher.abort();
    }

    #[tokio::test]
    async fn test_stop_worker_when_already_requested() {
        let (worker, _sink) = daemon_worker();
        worker.start_daemon().unwrap();

        let handler = SignalHandler::new();
        handler.request_shutdown();
        let watcher = handler.stop_worker_on_shutdown(worker.clone());

        assert!(wait_until_stopped(&worker).await);
        assert!(!worker.is_running());
        watcher.abort();
    }

    #[tokio::test]
    async fn test_watcher_survives_shutdown_before_start() {
        let (worker, sink) = daemon_worker();

        let handler = SignalHandler::new();
        let watcher = handler.stop_worker_on_shutdown(worker.clone());

        // Lands while the worker is still idle, so stop() has nothing to do.
        handler.request_shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(worker.state(), WorkerState::Idle);
        assert!(!watcher.is_finished());

        worker.start_daemon().unwrap();
        handler.request_shutdown();

        assert!(wait_until_stopped(&worker).await);
        assert_eq!(sink.count_containing("signal-test stopped"), 1);
        watcher.abort();
    }

    #[tokio::test]
    async fn test_run_daemon_until_shutdown_requested_before_start() {
        let (worker, sink) = daemon_worker();

        let handler = SignalHandler::new();
        handler.request_shutdown();

        let runner = {
            let handler = handler.clone();
            let worker = worker.clone();
            tokio::task::spawn_blocking(move || handler.run_daemon_until_shutdown(&worker))
        };

        tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("daemon run should return once shutdown was already requested")
            .unwrap()
            .unwrap();

        assert_eq!(worker.state(), WorkerState::Stopped);
        assert!(!worker.has_worker_thread());
        assert_eq!(sink.count_containing("signal-test daemon started"), 1);
        assert_eq!(sink.count_containing("signal-test stopped"), 1);
    }

    #[tokio::test]
    async fn test_run_daemon_until_shutdown_stops_on_signal() {
        let (worker, _sink) = daemon_worker();

        let handler = SignalHandler::new();
        let watcher = handler.stop_worker_on_shutdown(worker.clone());
        let runner = {
            let handler = handler.clone();
            let worker = worker.clone();
            tokio::task::spawn_blocking(move || handler.run_daemon_until_shutdown(&worker))
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        handler.request_shutdown();

        tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("daemon run should return after shutdown")
            .unwrap()
            .unwrap();
        assert_eq!(worker.state(), WorkerState::Stopped);
        watcher.abort();
    }
