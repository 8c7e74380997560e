//! Lifecycle tests driven from separate controlling threads.
//!
//! All timings use a 100ms time unit: foreground and poll intervals are one
//! unit, the background worker interval is two.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use simple_dummy_worker::{MemorySink, Worker, WorkerConfig, WorkerState};

const UNIT: Duration = Duration::from_millis(100);

fn worker_with_sink() -> (Arc<Worker>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let config = WorkerConfig::with_name("lifecycle").with_time_unit(UNIT);
    let worker = Arc::new(Worker::new(config, sink.clone()).unwrap());
    (worker, sink)
}

#[test]
fn test_daemon_stopped_after_three_and_a_half_units_logs_one_or_two_iterations() {
    let (worker, sink) = worker_with_sink();

    let runner = {
        let worker = worker.clone();
        thread::spawn(move || worker.run_daemon())
    };

    thread::sleep(UNIT * 7 / 2);
    worker.stop();

    let iterations = sink.count_containing("Daemon worker iteration");
    assert!(
        (1..=2).contains(&iterations),
        "expected 1 or 2 worker iterations, got {}",
        iterations
    );

    runner.join().unwrap().unwrap();
    assert_eq!(worker.state(), WorkerState::Stopped);
}

#[test]
fn test_stop_returns_only_after_worker_thread_terminates() {
    let (worker, sink) = worker_with_sink();
    worker.start_daemon().unwrap();
    thread::sleep(UNIT / 2);

    let stopper = {
        let worker = worker.clone();
        thread::spawn(move || worker.stop())
    };
    stopper.join().unwrap();

    assert!(!worker.has_worker_thread());
    assert!(!worker.status().worker_alive);

    // Nothing is logged once stop() has returned.
    let after_stop = sink.lines().len();
    thread::sleep(UNIT * 5);
    assert_eq!(sink.lines().len(), after_stop);
}

#[test]
fn test_run_daemon_blocks_until_stopped() {
    let (worker, _sink) = worker_with_sink();

    let started = Instant::now();
    let runner = {
        let worker = worker.clone();
        thread::spawn(move || {
            worker.run_daemon().unwrap();
            started.elapsed()
        })
    };

    thread::sleep(UNIT * 3);
    assert!(!runner.is_finished());

    worker.stop();
    let blocked_for = runner.join().unwrap();
    assert!(blocked_for >= UNIT * 3);
}

#[test]
fn test_foreground_logs_five_iterations_about_one_unit_apart() {
    let (worker, sink) = worker_with_sink();

    let started = Instant::now();
    worker.run_foreground().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(sink.count_containing("Foreground iteration"), 5);
    assert!(!worker.is_running());
    assert!(elapsed >= UNIT * 5, "foreground run took {:?}", elapsed);
}

#[test]
fn test_foreground_stops_early_when_stopped_externally() {
    let (worker, sink) = worker_with_sink();

    let runner = {
        let worker = worker.clone();
        thread::spawn(move || worker.run_foreground())
    };

    thread::sleep(UNIT * 3 / 2);
    worker.stop();
    runner.join().unwrap().unwrap();

    let iterations = sink.count_containing("Foreground iteration");
    assert!(iterations < 5, "expected an early exit, got {} iterations", iterations);
    assert_eq!(sink.count_containing("lifecycle foreground mode completed"), 1);
    assert_eq!(worker.state(), WorkerState::Stopped);
}

#[test]
fn test_dropping_a_running_daemon_joins_the_worker() {
    let sink = Arc::new(MemorySink::new());
    let config = WorkerConfig::with_name("dropped").with_time_unit(UNIT);
    let worker = Worker::new(config, sink.clone()).unwrap();
    worker.start_daemon().unwrap();
    thread::sleep(UNIT / 2);

    drop(worker);

    // stop() logs after the join, so this line proves the thread was reaped.
    assert_eq!(sink.count_containing("dropped stopped"), 1);
    let after_drop = sink.lines().len();
    thread::sleep(UNIT * 5);
    assert_eq!(sink.lines().len(), after_drop);
}

#[test]
fn test_concurrent_stops_are_safe() {
    let (worker, sink) = worker_with_sink();
    worker.start_daemon().unwrap();

    let stoppers: Vec<_> = (0..4)
        .map(|_| {
            let worker = worker.clone();
            thread::spawn(move || worker.stop())
        })
        .collect();
    for stopper in stoppers {
        stopper.join().unwrap();
    }

    assert_eq!(worker.state(), WorkerState::Stopped);
    assert_eq!(sink.count_containing("lifecycle stopped"), 1);
}
