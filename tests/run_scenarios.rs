//! End-to-end run scenarios through the public API.

use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use tsp_anneal::hsa::HsaSettings;
use tsp_anneal::run::{
    run_to_completion, Algorithm, Event, InitRequest, RunHistory, RunId, RunOptions, RunResult,
    RunWorker, ResultSink,
};
use tsp_anneal::sa::SaSettings;
use tsp_anneal::tsp::{direct_tour_length, Point};

const TIMEOUT: Duration = Duration::from_secs(60);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square() -> Vec<Point> {
    vec![
        Point::new("a", 0.0, 0.0),
        Point::new("b", 1.0, 0.0),
        Point::new("c", 1.0, 1.0),
        Point::new("d", 0.0, 1.0),
    ]
}

fn scatter(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Point::new(
                format!("c{}", i + 1),
                0.05 + 0.9 * ((t * 0.618_034) % 1.0),
                0.05 + 0.9 * ((t * 0.414_214) % 1.0),
            )
        })
        .collect()
}

/// Blocks until `run_id` completes, failing on any other terminal event.
fn wait_for_completion(events: &Receiver<Event>, run_id: &str) -> RunResult {
    loop {
        match events.recv_timeout(TIMEOUT).expect("event before timeout") {
            Event::Complete(result) if result.run_id.as_str() == run_id => return *result,
            Event::Stopped { run_id: id } | Event::Rejected { run_id: id, .. }
                if id.as_str() == run_id =>
            {
                panic!("run {run_id} ended without completing")
            }
            _ => {}
        }
    }
}

fn wait_for_progress(events: &Receiver<Event>, run_id: &str) {
    loop {
        match events.recv_timeout(TIMEOUT).expect("event before timeout") {
            Event::Progress(p) if p.run_id.as_str() == run_id => return,
            Event::Complete(r) if r.run_id.as_str() == run_id => {
                panic!("run {run_id} completed before the first progress event")
            }
            _ => {}
        }
    }
}

#[test]
fn sa_solves_unit_square() {
    init_logging();
    let request = InitRequest::new("square", square(), SaSettings::default().with_iterations(5_000));
    let result = run_to_completion(request).expect("valid request");

    assert!((result.best_distance - 4.0).abs() < 1e-9);
    assert_eq!(result.best_tour[0], 0);
    assert!((direct_tour_length(&square(), &result.best_tour) - 4.0).abs() < 1e-9);
}

#[test]
fn single_slot_hsa_solves_unit_square() {
    init_logging();
    for seed in 0..10 {
        let settings = HsaSettings::default()
            .with_memory_size(1)
            .with_iterations(1_000);
        let request = InitRequest::new(format!("hsa-{seed}"), square(), settings)
            .with_options(RunOptions::default().with_seed(seed));
        let result = run_to_completion(request).expect("valid request");
        assert!(
            (result.best_distance - 4.0).abs() < 1e-9,
            "seed {seed}: best {}",
            result.best_distance
        );
    }
}

#[test]
fn stopped_run_never_completes() {
    init_logging();
    let (worker, events) = RunWorker::spawn().expect("spawn worker");
    let run_id = RunId::from("long");
    let request = InitRequest::new(
        run_id.clone(),
        scatter(60),
        SaSettings::default().with_iterations(50_000_000),
    );
    worker.init(request).expect("send init");

    wait_for_progress(&events, "long");
    worker.stop(&run_id).expect("send stop");
    worker.shutdown();

    // The worker thread has exited, so this drains everything it ever sent.
    let rest: Vec<Event> = events.iter().collect();
    assert_eq!(
        rest.iter()
            .filter(|e| matches!(e, Event::Stopped { .. }))
            .count(),
        1
    );
    assert!(!rest.iter().any(|e| matches!(e, Event::Complete(_))));
}

#[test]
fn pause_and_resume_do_not_change_the_outcome() {
    init_logging();
    let request = InitRequest::new(
        "paused",
        scatter(20),
        SaSettings::default().with_iterations(5_000_000),
    )
    .with_options(RunOptions::default().with_seed(99));
    let reference = run_to_completion(request.clone()).expect("valid request");

    let (worker, events) = RunWorker::spawn().expect("spawn worker");
    let run_id = request.run_id.clone();
    worker.init(request).expect("send init");
    wait_for_progress(&events, "paused");

    worker.pause(&run_id).expect("send pause");
    thread::sleep(Duration::from_millis(100));
    let before_pause: Vec<Event> = events.try_iter().collect();
    assert!(
        !before_pause.iter().any(|e| matches!(e, Event::Complete(_))),
        "run finished before the pause took effect"
    );
    thread::sleep(Duration::from_millis(200));
    assert!(events.try_recv().is_err(), "paused run kept reporting");

    worker.resume(&run_id).expect("send resume");
    let result = wait_for_completion(&events, "paused");

    assert_eq!(result.iterations, reference.iterations);
    assert_eq!(result.best_tour, reference.best_tour);
    assert_eq!(result.convergence, reference.convergence);
}

#[test]
fn independent_workers_run_side_by_side() {
    init_logging();
    let (sa_worker, sa_events) = RunWorker::spawn().expect("spawn worker");
    let (hsa_worker, hsa_events) = RunWorker::spawn().expect("spawn worker");

    sa_worker
        .init(InitRequest::new("sa", scatter(40), SaSettings::default().with_iterations(20_000)))
        .expect("send init");
    hsa_worker
        .init(InitRequest::new("hsa", scatter(40), HsaSettings::default().with_iterations(20_000)))
        .expect("send init");

    let mut history = RunHistory::new();
    history.record(wait_for_completion(&sa_events, "sa"));
    history.record(wait_for_completion(&hsa_events, "hsa"));

    let sa = history.last(Algorithm::Sa).expect("sa result");
    let hsa = history.last(Algorithm::Hsa).expect("hsa result");
    assert_eq!(sa.iterations, 20_000);
    assert_eq!(hsa.iterations, 20_000);
    assert!(hsa.memory_updates.is_some());
    assert_eq!(history.summary(Algorithm::Sa).map(|s| s.runs), Some(1));
}

#[test]
fn new_init_supersedes_the_running_search() {
    init_logging();
    let (worker, events) = RunWorker::spawn().expect("spawn worker");
    worker
        .init(
            InitRequest::new("old", scatter(60), SaSettings::default().with_iterations(50_000_000)),
        )
        .expect("send init");
    wait_for_progress(&events, "old");

    worker
        .init(InitRequest::new("new", square(), SaSettings::default().with_iterations(1_000)))
        .expect("send init");
    let result = wait_for_completion(&events, "new");
    assert_eq!(result.iterations, 1_000);

    // Control messages for the superseded run are ignored.
    worker.stop(&RunId::from("old")).expect("send stop");
    worker.shutdown();
    let rest: Vec<Event> = events.iter().collect();
    assert!(rest.is_empty(), "unexpected events {rest:?}");
}

#[test]
fn invalid_init_is_rejected() {
    init_logging();
    let (worker, events) = RunWorker::spawn().expect("spawn worker");
    worker
        .init(InitRequest::new("tiny", square()[..2].to_vec(), SaSettings::default()))
        .expect("send init");

    match events.recv_timeout(TIMEOUT).expect("event before timeout") {
        Event::Rejected { run_id, reason } => {
            assert_eq!(run_id.as_str(), "tiny");
            assert!(!reason.is_empty());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}
