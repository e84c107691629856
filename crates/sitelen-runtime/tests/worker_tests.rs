use sitelen_layout::{Size, SurfacePruning, UnitKind};
use sitelen_runtime::*;

fn sentence(object: &str) -> Vec<Part> {
    vec![
        Part::words(["mi"]),
        Part::words(["moku"]).with_separator("li"),
        Part::words([object]).with_separator("e"),
    ]
}

#[tokio::test]
async fn test_compose_request() {
    let (worker, mut update_rx) = LayoutWorker::spawn();
    let request = worker
        .compose(sentence("kili"), LayoutOptions::default())
        .unwrap();

    match update_rx.recv().await {
        Some(LayoutUpdate::Composed { request: done, set }) => {
            assert_eq!(done, request);
            assert!(!set.is_empty());
            assert!(set.is_complete());
        }
        other => panic!("Expected Composed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_queued_compose_requests_are_coalesced() {
    let (worker, mut update_rx) = LayoutWorker::spawn();

    // queued before the worker gets to run
    let first = worker.compose(sentence("kili"), LayoutOptions::default()).unwrap();
    let second = worker.compose(sentence("telo"), LayoutOptions::default()).unwrap();
    let third = worker.compose(sentence("pan"), LayoutOptions::default()).unwrap();

    let mut superseded = Vec::new();
    loop {
        match update_rx.recv().await {
            Some(LayoutUpdate::Superseded { request }) => superseded.push(request),
            Some(LayoutUpdate::Composed { request, set }) => {
                assert_eq!(request, third);
                let object = set.options()[0].placements()[2].unit.nested_option().unwrap();
                assert_eq!(object.placements()[0].unit.token_str(), Some("pan"));
                break;
            }
            other => panic!("Unexpected update {:?}", other),
        }
    }
    assert_eq!(superseded, vec![first, second]);
}

#[tokio::test]
async fn test_other_commands_run_before_coalesced_compose() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let (worker, mut update_rx) = LayoutWorker::spawn();
    let first = worker.compose(sentence("kili"), LayoutOptions::default()).unwrap();
    worker.load_config(&missing).unwrap();
    let second = worker.compose(sentence("telo"), LayoutOptions::default()).unwrap();

    match update_rx.recv().await {
        Some(LayoutUpdate::Error { request: None, message }) => {
            assert!(message.contains("configuration"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }
    match update_rx.recv().await {
        Some(LayoutUpdate::Superseded { request }) => assert_eq!(request, first),
        other => panic!("Expected Superseded, got {:?}", other),
    }
    match update_rx.recv().await {
        Some(LayoutUpdate::Composed { request, .. }) => assert_eq!(request, second),
        other => panic!("Expected Composed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_layout_request() {
    let (worker, mut update_rx) = LayoutWorker::spawn();
    let units = vec![
        Unit::token(UnitKind::WordGlyph, "jan", Size::new(1.0, 1.0)).unwrap(),
        Unit::token(UnitKind::WordGlyph, "pona", Size::new(1.0, 1.0)).unwrap(),
    ];
    let request = worker.layout(units, LayoutOptions::default()).unwrap();

    match update_rx.recv().await {
        Some(LayoutUpdate::LaidOut { request: done, set }) => {
            assert_eq!(done, request);
            assert_eq!(set.len(), 2);
        }
        other => panic!("Expected LaidOut, got {:?}", other),
    }

    // layout requests are never coalesced, and failures name their request
    let empty = worker.layout(Vec::new(), LayoutOptions::default()).unwrap();
    match update_rx.recv().await {
        Some(LayoutUpdate::Error { request, message }) => {
            assert_eq!(request, Some(empty));
            assert!(message.contains("lay out"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_options_are_reported() {
    let (worker, mut update_rx) = LayoutWorker::spawn();
    let options = LayoutOptions {
        pruning: SurfacePruning {
            factor: Some(0.5),
            recheck_final: false,
        },
        ..LayoutOptions::default()
    };
    let request = worker.compose(sentence("kili"), options).unwrap();

    match update_rx.recv().await {
        Some(LayoutUpdate::Error { request: failed, .. }) => assert_eq!(failed, Some(request)),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_config() {
    use tempfile::NamedTempFile;

    let options = LayoutOptions {
        parallel: true,
        pruning: SurfacePruning::disabled(),
        ..LayoutOptions::default()
    };
    let temp_file = NamedTempFile::new().unwrap();
    options.save(temp_file.path()).await.unwrap();

    let (worker, mut update_rx) = LayoutWorker::spawn();
    worker.load_config(temp_file.path()).unwrap();

    match update_rx.recv().await {
        Some(LayoutUpdate::ConfigLoaded { options: loaded }) => assert_eq!(loaded, options),
        other => panic!("Expected ConfigLoaded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_stops_when_handles_are_dropped() {
    let (worker, mut update_rx) = LayoutWorker::spawn();
    let copy = worker.clone();
    drop(worker);
    copy.compose(sentence("kili"), LayoutOptions::default())
        .unwrap();
    drop(copy);

    assert!(matches!(
        update_rx.recv().await,
        Some(LayoutUpdate::Composed { .. })
    ));
    assert!(update_rx.recv().await.is_none());
}
