use propmap::prelude::*;
use propmap::tracking::EventType;

fn record(id: i64, coords: Option<(f64, f64)>) -> PropertyGeoRecord {
    PropertyGeoRecord {
        id,
        title: format!("Propiedad {id}"),
        price: 50_000_000.0,
        currency: Currency::Ars,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        property_type: "apartment".to_string(),
        operation_type: "alquiler".to_string(),
        images: Vec::new(),
        status: "available".to_string(),
    }
}

fn spread(count: usize) -> Vec<PropertyGeoRecord> {
    (0..count)
        .map(|i| {
            let step = i as f64 * 0.01;
            record(i as i64 + 1, Some((-34.5 - step, -58.3 - step)))
        })
        .collect()
}

async fn loaded_map(records: Vec<PropertyGeoRecord>) -> InteractivePropertyMap {
    let provider = StaticProvider::new(records);
    let mut map = MapBuilder::new().build().unwrap();
    map.mount();
    map.load(&provider).await;
    map
}

#[tokio::test]
async fn test_filtering_preserves_provider_order() {
    let records = vec![
        record(5, Some((-34.6, -58.4))),
        record(3, None),
        record(9, Some((-34.7, -58.5))),
        record(1, Some((f64::NAN, -58.5))),
        record(2, Some((-34.8, -58.6))),
    ];
    let map = loaded_map(records).await;

    let ids: Vec<i64> = map.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 9, 2]);
}

#[tokio::test]
async fn test_cluster_threshold_is_inclusive() {
    let below = loaded_map(spread(49)).await;
    assert!(!below.is_clustered());
    assert!(!below.render().clustered);

    let at = loaded_map(spread(50)).await;
    assert!(at.is_clustered());
    assert!(at.render().clustered);
}

#[tokio::test]
async fn test_explicit_clustering_wins_below_threshold() {
    let provider = StaticProvider::new(spread(3));
    let mut map = MapBuilder::new().with_clustering(true).build().unwrap();
    map.mount();
    map.load(&provider).await;
    assert!(map.is_clustered());
}

#[tokio::test]
async fn test_explicit_clustering_with_no_records_reports_unclustered() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::new(Vec::new());
    let mut map = MapBuilder::new()
        .with_clustering(true)
        .with_analytics(sink.clone())
        .build()
        .unwrap();
    map.mount();
    map.load(&provider).await;

    assert_eq!(map.state_kind(), StateKind::Empty);
    assert!(!map.render().clustered);
    let loaded = sink.events();
    assert_eq!(loaded[0].event_type, EventType::MapLoaded);
    assert_eq!(loaded[0].metadata["clustering"], false);
}

#[tokio::test]
async fn test_bounds_are_deterministic() {
    let first = loaded_map(spread(12)).await;
    let second = loaded_map(spread(12)).await;

    assert_eq!(first.render().fit, second.render().fit);
    let fit = first.render().fit.unwrap();
    assert_eq!(fit.bounds.north(), -34.5);
    assert_eq!(fit.bounds.west(), -58.3 - 11.0 * 0.01);
}

#[tokio::test]
async fn test_state_transitions_are_exclusive() {
    let provider = StaticProvider::new(spread(2));
    let mut map = MapBuilder::new().build().unwrap();

    let first = map.mount();
    assert_eq!(map.state_kind(), StateKind::Loading);
    assert!(map.retry().is_none());

    map.load(&provider).await;
    assert_eq!(map.state_kind(), StateKind::Ready);
    assert!(map.retry().is_none());

    let second = map.refresh().unwrap();
    assert_ne!(first, second);
    assert_eq!(map.complete_load(first, Ok(Vec::new())), LoadOutcome::Stale);
    assert_eq!(map.state_kind(), StateKind::Loading);

    map.unmount();
    assert_eq!(map.complete_load(second, Ok(spread(1))), LoadOutcome::Unmounted);
    assert_eq!(map.state_kind(), StateKind::Loading);
}

#[tokio::test]
async fn test_late_response_after_unmount_is_not_tracked() {
    let sink = Arc::new(MemorySink::new());
    let mut map = MapBuilder::new().with_analytics(sink.clone()).build().unwrap();

    let ticket = map.mount();
    map.unmount();
    map.complete_load(ticket, Err(MapError::DataFetch("late".into())));

    assert!(sink.is_empty());
}

struct BrokenSink;

impl AnalyticsSink for BrokenSink {
    fn track(&self, _event: &InteractionEvent) -> Result<()> {
        Err(MapError::Tracking("collector unreachable".into()))
    }
}

struct PanickingSink;

impl AnalyticsSink for PanickingSink {
    fn track(&self, _event: &InteractionEvent) -> Result<()> {
        panic!("collector crashed")
    }
}

#[tokio::test]
async fn test_tracking_failures_do_not_change_the_map() {
    let sinks: Vec<Arc<dyn AnalyticsSink>> = vec![
        Arc::new(MemorySink::new()),
        Arc::new(BrokenSink),
        Arc::new(PanickingSink),
    ];

    let mut outcomes = Vec::new();
    for sink in sinks {
        let provider = StaticProvider::new(spread(3));
        let mut map = MapBuilder::new()
            .with_analytics(sink)
            .with_render_context(RenderContext::interactive(1.0))
            .build()
            .unwrap();
        map.mount();
        map.load(&provider).await;

        let popup = map.click_marker(2).map(|p| p.details_href);
        let navigation = map.view_details(2).map(|n| n.href);
        outcomes.push((map.state_kind(), map.records().len(), popup, navigation));
    }

    assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(outcomes[0].0, StateKind::Ready);
}

#[tokio::test]
async fn test_repeated_pin_clicks_are_all_tracked() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::new(spread(2));
    let mut map = MapBuilder::new().with_analytics(sink.clone()).build().unwrap();
    map.mount();
    map.load(&provider).await;
    map.hydrate(1.0);

    map.click_marker(1);
    map.click_marker(1);

    let clicks: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| e.event_type == EventType::MapPinClick)
        .collect();
    assert_eq!(clicks.len(), 2);
    assert_eq!(clicks[0].metadata["property_type"], "apartment");
}

#[test]
fn test_price_formatting() {
    assert_eq!(format_price(150_000.0, Currency::Usd), "US$ 150.000");
    assert_eq!(format_price(50_000_000.0, Currency::Ars), "$ 50.000.000");
    assert_eq!(format_price(999.0, Currency::Ars), "$ 999");
}

#[test]
fn test_channel_sink_feeds_a_consumer() {
    let (sink, receiver) = ChannelSink::unbounded();
    let tracker = InteractionTracker::new(Arc::new(sink), "interactive-property-map");

    assert!(tracker.view_details(12));
    let event = receiver.try_recv().unwrap();
    assert_eq!(event.event_type, EventType::MapViewDetails);
    assert_eq!(event.target_id, "interactive-property-map");
}
