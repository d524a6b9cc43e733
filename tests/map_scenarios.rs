use instant::Instant;
use propmap::prelude::*;
use propmap::tracking::EventType;
use propmap::ui::views::{EMPTY_MESSAGE, RETRY_LABEL};

fn record(id: i64, lat: f64, lng: f64, property_type: &str) -> PropertyGeoRecord {
    PropertyGeoRecord {
        id,
        title: format!("Propiedad {id}"),
        price: 150_000.0,
        currency: Currency::Usd,
        latitude: Some(lat),
        longitude: Some(lng),
        property_type: property_type.to_string(),
        operation_type: "venta".to_string(),
        images: vec![format!("https://cdn.example.com/listings/{id}.jpg")],
        status: "available".to_string(),
    }
}

/// Two tight groups of 30 listings, far enough apart to land in separate cells
fn two_neighbourhoods() -> Vec<PropertyGeoRecord> {
    let mut records = Vec::new();
    for i in 0..30 {
        let offset = i as f64 * 0.00001;
        records.push(record(i + 1, -34.600 + offset, -58.380 + offset, "house"));
        records.push(record(i + 101, -34.700 + offset, -58.500 + offset, "departamento"));
    }
    records
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn map_with_sink(sink: Arc<MemorySink>) -> InteractivePropertyMap {
    init_logging();
    MapBuilder::new()
        .with_width(1280.0)
        .with_analytics(sink)
        .build()
        .unwrap()
}

fn events_of(sink: &MemorySink, event_type: EventType) -> Vec<InteractionEvent> {
    sink.events()
        .into_iter()
        .filter(|event| event.event_type == event_type)
        .collect()
}

#[tokio::test]
async fn test_empty_result_shows_empty_view() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::new(Vec::new());
    let mut map = map_with_sink(sink.clone());

    map.mount();
    let outcome = map.load(&provider).await;

    assert_eq!(outcome, Some(LoadOutcome::Applied(StateKind::Empty)));
    let view = map.render();
    assert!(view.html.contains(EMPTY_MESSAGE));
    assert!(view.markers.is_empty() && view.clusters.is_empty());
    assert!(view.fit.is_none());

    let loaded = events_of(&sink, EventType::MapLoaded);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].metadata["count"], 0);
}

#[tokio::test]
async fn test_error_then_retry_recovers() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::failing("503 Service Unavailable");
    let mut map = map_with_sink(sink.clone());

    map.mount();
    map.load(&provider).await;

    assert_eq!(
        map.state(),
        &MapUiState::Error {
            message: "503 Service Unavailable".into()
        }
    );
    let html = map.render().html;
    assert!(html.contains("503 Service Unavailable"));
    assert!(html.contains(RETRY_LABEL));
    assert_eq!(events_of(&sink, EventType::MapError).len(), 1);

    provider.set_records(vec![record(1, -34.6, -58.4, "house")]);
    let command = map.handle_event(InputEvent::Retry, Instant::now());
    assert!(matches!(command, Some(MapCommand::Fetch(_))));
    assert_eq!(map.state_kind(), StateKind::Loading);

    map.load(&provider).await;
    assert_eq!(map.state_kind(), StateKind::Ready);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(events_of(&sink, EventType::MapLoaded).len(), 1);
}

#[tokio::test]
async fn test_retry_while_loading_is_noop() {
    let mut map = MapBuilder::new().build().unwrap();
    let ticket = map.mount();

    assert_eq!(map.handle_event(InputEvent::Retry, Instant::now()), None);
    assert_eq!(map.handle_event(InputEvent::Refresh, Instant::now()), None);
    assert_eq!(map.in_flight(), Some(ticket));
}

#[tokio::test]
async fn test_sixty_listings_cluster_zoom_and_popup() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::new(two_neighbourhoods());
    let mut map = map_with_sink(sink.clone());

    map.mount();
    map.load(&provider).await;
    map.hydrate(1.0);
    let fit = map.take_viewport_adjustment().unwrap();
    assert!(map.viewport().zoom <= fit.max_zoom);

    let view = map.render();
    assert!(view.clustered);
    assert_eq!(view.represented_count(), 60);
    assert!(view.markers.len() + view.clusters.len() < 60);

    let cluster = view.clusters.iter().find(|c| c.count > 1).unwrap().clone();
    let zoom_before = map.viewport().zoom;
    let action = map
        .handle_event(
            InputEvent::ClusterClick {
                cluster_id: cluster.cluster_id.clone(),
            },
            Instant::now(),
        )
        .unwrap();
    assert!(matches!(
        action,
        MapCommand::Cluster(ClusterAction::ZoomToBounds(_))
    ));
    assert!(map.viewport().zoom > zoom_before);

    let property_id = cluster.property_ids[0];
    let zoomed = map.render();
    if let Some(group) = zoomed
        .clusters
        .iter()
        .find(|c| c.property_ids.contains(&property_id))
    {
        assert!(map.viewport().is_at_max_zoom());
        let action = map.click_cluster(&group.cluster_id).unwrap();
        assert!(matches!(action, ClusterAction::Spiderfy(_)));
    }
    let popup = map.click_marker(property_id).unwrap();
    assert!(popup.to_html().contains("Ver Detalles"));
    assert_eq!(popup.price_label, "US$ 150.000");
    assert_eq!(popup.operation_label, "Venta");

    let navigation = map.view_details(property_id).unwrap();
    assert_eq!(navigation.href, format!("/propiedades/{property_id}"));

    let loaded = events_of(&sink, EventType::MapLoaded);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].metadata["count"], 60);
    assert_eq!(loaded[0].metadata["clustering"], true);
    assert_eq!(events_of(&sink, EventType::MapPinClick).len(), 1);

    let details = events_of(&sink, EventType::MapViewDetails);
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].property_id, Some(property_id));
}

#[tokio::test]
async fn test_pins_inside_a_badge_are_not_clickable() {
    let sink = Arc::new(MemorySink::new());
    let stacked: Vec<_> = (1..=60).map(|id| record(id, -34.6, -58.4, "house")).collect();
    let provider = StaticProvider::new(stacked);
    let mut map = map_with_sink(sink.clone());

    map.mount();
    map.load(&provider).await;
    map.hydrate(1.0);
    map.take_viewport_adjustment();

    let view = map.render();
    assert_eq!(view.clusters.len(), 1);
    assert_eq!(view.clusters[0].count, 60);
    assert!(map.click_marker(30).is_none());
    assert!(map.popup().is_none());
    assert!(events_of(&sink, EventType::MapPinClick).is_empty());
}

#[tokio::test]
async fn test_cluster_at_max_zoom_spiderfies() {
    let mut records = Vec::new();
    for id in 1..=4 {
        records.push(record(id, -34.6, -58.4, "house"));
    }
    let provider = StaticProvider::new(records);
    let mut map = MapBuilder::new()
        .with_clustering(true)
        .with_render_context(RenderContext::interactive(1.0))
        .build()
        .unwrap();

    map.mount();
    map.load(&provider).await;
    map.take_viewport_adjustment();
    map.handle_event(InputEvent::ZoomChanged { zoom: 18.0 }, Instant::now());

    let view = map.render();
    assert_eq!(view.clusters.len(), 1);

    let action = map.click_cluster(&view.clusters[0].cluster_id).unwrap();
    match action {
        ClusterAction::Spiderfy(legs) => assert_eq!(legs.len(), 4),
        other => panic!("expected spiderfy, got {other:?}"),
    }
}

#[tokio::test]
async fn test_listing_without_images_uses_placeholder() {
    let mut listing = record(7, -34.6, -58.4, "terreno");
    listing.images.clear();
    let provider = StaticProvider::new(vec![listing]);
    let mut map = MapBuilder::new()
        .with_render_context(RenderContext::interactive(1.0))
        .build()
        .unwrap();

    map.mount();
    map.load(&provider).await;

    let popup = map.click_marker(7).unwrap();
    assert!(popup.uses_placeholder());
    assert_eq!(popup.image_url, map.settings().placeholder_image);
    assert_eq!(popup.type_label, "Terreno");
}

#[tokio::test]
async fn test_spanish_and_english_types_share_labels() {
    let provider = StaticProvider::new(vec![
        record(1, -34.6, -58.4, "Casa"),
        record(2, -34.61, -58.41, "house"),
        record(3, -34.62, -58.42, "quinta"),
    ]);
    let mut map = MapBuilder::new()
        .with_render_context(RenderContext::interactive(1.0))
        .build()
        .unwrap();

    map.mount();
    map.load(&provider).await;

    assert_eq!(map.click_marker(1).unwrap().type_label, "Casa");
    assert_eq!(map.click_marker(2).unwrap().type_label, "Casa");
    assert_eq!(map.click_marker(3).unwrap().type_label, "Quinta");
    assert_eq!(map.popup().unwrap().content.property_id, 3);
}

#[tokio::test]
async fn test_refresh_reloads_and_tracks_again() {
    let sink = Arc::new(MemorySink::new());
    let provider = StaticProvider::new(vec![record(1, -34.6, -58.4, "house")]);
    let mut map = map_with_sink(sink.clone());

    map.mount();
    map.load(&provider).await;
    assert!(map.take_viewport_adjustment().is_some());

    provider.set_records(vec![
        record(1, -34.6, -58.4, "house"),
        record(2, -34.5, -58.3, "house"),
    ]);
    assert!(map.refresh().is_some());
    map.load(&provider).await;

    assert_eq!(map.records().len(), 2);
    assert!(map.take_viewport_adjustment().is_some());
    assert_eq!(events_of(&sink, EventType::MapLoaded).len(), 2);
}
