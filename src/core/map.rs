use crate::{
    core::{
        config::{Breakpoint, ImagePreset, MapOverrides, MapSettings, ResolvedMapOptions},
        geo::{LatLng, Point},
        state::{LoadOutcome, LoadTicket, MapStateMachine, MapUiState, StateKind},
        viewport::{FitBounds, Viewport, ViewportCalculator, ViewportSync},
    },
    data::{
        property::{PropertyGeoRecord, PropertyKind},
        provider::GeoDataProvider,
    },
    input::{debounce::BreakpointWatcher, events::InputEvent},
    layers::marker::{ClusterMarker, Marker, MarkerFactory},
    rendering::context::RenderContext,
    spatial::clustering::{Cluster, ClusterAction, ClusterPolicy, Clustering},
    tracking::InteractionTracker,
    ui::{
        popup::{Popup, PopupContent, PopupManager, PopupRenderer},
        views,
    },
    Result,
};
use instant::Instant;
use maud::{html, Markup};
use std::time::Duration;

/// Member payload kept in the cluster index
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pin {
    property_id: i64,
    kind: PropertyKind,
}

/// Where the "Ver Detalles" action sends the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub property_id: i64,
    pub href: String,
}

/// What the embedding page should do after an input event
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Run the fetch identified by the ticket
    Fetch(LoadTicket),
    ShowPopup(PopupContent),
    Cluster(ClusterAction),
    Navigate(Navigation),
    /// Render again
    Redraw,
    /// Accepted; the effect shows up on a later [`InteractivePropertyMap::tick`]
    Deferred,
}

/// Everything needed to draw one frame of the map region
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub state: StateKind,
    pub options: ResolvedMapOptions,
    pub clustered: bool,
    /// Drawable single-property markers
    pub markers: Vec<Marker>,
    /// Drawable cluster badges
    pub clusters: Vec<ClusterMarker>,
    /// Icons skipped this pass for lack of a render context
    pub pending_icons: usize,
    pub fit: Option<FitBounds>,
    pub html: String,
}

impl MapView {
    /// Number of properties represented, whether as pins or inside badges
    pub fn represented_count(&self) -> usize {
        self.markers.len() + self.clusters.iter().map(|c| c.count).sum::<usize>()
    }
}

/// The interactive property map: data lifecycle, markers, clusters,
/// popups and analytics for one mounted map
pub struct InteractivePropertyMap {
    settings: MapSettings,
    overrides: MapOverrides,
    machine: MapStateMachine,
    breakpoints: BreakpointWatcher,
    viewport: Viewport,
    sync: ViewportSync,
    markers: MarkerFactory,
    popups: PopupRenderer,
    popup: PopupManager,
    tracker: InteractionTracker,
    context: RenderContext,
    policy: ClusterPolicy,
    clustering: Clustering<Pin>,
    /// Member ids fanned out by the last spiderfy
    spiderfied: Vec<String>,
}

impl InteractivePropertyMap {
    pub(crate) fn from_parts(
        settings: MapSettings,
        overrides: MapOverrides,
        width: f64,
        markers: MarkerFactory,
        popups: PopupRenderer,
        tracker: InteractionTracker,
        context: RenderContext,
    ) -> Self {
        let breakpoint = Breakpoint::from_width(width);
        let options = overrides.resolve(breakpoint);
        let calculator = ViewportCalculator::new(
            Point::new(settings.fit_padding.0, settings.fit_padding.1),
            settings.max_fit_zoom,
        );

        let mut viewport = Viewport::new(
            LatLng::new(settings.center.0, settings.center.1),
            options.zoom,
            Point::new(width, options.height_px),
        );
        viewport.set_zoom_limits(settings.min_zoom, settings.max_zoom);

        let policy = ClusterPolicy::new(settings.cluster_threshold).with_explicit(overrides.clustering);
        let window = Duration::from_millis(settings.resize_debounce_ms);

        Self {
            machine: MapStateMachine::new(calculator),
            breakpoints: BreakpointWatcher::new(breakpoint, window),
            viewport,
            sync: ViewportSync::new(),
            markers,
            popups,
            popup: PopupManager::new(),
            tracker,
            context,
            policy,
            clustering: Clustering::default(),
            spiderfied: Vec::new(),
            settings,
            overrides,
        }
    }

    /// Enters Loading; the returned ticket identifies the first fetch
    pub fn mount(&mut self) -> LoadTicket {
        self.sync.reset();
        self.machine.mount()
    }

    /// Stops accepting responses; a late fetch result is discarded
    pub fn unmount(&mut self) {
        self.machine.unmount();
        self.popup.close();
        self.spiderfied.clear();
    }

    pub fn retry(&mut self) -> Option<LoadTicket> {
        self.machine.retry()
    }

    pub fn refresh(&mut self) -> Option<LoadTicket> {
        let ticket = self.machine.refresh();
        if ticket.is_some() {
            self.popup.close();
        }
        ticket
    }

    /// Hands the result of a fetch back to the map
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<PropertyGeoRecord>>,
    ) -> LoadOutcome {
        if self.machine.is_mounted() && self.machine.in_flight() == Some(ticket) {
            if let Err(err) = &result {
                self.tracker.map_error(err);
            }
        }

        let outcome = self.machine.complete(ticket, result);
        if let LoadOutcome::Applied(kind) = outcome {
            self.on_settled(kind);
        }
        outcome
    }

    /// Runs the in-flight fetch against `provider`, if there is one
    pub async fn load(&mut self, provider: &dyn GeoDataProvider) -> Option<LoadOutcome> {
        let ticket = self.machine.in_flight()?;
        let result = provider.fetch_properties(self.max_properties()).await;
        Some(self.complete_load(ticket, result))
    }

    fn on_settled(&mut self, kind: StateKind) {
        self.popup.close();
        self.clustering.clear();
        self.spiderfied.clear();

        if !matches!(kind, StateKind::Ready | StateKind::Empty) {
            return;
        }

        let records = self.machine.state().records();
        for record in records {
            if let Some(position) = record.position() {
                let pin = Pin {
                    property_id: record.id,
                    kind: record.kind(),
                };
                self.clustering.add_item(record.id.to_string(), position, pin);
            }
        }

        let count = records.len();
        self.tracker.map_loaded(count, self.render_clustered());
    }

    /// Builds markers, badges and markup for the current state.
    ///
    /// Does not mutate anything; calling it twice yields the same view.
    pub fn render(&self) -> MapView {
        let state = self.machine.state();
        let options = self.options();
        let count = state.records().len();
        let clustered = state.kind() == StateKind::Ready && self.policy.should_cluster(count);

        let mut markers = Vec::new();
        let mut clusters = Vec::new();
        let mut pending_icons = 0;

        if clustered {
            for cluster in self.visible_clusters() {
                if cluster.is_single() {
                    let item = &cluster.items[0];
                    match self.marker(item.data.property_id, item.position, item.data.kind) {
                        Some(marker) => markers.push(marker),
                        None => pending_icons += 1,
                    }
                    continue;
                }

                let spec = self.markers.cluster_icon_spec(cluster.count());
                let icon = self.markers.icon_state(&spec, &self.context);
                if !icon.is_ready() {
                    pending_icons += 1;
                    continue;
                }
                clusters.push(ClusterMarker {
                    property_ids: cluster.items.iter().map(|i| i.data.property_id).collect(),
                    count: cluster.count(),
                    position: cluster.center,
                    cluster_id: cluster.id,
                    icon,
                });
            }
        } else {
            for record in state.records() {
                let Some(position) = record.position() else {
                    continue;
                };
                match self.marker(record.id, position, record.kind()) {
                    Some(marker) => markers.push(marker),
                    None => pending_icons += 1,
                }
            }
        }

        let html = self.render_html(state, &options, clustered);

        MapView {
            state: state.kind(),
            options,
            clustered,
            markers,
            clusters,
            pending_icons,
            fit: state.fit_bounds().cloned(),
            html,
        }
    }

    fn marker(&self, property_id: i64, position: LatLng, kind: PropertyKind) -> Option<Marker> {
        let spec = self.markers.property_icon_spec(kind);
        let icon = self.markers.icon_state(&spec, &self.context);
        icon.is_ready().then(|| Marker::new(property_id, position, kind, icon))
    }

    fn render_html(&self, state: &MapUiState, options: &ResolvedMapOptions, clustered: bool) -> String {
        let content = match state {
            MapUiState::Loading => views::loading_view(),
            MapUiState::Error { message } => views::error_view(message),
            MapUiState::Empty => views::empty_view(),
            MapUiState::Ready { records, .. } => html! {
                div id=(self.settings.target_id)
                    class="property-map__canvas"
                    data-count=(records.len())
                    data-clustered=(clustered.to_string())
                    data-zoom-control=(options.zoom_control.to_string())
                    data-dragging=(options.dragging.to_string())
                    data-touch-zoom=(options.touch_zoom.to_string())
                    data-scroll-wheel-zoom=(options.scroll_wheel_zoom.to_string()) {}
                @if let Some(popup) = self.popup.current() {
                    div class="property-map__popup-layer" {
                        (popup.content.render())
                    }
                }
            },
        };

        views::map_container(options, state.kind().as_str(), content).into_string()
    }

    /// Fit bounds to apply to the viewport, once per distinct bounds
    pub fn take_viewport_adjustment(&mut self) -> Option<FitBounds> {
        let current = self.machine.state().fit_bounds().cloned();
        let fit = self.sync.take_adjustment(current.as_ref())?;
        self.viewport.fit_bounds(&fit);
        self.spiderfied.clear();
        Some(fit)
    }

    /// Opens the popup of a drawn pin and reports the click.
    ///
    /// Pins folded into a cluster badge, culled off screen or still waiting
    /// for their icon cannot be clicked.
    pub fn click_marker(&mut self, property_id: i64) -> Option<PopupContent> {
        let record = self.find_record(property_id)?;
        if !self.is_drawn(record) {
            return None;
        }
        let position = record.position()?;
        let kind = record.kind();
        let content = self.popups.render(record);

        self.tracker.pin_click(property_id, kind);
        self.popup.open(Popup {
            position,
            content: content.clone(),
        });
        Some(content)
    }

    /// Zooms into a cluster, or spiderfies it at max zoom
    pub fn click_cluster(&mut self, cluster_id: &str) -> Option<ClusterAction> {
        if !self.render_clustered() {
            return None;
        }

        let action = self.clustering.activate(cluster_id, &self.viewport)?;
        if let ClusterAction::Spiderfy(legs) = &action {
            self.spiderfied = legs.iter().map(|leg| leg.id.clone()).collect();
        }
        if let ClusterAction::ZoomToBounds(bounds) = &action {
            let before = self.viewport.zoom;
            self.viewport.fit_bounds(&FitBounds {
                bounds: bounds.clone(),
                padding: Point::new(self.settings.fit_padding.0, self.settings.fit_padding.1),
                max_zoom: self.viewport.max_zoom,
            });
            if self.viewport.zoom <= before {
                self.viewport.set_zoom(before + 1.0);
            }
            self.popup.close();
            self.spiderfied.clear();
        }
        Some(action)
    }

    /// Reports the view-details action, then hands back where to navigate
    pub fn view_details(&mut self, property_id: i64) -> Option<Navigation> {
        self.find_record(property_id)?;
        self.tracker.view_details(property_id);
        Some(Navigation {
            property_id,
            href: self.settings.detail_href(property_id),
        })
    }

    /// List card for a record, with its cover resolved at thumbnail size
    pub fn thumbnail(&self, record: &PropertyGeoRecord) -> Markup {
        let image_url = self.popups.image_for(record, &ImagePreset::thumbnail());
        views::property_thumbnail(record, &image_url, self.popups.placeholder())
    }

    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    /// Records a container width; applied once the debounce window passes
    pub fn resize(&mut self, width: f64, at: Instant) {
        self.breakpoints.on_resize(width, at);
    }

    /// Applies a settled resize. Returns the new breakpoint when it changed.
    pub fn tick(&mut self, now: Instant) -> Option<Breakpoint> {
        let before = self.breakpoints.recompute_count();
        let changed = self.breakpoints.poll(now);

        if self.breakpoints.recompute_count() != before {
            if let Some(width) = self.breakpoints.width() {
                self.viewport.set_size(Point::new(width, self.options().height_px));
            }
        }
        changed
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> Option<MapCommand> {
        match event {
            InputEvent::Resize { width } => {
                self.resize(width, now);
                Some(MapCommand::Deferred)
            }
            InputEvent::ZoomChanged { zoom } => {
                self.viewport.set_zoom(zoom);
                self.spiderfied.clear();
                Some(MapCommand::Redraw)
            }
            InputEvent::MarkerClick { property_id } => {
                self.click_marker(property_id).map(MapCommand::ShowPopup)
            }
            InputEvent::ClusterClick { cluster_id } => {
                self.click_cluster(&cluster_id).map(MapCommand::Cluster)
            }
            InputEvent::ViewDetails { property_id } => {
                self.view_details(property_id).map(MapCommand::Navigate)
            }
            InputEvent::Retry => self.retry().map(MapCommand::Fetch),
            InputEvent::Refresh => self.refresh().map(MapCommand::Fetch),
        }
    }

    /// Marks the render context ready; icons materialize from the next render
    pub fn hydrate(&mut self, device_pixel_ratio: f32) {
        self.context.hydrate(device_pixel_ratio);
    }

    fn render_clustered(&self) -> bool {
        let state = self.machine.state();
        state.kind() == StateKind::Ready && self.policy.should_cluster(state.records().len())
    }

    /// Clusters at the current zoom, limited to the visible area
    fn visible_clusters(&self) -> Vec<Cluster<Pin>> {
        let visible = self.viewport.visible_bounds();
        self.clustering.get_clusters(Some(&visible), self.viewport.zoom)
    }

    fn is_drawn(&self, record: &PropertyGeoRecord) -> bool {
        let Some(position) = record.position() else {
            return false;
        };
        if self.marker(record.id, position, record.kind()).is_none() {
            return false;
        }
        if !self.render_clustered() {
            return true;
        }

        let id = record.id.to_string();
        self.spiderfied.contains(&id)
            || self
                .visible_clusters()
                .iter()
                .any(|cluster| cluster.is_single() && cluster.id == id)
    }

    fn find_record(&self, property_id: i64) -> Option<&PropertyGeoRecord> {
        self.machine
            .state()
            .records()
            .iter()
            .find(|record| record.id == property_id)
    }

    pub fn state(&self) -> &MapUiState {
        self.machine.state()
    }

    pub fn state_kind(&self) -> StateKind {
        self.machine.kind()
    }

    pub fn records(&self) -> &[PropertyGeoRecord] {
        self.machine.state().records()
    }

    pub fn in_flight(&self) -> Option<LoadTicket> {
        self.machine.in_flight()
    }

    /// Cap passed to the provider on each fetch
    pub fn max_properties(&self) -> Option<usize> {
        self.overrides.max_properties
    }

    /// Breakpoint defaults merged under the caller's explicit values
    pub fn options(&self) -> ResolvedMapOptions {
        self.overrides.resolve(self.breakpoints.current())
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoints.current()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.current()
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.context
    }

    pub fn is_clustered(&self) -> bool {
        self.render_clustered()
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::MapBuilder;
    use crate::data::property::Currency;
    use crate::tracking::{EventType, MemorySink};
    use std::sync::Arc;

    fn record(id: i64, lat: f64, lng: f64) -> PropertyGeoRecord {
        PropertyGeoRecord {
            id,
            title: format!("Propiedad {id}"),
            price: 95_000.0,
            currency: Currency::Usd,
            latitude: Some(lat),
            longitude: Some(lng),
            property_type: "land".into(),
            operation_type: "sale".into(),
            images: Vec::new(),
            status: "available".into(),
        }
    }

    fn ready_map(records: Vec<PropertyGeoRecord>) -> InteractivePropertyMap {
        let mut map = MapBuilder::new().with_width(1200.0).build().unwrap();
        let ticket = map.mount();
        map.complete_load(ticket, Ok(records));
        map
    }

    fn tracked_map(
        records: Vec<PropertyGeoRecord>,
        sink: Arc<MemorySink>,
    ) -> InteractivePropertyMap {
        let mut map = MapBuilder::new()
            .with_width(1200.0)
            .with_clustering(true)
            .with_analytics(sink)
            .with_render_context(RenderContext::interactive(1.0))
            .build()
            .unwrap();
        let ticket = map.mount();
        map.complete_load(ticket, Ok(records));
        map.take_viewport_adjustment();
        map
    }

    #[test]
    fn test_server_render_skips_pending_icons() {
        let map = ready_map(vec![record(1, -34.6, -58.4), record(2, -34.7, -58.5)]);
        let view = map.render();

        assert_eq!(view.state, StateKind::Ready);
        assert!(view.markers.is_empty());
        assert_eq!(view.pending_icons, 2);
    }

    #[test]
    fn test_hydrated_render_draws_markers() {
        let mut map = ready_map(vec![record(1, -34.6, -58.4), record(2, -34.7, -58.5)]);
        map.hydrate(2.0);
        let view = map.render();

        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.pending_icons, 0);
        assert!(!view.clustered);
        assert_eq!(view, map.render());
    }

    #[test]
    fn test_viewport_adjusts_once_per_bounds() {
        let mut map = ready_map(vec![record(1, -34.6, -58.4)]);

        let fit = map.take_viewport_adjustment().unwrap();
        assert!(fit.bounds.is_point());
        assert_eq!(map.viewport().zoom, map.settings().max_fit_zoom);
        assert!(map.take_viewport_adjustment().is_none());
    }

    #[test]
    fn test_resize_applies_after_quiet_window() {
        let mut map = ready_map(vec![record(1, -34.6, -58.4)]);
        let start = Instant::now();

        map.resize(900.0, start);
        map.resize(700.0, start + Duration::from_millis(50));
        assert_eq!(map.tick(start + Duration::from_millis(100)), None);
        assert_eq!(
            map.tick(start + Duration::from_millis(250)),
            Some(Breakpoint::Mobile)
        );
        assert_eq!(map.viewport().size.x, 700.0);
        assert_eq!(map.options().height_px, 300.0);
    }

    #[test]
    fn test_thumbnail_uses_thumbnail_preset() {
        let mut listing = record(3, -34.6, -58.4);
        listing.images = vec!["listings/3-front".into()];
        let map = ready_map(vec![listing.clone()]);

        let html = map.thumbnail(&listing).into_string();
        assert!(html.contains("w_120,h_90"));
        assert!(html.contains("Propiedad 3"));
    }

    #[test]
    fn test_thumbnail_without_images_uses_placeholder() {
        let listing = record(4, -34.6, -58.4);
        let map = ready_map(vec![listing.clone()]);

        let html = map.thumbnail(&listing).into_string();
        let placeholder = &map.settings().placeholder_image;
        assert!(html.contains(&format!(r#"src="{placeholder}""#)));
        assert!(html.contains(&format!(r#"data-fallback="{placeholder}""#)));
    }

    #[test]
    fn test_empty_load_reports_no_clustering() {
        let sink = Arc::new(MemorySink::new());
        let map = tracked_map(Vec::new(), sink.clone());

        assert_eq!(map.state_kind(), StateKind::Empty);
        assert!(!map.render().clustered);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::MapLoaded);
        assert_eq!(events[0].metadata["clustering"], false);
    }

    #[test]
    fn test_only_drawn_pins_open_popups() {
        let sink = Arc::new(MemorySink::new());
        let stacked: Vec<_> = (1..=6).map(|id| record(id, -34.6, -58.4)).collect();
        let mut map = tracked_map(stacked, sink.clone());
        map.handle_event(InputEvent::ZoomChanged { zoom: 18.0 }, Instant::now());

        let view = map.render();
        assert!(view.markers.is_empty());
        assert_eq!(view.clusters.len(), 1);
        assert!(map.click_marker(3).is_none());
        assert!(map.popup().is_none());

        let action = map.click_cluster(&view.clusters[0].cluster_id).unwrap();
        assert!(matches!(action, ClusterAction::Spiderfy(ref legs) if legs.len() == 6));
        assert_eq!(map.click_marker(3).unwrap().property_id, 3);

        let clicks = sink
            .events()
            .into_iter()
            .filter(|e| e.event_type == EventType::MapPinClick)
            .count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_pending_icon_is_not_clickable() {
        let mut map = ready_map(vec![record(1, -34.6, -58.4)]);
        assert!(map.click_marker(1).is_none());

        map.hydrate(1.0);
        assert!(map.click_marker(1).is_some());
    }

    #[test]
    fn test_unknown_property_click_is_ignored() {
        let mut map = ready_map(vec![record(1, -34.6, -58.4)]);
        assert!(map.click_marker(99).is_none());
        assert!(map.view_details(99).is_none());
        assert!(map.popup().is_none());
    }
}
