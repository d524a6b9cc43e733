use anyhow::{bail, Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use propmap::prelude::*;

/// Renders `records.json` into an HTML page on stdout
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: propmap-app <records.json> [width] [settings.json]");
    };
    let width: f64 = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("invalid width {raw:?}"))?,
        None => 1280.0,
    };
    let settings = match args.next() {
        Some(settings_path) => {
            let raw = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("reading {settings_path}"))?;
            MapSettings::from_json(&raw)?
        }
        None => MapSettings::default(),
    };

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let records: Vec<PropertyGeoRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
    log::info!("Loaded {} records from {}", records.len(), path);

    let provider = Arc::new(StaticProvider::new(records));
    let mut map = MapBuilder::new()
        .with_settings(settings)
        .with_width(width)
        .with_analytics(Arc::new(LogSink))
        .with_render_context(RenderContext::interactive(1.0))
        .build()?;

    map.mount();
    if let Some(pending) = map.spawn_in_flight(provider) {
        map.finish(pending).await;
    }
    map.take_viewport_adjustment();

    println!("{}", page(&map).into_string());
    Ok(())
}

fn page(map: &InteractivePropertyMap) -> Markup {
    let view = map.render();
    let viewport = map.viewport();

    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                title { "Mapa de propiedades" }
            }
            body {
                (PreEscaped(view.html.clone()))
                p class="property-map__summary" {
                    "Centro " (format!("{:.4}, {:.4}", viewport.center.lat, viewport.center.lng))
                    " zoom " (viewport.zoom)
                }
                div class="property-map__pins" {
                    @for marker in &view.markers {
                        @if let Some(icon) = marker.icon.icon() {
                            (PreEscaped(icon.html.clone()))
                        }
                    }
                    @for cluster in &view.clusters {
                        @if let Some(icon) = cluster.icon.icon() {
                            (PreEscaped(icon.html.clone()))
                        }
                    }
                }
                section class="property-list" {
                    @for record in map.records() {
                        (map.thumbnail(record))
                    }
                }
            }
        }
    }
}
