use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use scrim_compositor::*;
use scrim_core::*;
use serde_json::json;

const CONFIG: &str = include_str!("overlay.json");

fn print_frame(title: &str, overlay: &OverlayCompositor) {
    println!("── {title}");
    for f in overlay.frame() {
        let state = format!("{:?}", f.state);
        println!("{:<10} {:<12} {}", f.widget.id, state, f.style.to_css());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = OverlayConfig::from_json(CONFIG)?;
    let settle = config
        .collision
        .settle
        .delay()
        .unwrap_or(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS));

    let registry = WidgetRegistry::new()
        .with(WidgetDefinition::new("badge").default_size(72.0, 24.0))
        .with(WidgetDefinition::new("toolbar").interactive(true));

    let clock = Arc::new(ManualClock::new());
    let timers = Timers::new(clock.clone());
    let platform = HeadlessPlatform::desktop();

    let mut overlay: OverlayCompositor = OverlayCompositor::new(
        Rc::new(registry),
        Rc::new(platform.clone()),
        timers,
        config.collision.clone(),
    );
    overlay.on_widget_click(|id, data| log::info!("clicked `{id}` with {data:?}"));
    overlay.set_widgets(config.widgets);
    overlay.set_data("live", json!({ "label": "LIVE" }));
    overlay.set_data("viewers", json!({ "count": 1204 }));

    let layout = MeasureSnapshot::new(Rect::new(0.0, 0.0, 640.0, 360.0));

    clock.advance(settle);
    overlay.tick(&layout);
    if let Some(pass) = overlay.last_pass() {
        log::info!(
            "{} collisions, {} widgets moved",
            pass.collisions.len(),
            pass.adjusted_positions.len()
        );
    }
    print_frame("after settle", &overlay);

    overlay.handle_event(OverlayEvent::ContainerEnter);
    overlay.handle_event(OverlayEvent::WidgetEnter("toolbar".into()));
    overlay.handle_event(OverlayEvent::WidgetLeave("toolbar".into()));
    overlay.handle_event(OverlayEvent::WidgetEnter("tip".into()));
    print_frame("pointer over tip", &overlay);

    clock.advance(Duration::from_millis(250));
    overlay.tick(&layout);
    print_frame("tip delay elapsed", &overlay);

    overlay.click("toolbar");
    overlay.key_press("live", Key::Enter);

    platform.set_reduced_motion(true);
    overlay.handle_event(OverlayEvent::ContainerLeave);
    clock.advance(Duration::from_millis(250));
    overlay.tick(&layout);
    print_frame("reduced motion, pointer gone", &overlay);

    overlay.destroy();
    Ok(())
}
