use chrono::{Months, NaiveDate};
use returns_chart::api::{HitTarget, HitTestSource, MeasuredSurface, ValueBasis};
use returns_chart::core::{TimeSeries, TimeSeriesPoint, ViewportConfig, ZoomTransform};
use returns_chart::interaction::{GestureEvent, InteractionMode, WheelDeltaMode, ZoomCommand};
use returns_chart::render::{CanvasLayerKind, NullRenderer};
use returns_chart::{ChartConfig, ChartEngine, SceneStatus};

fn series(months: u32) -> TimeSeries {
    let first = NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid date");
    let points = (0..months)
        .map(|i| {
            let date_start = first + Months::new(i);
            let value_start = 1.0 + f64::from(i) * 0.02;
            TimeSeriesPoint::new(
                date_start,
                date_start + Months::new(1),
                value_start,
                value_start + 0.02,
            )
            .with_benchmark(1.0 + f64::from(i) * 0.01)
        })
        .collect();
    TimeSeries::new(points).expect("valid series")
}

fn engine() -> ChartEngine<NullRenderer> {
    ChartEngine::with_size(NullRenderer::default(), ChartConfig::default(), 800.0, 400.0)
        .expect("engine init")
}

#[test]
fn building_twice_reuses_the_cached_layout() {
    let mut engine = engine();
    engine.set_series(series(24));

    let first = engine.build_scene();
    assert_eq!(first.status, SceneStatus::Ready);
    let cached = engine.layout().expect("layout").clone();

    let second = engine.build_scene();
    assert_eq!(second.frame, first.frame);
    assert_eq!(engine.layout(), Some(&cached));
}

#[test]
fn zoom_gesture_rescales_before_the_next_hit_test() {
    let mut engine = engine();
    engine.set_series(series(24));
    engine.build_scene();
    let before = engine.layout().expect("layout").x_scale;

    engine.handle_zoom_gesture(GestureEvent::Wheel {
        delta_y: -500.0,
        delta_mode: WheelDeltaMode::Pixel,
        x: 400.0,
        y: 200.0,
    });
    assert_eq!(engine.transform().k, 2.0);

    let tooltip = engine.handle_pointer_move(400.0, 200.0);
    assert!(tooltip.is_visible());
    let layout = engine.layout().expect("layout");
    assert_eq!(layout.key.transform, engine.transform());
    assert_ne!(layout.x_scale, before);

    let Some(hit) = tooltip.hit() else {
        panic!("tooltip should be visible");
    };
    let HitTarget::Point(index) = hit.target else {
        panic!("raw points are hit by default");
    };
    let point = &engine.series().points()[index];
    let time = layout.x_scale.pixel_to_time(400.0);
    assert!(point.start_time() <= time + 1e-3 && time <= point.end_time() + 1e-3);
}

#[test]
fn zoom_hides_the_tooltip_and_pointer_leave_clears_it() {
    let mut engine = engine();
    engine.set_series(series(24));
    assert!(engine.handle_pointer_move(300.0, 200.0).is_visible());

    engine.apply_zoom_command(ZoomCommand::ScaleBy {
        factor: 2.0,
        anchor_x: 300.0,
        anchor_y: 200.0,
    });
    assert!(!engine.tooltip().is_visible());

    assert!(engine.handle_pointer_move(300.0, 200.0).is_visible());
    assert!(!engine.handle_pointer_leave().is_visible());
}

#[test]
fn render_draws_data_and_axes_through_the_renderer() {
    let mut engine = engine();
    engine.set_series(series(24));
    engine.handle_pointer_move(300.0, 200.0);

    let status = engine
        .render(MeasuredSurface::new(800.0, 400.0))
        .expect("render");
    assert_eq!(status, SceneStatus::Ready);

    let renderer = engine.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 24);
    assert!(renderer.last_polyline_count >= 2);
    assert!(renderer.last_text_count > 0);
    // Two crosshair lines, two axis baselines, plus grid and tick lines.
    assert!(renderer.last_line_count >= 4);
}

#[test]
fn unmeasured_surface_defers_without_rendering() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartConfig::default(),
        ViewportConfig::new(0.0, 0.0),
    )
    .expect("engine init");
    engine.set_series(series(12));

    assert_eq!(engine.build_scene().status, SceneStatus::Deferred);
    assert!(!engine.handle_pointer_move(10.0, 10.0).is_visible());
    assert_eq!(
        engine
            .render(MeasuredSurface::new(0.0, 0.0))
            .expect("deferred render"),
        SceneStatus::Deferred
    );
    assert_eq!(engine.renderer().frames_rendered, 0);

    let pass = engine.commit_surface(MeasuredSurface::new(640.0, 360.0));
    assert!(!pass.time_ticks.is_empty());
    assert_eq!(engine.viewport().width, 640.0);
    assert_eq!(engine.build_scene().status, SceneStatus::Ready);
}

#[test]
fn empty_chart_renders_the_placeholder() {
    let mut engine = engine();
    let status = engine
        .render(MeasuredSurface::new(800.0, 400.0))
        .expect("render");
    assert_eq!(status, SceneStatus::Empty);
    assert_eq!(engine.renderer().last_text_count, 1);
    assert_eq!(engine.renderer().last_rect_count, 0);
}

#[test]
fn set_series_keeps_the_transform_and_remount_resets_it() {
    let mut engine = engine();
    engine.set_series(series(24));
    engine.apply_zoom_command(ZoomCommand::Set(ZoomTransform::new(3.0, -50.0, -20.0)));
    engine.build_scene();

    engine.set_series(series(36));
    assert_eq!(engine.transform().k, 3.0);
    engine.build_scene();
    assert_eq!(engine.layout().expect("layout").key.series_id, engine.series().id());

    engine.handle_zoom_gesture(GestureEvent::PointerDown { x: 10.0, y: 10.0 });
    assert_eq!(engine.interaction_mode(), InteractionMode::Panning);

    engine.remount(series(12));
    assert!(engine.transform().is_identity());
    assert_eq!(engine.interaction_mode(), InteractionMode::Idle);
    assert!(engine.layout().is_none());
}

#[test]
fn bars_hit_source_resolves_merged_bars() {
    let config = ChartConfig::default().with_hit_test_source(HitTestSource::Bars);
    let mut engine =
        ChartEngine::with_size(NullRenderer::default(), config, 800.0, 400.0).expect("engine init");
    engine.set_series(series(600));

    let scene = engine.build_scene();
    assert_eq!(scene.granularity, Some(4));

    let tooltip = engine.handle_pointer_move(300.0, 200.0);
    let hit = tooltip.hit().expect("visible tooltip");
    assert!(matches!(hit.target, HitTarget::Bar(_)));

    let scene = engine.build_scene();
    let panel = scene.panel.expect("panel for the highlighted bar");
    assert!(panel.period_label.contains(" - "));
    assert_eq!(scene.frame.layer(CanvasLayerKind::Crosshair).lines.len(), 2);
}

#[test]
fn payloads_load_and_report_their_hash() {
    let mut engine = engine();
    let input = r#"{
        "data": { "monthly_data": [
            { "date": [2020, 1], "value_start": 1.0, "value_end": 1.1 },
            { "date": [2020, 2], "value_start": 1.1, "value_end": 1.05 }
        ] },
        "config_hash": "f00d"
    }"#;

    let hash = engine
        .load_payload(input, ValueBasis::Pretax)
        .expect("payload");
    assert_eq!(hash.as_deref(), Some("f00d"));
    assert_eq!(engine.series().len(), 2);

    assert!(engine.load_payload("[", ValueBasis::Pretax).is_err());
    assert_eq!(engine.series().len(), 2);

    engine.clear_series();
    assert_eq!(engine.build_scene().status, SceneStatus::Empty);
}

#[test]
fn config_change_keeps_the_transform_and_applies_margins() {
    let mut engine = engine();
    engine.set_series(series(24));
    engine.apply_zoom_command(ZoomCommand::Set(ZoomTransform::new(2.0, -40.0, 0.0)));
    engine.build_scene();

    let config = ChartConfig::default().with_margin(returns_chart::core::Margin::uniform(50.0));
    engine.set_config(config).expect("valid config");
    assert!(engine.layout().is_none());
    assert_eq!(engine.transform().k, 2.0);
    assert_eq!(engine.viewport().margin.left, 50.0);

    engine.build_scene();
    assert_eq!(engine.layout().expect("layout").plot.left, 50.0);
}

#[test]
fn zoom_revision_advances_per_command_and_survives_data_changes() {
    let mut engine = engine();
    engine.set_series(series(24));
    assert_eq!(engine.zoom_revision(), 0);

    engine.apply_zoom_command(ZoomCommand::ScaleBy {
        factor: 2.0,
        anchor_x: 400.0,
        anchor_y: 200.0,
    });
    assert_eq!(engine.zoom_revision(), 1);

    engine.handle_zoom_gesture(GestureEvent::Wheel {
        delta_y: -100.0,
        delta_mode: WheelDeltaMode::Pixel,
        x: 400.0,
        y: 200.0,
    });
    assert_eq!(engine.zoom_revision(), 2);

    engine.set_series(series(36));
    assert_eq!(engine.zoom_revision(), 2);

    let zoomed = engine.transform();
    engine
        .set_config(ChartConfig::default())
        .expect("valid config");
    assert_eq!(engine.zoom_revision(), 2);
    assert_eq!(engine.transform(), zoomed);

    engine.reset_zoom();
    assert_eq!(engine.zoom_revision(), 3);
    assert!(engine.transform().is_identity());
}
