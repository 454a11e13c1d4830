use returns_chart::core::ZoomTransform;
use returns_chart::interaction::{
    GestureEvent, GestureRecognizer, InteractionMode, TranslateConstraint, WheelDeltaMode,
    ZoomCommand, ZoomController, ZoomLimits,
};

fn build_zoom() -> ZoomController {
    ZoomController::new(ZoomLimits::default(), 800.0, 400.0).expect("zoom init")
}

#[test]
fn wheel_up_doubles_scale_per_five_hundred_pixels() {
    let mut zoom = build_zoom();

    let transform = zoom.apply(ZoomCommand::Wheel {
        delta_y: -500.0,
        delta_mode: WheelDeltaMode::Pixel,
        anchor_x: 60.0,
        anchor_y: 40.0,
    });

    assert!((transform.k - 2.0).abs() <= 1e-12);
    // Anchor stays fixed: 60 - 60 * 2 and 40 - 40 * 2, both inside the extent.
    assert!((transform.x - -60.0).abs() <= 1e-9);
    assert!((transform.y - -40.0).abs() <= 1e-9);
}

#[test]
fn line_mode_wheel_uses_a_coarser_step() {
    let mut zoom = build_zoom();
    let transform = zoom.apply(ZoomCommand::Wheel {
        delta_y: -20.0,
        delta_mode: WheelDeltaMode::Line,
        anchor_x: 0.0,
        anchor_y: 0.0,
    });
    assert!((transform.k - 2.0).abs() <= 1e-12);
}

#[test]
fn scale_is_clamped_into_the_extent() {
    let mut zoom = build_zoom();

    let zoomed_in = zoom.apply(ZoomCommand::ScaleBy {
        factor: 1_000.0,
        anchor_x: 0.0,
        anchor_y: 0.0,
    });
    assert_eq!(zoomed_in.k, 8.0);

    let zoomed_out = zoom.apply(ZoomCommand::ScaleBy {
        factor: 0.001,
        anchor_x: 0.0,
        anchor_y: 0.0,
    });
    assert_eq!(zoomed_out.k, 1.0);
}

#[test]
fn translate_is_clamped_to_overscroll_extent() {
    let mut zoom = build_zoom();

    let transform = zoom.apply(ZoomCommand::TranslateBy {
        dx: -5_000.0,
        dy: 5_000.0,
    });
    assert_eq!(transform.x, -100.0);
    assert_eq!(transform.y, 500.0);

    let transform = zoom.apply(ZoomCommand::ScaleBy {
        factor: 2.0,
        anchor_x: 400.0,
        anchor_y: 200.0,
    });
    assert_eq!(transform.k, 2.0);
    assert!(transform.x >= -100.0 && transform.x <= 900.0);
    assert!(transform.y >= -100.0 && transform.y <= 500.0);
}

#[test]
fn non_finite_proposals_are_ignored_but_still_signal() {
    let mut zoom = build_zoom();
    zoom.apply(ZoomCommand::TranslateBy { dx: 10.0, dy: 0.0 });
    let before = zoom.transform();
    let revision = zoom.revision();

    let after = zoom.apply(ZoomCommand::TranslateBy {
        dx: f64::NAN,
        dy: 0.0,
    });
    assert_eq!(after, before);

    let after = zoom.apply(ZoomCommand::ScaleBy {
        factor: f64::INFINITY,
        anchor_x: 10.0,
        anchor_y: 10.0,
    });
    assert_eq!(after, before);

    let after = zoom.apply(ZoomCommand::Set(ZoomTransform::new(f64::NAN, 0.0, 0.0)));
    assert_eq!(after, before);
    assert_eq!(zoom.revision(), revision + 3);
}

#[test]
fn reset_returns_to_identity() {
    let mut zoom = build_zoom();
    zoom.apply(ZoomCommand::Set(ZoomTransform::new(3.0, -50.0, -20.0)));
    assert!(!zoom.transform().is_identity());

    let transform = zoom.reset();
    assert!(transform.is_identity());
}

#[test]
fn shrinking_the_surface_reconstrains_translate() {
    let mut zoom = build_zoom();
    zoom.apply(ZoomCommand::TranslateBy { dx: 800.0, dy: 0.0 });
    assert_eq!(zoom.transform().x, 800.0);
    let revision = zoom.revision();

    zoom.set_surface_size(400.0, 400.0);
    assert_eq!(zoom.transform().x, 500.0);
    assert_eq!(zoom.surface_size(), (400.0, 400.0));
    assert_eq!(zoom.revision(), revision + 1);
}

#[test]
fn invalid_limits_are_rejected() {
    let inverted = ZoomLimits {
        scale_min: 8.0,
        scale_max: 1.0,
        ..ZoomLimits::default()
    };
    assert!(ZoomController::new(inverted, 800.0, 400.0).is_err());

    let negative_overscroll = ZoomLimits {
        overscroll_px: -1.0,
        ..ZoomLimits::default()
    };
    assert!(ZoomController::new(negative_overscroll, 800.0, 400.0).is_err());
}

#[test]
fn visible_window_mode_keeps_zoomed_content_reachable() {
    let limits = ZoomLimits {
        constraint: TranslateConstraint::VisibleWindow,
        ..ZoomLimits::default()
    };
    let mut zoom = ZoomController::new(limits, 800.0, 400.0).expect("zoom init");
    zoom.apply(ZoomCommand::ScaleBy {
        factor: 8.0,
        anchor_x: 0.0,
        anchor_y: 0.0,
    });

    let transform = zoom.apply(ZoomCommand::TranslateBy {
        dx: -100_000.0,
        dy: 0.0,
    });
    // Right edge of the visible window is pinned to the extent end (900).
    let visible_right = (900.0 - transform.x) / transform.k;
    assert!((visible_right - 900.0).abs() <= 1e-9);
}

#[test]
fn drag_emits_translate_deltas_between_down_and_up() {
    let mut recognizer = GestureRecognizer::default();
    assert_eq!(
        recognizer.recognize(GestureEvent::PointerDrag { x: 10.0, y: 10.0 }),
        None
    );

    assert_eq!(
        recognizer.recognize(GestureEvent::PointerDown { x: 100.0, y: 50.0 }),
        None
    );
    assert_eq!(recognizer.mode(), InteractionMode::Panning);
    assert_eq!(
        recognizer.recognize(GestureEvent::PointerDrag { x: 130.0, y: 40.0 }),
        Some(ZoomCommand::TranslateBy { dx: 30.0, dy: -10.0 })
    );
    assert_eq!(
        recognizer.recognize(GestureEvent::PointerDrag { x: 120.0, y: 40.0 }),
        Some(ZoomCommand::TranslateBy { dx: -10.0, dy: 0.0 })
    );

    recognizer.recognize(GestureEvent::PointerUp);
    assert_eq!(recognizer.mode(), InteractionMode::Idle);
    assert_eq!(
        recognizer.recognize(GestureEvent::PointerDrag { x: 200.0, y: 40.0 }),
        None
    );
}

#[test]
fn double_click_and_pinch_scale_around_the_pointer() {
    let mut recognizer = GestureRecognizer::default();
    assert_eq!(
        recognizer.recognize(GestureEvent::DoubleClick { x: 5.0, y: 6.0 }),
        Some(ZoomCommand::ScaleBy {
            factor: 2.0,
            anchor_x: 5.0,
            anchor_y: 6.0,
        })
    );
    assert_eq!(
        recognizer.recognize(GestureEvent::Pinch {
            scale: 1.5,
            x: 1.0,
            y: 2.0,
        }),
        Some(ZoomCommand::ScaleBy {
            factor: 1.5,
            anchor_x: 1.0,
            anchor_y: 2.0,
        })
    );
}
