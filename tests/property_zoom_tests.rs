use proptest::prelude::*;
use returns_chart::core::ZoomTransform;
use returns_chart::interaction::{
    GestureEvent, GestureRecognizer, WheelDeltaMode, ZoomCommand, ZoomController, ZoomLimits,
};

fn command_strategy() -> impl Strategy<Value = ZoomCommand> {
    prop_oneof![
        (-2_000.0f64..2_000.0, -50.0f64..900.0, -50.0f64..500.0).prop_map(|(delta_y, x, y)| {
            ZoomCommand::Wheel {
                delta_y,
                delta_mode: WheelDeltaMode::Pixel,
                anchor_x: x,
                anchor_y: y,
            }
        }),
        (0.01f64..100.0, -50.0f64..900.0, -50.0f64..500.0).prop_map(|(factor, x, y)| {
            ZoomCommand::ScaleBy {
                factor,
                anchor_x: x,
                anchor_y: y,
            }
        }),
        (-3_000.0f64..3_000.0, -3_000.0f64..3_000.0)
            .prop_map(|(dx, dy)| ZoomCommand::TranslateBy { dx, dy }),
        (0.1f64..50.0, -5_000.0f64..5_000.0, -5_000.0f64..5_000.0)
            .prop_map(|(k, x, y)| ZoomCommand::Set(ZoomTransform::new(k, x, y))),
        Just(ZoomCommand::Reset),
    ]
}

fn gesture_strategy() -> impl Strategy<Value = GestureEvent> {
    prop_oneof![
        (-1_000.0f64..1_000.0, 0.0f64..800.0, 0.0f64..400.0).prop_map(|(delta_y, x, y)| {
            GestureEvent::Wheel {
                delta_y,
                delta_mode: WheelDeltaMode::Pixel,
                x,
                y,
            }
        }),
        (0.0f64..800.0, 0.0f64..400.0).prop_map(|(x, y)| GestureEvent::PointerDown { x, y }),
        (-500.0f64..1_300.0, -500.0f64..900.0).prop_map(|(x, y)| GestureEvent::PointerDrag { x, y }),
        Just(GestureEvent::PointerUp),
        (0.0f64..800.0, 0.0f64..400.0).prop_map(|(x, y)| GestureEvent::DoubleClick { x, y }),
        (0.2f64..5.0, 0.0f64..800.0, 0.0f64..400.0)
            .prop_map(|(scale, x, y)| GestureEvent::Pinch { scale, x, y }),
    ]
}

proptest! {
    #[test]
    fn commands_keep_transform_inside_limits(
        commands in prop::collection::vec(command_strategy(), 1..64)
    ) {
        let mut zoom = ZoomController::new(ZoomLimits::default(), 800.0, 400.0).expect("zoom");
        for command in commands {
            let t = zoom.apply(command);
            prop_assert!((1.0..=8.0).contains(&t.k));
            prop_assert!((-100.0..=900.0).contains(&t.x));
            prop_assert!((-100.0..=500.0).contains(&t.y));
        }
    }

    #[test]
    fn recognized_gestures_keep_transform_inside_limits(
        gestures in prop::collection::vec(gesture_strategy(), 1..96)
    ) {
        let mut zoom = ZoomController::new(ZoomLimits::default(), 800.0, 400.0).expect("zoom");
        let mut recognizer = GestureRecognizer::default();
        for gesture in gestures {
            if let Some(command) = recognizer.recognize(gesture) {
                zoom.apply(command);
            }
            let t = zoom.transform();
            prop_assert!((1.0..=8.0).contains(&t.k));
            prop_assert!((-100.0..=900.0).contains(&t.x));
            prop_assert!((-100.0..=500.0).contains(&t.y));
        }
    }
}
