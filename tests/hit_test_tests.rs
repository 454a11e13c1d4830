use chrono::{Months, NaiveDate};
use returns_chart::api::{HitTarget, HitTester, TooltipState, build_bars};
use returns_chart::core::{
    TimeScale, TimeSeriesPoint, ValueScale, ValueScaleTuning, ViewportConfig,
};

fn monthly_points(months: usize) -> Vec<TimeSeriesPoint> {
    let first = NaiveDate::from_ymd_opt(2012, 1, 1).expect("valid date");
    (0..months)
        .map(|i| {
            let date_start = first + Months::new(i as u32);
            let value_start = 1.0 + i as f64 * 0.05;
            TimeSeriesPoint::new(
                date_start,
                date_start + Months::new(1),
                value_start,
                value_start + 0.05,
            )
        })
        .collect()
}

struct Fixture {
    points: Vec<TimeSeriesPoint>,
    viewport: ViewportConfig,
    x_scale: TimeScale,
    y_scale: ValueScale,
}

fn fixture() -> Fixture {
    let points = monthly_points(24);
    let viewport = ViewportConfig::new(800.0, 400.0);
    let plot = viewport.plot_rect();
    let x_scale = TimeScale::from_series(&points, (plot.left, plot.right)).expect("x scale");
    let y_scale =
        ValueScale::from_series(&points, (plot.bottom, plot.top), ValueScaleTuning::default())
            .expect("y scale");
    Fixture {
        points,
        viewport,
        x_scale,
        y_scale,
    }
}

#[test]
fn pointer_on_a_month_start_resolves_to_that_month() {
    let f = fixture();
    let plot = f.viewport.plot_rect();

    let px = f.x_scale.date_to_pixel(f.points[5].date_start);
    let state = HitTester::locate(px, 200.0, &f.x_scale, &f.y_scale, &f.points, plot);

    let hit = state.hit().expect("visible tooltip");
    assert_eq!(hit.target, HitTarget::Point(5));
    assert_eq!(hit.pointer_x, px);
}

#[test]
fn pointer_inside_a_month_resolves_to_it_and_anchors_at_its_end() {
    let f = fixture();
    let plot = f.viewport.plot_rect();
    let start = f.x_scale.date_to_pixel(f.points[5].date_start);
    let end = f.x_scale.date_to_pixel(f.points[5].date_end);

    let state = HitTester::locate(
        (start + end) / 2.0,
        120.0,
        &f.x_scale,
        &f.y_scale,
        &f.points,
        plot,
    );

    let hit = state.hit().expect("visible tooltip");
    assert_eq!(hit.target, HitTarget::Point(5));
    assert!((hit.x - end).abs() <= 1e-9);
    assert!((hit.y - f.y_scale.value_to_pixel(f.points[5].value_end)).abs() <= 1e-9);
}

#[test]
fn pointer_outside_the_data_hides_the_tooltip() {
    let f = fixture();
    let plot = f.viewport.plot_rect();
    let first = f.x_scale.date_to_pixel(f.points[0].date_start);
    let last = f.x_scale.date_to_pixel(f.points[23].date_end);

    let before = HitTester::locate(first - 5.0, 200.0, &f.x_scale, &f.y_scale, &f.points, plot);
    let after = HitTester::locate(last + 5.0, 200.0, &f.x_scale, &f.y_scale, &f.points, plot);

    assert_eq!(before, TooltipState::Hidden);
    assert_eq!(after, TooltipState::Hidden);
}

#[test]
fn anchor_is_clamped_into_the_plot() {
    let f = fixture();
    let plot = f.viewport.plot_rect();
    // The last month ends one month past the right edge of the plot.
    let px = f.x_scale.date_to_pixel(f.points[23].date_start) + 1.0;

    let hit = HitTester::locate(px, 200.0, &f.x_scale, &f.y_scale, &f.points, plot)
        .hit()
        .expect("visible tooltip");
    assert_eq!(hit.target, HitTarget::Point(23));
    assert_eq!(hit.x, plot.right);
}

#[test]
fn bars_can_be_hit_instead_of_raw_months() {
    let f = fixture();
    let plot = f.viewport.plot_rect();
    let bars = build_bars(&f.points, 4, &f.x_scale, &f.y_scale, f.viewport);

    let start = f.x_scale.date_to_pixel(f.points[5].date_start);
    let end = f.x_scale.date_to_pixel(f.points[5].date_end);
    let hit = HitTester::locate((start + end) / 2.0, 100.0, &f.x_scale, &f.y_scale, &bars, plot)
        .hit()
        .expect("visible tooltip");

    assert_eq!(hit.target, HitTarget::Bar(1));
    let bar_end = f.x_scale.date_to_pixel(bars[1].date_end);
    assert!((hit.x - bar_end).abs() <= 1e-9);
}

#[test]
fn empty_entries_and_non_finite_pointers_hide_the_tooltip() {
    let f = fixture();
    let plot = f.viewport.plot_rect();
    let empty: Vec<TimeSeriesPoint> = Vec::new();

    assert_eq!(
        HitTester::locate(300.0, 200.0, &f.x_scale, &f.y_scale, &empty, plot),
        TooltipState::Hidden
    );
    assert_eq!(
        HitTester::locate(f64::NAN, 200.0, &f.x_scale, &f.y_scale, &f.points, plot),
        TooltipState::Hidden
    );
    assert_eq!(HitTester::leave(), TooltipState::Hidden);
}
