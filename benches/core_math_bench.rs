use chrono::{Months, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use returns_chart::api::{MeasuredSurface, build_bars, select_granularity};
use returns_chart::core::{
    TimeScale, TimeSeries, TimeSeriesPoint, ValueScale, ValueScaleTuning, ViewportConfig,
    ZoomTransform, apply_zoom,
};
use returns_chart::render::NullRenderer;
use returns_chart::{ChartConfig, ChartEngine, render_scene};
use std::hint::black_box;

fn monthly_points(months: u32) -> Vec<TimeSeriesPoint> {
    let first = NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid date");
    let mut value = 1.0;
    (0..months)
        .map(|i| {
            let date_start = first + Months::new(i);
            let value_start = value;
            value *= if i % 5 == 0 { 0.99 } else { 1.008 };
            TimeSeriesPoint::new(date_start, date_start + Months::new(1), value_start, value)
                .with_benchmark(1.0 + f64::from(i) * 0.001)
        })
        .collect()
}

fn bench_scale_round_trip(c: &mut Criterion) {
    let points = monthly_points(1_200);
    let x_scale = TimeScale::from_series(&points, (35.0, 1_890.0)).expect("x scale");
    let y_scale = ValueScale::from_series(&points, (1_050.0, 30.0), ValueScaleTuning::default())
        .expect("y scale");

    c.bench_function("scale_round_trip", |b| {
        b.iter(|| {
            let px = x_scale.date_to_pixel(black_box(points[600].date_start));
            let _ = x_scale.pixel_to_time(px);
            let py = y_scale.value_to_pixel(black_box(points[600].value_end));
            let _ = y_scale.pixel_to_value(py);
        })
    });
}

fn bench_bar_aggregation_10k(c: &mut Criterion) {
    let points = monthly_points(10_000);
    let viewport = ViewportConfig::new(1_920.0, 1_080.0);
    let plot = viewport.plot_rect();
    let x_scale = TimeScale::from_series(&points, (plot.left, plot.right)).expect("x scale");
    let y_scale =
        ValueScale::from_series(&points, (plot.bottom, plot.top), ValueScaleTuning::default())
            .expect("y scale");
    let transform = ZoomTransform::new(4.0, -2_000.0, -300.0);
    let x_scale = apply_zoom(&x_scale, transform).expect("zoom x");
    let y_scale = apply_zoom(&y_scale, transform).expect("zoom y");

    c.bench_function("bar_aggregation_10k", |b| {
        b.iter(|| {
            let granularity = select_granularity(points.len(), viewport.width, transform.k);
            let _ = build_bars(
                black_box(&points),
                granularity,
                &x_scale,
                &y_scale,
                viewport,
            );
        })
    });
}

fn bench_scene_build_10k(c: &mut Criterion) {
    let series = TimeSeries::new(monthly_points(10_000)).expect("valid series");
    let config = ChartConfig::default();
    let viewport = ViewportConfig::new(1_920.0, 1_080.0);

    c.bench_function("scene_build_10k", |b| {
        b.iter(|| {
            let _ = render_scene(
                black_box(&series),
                viewport,
                ZoomTransform::new(2.0, -500.0, 0.0),
                &config,
            );
        })
    });
}

fn bench_engine_render_with_pointer(c: &mut Criterion) {
    let mut engine = ChartEngine::with_size(
        NullRenderer::default(),
        ChartConfig::default(),
        1_920.0,
        1_080.0,
    )
    .expect("engine init");
    engine.set_series(TimeSeries::new(monthly_points(2_400)).expect("valid series"));
    let surface = MeasuredSurface::new(1_920.0, 1_080.0);

    c.bench_function("engine_render_with_pointer", |b| {
        let mut x = 40.0;
        b.iter(|| {
            x = if x > 1_800.0 { 40.0 } else { x + 7.0 };
            let _ = engine.handle_pointer_move(black_box(x), 500.0);
            let _ = engine.render(surface).expect("render");
        })
    });
}

criterion_group!(
    benches,
    bench_scale_round_trip,
    bench_bar_aggregation_10k,
    bench_scene_build_10k,
    bench_engine_render_with_pointer
);
criterion_main!(benches);
