use approx::assert_relative_eq;
use chart_geometry::api::{ChartEngine, ChartEngineConfig};
use chart_geometry::core::series::{CornerRadius, MarkerSettings, MarkerShape};
use chart_geometry::core::stacking::compute_stacked_values;
use chart_geometry::core::{
    AxisConfig, DataLabelSettings, EmptyPointMode, Orientation, PlotRect, Series, SeriesKind,
    SeriesPoint, SeriesStyle, ValueType, Viewport,
};
use chart_geometry::render::{NullRenderer, RenderShape};

fn engine(config: ChartEngineConfig) -> ChartEngine<NullRenderer> {
    ChartEngine::new(NullRenderer::default(), config).expect("engine init")
}

fn columns(id: &str, values: [f64; 3]) -> Series {
    Series::new(
        id,
        SeriesKind::Column,
        values
            .iter()
            .enumerate()
            .map(|(x, y)| SeriesPoint::xy(x as f64, *y))
            .collect(),
    )
    .with_column_width(1.0)
}

fn rect_of(engine: &ChartEngine<NullRenderer>, id: &str) -> PlotRect {
    let frame = engine.last_frame().expect("frame");
    match &frame.series_options(id).expect("option").shape {
        RenderShape::Rect(rect) => *rect,
        RenderShape::Path(path) => panic!("expected rect for {id}, got {}", path.to_svg()),
    }
}

#[test]
fn three_column_series_share_each_category_in_thirds() {
    let config = ChartEngineConfig::new(Viewport::new(800, 600))
        .with_series(columns("a", [3.0, 4.0, 5.0]))
        .with_series(columns("b", [2.0, 6.0, 1.0]))
        .with_series(columns("c", [7.0, 2.0, 4.0]));
    let mut engine = engine(config);
    engine.layout().expect("layout");

    let plot = engine.last_frame().expect("frame").plot_rect;
    // x spans -0.5..2.5 after rect padding: one category is a third of the plot.
    let category_px = plot.width / 3.0;
    let a = rect_of(&engine, "a_point_1");
    let b = rect_of(&engine, "b_point_1");
    let c = rect_of(&engine, "c_point_1");
    for rect in [a, b, c] {
        assert_relative_eq!(rect.width, category_px / 3.0, epsilon = 1e-9);
    }
    assert_relative_eq!(a.right(), b.x, epsilon = 1e-9);
    assert_relative_eq!(b.right(), c.x, epsilon = 1e-9);
    assert_relative_eq!(a.x, category_px, epsilon = 1e-9);
    assert_relative_eq!(c.right(), 2.0 * category_px, epsilon = 1e-9);
}

#[test]
fn stacked_columns_sit_on_top_of_each_other() {
    let points = || vec![SeriesPoint::xy(0.0, 2.0), SeriesPoint::xy(1.0, 3.0)];
    let config = ChartEngineConfig::new(Viewport::new(400, 300))
        .with_series(Series::new("low", SeriesKind::StackingColumn, points()))
        .with_series(Series::new("high", SeriesKind::StackingColumn, points()));
    let mut engine = engine(config);
    engine.layout().expect("layout");

    let low = rect_of(&engine, "low_point_0");
    let high = rect_of(&engine, "high_point_0");
    assert_relative_eq!(high.bottom(), low.y, epsilon = 1e-9);
    assert_relative_eq!(high.x, low.x, epsilon = 1e-9);
    assert_relative_eq!(high.height, low.height, epsilon = 1e-9);
}

#[test]
fn stacking_sums_positive_and_negative_separately() {
    let a = Series::new(
        "a",
        SeriesKind::StackingColumn,
        vec![SeriesPoint::xy(0.0, 2.0), SeriesPoint::xy(1.0, -1.0)],
    );
    let b = Series::new(
        "b",
        SeriesKind::StackingColumn,
        vec![SeriesPoint::xy(0.0, 3.0), SeriesPoint::xy(1.0, -4.0)],
    );
    let c = Series::new(
        "c",
        SeriesKind::StackingColumn,
        vec![SeriesPoint::xy(0.0, -5.0), SeriesPoint::xy(1.0, 6.0)],
    );
    let stacked = compute_stacked_values(&[&a, &b, &c]);
    assert_eq!(stacked["b"].start_values, vec![2.0, -1.0]);
    assert_eq!(stacked["b"].end_values, vec![5.0, -5.0]);
    assert_eq!(stacked["c"].start_values, vec![0.0, 0.0]);
    assert_eq!(stacked["c"].end_values, vec![-5.0, 6.0]);
}

#[test]
fn hundred_percent_stacking_reaches_one_hundred() {
    let a = Series::new("a", SeriesKind::StackingColumn100, vec![SeriesPoint::xy(0.0, 1.0)]);
    let b = Series::new("b", SeriesKind::StackingColumn100, vec![SeriesPoint::xy(0.0, 3.0)]);
    let stacked = compute_stacked_values(&[&a, &b]);
    assert_relative_eq!(stacked["a"].end_values[0], 25.0);
    assert_relative_eq!(stacked["b"].end_values[0], 100.0);
}

#[test]
fn gap_breaks_line_and_drop_bridges_it() {
    let points = vec![
        SeriesPoint::xy(0.0, 1.0),
        SeriesPoint::xy(1.0, 2.0),
        SeriesPoint::empty(2.0),
        SeriesPoint::xy(3.0, 1.0),
        SeriesPoint::xy(4.0, 2.0),
    ];
    let config = ChartEngineConfig::new(Viewport::new(400, 300))
        .with_series(Series::new("gap", SeriesKind::Line, points.clone()))
        .with_series(
            Series::new("drop", SeriesKind::Line, points).with_empty_point_mode(EmptyPointMode::Drop),
        );
    let mut engine = engine(config);
    let frame = engine.layout().expect("layout");

    assert!(frame.series_options("gap_line_0").is_some());
    assert!(frame.series_options("gap_line_1").is_some());
    assert!(frame.series_options("drop_line_1").is_none());
    let bridged = frame
        .series_options("drop_line_0")
        .and_then(|options| options.as_path())
        .expect("path");
    assert_eq!(bridged.vertices().count(), 4);
}

#[test]
fn category_axis_places_named_points_on_indices() {
    let config = ChartEngineConfig::new(Viewport::new(400, 300))
        .with_axis(AxisConfig::horizontal("primaryXAxis").with_value_type(ValueType::Category))
        .with_series(Series::new(
            "sales",
            SeriesKind::Line,
            vec![
                SeriesPoint::category("Jan", 10.0),
                SeriesPoint::category("Feb", 20.0),
                SeriesPoint::category("Mar", 15.0),
            ],
        ));
    let mut engine = engine(config);
    engine.layout().expect("layout");

    let x_axis = engine.axis("primaryXAxis").expect("axis");
    assert_eq!(x_axis.categories, vec!["Jan", "Feb", "Mar"]);
    let texts: Vec<&str> = engine.last_frame().expect("frame").axes[0]
        .labels
        .iter()
        .map(|label| label.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Jan", "Feb", "Mar"]);

    let feb = engine.geometry_cache().point("sales", 1).expect("point");
    let expected = engine
        .data_to_pixel("primaryXAxis", "primaryYAxis", 1.0, 20.0)
        .expect("pixel");
    assert_eq!(feb.symbol_locations[0], expected);
}

#[test]
fn rounded_columns_render_as_quadratic_paths() {
    let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_series(
        columns("r", [3.0, 4.0, 5.0]).with_corner_radius(CornerRadius::uniform(4.0)),
    );
    let mut engine = engine(config);
    let frame = engine.layout().expect("layout");
    let path = frame
        .series_options("r_point_0")
        .and_then(|options| options.as_path())
        .expect("rounded path");
    assert!(path.is_closed());
    assert!(path.to_svg().contains('Q'));
}

#[test]
fn candles_color_by_direction() {
    let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_series(Series::new(
        "ohlc",
        SeriesKind::Candle,
        vec![
            SeriesPoint::ohlc(0.0, 10.0, 14.0, 9.0, 13.0),
            SeriesPoint::ohlc(1.0, 13.0, 13.5, 8.0, 9.0),
        ],
    ));
    let mut engine = engine(config);
    let frame = engine.layout().expect("layout");
    let style = SeriesStyle::default();
    let bull_wick = frame.series_options("ohlc_wick_0").expect("wick");
    let bear_body = frame.series_options("ohlc_body_1").expect("body");
    assert_eq!(bull_wick.stroke, style.bull_color);
    assert_eq!(bear_body.fill, style.bear_color);
}

#[test]
fn markers_and_data_labels_follow_points() {
    let series = Series::new(
        "m",
        SeriesKind::Line,
        vec![SeriesPoint::xy(0.0, 1.5), SeriesPoint::xy(1.0, 2.0), SeriesPoint::xy(2.0, 2.5)],
    )
    .with_marker(MarkerSettings {
        visible: true,
        shape: MarkerShape::Diamond,
        width: 6.0,
        height: 6.0,
    })
    .with_data_label(DataLabelSettings {
        visible: true,
        ..DataLabelSettings::default()
    });
    let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_series(series);
    let mut engine = engine(config);
    let frame = engine.layout().expect("layout");

    assert_eq!(frame.markers.len(), 3);
    assert_eq!(frame.markers[1].id, "m_marker_1_0");
    let texts: Vec<&str> = frame.data_labels.iter().map(|label| label.text.as_str()).collect();
    assert_eq!(texts.len(), 3);
    assert!(texts.contains(&"1.5"));
    assert!(texts.contains(&"2"));
    assert!(texts.contains(&"2.5"));
}

#[test]
fn bars_grow_horizontally_from_the_value_origin() {
    let bars = Series::new(
        "bars",
        SeriesKind::Bar,
        vec![SeriesPoint::xy(0.0, 3.0), SeriesPoint::xy(1.0, 6.0), SeriesPoint::xy(2.0, 9.0)],
    );
    let mut engine = engine(ChartEngineConfig::new(Viewport::new(800, 600)).with_series(bars));
    engine.layout().expect("layout");

    let x_axis = engine.axis("primaryXAxis").expect("x axis");
    assert_eq!(x_axis.orientation(), Orientation::Vertical);
    let rects: Vec<PlotRect> = (0..3).map(|i| rect_of(&engine, &format!("bars_point_{i}"))).collect();
    for rect in &rects {
        assert_relative_eq!(rect.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rect.height, rects[0].height, epsilon = 1e-9);
    }
    assert!(rects[0].width < rects[1].width && rects[1].width < rects[2].width);
    assert_relative_eq!(rects[2].width, 3.0 * rects[0].width, epsilon = 1e-9);
    // Categories run bottom to top.
    assert!(rects[0].y > rects[1].y && rects[1].y > rects[2].y);

    let tip = engine
        .data_to_pixel("primaryXAxis", "primaryYAxis", 2.0, 9.0)
        .expect("pixel");
    assert_relative_eq!(tip.x, rects[2].right(), epsilon = 1e-9);
}
