use approx::assert_relative_eq;
use chart_geometry::core::coordinate::{pixel_to_value, to_pixel};
use chart_geometry::core::{Axis, AxisConfig, AxisRange, PixelPoint, PlotRect, ValueType};
use proptest::prelude::*;

fn axes(
    (x_min, x_span): (f64, f64),
    (y_min, y_span): (f64, f64),
    inversed: bool,
    transposed: bool,
) -> (Axis, Axis) {
    let plot = PlotRect::new(0.0, 0.0, 800.0, 600.0);
    let (x_config, y_config) = if transposed {
        (AxisConfig::vertical("x"), AxisConfig::horizontal("y"))
    } else {
        (AxisConfig::horizontal("x"), AxisConfig::vertical("y"))
    };
    let mut x = Axis::new(x_config.with_inversed(inversed), plot);
    x.visible_range = AxisRange::new(x_min, x_min + x_span, 1.0);
    let mut y = Axis::new(y_config, plot);
    y.visible_range = AxisRange::new(y_min, y_min + y_span, 1.0);
    (x, y)
}

proptest! {
    #[test]
    fn pixel_round_trip_recovers_values(
        x_min in -1_000_000.0f64..1_000_000.0,
        x_span in 0.01f64..1_000_000.0,
        y_min in -1_000_000.0f64..1_000_000.0,
        y_span in 0.01f64..1_000_000.0,
        x_factor in 0.0f64..1.0,
        y_factor in 0.0f64..1.0,
        inversed in any::<bool>(),
        transposed in any::<bool>()
    ) {
        let (x_axis, y_axis) = axes((x_min, x_span), (y_min, y_span), inversed, transposed);
        let x = x_min + x_factor * x_span;
        let y = y_min + y_factor * y_span;

        let pixel = to_pixel(x, y, &x_axis, &y_axis, transposed);
        let (x_back, y_back) = pixel_to_value(pixel, &x_axis, &y_axis, transposed);

        let x_tolerance = 1e-9 * x_min.abs().max(x_span).max(1.0);
        let y_tolerance = 1e-9 * y_min.abs().max(y_span).max(1.0);
        prop_assert!((x_back - x).abs() <= x_tolerance);
        prop_assert!((y_back - y).abs() <= y_tolerance);
    }

    #[test]
    fn visible_values_map_inside_the_plot(
        x_factor in 0.0f64..=1.0,
        y_factor in 0.0f64..=1.0,
        transposed in any::<bool>()
    ) {
        let (x_axis, y_axis) = axes((0.0, 10.0), (-5.0, 10.0), false, transposed);
        let pixel = to_pixel(x_factor * 10.0, -5.0 + y_factor * 10.0, &x_axis, &y_axis, transposed);
        prop_assert!((-1e-9..=800.0 + 1e-9).contains(&pixel.x));
        prop_assert!((-1e-9..=600.0 + 1e-9).contains(&pixel.y));
    }
}

#[test]
fn y_grows_downward_and_inversion_flips() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 100.0), false, false);
    assert_eq!(to_pixel(0.0, 0.0, &x_axis, &y_axis, false), PixelPoint::new(0.0, 600.0));
    assert_eq!(to_pixel(10.0, 100.0, &x_axis, &y_axis, false), PixelPoint::new(800.0, 0.0));

    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 100.0), true, false);
    assert_eq!(to_pixel(0.0, 0.0, &x_axis, &y_axis, false).x, 800.0);
}

#[test]
fn transposed_chart_runs_x_up_the_left_edge() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 100.0), false, true);
    let pixel = to_pixel(10.0, 50.0, &x_axis, &y_axis, true);
    assert_relative_eq!(pixel.x, 400.0);
    assert_relative_eq!(pixel.y, 0.0);
}

#[test]
fn logarithmic_round_trip() {
    let plot = PlotRect::new(0.0, 0.0, 800.0, 600.0);
    let x = {
        let mut axis = Axis::new(AxisConfig::horizontal("x"), plot);
        axis.visible_range = AxisRange::new(0.0, 1.0, 1.0);
        axis
    };
    let mut y = Axis::new(
        AxisConfig::vertical("y").with_value_type(ValueType::Logarithmic),
        plot,
    );
    y.visible_range = AxisRange::new(0.0, 4.0, 1.0);

    let pixel = to_pixel(0.5, 100.0, &x, &y, false);
    assert_relative_eq!(pixel.y, 300.0, epsilon = 1e-9);
    let (_, value) = pixel_to_value(pixel, &x, &y, false);
    assert_relative_eq!(value, 100.0, max_relative = 1e-12);
}
