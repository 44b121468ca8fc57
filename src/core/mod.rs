pub mod area_series;
pub mod axis;
pub mod axis_labels;
pub mod axis_range;
pub mod candlestick;
pub mod column_series;
pub mod coordinate;
pub mod cross_axis;
pub mod datetime_range;
pub mod double_range;
pub mod error_bar_series;
pub mod label_text;
pub mod line_series;
pub mod numeric_range;
pub mod primitives;
pub mod scatter_series;
pub mod series;
pub mod series_builder;
pub mod side_by_side;
pub mod spline;
pub mod stacking;
pub mod types;

pub use axis::{
    Axis, AxisConfig, AxisLabel, CrossValue, DateTimeIntervalType, LabelIntersectAction,
    LabelPlacement, RangePadding, ValueType,
};
pub use axis_labels::{AxisLabelCallback, LabelDecision};
pub use axis_range::{AxisRangeEngine, AxisRole, RangeAccumulator};
pub use cross_axis::AxisCrossing;
pub use double_range::{AxisRange, DoubleRange};
pub use numeric_range::RangeTuning;
pub use series::{
    DataLabelPosition, DataLabelSettings, EmptyPointMode, PointValue, Series, SeriesKind,
    SeriesPoint, SeriesStyle,
};
pub use series_builder::{build_series, BuildContext, PointGeometry, SeriesGeometry};
pub use side_by_side::SideBySideSlot;
pub use stacking::StackedValues;
pub use types::{Orientation, PixelPoint, PlotRect, Size, Viewport};
