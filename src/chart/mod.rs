//! SVG bar charts bound to a container element.

mod instance;
mod layout;
mod option;

pub use instance::{ChartHandle, ResizeDisposer, create_chart, create_chart_with_renderer};
pub use layout::{
    BAND_PADDING_RATIO, SERIES_GAP_RATIO, VALUE_AXIS_INTERVALS, layout_bar_chart, plot_area,
};
pub use option::{
    AxisOption, ChartOption, DEFAULT_PALETTE, DatasetOption, DimensionRef, EncodeOption,
    GridOption, ResolvedDataset, ResolvedSeries, SeriesOption, TitleOption, TooltipOption,
};
