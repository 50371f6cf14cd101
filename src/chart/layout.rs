use ordered_float::OrderedFloat;

use crate::chart::ChartOption;
use crate::core::{BandScale, LinearScale, PixelRect, Viewport};
use crate::error::{WidgetError, WidgetResult};
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RectRole, RenderFrame, TextHAlign, TextPrimitive,
    TextRole, format_number,
};

/// Number of intervals on the value axis.
pub const VALUE_AXIS_INTERVALS: usize = 5;
/// Share of each category band left empty around its bars.
pub const BAND_PADDING_RATIO: f64 = 0.2;
/// Share of each per-series slot left empty between neighbouring bars.
pub const SERIES_GAP_RATIO: f64 = 0.1;

const BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);
const GRID_LINE: Color = Color::rgb(0.878, 0.902, 0.945);
const AXIS_LINE: Color = Color::rgb(0.431, 0.439, 0.475);
const LABEL: Color = Color::rgb(0.431, 0.439, 0.475);
const TITLE: Color = Color::rgb(0.2, 0.2, 0.2);

const LABEL_FONT_PX: f64 = 12.0;
const TITLE_FONT_PX: f64 = 18.0;

/// Plot rectangle left after removing the grid margins from `viewport`.
pub fn plot_area(option: &ChartOption, viewport: Viewport) -> WidgetResult<PixelRect> {
    if !viewport.is_valid() {
        return Err(WidgetError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let grid = option.grid;
    let plot = PixelRect::new(
        grid.left,
        grid.top,
        f64::from(viewport.width) - grid.left - grid.right,
        f64::from(viewport.height) - grid.top - grid.bottom,
    );
    if plot.is_empty() {
        return Err(WidgetError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(plot)
}

/// Lays out a bar chart for `option` inside `viewport`.
///
/// The output is a pure function of its inputs, which is what makes option
/// updates and resizes repeatable.
pub fn layout_bar_chart(option: &ChartOption, viewport: Viewport) -> WidgetResult<RenderFrame> {
    let plot = plot_area(option, viewport)?;
    let dataset = option.resolve()?;
    let scale = value_scale(option, &dataset.series)?;
    let y_range = (plot.bottom(), plot.y);
    let (domain_start, domain_end) = scale.domain();
    let (domain_low, domain_high) = (domain_start.min(domain_end), domain_start.max(domain_end));
    let baseline = scale.map(0.0_f64.clamp(domain_low, domain_high), y_range)?;

    let width = f64::from(viewport.width);
    let mut frame = RenderFrame::with_background(viewport, BACKGROUND);

    for tick in scale.ticks(VALUE_AXIS_INTERVALS) {
        let y = scale.map(tick, y_range)?;
        frame = frame
            .with_line(LinePrimitive::new(plot.x, y, plot.right(), y, 1.0, GRID_LINE))
            .with_text(TextPrimitive::new(
                format_number(tick),
                plot.x - 8.0,
                y + LABEL_FONT_PX / 3.0,
                LABEL_FONT_PX,
                LABEL,
                TextHAlign::Right,
                TextRole::AxisLabel,
            ));
    }
    frame = frame.with_line(LinePrimitive::new(
        plot.x,
        baseline,
        plot.right(),
        baseline,
        1.0,
        AXIS_LINE,
    ));

    if !dataset.categories.is_empty() {
        let bands = BandScale::new(
            dataset.categories.len(),
            (plot.x, plot.right()),
            BAND_PADDING_RATIO,
        )?;
        let slot = bands.bandwidth() / dataset.series.len() as f64;
        let bar_width = slot * (1.0 - SERIES_GAP_RATIO);
        let show_tooltip = option.tooltip.as_ref().is_some_and(|t| t.show);

        for (category_index, category) in dataset.categories.iter().enumerate() {
            for (series_index, series) in dataset.series.iter().enumerate() {
                let Some(value) = series.values.get(category_index).copied().flatten() else {
                    continue;
                };
                let clamped = value.clamp(domain_low, domain_high);
                let top = scale.map(clamped, y_range)?;
                let x = bands.band_start(category_index)
                    + slot * series_index as f64
                    + slot * SERIES_GAP_RATIO * 0.5;
                let mut bar = RectPrimitive::new(
                    x,
                    top.min(baseline),
                    bar_width,
                    (top - baseline).abs(),
                    series.color,
                    RectRole::Bar {
                        series: series_index,
                        category: category_index,
                    },
                );
                if show_tooltip {
                    bar = bar.with_tooltip(format!(
                        "{category}\n{}: {}",
                        series.name,
                        format_number(value)
                    ));
                }
                frame = frame.with_rect(bar);
            }
            if !category.is_empty() {
                frame = frame.with_text(TextPrimitive::new(
                    category.clone(),
                    bands.band_center(category_index),
                    plot.bottom() + LABEL_FONT_PX + 6.0,
                    LABEL_FONT_PX,
                    LABEL,
                    TextHAlign::Center,
                    TextRole::AxisLabel,
                ));
            }
        }
    }

    if let Some(name) = option.x_axis.name.as_deref().filter(|n| !n.is_empty()) {
        frame = frame.with_text(TextPrimitive::new(
            name,
            plot.right(),
            plot.bottom() + LABEL_FONT_PX * 2.0 + 12.0,
            LABEL_FONT_PX,
            LABEL,
            TextHAlign::Right,
            TextRole::AxisName,
        ));
    }
    if let Some(name) = option.y_axis.name.as_deref().filter(|n| !n.is_empty()) {
        frame = frame.with_text(TextPrimitive::new(
            name,
            plot.x,
            plot.y - 12.0,
            LABEL_FONT_PX,
            LABEL,
            TextHAlign::Left,
            TextRole::AxisName,
        ));
    }

    if let Some(title) = option.title.as_ref().filter(|t| !t.text.is_empty()) {
        frame = frame.with_text(TextPrimitive::new(
            title.text.clone(),
            width / 2.0,
            TITLE_FONT_PX + 6.0,
            TITLE_FONT_PX,
            TITLE,
            TextHAlign::Center,
            TextRole::Title,
        ));
        if let Some(subtext) = title.subtext.as_deref().filter(|s| !s.is_empty()) {
            frame = frame.with_text(TextPrimitive::new(
                subtext,
                width / 2.0,
                TITLE_FONT_PX + LABEL_FONT_PX + 14.0,
                LABEL_FONT_PX,
                LABEL,
                TextHAlign::Center,
                TextRole::Subtitle,
            ));
        }
    }

    Ok(frame)
}

fn value_scale(
    option: &ChartOption,
    series: &[crate::chart::ResolvedSeries],
) -> WidgetResult<LinearScale> {
    let values = series.iter().flat_map(|s| s.values.iter().flatten().copied());
    let data_min = values
        .clone()
        .map(OrderedFloat)
        .min()
        .map_or(0.0, |v| v.0)
        .min(0.0);
    let data_max = values.map(OrderedFloat).max().map_or(0.0, |v| v.0).max(0.0);

    match (option.y_axis.min, option.y_axis.max) {
        (Some(min), Some(max)) if !(min < max) => Err(WidgetError::InvalidOption(format!(
            "yAxis min {min} must be below max {max}"
        ))),
        (Some(min), Some(max)) => LinearScale::new(min, max).map_err(|_| {
            WidgetError::InvalidOption(format!("yAxis range [{min}, {max}] is empty or invalid"))
        }),
        (min, max) => LinearScale::nice(
            min.unwrap_or(data_min),
            max.unwrap_or(data_max).max(min.unwrap_or(data_min)),
            VALUE_AXIS_INTERVALS,
        ),
    }
}
