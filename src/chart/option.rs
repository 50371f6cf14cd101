use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WidgetError, WidgetResult};
use crate::render::Color;

/// Series palette used when the option names none.
pub const DEFAULT_PALETTE: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

/// Bar-chart subset of the charting configuration schema.
///
/// Field names follow the JSON form (`xAxis`, `yAxis`, ...). Keys this layer
/// does not know are ignored; structural problems surface when the option is
/// rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOption {
    pub title: Option<TitleOption>,
    pub tooltip: Option<TooltipOption>,
    pub grid: GridOption,
    pub dataset: DatasetOption,
    pub x_axis: AxisOption,
    pub y_axis: AxisOption,
    pub series: Vec<SeriesOption>,
    pub color: Vec<String>,
}

impl ChartOption {
    pub fn from_json_str(input: &str) -> WidgetResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| WidgetError::InvalidOption(format!("failed to parse chart option: {e}")))
    }

    pub fn from_json_value(value: Value) -> WidgetResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| WidgetError::InvalidOption(format!("failed to parse chart option: {e}")))
    }

    pub fn to_json_pretty(&self) -> WidgetResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            WidgetError::InvalidOption(format!("failed to serialize chart option: {e}"))
        })
    }

    /// Resolves the dataset into categories and per-series values.
    pub fn resolve(&self) -> WidgetResult<ResolvedDataset> {
        if self.series.is_empty() {
            return Err(WidgetError::InvalidOption(
                "chart option needs at least one series".to_owned(),
            ));
        }
        for axis_type in [&self.x_axis.kind, &self.y_axis.kind].into_iter().flatten() {
            if axis_type != "category" && axis_type != "value" {
                return Err(WidgetError::InvalidOption(format!(
                    "unsupported axis type `{axis_type}`"
                )));
            }
        }
        if self.x_axis.kind.as_deref() == Some("value") {
            return Err(WidgetError::InvalidOption(
                "horizontal bars (value x axis) are not supported".to_owned(),
            ));
        }

        let (header, rows) = self.dataset.split_header();
        let header = header.as_deref();
        let category_column = match self.series[0].encode.as_ref().and_then(|e| e.x.as_ref()) {
            Some(dimension) => dimension.column(header)?,
            None => 0,
        };

        let categories = rows
            .iter()
            .map(|row| row.get(category_column).map(cell_label).unwrap_or_default())
            .collect();

        let palette: Vec<&str> = if self.color.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            self.color.iter().map(String::as_str).collect()
        };

        let mut series = Vec::with_capacity(self.series.len());
        for (index, option) in self.series.iter().enumerate() {
            if option.kind != "bar" {
                return Err(WidgetError::InvalidOption(format!(
                    "series {index}: unsupported type `{}`",
                    option.kind
                )));
            }
            let column = match option.encode.as_ref().and_then(|e| e.y.as_ref()) {
                Some(dimension) => dimension.column(header)?,
                None => index + 1,
            };
            let values = rows
                .iter()
                .enumerate()
                .map(|(row, cells)| cell_value(cells.get(column), index, row))
                .collect::<WidgetResult<Vec<_>>>()?;
            let name = option
                .name
                .clone()
                .or_else(|| header.and_then(|h| h.get(column).cloned()))
                .unwrap_or_else(|| format!("series {index}"));
            let color = match &option.color {
                Some(hex) => Color::from_hex(hex)?,
                None => Color::from_hex(palette[index % palette.len()])?,
            };
            series.push(ResolvedSeries {
                name,
                color,
                values,
            });
        }

        Ok(ResolvedDataset { categories, series })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOption {
    pub text: String,
    pub subtext: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipOption {
    pub show: bool,
}

impl Default for TooltipOption {
    fn default() -> Self {
        Self { show: true }
    }
}

/// Pixel margins between the container edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOption {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for GridOption {
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 40.0,
            top: 60.0,
            bottom: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOption {
    pub dimensions: Vec<String>,
    pub source: Vec<Vec<Value>>,
}

impl DatasetOption {
    /// Splits off the header row: explicit `dimensions` win, otherwise a
    /// first row made only of strings is taken as the header.
    fn split_header(&self) -> (Option<Vec<String>>, &[Vec<Value>]) {
        if !self.dimensions.is_empty() {
            return (Some(self.dimensions.clone()), &self.source);
        }
        match self.source.split_first() {
            Some((first, rest)) if first.len() > 1 && first.iter().all(Value::is_string) => {
                (Some(first.iter().map(cell_label).collect()), rest)
            }
            _ => (None, &self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOption {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub encode: Option<EncodeOption>,
}

impl Default for SeriesOption {
    fn default() -> Self {
        Self {
            kind: "bar".to_owned(),
            name: None,
            color: None,
            encode: None,
        }
    }
}

impl SeriesOption {
    #[must_use]
    pub fn bar() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOption {
    pub x: Option<DimensionRef>,
    pub y: Option<DimensionRef>,
}

/// Dataset column addressed by index or by dimension name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionRef {
    Index(usize),
    Name(String),
}

impl DimensionRef {
    fn column(&self, header: Option<&[String]>) -> WidgetResult<usize> {
        match self {
            Self::Index(index) => Ok(*index),
            Self::Name(name) => header
                .and_then(|h| h.iter().position(|d| d == name))
                .ok_or_else(|| WidgetError::InvalidOption(format!("unknown dimension `{name}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub name: String,
    pub color: Color,
    /// One entry per category; `None` leaves a gap.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDataset {
    pub categories: Vec<String>,
    pub series: Vec<ResolvedSeries>,
}

fn cell_label(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: Option<&Value>, series: usize, row: usize) -> WidgetResult<Option<f64>> {
    let invalid = || {
        WidgetError::InvalidOption(format!(
            "series {series}, row {row}: value must be numeric"
        ))
    };
    match cell {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_f64().map(Some).ok_or_else(invalid),
        Some(Value::String(text)) if text.trim() == "-" => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}
