use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

/// Page-size choices offered when the caller names none.
pub const DEFAULT_PER_PAGE_SELECT: [usize; 3] = [10, 25, 50];
/// Column that is not sortable unless the caller overrides `columns`.
pub const DEFAULT_UNSORTABLE_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub fn aria_value(self) -> &'static str {
        match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        }
    }
}

/// One sort instruction. Serialized as `[column, "asc" | "desc"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, SortDirection)", into = "(usize, SortDirection)")]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortKey {
    #[must_use]
    pub const fn new(column: usize, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    #[must_use]
    pub const fn asc(column: usize) -> Self {
        Self::new(column, SortDirection::Asc)
    }
}

impl From<(usize, SortDirection)> for SortKey {
    fn from((column, direction): (usize, SortDirection)) -> Self {
        Self { column, direction }
    }
}

impl From<SortKey> for (usize, SortDirection) {
    fn from(key: SortKey) -> Self {
        (key.column, key.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOverride {
    pub sortable: bool,
    pub searchable: bool,
}

impl Default for ColumnOverride {
    fn default() -> Self {
        Self {
            sortable: true,
            searchable: true,
        }
    }
}

impl ColumnOverride {
    #[must_use]
    pub fn unsortable() -> Self {
        Self {
            sortable: false,
            ..Self::default()
        }
    }
}

/// User-facing strings. `info` understands `{start}`, `{end}` and `{rows}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableLabels {
    pub placeholder: String,
    pub per_page: String,
    pub no_rows: String,
    pub info: String,
}

impl Default for TableLabels {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_owned(),
            per_page: "entries per page".to_owned(),
            no_rows: "No entries found".to_owned(),
            info: "Showing {start} to {end} of {rows} entries".to_owned(),
        }
    }
}

impl TableLabels {
    #[must_use]
    pub fn format_info(&self, start: usize, end: usize, rows: usize) -> String {
        self.info
            .replace("{start}", &start.to_string())
            .replace("{end}", &end.to_string())
            .replace("{rows}", &rows.to_string())
    }
}

/// Caller-supplied table options. Every key is optional; a key that is set
/// replaces the default for that whole key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TableOptions {
    pub per_page_select: Option<Vec<usize>>,
    pub per_page: Option<usize>,
    pub columns: Option<IndexMap<usize, ColumnOverride>>,
    pub order: Option<Vec<SortKey>>,
    pub sortable: Option<bool>,
    pub searchable: Option<bool>,
    pub labels: Option<TableLabels>,
}

impl TableOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> WidgetResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| WidgetError::InvalidOption(format!("failed to parse table options: {e}")))
    }

    #[must_use]
    pub fn with_order(mut self, column: usize, direction: SortDirection) -> Self {
        self.order = Some(vec![SortKey::new(column, direction)]);
        self
    }

    #[must_use]
    pub fn with_per_page_select(mut self, choices: Vec<usize>) -> Self {
        self.per_page_select = Some(choices);
        self
    }

    #[must_use]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: IndexMap<usize, ColumnOverride>) -> Self {
        self.columns = Some(columns);
        self
    }

    #[must_use]
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = Some(searchable);
        self
    }
}

/// Resolved table configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    pub per_page_select: Vec<usize>,
    pub per_page: usize,
    pub columns: IndexMap<usize, ColumnOverride>,
    pub order: Vec<SortKey>,
    pub sortable: bool,
    pub searchable: bool,
    pub labels: TableLabels,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            per_page_select: DEFAULT_PER_PAGE_SELECT.to_vec(),
            per_page: DEFAULT_PER_PAGE_SELECT[0],
            columns: IndexMap::from([(DEFAULT_UNSORTABLE_COLUMN, ColumnOverride::unsortable())]),
            order: Vec::new(),
            sortable: true,
            searchable: true,
            labels: TableLabels::default(),
        }
    }
}

impl TableConfig {
    /// Defaults overridden by `options`, keyed field by field; caller wins.
    pub fn merged(options: TableOptions) -> WidgetResult<Self> {
        let defaults = Self::default();
        let mut per_page_select = options.per_page_select.unwrap_or(defaults.per_page_select);
        if per_page_select.is_empty() || per_page_select.contains(&0) {
            return Err(WidgetError::InvalidOption(
                "perPageSelect must hold positive page sizes".to_owned(),
            ));
        }
        let per_page = options.per_page.unwrap_or(per_page_select[0]);
        if per_page == 0 {
            return Err(WidgetError::InvalidOption(
                "perPage must be positive".to_owned(),
            ));
        }
        if !per_page_select.contains(&per_page) {
            per_page_select.push(per_page);
            per_page_select.sort_unstable();
            per_page_select.dedup();
        }

        Ok(Self {
            per_page_select,
            per_page,
            columns: options.columns.unwrap_or(defaults.columns),
            order: options.order.unwrap_or(defaults.order),
            sortable: options.sortable.unwrap_or(defaults.sortable),
            searchable: options.searchable.unwrap_or(defaults.searchable),
            labels: options.labels.unwrap_or(defaults.labels),
        })
    }

    #[must_use]
    pub fn is_column_sortable(&self, column: usize) -> bool {
        self.sortable && self.columns.get(&column).is_none_or(|c| c.sortable)
    }

    #[must_use]
    pub fn is_column_searchable(&self, column: usize) -> bool {
        self.columns.get(&column).is_none_or(|c| c.searchable)
    }
}
