use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::table::{SortDirection, SortKey};

/// Pages shown around the current one before the list is elided.
const PAGINATION_WINDOW: usize = 7;

/// Sort key parsed from one cell. Variant order is the cross-type order:
/// empty cells first, then numbers, dates and finally text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellValue {
    Empty,
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if let Ok(number) = Decimal::from_str(trimmed) {
            return Self::Number(number);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::Date(date);
        }
        Self::Text(trimmed.to_lowercase())
    }
}

#[must_use]
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    CellValue::parse(a).cmp(&CellValue::parse(b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<K> {
    pub key: K,
    pub cells: Vec<String>,
}

impl<K> TableRow<K> {
    pub fn new(key: K, cells: Vec<String>) -> Self {
        Self { key, cells }
    }
}

/// Range summary for the info line. `start` is 1-based; both are 0 when
/// nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub filtered: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Sorting, filtering and paging state over a fixed set of rows.
///
/// Rows are never mutated; every view is derived from the original order,
/// which keeps sorting stable across repeated header clicks.
#[derive(Debug, Clone)]
pub struct TableModel<K> {
    rows: Vec<TableRow<K>>,
    sort: Vec<SortKey>,
    query: String,
    unsearchable: Vec<usize>,
    per_page: usize,
    page: usize,
}

impl<K: Copy> TableModel<K> {
    #[must_use]
    pub fn new(rows: Vec<TableRow<K>>, per_page: usize) -> Self {
        Self {
            rows,
            sort: Vec::new(),
            query: String::new(),
            unsearchable: Vec::new(),
            per_page: per_page.max(1),
            page: 1,
        }
    }

    /// Excludes `columns` from search matching.
    #[must_use]
    pub fn with_unsearchable(mut self, columns: Vec<usize>) -> Self {
        self.unsearchable = columns;
        self
    }

    pub fn set_sort(&mut self, keys: Vec<SortKey>) {
        self.sort = keys;
        self.clamp_page();
    }

    /// Sorts by `column` alone: ascending when it was not the primary key,
    /// otherwise flips its direction.
    pub fn toggle_sort(&mut self, column: usize) -> SortDirection {
        let direction = match self.sort.first() {
            Some(key) if key.column == column => key.direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.set_sort(vec![SortKey::new(column, direction)]);
        direction
    }

    #[must_use]
    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Primary sort key, if any.
    #[must_use]
    pub fn primary_sort(&self) -> Option<SortKey> {
        self.sort.first().copied()
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        self.page = 1;
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Moves to `page`, clamped into `1..=page_count`.
    pub fn goto_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.page_count());
        self.page
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.filtered_len().div_ceil(self.per_page).max(1)
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    /// Row keys after filtering and sorting, across all pages.
    #[must_use]
    pub fn ordered_keys(&self) -> Vec<K> {
        self.ordered_rows().into_iter().map(|row| row.key).collect()
    }

    /// Row keys of the current page.
    #[must_use]
    pub fn visible_keys(&self) -> Vec<K> {
        self.ordered_rows()
            .into_iter()
            .skip((self.page - 1) * self.per_page)
            .take(self.per_page)
            .map(|row| row.key)
            .collect()
    }

    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let filtered = self.filtered_len();
        let offset = (self.page - 1) * self.per_page;
        let end = (offset + self.per_page).min(filtered);
        PageInfo {
            start: if end > offset { offset + 1 } else { 0 },
            end,
            filtered,
            total: self.rows.len(),
        }
    }

    #[must_use]
    pub fn pagination(&self) -> Vec<PageItem> {
        pagination_items(self.page, self.page_count())
    }

    fn matches(&self, row: &TableRow<K>) -> bool {
        self.query.is_empty()
            || row
                .cells
                .iter()
                .enumerate()
                .filter(|(column, _)| !self.unsearchable.contains(column))
                .any(|(_, cell)| cell.to_lowercase().contains(&self.query))
    }

    fn ordered_rows(&self) -> Vec<&TableRow<K>> {
        let mut keyed: Vec<(Vec<CellValue>, &TableRow<K>)> = self
            .rows
            .iter()
            .filter(|row| self.matches(row))
            .map(|row| {
                let values = self
                    .sort
                    .iter()
                    .map(|key| {
                        CellValue::parse(row.cells.get(key.column).map_or("", String::as_str))
                    })
                    .collect();
                (values, row)
            })
            .collect();

        if !self.sort.is_empty() {
            keyed.sort_by(|(a, _), (b, _)| {
                self.sort
                    .iter()
                    .zip(a.iter().zip(b.iter()))
                    .map(|(key, (left, right))| match key.direction {
                        SortDirection::Asc => left.cmp(right),
                        SortDirection::Desc => right.cmp(left),
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        keyed.into_iter().map(|(_, row)| row).collect()
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count());
    }
}

/// Page links for `current` of `count`, eliding long runs with `Ellipsis`.
#[must_use]
pub fn pagination_items(current: usize, count: usize) -> Vec<PageItem> {
    if count <= PAGINATION_WINDOW {
        return (1..=count).map(PageItem::Page).collect();
    }
    let current = current.clamp(1, count);
    let (low, high) = match current {
        c if c <= 4 => (2, 5),
        c if c >= count - 3 => (count - 4, count - 1),
        c => (c - 1, c + 1),
    };

    let mut items = vec![PageItem::Page(1)];
    if low > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((low..=high).map(PageItem::Page));
    if high < count - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(count));
    items
}
