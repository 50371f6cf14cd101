//! Paginated, sortable tables over server-rendered rows.

mod config;
mod model;
mod view;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

pub use config::{
    ColumnOverride, DEFAULT_PER_PAGE_SELECT, DEFAULT_UNSORTABLE_COLUMN, SortDirection, SortKey,
    TableConfig, TableLabels, TableOptions,
};
pub use model::{
    CellValue, PageInfo, PageItem, TableModel, TableRow, compare_cells, pagination_items,
};
pub use view::{
    ACTIVE_PAGE_CLASS, ASCENDING_CLASS, DESCENDING_CLASS, INITIALIZED_CLASS, SORTABLE_CLASS,
};

use crate::dom::{Document, NodeId, Page};
use crate::error::{WidgetError, WidgetResult};
use crate::interaction::{Event, EventKind, EventTarget};
use view::{TableView, read_markup};

/// Table listing every probe on the probes page.
pub const PROBES_TABLE_SELECTOR: &str = "#probes-table";
/// Execution-order column of the probes table.
pub const EXECUTION_ORDER_COLUMN: usize = 3;

#[derive(Debug)]
struct TableState {
    model: TableModel<NodeId>,
    view: TableView,
}

type SharedTable = Rc<RefCell<TableState>>;

/// Turns the table matched by `selector` into a paginated, sortable table.
///
/// A selector that matches nothing is a silent no-op. Options are merged
/// over the defaults key by key; invalid options are logged and the table
/// is left untouched.
pub fn setup_table(page: &mut Page, selector: &str, options: TableOptions) {
    match attach_table(page, selector, options) {
        Ok(Some(table)) => debug!(selector, table = table.index(), "table initialized"),
        Ok(None) => {}
        Err(WidgetError::MissingTarget { target }) => {
            debug!(missing = %target, "table target not found; skipping");
        }
        Err(err) => warn!(selector, error = %err, "table setup skipped"),
    }
}

/// Sets up `#probes-table` sorted ascending by execution order.
pub fn setup_probes_table(page: &mut Page) {
    setup_table(
        page,
        PROBES_TABLE_SELECTOR,
        TableOptions::new().with_order(EXECUTION_ORDER_COLUMN, SortDirection::Asc),
    );
}

/// Attaches table behavior and returns the table node, or `None` when the
/// table was already initialized.
pub(crate) fn attach_table(
    page: &mut Page,
    selector: &str,
    options: TableOptions,
) -> WidgetResult<Option<NodeId>> {
    let body = page.document().body();
    let table = page
        .document()
        .query_selector(body, selector)?
        .ok_or_else(|| WidgetError::missing(selector))?;
    if page.document().tag(table) != "table" {
        return Err(WidgetError::InvalidData(format!(
            "{selector} matched <{}>, expected <table>",
            page.document().tag(table)
        )));
    }
    if page.document().has_class(table, INITIALIZED_CLASS) {
        debug!(selector, "table already initialized");
        return Ok(None);
    }
    let config = TableConfig::merged(options)?;

    let document = page.document_mut();
    let markup = read_markup(document, table);
    let columns = markup.headers.len().max(
        markup
            .rows
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0),
    );
    if let Some(key) = config.order.iter().find(|key| key.column >= columns) {
        return Err(WidgetError::InvalidOption(format!(
            "order column {} is out of range for {columns} columns",
            key.column
        )));
    }
    let unsearchable = (0..columns)
        .filter(|column| !config.is_column_searchable(*column))
        .collect();

    let row_count = markup.rows.len();
    let mut model =
        TableModel::new(markup.rows.clone(), config.per_page).with_unsearchable(unsearchable);
    model.set_sort(config.order.clone());
    let view = TableView::build(document, table, &markup, &config);
    view.render(document, &model);
    debug!(
        selector,
        rows = row_count,
        per_page = config.per_page,
        sort = ?config.order,
        "table markup built"
    );

    let state: SharedTable = Rc::new(RefCell::new(TableState { model, view }));
    register_listeners(page, &state, &config);
    Ok(Some(table))
}

fn register_listeners(page: &mut Page, state: &SharedTable, config: &TableConfig) {
    let (headers, selector, search, pagination) = {
        let state = state.borrow();
        (
            state.view.headers.clone(),
            state.view.selector,
            state.view.search,
            state.view.pagination,
        )
    };

    for (column, header) in headers.into_iter().enumerate() {
        if !config.is_column_sortable(column) {
            continue;
        }
        let state = Rc::clone(state);
        page.add_listener(EventTarget::Element(header), EventKind::Click, move |doc, event| {
            event.prevent_default();
            update(&state, doc, |model| {
                let direction = model.toggle_sort(column);
                debug!(column, ?direction, "table sorted");
            });
        });
    }

    let pages = Rc::clone(state);
    page.add_listener(EventTarget::Element(pagination), EventKind::Click, move |doc, event| {
        let Some(target) = page_link_target(doc, event, pagination) else {
            return;
        };
        event.prevent_default();
        update(&pages, doc, |model| {
            let page = model.goto_page(target);
            debug!(page, "table page changed");
        });
    });

    let sizes = Rc::clone(state);
    let choices = config.per_page_select.clone();
    page.add_listener(EventTarget::Element(selector), EventKind::Change, move |doc, event| {
        let Some(per_page) = event
            .value
            .as_deref()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|value| choices.contains(value))
        else {
            warn!(value = ?event.value, "ignoring unknown page size");
            return;
        };
        update(&sizes, doc, |model| model.set_per_page(per_page));
    });

    if let Some(search) = search {
        let filter = Rc::clone(state);
        page.add_listener(EventTarget::Element(search), EventKind::Input, move |doc, event| {
            let query = event.value.clone().unwrap_or_default();
            update(&filter, doc, |model| {
                model.set_query(&query);
                debug!(query = %query, matches = model.filtered_len(), "table filtered");
            });
        });
    }
}

/// Applies `change` to the model and re-renders the table.
fn update(state: &SharedTable, doc: &mut Document, change: impl FnOnce(&mut TableModel<NodeId>)) {
    let mut state = state.borrow_mut();
    let TableState { model, view } = &mut *state;
    change(model);
    view.render(doc, model);
}

/// Page number of the `a[data-page]` between the click target and `list`.
fn page_link_target(doc: &Document, event: &Event, list: NodeId) -> Option<usize> {
    let EventTarget::Element(origin) = event.target else {
        return None;
    };
    doc.ancestry(origin)
        .into_iter()
        .take_while(|node| *node != list)
        .find_map(|node| doc.attribute(node, "data-page"))
        .and_then(|page| page.parse().ok())
}
