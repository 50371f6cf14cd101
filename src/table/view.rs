use crate::dom::{Document, NodeId};
use crate::table::{PageItem, SortDirection, TableConfig, TableLabels, TableModel, TableRow};

pub const INITIALIZED_CLASS: &str = "datatable-table";
pub const SORTABLE_CLASS: &str = "datatable-sortable";
pub const ASCENDING_CLASS: &str = "datatable-ascending";
pub const DESCENDING_CLASS: &str = "datatable-descending";
pub const ACTIVE_PAGE_CLASS: &str = "datatable-active";

/// Pagination and sort affordances inserted into one table.
#[derive(Debug)]
pub(crate) struct TableView {
    pub(crate) tbody: NodeId,
    pub(crate) headers: Vec<NodeId>,
    pub(crate) selector: NodeId,
    pub(crate) search: Option<NodeId>,
    pub(crate) pagination: NodeId,
    info: NodeId,
    options: Vec<(usize, NodeId)>,
    empty_row: NodeId,
    labels: TableLabels,
}

/// Header cells and body rows read from the server-rendered markup.
pub(crate) struct TableMarkup {
    pub(crate) tbody: NodeId,
    pub(crate) headers: Vec<NodeId>,
    pub(crate) rows: Vec<TableRow<NodeId>>,
}

/// Reads header cells and body rows, moving loose rows into a `tbody`.
pub(crate) fn read_markup(doc: &mut Document, table: NodeId) -> TableMarkup {
    let headers = doc
        .first_child_element(table, "thead")
        .and_then(|thead| doc.first_child_element(thead, "tr"))
        .map(|row| doc.child_elements(row, "th"))
        .unwrap_or_default();

    let tbody = match doc.first_child_element(table, "tbody") {
        Some(tbody) => tbody,
        None => {
            let tbody = doc.append_element(table, "tbody");
            for row in doc.child_elements(table, "tr") {
                // Rows are direct children of `table`, never ancestors of `tbody`.
                let _ = doc.append_child(tbody, row);
            }
            tbody
        }
    };

    let rows = doc
        .child_elements(tbody, "tr")
        .into_iter()
        .map(|row| {
            let cells = doc
                .children(row)
                .iter()
                .filter(|cell| matches!(doc.tag(**cell), "td" | "th"))
                .map(|cell| doc.text_content(*cell))
                .collect();
            TableRow::new(row, cells)
        })
        .collect();

    TableMarkup {
        tbody,
        headers,
        rows,
    }
}

impl TableView {
    /// Inserts the top controls (`caption`) and bottom bar (`tfoot`).
    pub(crate) fn build(
        doc: &mut Document,
        table: NodeId,
        markup: &TableMarkup,
        config: &TableConfig,
    ) -> Self {
        doc.add_class(table, INITIALIZED_CLASS);

        let caption = doc.create_element("caption");
        doc.add_class(caption, "datatable-top");
        let first = doc.children(table).first().copied();
        // `caption` is fresh and detached, so insertion cannot fail.
        let _ = doc.insert_before(table, caption, first);

        let dropdown = doc.append_element(caption, "label");
        doc.add_class(dropdown, "datatable-dropdown");
        let selector = doc.append_element(dropdown, "select");
        doc.add_class(selector, "datatable-selector");
        let options = config
            .per_page_select
            .iter()
            .map(|size| {
                let option = doc.append_element(selector, "option");
                doc.set_attribute(option, "value", size.to_string());
                doc.set_text(option, size.to_string());
                (*size, option)
            })
            .collect();
        let per_page_label = doc.append_element(dropdown, "span");
        doc.set_text(per_page_label, config.labels.per_page.clone());

        let search = config.searchable.then(|| {
            let search = doc.append_element(caption, "input");
            doc.add_class(search, "datatable-input");
            doc.set_attribute(search, "type", "search");
            doc.set_attribute(search, "placeholder", config.labels.placeholder.clone());
            search
        });

        for (column, header) in markup.headers.iter().enumerate() {
            if config.is_column_sortable(column) {
                doc.add_class(*header, SORTABLE_CLASS);
            }
        }

        let tfoot = doc.append_element(table, "tfoot");
        doc.add_class(tfoot, "datatable-bottom");
        let footer_row = doc.append_element(tfoot, "tr");
        let footer_cell = doc.append_element(footer_row, "td");
        let columns = column_count(markup);
        doc.set_attribute(footer_cell, "colspan", columns.to_string());
        let info = doc.append_element(footer_cell, "div");
        doc.add_class(info, "datatable-info");
        let pagination = doc.append_element(footer_cell, "ul");
        doc.add_class(pagination, "datatable-pagination");

        let empty_row = doc.create_element("tr");
        doc.add_class(empty_row, "datatable-empty");
        let empty_cell = doc.append_element(empty_row, "td");
        doc.set_attribute(empty_cell, "colspan", columns.to_string());
        doc.set_text(empty_cell, config.labels.no_rows.clone());

        Self {
            tbody: markup.tbody,
            headers: markup.headers.clone(),
            selector,
            search,
            pagination,
            info,
            options,
            empty_row,
            labels: config.labels.clone(),
        }
    }

    /// Brings the DOM in line with `model`.
    pub(crate) fn render(&self, doc: &mut Document, model: &TableModel<NodeId>) {
        doc.clear_children(self.tbody);
        let visible = model.visible_keys();
        if visible.is_empty() {
            let _ = doc.append_child(self.tbody, self.empty_row);
        }
        for row in visible {
            let _ = doc.append_child(self.tbody, row);
        }

        let primary = model.primary_sort();
        for (column, header) in self.headers.iter().enumerate() {
            doc.remove_class(*header, ASCENDING_CLASS);
            doc.remove_class(*header, DESCENDING_CLASS);
            doc.remove_attribute(*header, "aria-sort");
            if let Some(key) = primary.filter(|key| key.column == column) {
                let class = match key.direction {
                    SortDirection::Asc => ASCENDING_CLASS,
                    SortDirection::Desc => DESCENDING_CLASS,
                };
                doc.add_class(*header, class);
                doc.set_attribute(*header, "aria-sort", key.direction.aria_value());
            }
        }

        for (size, option) in &self.options {
            if *size == model.per_page() {
                doc.set_attribute(*option, "selected", "selected");
            } else {
                doc.remove_attribute(*option, "selected");
            }
        }
        doc.set_attribute(self.selector, "value", model.per_page().to_string());

        let info = model.page_info();
        doc.set_text(
            self.info,
            self.labels.format_info(info.start, info.end, info.filtered),
        );

        self.render_pagination(doc, model);
    }

    fn render_pagination(&self, doc: &mut Document, model: &TableModel<NodeId>) {
        doc.remove_children(self.pagination);
        let count = model.page_count();
        if count <= 1 {
            return;
        }
        let current = model.page();

        let link = |doc: &mut Document, page: Option<usize>, text: String, class: &str| {
            let item = doc.append_element(self.pagination, "li");
            doc.add_class(item, class);
            if page == Some(current) && class == "datatable-pagination-list-item" {
                doc.add_class(item, ACTIVE_PAGE_CLASS);
            }
            let anchor = doc.append_element(item, "a");
            doc.set_text(anchor, text);
            match page {
                Some(page) => doc.set_attribute(anchor, "data-page", page.to_string()),
                None => doc.add_class(item, "datatable-ellipsis"),
            }
        };

        if current > 1 {
            link(doc, Some(current - 1), "‹".to_owned(), "datatable-prev");
        }
        for item in model.pagination() {
            match item {
                PageItem::Page(page) => link(
                    doc,
                    Some(page),
                    page.to_string(),
                    "datatable-pagination-list-item",
                ),
                PageItem::Ellipsis => link(
                    doc,
                    None,
                    "…".to_owned(),
                    "datatable-pagination-list-item",
                ),
            }
        }
        if current < count {
            link(doc, Some(current + 1), "›".to_owned(), "datatable-next");
        }
    }
}

fn column_count(markup: &TableMarkup) -> usize {
    markup
        .rows
        .iter()
        .map(|row| row.cells.len())
        .chain(std::iter::once(markup.headers.len()))
        .max()
        .unwrap_or(1)
        .max(1)
}
