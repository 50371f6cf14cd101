use tracing::{debug, warn};

use crate::api::PageConfig;
use crate::chart::{ChartHandle, ResizeDisposer, create_chart};
use crate::collapse::{CollapseBinding, wire_collapse};
use crate::dom::{NodeId, Page};
use crate::error::WidgetError;
use crate::table::{
    EXECUTION_ORDER_COLUMN, PROBES_TABLE_SELECTOR, SortDirection, TableOptions, attach_table,
};

#[derive(Debug)]
pub struct MountedChart {
    pub container_id: String,
    pub handle: ChartHandle,
    pub disposer: ResizeDisposer,
}

/// What `bootstrap_page` set up. Failures of one initializer never stop
/// the others.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub collapse: Vec<CollapseBinding>,
    pub tables: Vec<NodeId>,
    pub charts: Vec<MountedChart>,
    pub chart_errors: Vec<(String, WidgetError)>,
}

impl BootstrapReport {
    #[must_use]
    pub fn chart(&self, container_id: &str) -> Option<&MountedChart> {
        self.charts
            .iter()
            .find(|chart| chart.container_id == container_id)
    }

    /// Removes every chart resize listener. Returns how many were removed.
    pub fn dispose_charts(&mut self, page: &mut Page) -> usize {
        let mut removed = 0;
        for chart in &mut self.charts {
            if chart.disposer.dispose(page) {
                removed += 1;
            }
        }
        removed
    }
}

/// Runs the page initializers listed in `config`.
pub fn bootstrap_page(page: &mut Page, config: &PageConfig) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    if let Some(collapse) = &config.collapse {
        let body = page.document().body();
        report.collapse = wire_collapse(page, body, collapse);
    }

    let probes = config.probes_table.then(|| {
        (
            PROBES_TABLE_SELECTOR.to_owned(),
            TableOptions::new().with_order(EXECUTION_ORDER_COLUMN, SortDirection::Asc),
        )
    });
    let mounts = probes.into_iter().chain(
        config
            .tables
            .iter()
            .map(|mount| (mount.selector.clone(), mount.options.clone())),
    );
    for (selector, options) in mounts {
        match attach_table(page, &selector, options) {
            Ok(Some(table)) => report.tables.push(table),
            Ok(None) => {}
            Err(WidgetError::MissingTarget { target }) => {
                debug!(missing = %target, "table target not found; skipping");
            }
            Err(err) => warn!(selector = %selector, error = %err, "table setup skipped"),
        }
    }

    for mount in &config.charts {
        match create_chart(page, &mount.container_id, mount.option.clone()) {
            Ok((handle, disposer)) => report.charts.push(MountedChart {
                container_id: mount.container_id.clone(),
                handle,
                disposer,
            }),
            Err(err) => {
                warn!(container = %mount.container_id, error = %err, "chart mount failed");
                report.chart_errors.push((mount.container_id.clone(), err));
            }
        }
    }

    debug!(
        collapse = report.collapse.len(),
        tables = report.tables.len(),
        charts = report.charts.len(),
        chart_errors = report.chart_errors.len(),
        "page bootstrapped"
    );
    report
}
