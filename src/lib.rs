//! pluginhealth-ui: page widgets for the plugin health scoring site.
//!
//! Three independent initializers attach behavior to server-rendered markup
//! held in an in-memory DOM (`dom::Page`): paginated sortable tables, SVG bar
//! charts that follow their container's size, and collapsible panels with
//! direction icons.

pub mod api;
pub mod chart;
pub mod collapse;
pub mod core;
pub mod dom;
pub mod error;
pub mod interaction;
pub mod render;
pub mod table;
pub mod telemetry;

pub use api::{BootstrapReport, PageConfig, bootstrap_page};
pub use chart::{ChartHandle, ChartOption, ResizeDisposer, create_chart};
pub use collapse::{CollapseBinding, CollapseConfig, IconSelectionStrategy, wire_collapse};
pub use dom::{Document, NodeId, Page};
pub use error::{WidgetError, WidgetResult};
pub use table::{TableOptions, setup_probes_table, setup_table};
