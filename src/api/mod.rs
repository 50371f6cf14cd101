//! Page-level entry points that run the widget initializers together.

mod bootstrap;
mod page_config;

pub use bootstrap::{BootstrapReport, MountedChart, bootstrap_page};
pub use page_config::{
    ChartMount, PAGE_CONFIG_JSON_SCHEMA_V1, PageConfig, PageConfigJsonContractV1, TableMount,
};
