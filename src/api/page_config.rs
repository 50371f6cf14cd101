use serde::{Deserialize, Serialize};

use crate::chart::ChartOption;
use crate::collapse::CollapseConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::table::TableOptions;

pub const PAGE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMount {
    pub selector: String,
    #[serde(default)]
    pub options: TableOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMount {
    pub container_id: String,
    pub option: ChartOption,
}

/// Initializers to run once the page markup is in place.
///
/// Unknown keys are rejected, so a versioned contract payload never parses
/// as a bare config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// `None` skips collapse wiring.
    pub collapse: Option<CollapseConfig>,
    pub probes_table: bool,
    pub tables: Vec<TableMount>,
    pub charts: Vec<ChartMount>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            collapse: Some(CollapseConfig::default()),
            probes_table: false,
            tables: Vec::new(),
            charts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfigJsonContractV1 {
    pub schema_version: u32,
    pub page: PageConfig,
}

impl PageConfig {
    /// Collapse wiring plus the probes table, as on the probes listing page.
    #[must_use]
    pub fn probes_page() -> Self {
        Self {
            probes_table: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_table(mut self, selector: impl Into<String>, options: TableOptions) -> Self {
        self.tables.push(TableMount {
            selector: selector.into(),
            options,
        });
        self
    }

    #[must_use]
    pub fn with_chart(mut self, container_id: impl Into<String>, option: ChartOption) -> Self {
        self.charts.push(ChartMount {
            container_id: container_id.into(),
            option,
        });
        self
    }

    pub fn to_json_contract_v1_pretty(&self) -> WidgetResult<String> {
        let payload = PageConfigJsonContractV1 {
            schema_version: PAGE_CONFIG_JSON_SCHEMA_V1,
            page: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            WidgetError::InvalidData(format!("failed to serialize page config contract v1: {e}"))
        })
    }

    /// Accepts either a bare page config or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> WidgetResult<Self> {
        if let Ok(config) = serde_json::from_str::<Self>(input) {
            return Ok(config);
        }
        let payload: PageConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            WidgetError::InvalidData(format!("failed to parse page config json payload: {e}"))
        })?;
        if payload.schema_version != PAGE_CONFIG_JSON_SCHEMA_V1 {
            return Err(WidgetError::InvalidData(format!(
                "unsupported page config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.page)
    }
}
