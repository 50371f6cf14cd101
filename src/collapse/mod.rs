//! Click-to-toggle panels with direction icons.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::dom::{Document, NodeId, Page, Selector};
use crate::interaction::{EventKind, EventTarget, ListenerId};

/// How a trigger's icon elements are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSelectionStrategy {
    /// First icon descendant carrying the marker attribute.
    #[default]
    Marked,
    /// Every icon descendant.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapseConfig {
    pub group_class: String,
    pub state_class: String,
    pub icon_strategy: IconSelectionStrategy,
    pub icon_tag: String,
    pub marker_attribute: String,
    pub target_attribute: String,
    pub expanded_icon: String,
    pub collapsed_icon: String,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            group_class: "collapse".to_owned(),
            state_class: "show".to_owned(),
            icon_strategy: IconSelectionStrategy::Marked,
            icon_tag: "ion-icon".to_owned(),
            marker_attribute: "data-collapse".to_owned(),
            target_attribute: "data-target".to_owned(),
            expanded_icon: "chevron-collapse".to_owned(),
            collapsed_icon: "chevron-expand".to_owned(),
        }
    }
}

impl CollapseConfig {
    #[must_use]
    pub fn with_icon_strategy(mut self, strategy: IconSelectionStrategy) -> Self {
        self.icon_strategy = strategy;
        self
    }

    /// Visibility of `panel`, read from its state class.
    #[must_use]
    pub fn panel_state(&self, document: &Document, panel: NodeId) -> PanelState {
        if document.has_class(panel, &self.state_class) {
            PanelState::Expanded
        } else {
            PanelState::Collapsed
        }
    }

    #[must_use]
    pub fn icon_name(&self, state: PanelState) -> &str {
        match state {
            PanelState::Expanded => &self.expanded_icon,
            PanelState::Collapsed => &self.collapsed_icon,
        }
    }

    fn icons(&self, document: &Document, trigger: NodeId) -> SmallVec<[NodeId; 2]> {
        let icons = document
            .descendants(trigger)
            .into_iter()
            .filter(|node| document.tag(*node) == self.icon_tag);
        match self.icon_strategy {
            IconSelectionStrategy::Marked => icons
                .filter(|node| document.has_attribute(*node, &self.marker_attribute))
                .take(1)
                .collect(),
            IconSelectionStrategy::All => icons.collect(),
        }
    }
}

/// One wired trigger and the panel it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseBinding {
    pub trigger: NodeId,
    pub target_panel_id: String,
    pub panel: NodeId,
    pub icons: SmallVec<[NodeId; 2]>,
    pub listener: ListenerId,
}

/// Wires every collapse trigger under `root`, inclusive.
///
/// Icons are synchronized with their panel right away and again after each
/// toggle. Triggers without a resolvable panel are skipped.
pub fn wire_collapse(
    page: &mut Page,
    root: NodeId,
    config: &CollapseConfig,
) -> Vec<CollapseBinding> {
    let selector = Selector {
        classes: vec![config.group_class.clone()],
        ..Selector::default()
    };
    let document = page.document();
    let mut triggers = Vec::new();
    if selector.matches(document, root) {
        triggers.push(root);
    }
    triggers.extend(document.select_all(root, &selector));

    let mut bindings = Vec::with_capacity(triggers.len());
    for trigger in triggers {
        let Some(target_id) = page
            .document()
            .attribute(trigger, &config.target_attribute)
            .map(str::to_owned)
        else {
            debug!(
                trigger = trigger.index(),
                "collapse trigger has no target attribute; skipping"
            );
            continue;
        };
        let Some(panel) = page.document().get_element_by_id(&target_id) else {
            debug!(panel_id = %target_id, "collapse target not found; skipping");
            continue;
        };

        let icons = config.icons(page.document(), trigger);
        sync_icons(page.document_mut(), config, panel, &icons);

        let handler_config = config.clone();
        let handler_icons = icons.clone();
        let listener = page.add_listener(
            EventTarget::Element(trigger),
            EventKind::Click,
            move |document, event| {
                event.prevent_default();
                document.toggle_class(panel, &handler_config.state_class);
                let state = sync_icons(document, &handler_config, panel, &handler_icons);
                trace!(panel = panel.index(), ?state, "collapse toggled");
            },
        );

        bindings.push(CollapseBinding {
            trigger,
            target_panel_id: target_id,
            panel,
            icons,
            listener,
        });
    }
    debug!(bindings = bindings.len(), "collapse triggers wired");
    bindings
}

/// Wires every collapse trigger in the document with the default config.
pub fn wire_collapse_defaults(page: &mut Page) -> Vec<CollapseBinding> {
    let body = page.document().body();
    wire_collapse(page, body, &CollapseConfig::default())
}

fn sync_icons(
    document: &mut Document,
    config: &CollapseConfig,
    panel: NodeId,
    icons: &[NodeId],
) -> PanelState {
    let state = config.panel_state(document, panel);
    let name = config.icon_name(state).to_owned();
    for icon in icons {
        document.set_attribute(*icon, "name", name.clone());
    }
    state
}
