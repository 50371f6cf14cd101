use pluginhealth_ui::collapse::{
    CollapseConfig, IconSelectionStrategy, PanelState, wire_collapse, wire_collapse_defaults,
};
use pluginhealth_ui::dom::{Document, NodeId, Page};
use pluginhealth_ui::interaction::{EventKind, EventTarget};

struct Section {
    trigger: NodeId,
    panel: NodeId,
    marked_icon: NodeId,
    plain_icon: NodeId,
}

/// `div.collapse[data-target]` holding a marked and an unmarked icon, plus
/// the `div#<panel_id>` it controls.
fn section(doc: &mut Document, parent: NodeId, panel_id: &str, expanded: bool) -> Section {
    let trigger = doc.append_element(parent, "div");
    doc.add_class(trigger, "collapse");
    doc.set_attribute(trigger, "data-target", panel_id);
    let heading = doc.append_element(trigger, "h3");
    doc.set_text(heading, "Details");
    let marked_icon = doc.append_element(trigger, "ion-icon");
    doc.set_attribute(marked_icon, "data-collapse", "");
    let plain_icon = doc.append_element(trigger, "ion-icon");
    doc.set_attribute(plain_icon, "name", "information-circle");

    let panel = doc.append_element(parent, "div");
    doc.set_attribute(panel, "id", panel_id);
    if expanded {
        doc.add_class(panel, "show");
    }
    Section {
        trigger,
        panel,
        marked_icon,
        plain_icon,
    }
}

fn icon_name(page: &Page, icon: NodeId) -> Option<String> {
    page.document().attribute(icon, "name").map(str::to_owned)
}

#[test]
fn icons_reflect_initial_panel_state() {
    let mut doc = Document::new();
    let body = doc.body();
    let open = section(&mut doc, body, "open-panel", true);
    let closed = section(&mut doc, body, "closed-panel", false);
    let mut page = Page::new(doc);

    let bindings = wire_collapse_defaults(&mut page);

    assert_eq!(bindings.len(), 2);
    assert_eq!(icon_name(&page, open.marked_icon).as_deref(), Some("chevron-collapse"));
    assert_eq!(icon_name(&page, closed.marked_icon).as_deref(), Some("chevron-expand"));
    assert_eq!(
        icon_name(&page, open.plain_icon).as_deref(),
        Some("information-circle")
    );
    assert_eq!(bindings[0].target_panel_id, "open-panel");
    assert_eq!(bindings[0].icons.as_slice(), &[open.marked_icon]);
}

#[test]
fn click_toggles_panel_and_icon_together() {
    let mut doc = Document::new();
    let body = doc.body();
    let item = section(&mut doc, body, "probe-details", false);
    let mut page = Page::new(doc);
    let config = CollapseConfig::default();
    wire_collapse(&mut page, body, &config);

    let outcome = page.click(item.trigger);
    assert!(outcome.default_prevented);
    assert!(page.document().has_class(item.panel, "show"));
    assert_eq!(config.panel_state(page.document(), item.panel), PanelState::Expanded);
    assert_eq!(icon_name(&page, item.marked_icon).as_deref(), Some("chevron-collapse"));

    page.click(item.trigger);
    assert!(!page.document().has_class(item.panel, "show"));
    assert_eq!(icon_name(&page, item.marked_icon).as_deref(), Some("chevron-expand"));
}

#[test]
fn clicks_inside_trigger_bubble_to_its_listener() {
    let mut doc = Document::new();
    let body = doc.body();
    let item = section(&mut doc, body, "nested", false);
    let heading = doc.children(item.trigger)[0];
    let mut page = Page::new(doc);
    wire_collapse_defaults(&mut page);

    page.click(heading);
    assert!(page.document().has_class(item.panel, "show"));
}

#[test]
fn trigger_with_missing_target_is_skipped_without_affecting_siblings() {
    let mut doc = Document::new();
    let body = doc.body();
    let first = section(&mut doc, body, "first", false);
    let orphan = doc.append_element(body, "div");
    doc.add_class(orphan, "collapse");
    doc.set_attribute(orphan, "data-target", "does-not-exist");
    let orphan_icon = doc.append_element(orphan, "ion-icon");
    doc.set_attribute(orphan_icon, "data-collapse", "");
    let untargeted = doc.append_element(body, "div");
    doc.add_class(untargeted, "collapse");
    let last = section(&mut doc, body, "last", true);
    let mut page = Page::new(doc);

    let bindings = wire_collapse_defaults(&mut page);

    let triggers: Vec<NodeId> = bindings.iter().map(|binding| binding.trigger).collect();
    assert_eq!(triggers, vec![first.trigger, last.trigger]);
    assert_eq!(
        page.listener_count(EventTarget::Element(orphan), EventKind::Click),
        0
    );
    assert_eq!(icon_name(&page, orphan_icon), None);

    page.click(orphan);
    page.click(last.trigger);
    assert!(!page.document().has_class(last.panel, "show"));
    assert_eq!(icon_name(&page, last.marked_icon).as_deref(), Some("chevron-expand"));
}

#[test]
fn all_strategy_updates_every_icon() {
    let mut doc = Document::new();
    let body = doc.body();
    let item = section(&mut doc, body, "panel", true);
    let mut page = Page::new(doc);
    let config = CollapseConfig::default().with_icon_strategy(IconSelectionStrategy::All);

    let bindings = wire_collapse(&mut page, body, &config);
    assert_eq!(bindings[0].icons.len(), 2);
    assert_eq!(icon_name(&page, item.plain_icon).as_deref(), Some("chevron-collapse"));

    page.click(item.trigger);
    assert_eq!(icon_name(&page, item.marked_icon).as_deref(), Some("chevron-expand"));
    assert_eq!(icon_name(&page, item.plain_icon).as_deref(), Some("chevron-expand"));
}

#[test]
fn only_triggers_under_root_are_wired() {
    let mut doc = Document::new();
    let body = doc.body();
    let sidebar = doc.append_element(body, "aside");
    let main = doc.append_element(body, "main");
    let inside = section(&mut doc, main, "inside", false);
    let outside = section(&mut doc, sidebar, "outside", false);
    let mut page = Page::new(doc);

    let bindings = wire_collapse(&mut page, main, &CollapseConfig::default());

    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].trigger, inside.trigger);
    assert_eq!(icon_name(&page, outside.marked_icon), None);
    page.click(outside.trigger);
    assert!(!page.document().has_class(outside.panel, "show"));
}

#[test]
fn root_itself_can_be_a_trigger() {
    let mut doc = Document::new();
    let body = doc.body();
    let item = section(&mut doc, body, "self", false);
    let mut page = Page::new(doc);

    let bindings = wire_collapse(&mut page, item.trigger, &CollapseConfig::default());
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].panel, item.panel);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: CollapseConfig =
        serde_json::from_str(r#"{"icon_strategy": "all", "state_class": "open"}"#)
            .expect("valid config");
    assert_eq!(config.icon_strategy, IconSelectionStrategy::All);
    assert_eq!(config.state_class, "open");
    assert_eq!(config.group_class, "collapse");
    assert_eq!(config.icon_name(PanelState::Collapsed), "chevron-expand");
}
