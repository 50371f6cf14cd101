use approx::assert_relative_eq;
use pluginhealth_ui::chart::{
    ChartOption, DatasetOption, SeriesOption, create_chart, create_chart_with_renderer,
    layout_bar_chart,
};
use pluginhealth_ui::core::Viewport;
use pluginhealth_ui::dom::{Document, NodeId, Page};
use pluginhealth_ui::error::WidgetError;
use pluginhealth_ui::interaction::{EventKind, EventTarget};
use pluginhealth_ui::render::{NullRenderer, TextRole};
use serde_json::json;

const SCORE_DISTRIBUTION: &str = r#"{
    "title": { "text": "Score distribution" },
    "tooltip": {},
    "dataset": {
        "source": [
            ["score", "plugins"],
            ["0-49", 12],
            ["50-89", 42],
            ["90-100", 40]
        ]
    },
    "xAxis": { "type": "category", "name": "Score" },
    "yAxis": { "type": "value", "name": "Plugins" },
    "series": [{ "type": "bar" }]
}"#;

fn chart_page(width: u32, height: u32) -> (Page, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let container = doc.append_element(body, "div");
    doc.set_attribute(container, "id", "distribution");
    doc.set_size(container, width, height);
    (Page::new(doc), container)
}

fn option() -> ChartOption {
    ChartOption::from_json_str(SCORE_DISTRIBUTION).expect("valid chart option")
}

fn resize_listeners(page: &Page) -> usize {
    page.listener_count(EventTarget::Window, EventKind::Resize)
}

#[test]
fn chart_renders_svg_sized_to_container() {
    let (mut page, container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");

    let svgs = page.document().child_elements(container, "svg");
    assert_eq!(svgs.len(), 1);
    assert_eq!(page.document().attribute(svgs[0], "width"), Some("800"));
    assert_eq!(page.document().attribute(svgs[0], "height"), Some("400"));
    assert_eq!(page.document().attribute(svgs[0], "viewBox"), Some("0 0 800 400"));

    let bars = page
        .document()
        .query_selector_all(svgs[0], "rect.bar")
        .expect("valid selector");
    assert_eq!(bars.len(), 3);
    assert_eq!(chart.render_count(), 1);
    assert_eq!(resize_listeners(&page), 1);

    let markup = chart.svg_markup(&page).expect("svg drawn");
    assert!(markup.contains("Score distribution"));
    assert!(markup.contains("<title>50-89\nplugins: 42</title>"));
}

#[test]
fn bar_geometry_follows_nice_value_axis() {
    let frame = layout_bar_chart(&option(), Viewport::new(800, 400)).expect("layout");
    let bar = frame.bar(0, 2).expect("bar for last category");

    // Plot area is 700x280 at (60, 60); the axis tops out at 50.
    assert_relative_eq!(bar.height, 280.0 * 40.0 / 50.0, epsilon = 1e-9);
    assert_relative_eq!(bar.y + bar.height, 340.0, epsilon = 1e-9);

    let step = 700.0 / 3.0;
    let slot = step * 0.8;
    assert_relative_eq!(bar.width, slot * 0.9, epsilon = 1e-9);
    assert_relative_eq!(bar.x, 60.0 + step * 2.0 + step * 0.1 + slot * 0.05, epsilon = 1e-9);
}

#[test]
fn reapplying_the_same_option_is_idempotent() {
    let (mut page, container) = chart_page(640, 360);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    let first = chart.svg_markup(&page).expect("svg drawn");

    chart.set_option(&mut page, option()).expect("same option");
    chart.set_option(&mut page, option()).expect("same option again");

    assert_eq!(chart.svg_markup(&page).expect("svg drawn"), first);
    assert_eq!(page.document().child_elements(container, "svg").len(), 1);
    assert_eq!(resize_listeners(&page), 1);
    assert_eq!(chart.render_count(), 3);
}

#[test]
fn set_option_replaces_instead_of_merging() {
    let (mut page, _container) = chart_page(640, 360);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");

    let mut next = option();
    next.title = None;
    next.dataset = DatasetOption {
        dimensions: Vec::new(),
        source: vec![vec![json!("all"), json!(7)]],
    };
    chart.set_option(&mut page, next.clone()).expect("new option");

    assert_eq!(chart.option(), next);
    let markup = chart.svg_markup(&page).expect("svg drawn");
    assert!(!markup.contains("Score distribution"));
    assert_eq!(markup.matches("class=\"bar\"").count(), 1);
}

#[test]
fn invalid_option_keeps_previous_drawing() {
    let (mut page, _container) = chart_page(640, 360);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    let before = chart.svg_markup(&page).expect("svg drawn");

    let mut broken = option();
    broken.series = vec![SeriesOption {
        kind: "pie".to_owned(),
        ..SeriesOption::bar()
    }];
    let err = chart
        .set_option(&mut page, broken)
        .expect_err("pie series is rejected");
    assert!(matches!(err, WidgetError::InvalidOption(_)));
    assert_eq!(chart.option(), option());
    assert_eq!(chart.svg_markup(&page).expect("svg kept"), before);
}

#[test]
fn window_resize_relays_out_to_container_box() {
    let (mut page, container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");

    page.document_mut().set_size(container, 500, 300);
    let outcome = page.resize_window(900, 700);
    assert_eq!(outcome.handlers_run, 1);

    assert_eq!(chart.viewport(), Viewport::new(500, 300));
    assert_eq!(chart.render_count(), 2);
    let svg = page.document().child_elements(container, "svg")[0];
    assert_eq!(page.document().attribute(svg, "width"), Some("500"));
}

#[test]
fn disposer_removes_resize_listener_once() {
    let (mut page, container) = chart_page(800, 400);
    let (chart, mut disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    assert!(!disposer.is_disposed());

    assert!(disposer.dispose(&mut page));
    assert!(!disposer.dispose(&mut page));
    assert!(disposer.is_disposed());
    assert_eq!(resize_listeners(&page), 0);

    page.document_mut().set_size(container, 300, 200);
    page.resize_window(400, 300);
    assert_eq!(chart.render_count(), 1);
    assert_eq!(chart.viewport(), Viewport::new(800, 400));
}

#[test]
fn resize_to_zero_keeps_last_drawing() {
    let (mut page, container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    let before = chart.svg_markup(&page).expect("svg drawn");

    page.document_mut().set_size(container, 0, 0);
    page.resize_window(10, 10);

    assert_eq!(chart.render_count(), 1);
    assert_eq!(chart.svg_markup(&page).expect("svg kept"), before);
}

#[test]
fn missing_container_is_reported() {
    let (mut page, _container) = chart_page(800, 400);
    let err = create_chart(&mut page, "nope", option()).expect_err("missing container");
    assert!(matches!(err, WidgetError::MissingTarget { .. }));
    assert_eq!(page.total_listeners(), 0);
}

#[test]
fn zero_sized_container_is_rejected() {
    let (mut page, _container) = chart_page(0, 0);
    let err = create_chart(&mut page, "distribution", option()).expect_err("no box");
    assert!(matches!(
        err,
        WidgetError::InvalidViewport {
            width: 0,
            height: 0
        }
    ));
    assert_eq!(page.total_listeners(), 0);
}

#[test]
fn each_chart_registers_its_own_listener() {
    let (mut page, _container) = chart_page(800, 400);
    let body = page.document().body();
    let second = page.document_mut().append_element(body, "div");
    page.document_mut().set_attribute(second, "id", "trend");
    page.document_mut().set_size(second, 400, 200);

    let (_a, _da) = create_chart(&mut page, "distribution", option()).expect("first chart");
    let (_b, _db) = create_chart(&mut page, "trend", option()).expect("second chart");
    assert_eq!(resize_listeners(&page), 2);
}

#[test]
fn custom_renderer_receives_frames() {
    let (mut page, _container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart_with_renderer(&mut page, "distribution", option(), NullRenderer::default())
            .expect("chart created");

    chart.with_renderer(|renderer| {
        assert_eq!(renderer.render_calls, 1);
        assert_eq!(renderer.last_rect_count, 4);
    });
    assert_eq!(page.document().descendants(page.document().body()).len(), 1);
}

fn option_with_axis(min: Option<f64>, max: Option<f64>) -> ChartOption {
    let mut option = option();
    option.y_axis.min = min;
    option.y_axis.max = max;
    option
}

#[test]
fn explicit_axis_range_is_used_as_is() {
    let option = option_with_axis(Some(0.0), Some(100.0));
    let frame = layout_bar_chart(&option, Viewport::new(800, 400)).expect("layout");

    let bar = frame.bar(0, 2).expect("bar for last category");
    assert_relative_eq!(bar.height, 280.0 * 40.0 / 100.0, epsilon = 1e-9);
    let labels: Vec<&str> = frame
        .texts_with_role(TextRole::AxisLabel)
        .map(|text| text.text.as_str())
        .collect();
    assert!(labels.contains(&"100"));
    assert!(labels.contains(&"20"));
}

#[test]
fn axis_max_below_data_clamps_bars_to_plot_top() {
    // Only a max of 20 is given, so the axis rounds up to 25.
    let option = option_with_axis(None, Some(20.0));
    let frame = layout_bar_chart(&option, Viewport::new(800, 400)).expect("layout");

    let tallest = frame.bar(0, 1).expect("42 plugins bar");
    assert_relative_eq!(tallest.y, 60.0, epsilon = 1e-9);
    assert_relative_eq!(tallest.height, 280.0, epsilon = 1e-9);
    let lowest = frame.bar(0, 0).expect("12 plugins bar");
    assert_relative_eq!(lowest.height, 280.0 * 12.0 / 25.0, epsilon = 1e-9);
}

#[test]
fn negative_axis_min_lifts_the_baseline() {
    // min -10 with data up to 42 gives a [-20, 80] axis.
    let option = option_with_axis(Some(-10.0), None);
    let frame = layout_bar_chart(&option, Viewport::new(800, 400)).expect("layout");

    let baseline = 340.0 - 280.0 * 20.0 / 100.0;
    for bar in frame.bars() {
        assert_relative_eq!(bar.y + bar.height, baseline, epsilon = 1e-9);
    }
}

#[test]
fn reversed_or_flat_axis_range_is_rejected() {
    for (min, max) in [(10.0, 0.0), (5.0, 5.0)] {
        let (mut page, container) = chart_page(800, 400);
        let err = create_chart(&mut page, "distribution", option_with_axis(Some(min), Some(max)))
            .expect_err("bad axis range");
        assert!(matches!(err, WidgetError::InvalidOption(_)), "{min}..{max}: {err}");
        assert_eq!(page.total_listeners(), 0);
        assert!(page.document().child_elements(container, "svg").is_empty());
    }

    let (mut page, _container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    let before = chart.svg_markup(&page).expect("svg drawn");
    let err = chart
        .set_option(&mut page, option_with_axis(Some(10.0), Some(0.0)))
        .expect_err("reversed range");
    assert!(matches!(err, WidgetError::InvalidOption(_)));
    assert_eq!(chart.option(), option());
    assert_eq!(chart.svg_markup(&page).expect("svg kept"), before);
}

#[test]
fn repeated_resizes_reuse_svg_nodes() {
    let (mut page, container) = chart_page(800, 400);
    let (chart, _disposer) =
        create_chart(&mut page, "distribution", option()).expect("chart created");
    let capacity = page.document().capacity();
    let live = page.document().node_count();

    for _ in 0..1000 {
        page.resize_window(800, 600);
    }

    assert_eq!(chart.render_count(), 1001);
    assert_eq!(page.document().capacity(), capacity);
    assert_eq!(page.document().node_count(), live);
    assert_eq!(page.document().child_elements(container, "svg").len(), 1);
}
