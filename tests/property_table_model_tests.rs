use pluginhealth_ui::table::{PageItem, SortKey, TableModel, TableRow, pagination_items};
use proptest::prelude::*;

fn rows(values: &[i64]) -> Vec<TableRow<usize>> {
    values
        .iter()
        .enumerate()
        .map(|(key, value)| TableRow::new(key, vec![format!("row-{key}"), value.to_string()]))
        .collect()
}

proptest! {
    #[test]
    fn pages_partition_the_filtered_rows(
        values in prop::collection::vec(-1_000i64..1_000, 0..120),
        per_page in 1usize..60
    ) {
        let mut model = TableModel::new(rows(&values), per_page);
        model.set_sort(vec![SortKey::asc(1)]);

        let mut seen = Vec::new();
        for page in 1..=model.page_count() {
            prop_assert_eq!(model.goto_page(page), page);
            let visible = model.visible_keys();
            prop_assert!(visible.len() <= per_page);
            let info = model.page_info();
            if visible.is_empty() {
                prop_assert_eq!((info.start, info.end), (0, 0));
            } else {
                prop_assert_eq!(info.end + 1 - info.start, visible.len());
            }
            seen.extend(visible);
        }
        prop_assert_eq!(seen, model.ordered_keys());
        prop_assert_eq!(model.ordered_keys().len(), values.len());
    }

    #[test]
    fn ascending_sort_is_numeric_and_stable(
        values in prop::collection::vec(-50i64..50, 0..80)
    ) {
        let mut model = TableModel::new(rows(&values), 10);
        model.set_sort(vec![SortKey::asc(1)]);

        let keys = model.ordered_keys();
        for pair in keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(values[a] < values[b] || (values[a] == values[b] && a < b));
        }
    }

    #[test]
    fn toggling_twice_reverses_distinct_values(
        values in prop::collection::hash_set(-10_000i64..10_000, 0..60)
    ) {
        let values: Vec<i64> = values.into_iter().collect();
        let mut model = TableModel::new(rows(&values), 5);
        model.toggle_sort(1);
        let ascending = model.ordered_keys();
        model.toggle_sort(1);
        let mut descending = model.ordered_keys();
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    #[test]
    fn pagination_always_shows_first_last_and_current(
        count in 1usize..200,
        current_factor in 0.0f64..1.0
    ) {
        let current = 1 + ((count - 1) as f64 * current_factor) as usize;
        let items = pagination_items(current, count);

        prop_assert_eq!(items.first().copied(), Some(PageItem::Page(1)));
        prop_assert_eq!(items.last().copied(), Some(PageItem::Page(count)));
        prop_assert!(items.contains(&PageItem::Page(current)));
        prop_assert!(items.len() <= 7);

        let pages: Vec<usize> = items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page(page) => Some(*page),
                PageItem::Ellipsis => None,
            })
            .collect();
        prop_assert!(pages.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
