//! Property-based tests for cursor encoding and page traversal using proptest.
//!
//! Rows carry small nullable columns so that ties and NULL groups are common.

use futures::executor::block_on;
use proptest::prelude::*;
use seekpage::prelude::*;
use serde_json::{Value as JsonValue, json};
use std::collections::HashSet;

const DIRECTIONS: [Direction; 6] = [
    Direction::Asc,
    Direction::Desc,
    Direction::AscNullsFirst,
    Direction::AscNullsLast,
    Direction::DescNullsFirst,
    Direction::DescNullsLast,
];

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        ".{0,12}".prop_map(Value::String),
    ]
}

fn rows() -> impl Strategy<Value = Vec<JsonValue>> {
    prop::collection::vec(
        (prop::option::of(0i64..3), prop::option::of(any::<bool>())),
        1..12,
    )
    .prop_map(|cols| {
        cols.into_iter()
            .enumerate()
            .map(|(id, (a, b))| json!({"id": id, "a": a, "b": b}))
            .collect()
    })
}

fn order_items() -> impl Strategy<Value = Vec<OrderItem>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["a", "b"]),
            prop::sample::select(DIRECTIONS.to_vec()),
        ),
        0..3,
    )
    .prop_map(|items| items.into_iter().map(OrderItem::from).collect())
}

fn ids(page: &Page<JsonValue>) -> Vec<i64> {
    page.nodes().filter_map(|n| n["id"].as_i64()).collect()
}

fn paginate(store: &MemoryStore<JsonValue>, request: PageRequest) -> Page<JsonValue> {
    block_on(Paginator::default().paginate(store, request)).unwrap()
}

/// Every row in canonical order, fetched as a single page.
fn all_ids(store: &MemoryStore<JsonValue>, items: &[OrderItem]) -> Vec<i64> {
    ids(&paginate(store, PageRequest::new(store.len()).order(items.to_vec())))
}

// =============================================================================
// Cursor Codec Property Tests
// =============================================================================

proptest! {
    /// Decoding an encoded cursor yields the same tuple
    #[test]
    fn cursor_round_trips(values in prop::collection::vec(scalar(), 0..8)) {
        let cursor = Cursor::new(values);
        let token = cursor.encode();
        prop_assert_eq!(Cursor::decode(&token).unwrap(), cursor);
    }

    /// Tokens only use the URL-safe alphabet
    #[test]
    fn cursor_tokens_are_url_safe(values in prop::collection::vec(scalar(), 0..8)) {
        let token = Cursor::new(values).encode();
        prop_assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    /// Arbitrary input never panics and lenient parsing never errors
    #[test]
    fn arbitrary_tokens_decode_or_fail_cleanly(token in ".{0,64}") {
        let _ = Cursor::decode(&token);
        let _ = parse_cursor(Some(&token));
    }
}

// =============================================================================
// Pagination Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Normalized orders end in the primary key, so no two rows share a cursor
    #[test]
    fn cursors_are_unique(rows in rows(), items in order_items()) {
        let order = Order::normalize(&items, &["id".to_string()], false).unwrap();
        let tokens: HashSet<String> = rows
            .iter()
            .map(|row| Cursor::from_record(row, &order).encode())
            .collect();
        prop_assert_eq!(tokens.len(), rows.len());
    }

    /// Following endCursor until hasNextPage is false visits every row once, in order
    #[test]
    fn forward_walk_is_complete(rows in rows(), items in order_items(), limit in 1usize..5) {
        let store = MemoryStore::new(rows);
        let expected = all_ids(&store, &items);
        let request = PageRequest::new(limit).order(items);

        let mut page = paginate(&store, request.clone());
        let mut walked = ids(&page);
        while page.page_info.has_next_page {
            let after = page.page_info.end_cursor.clone().unwrap();
            page = paginate(&store, request.clone().after(after));
            prop_assert!(!page.edges.is_empty());
            walked.extend(ids(&page));
        }

        prop_assert_eq!(walked, expected);
        prop_assert_eq!(page.total_count, store.len() as u64);
    }

    /// Going forward one page then back with its startCursor reproduces the page
    #[test]
    fn backward_reverses_forward(rows in rows(), items in order_items(), limit in 1usize..4) {
        let store = MemoryStore::new(rows);
        let request = PageRequest::new(limit).order(items);

        let first = paginate(&store, request.clone());
        prop_assume!(first.page_info.has_next_page);

        let after = first.page_info.end_cursor.clone().unwrap();
        let second = paginate(&store, request.clone().after(after));
        let before = second.page_info.start_cursor.clone().unwrap();
        let back = paginate(&store, request.before(before));

        prop_assert_eq!(ids(&back), ids(&first));
        prop_assert_eq!(&back.page_info.start_cursor, &first.page_info.start_cursor);
        prop_assert!(back.page_info.has_next_page);
        prop_assert!(!back.page_info.has_previous_page);
    }

    /// totalCount follows the filter and ignores limit and cursors
    #[test]
    fn total_count_ignores_bounds(rows in rows(), limit in 1usize..4, threshold in 0i64..3) {
        let store = MemoryStore::new(rows);
        let filter = simple("a", Operator::Gte, threshold);
        let expected = store.rows().iter().filter(|r| filter.matches(*r)).count() as u64;

        let request = PageRequest::new(limit).filter(filter);
        let first = paginate(&store, request.clone());
        prop_assert_eq!(first.total_count, expected);

        if let Some(after) = first.page_info.end_cursor.clone() {
            let next = paginate(&store, request.after(after));
            prop_assert_eq!(next.total_count, expected);
        }
    }
}
