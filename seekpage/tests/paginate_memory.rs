//! End-to-end pagination scenarios against the in-memory store.
//!
//! Fixture: five `tests` rows, each joined to a `persons` row under the
//! `persons` alias.

use anyhow::Result;
use seekpage::prelude::*;
use serde_json::{Value as JsonValue, json};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tests_table() -> Paginated<MemoryStore<JsonValue>> {
    init_tracing();
    let rows = vec![
        json!({"id": 1, "counter": 3, "extra": 4, "personId": 4, "isValid": true,
               "persons": {"id": 4, "name": "little"}}),
        json!({"id": 2, "counter": 4, "extra": 4, "personId": 2, "isValid": false,
               "persons": {"id": 2, "name": "bob"}}),
        json!({"id": 3, "counter": 4, "extra": 3, "personId": 1, "isValid": null,
               "persons": {"id": 1, "name": "jacky"}}),
        json!({"id": 4, "counter": 2, "extra": 3, "personId": 5, "isValid": false,
               "persons": {"id": 5, "name": "jony"}}),
        json!({"id": 5, "counter": 1, "extra": 3, "personId": 3, "isValid": null,
               "persons": {"id": 3, "name": "john"}}),
    ];
    with_pagination(PaginateConfig::default()).attach(MemoryStore::new(rows))
}

fn order(json: JsonValue) -> Vec<OrderItem> {
    OrderItem::list_from_json(&json).unwrap()
}

fn ids(page: &Page<JsonValue>) -> Vec<i64> {
    page.nodes().filter_map(|n| n["id"].as_i64()).collect()
}

fn assert_page_info_cursors(page: &Page<JsonValue>) {
    let first = page.edges.first().map(|e| e.cursor.clone());
    let last = page.edges.last().map(|e| e.cursor.clone());
    assert!(first.is_some());
    assert_eq!(page.page_info.start_cursor, first);
    assert_eq!(page.page_info.end_cursor, last);
}

#[test]
fn default_method_name() {
    assert_eq!(tests_table().method_name(), "paginate");
    let custom = with_pagination(PaginateConfig::new().method_name("myPaginate"))
        .attach(MemoryStore::<JsonValue>::default());
    assert_eq!(custom.method_name(), "myPaginate");
}

#[tokio::test]
async fn paginates_with_after_cursor() -> Result<()> {
    let tests = tests_table();

    let page = tests.paginate(PageRequest::new(2)).await?;
    assert_eq!(ids(&page), vec![1, 2]);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
    assert_page_info_cursors(&page);
    assert_eq!(page.total_count, 5);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(PageRequest::new(2).after(after)).await?;
    assert_eq!(ids(&page), vec![3, 4]);
    assert!(page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
    assert_page_info_cursors(&page);
    assert_eq!(page.total_count, 5);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(PageRequest::new(2).after(after)).await?;
    assert_eq!(ids(&page), vec![5]);
    assert!(!page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
    assert_page_info_cursors(&page);
    assert_eq!(page.total_count, 5);
    Ok(())
}

#[tokio::test]
async fn paginates_with_before_cursor() -> Result<()> {
    let tests = tests_table();

    let page = tests.paginate(PageRequest::new(2)).await?;
    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(PageRequest::new(2).after(after)).await?;
    assert_eq!(ids(&page), vec![3, 4]);

    let before = page.page_info.start_cursor.unwrap();
    let page = tests.paginate(PageRequest::new(2).before(before)).await?;
    assert_eq!(ids(&page), vec![1, 2]);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
    assert_page_info_cursors(&page);
    Ok(())
}

#[tokio::test]
async fn paginates_with_simple_order() -> Result<()> {
    let tests = tests_table();
    let request = PageRequest::new(3).order(order(json!([["counter", "asc"]])));

    let page = tests.paginate(request.clone()).await?;
    assert_eq!(ids(&page), vec![5, 4, 1]);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(request.clone().after(after)).await?;
    assert_eq!(ids(&page), vec![2, 3]);

    let before = page.page_info.start_cursor.unwrap();
    let page = tests.paginate(request.before(before)).await?;
    assert_eq!(ids(&page), vec![5, 4, 1]);
    Ok(())
}

#[tokio::test]
async fn paginates_with_complex_order() -> Result<()> {
    let tests = tests_table();
    let request =
        PageRequest::new(3).order(order(json!([["counter", "desc"], ["extra", "asc"]])));

    let page = tests.paginate(request.clone()).await?;
    assert_eq!(ids(&page), vec![3, 2, 1]);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(request.clone().after(after)).await?;
    assert_eq!(ids(&page), vec![4, 5]);

    let before = page.page_info.start_cursor.unwrap();
    let page = tests.paginate(request.before(before)).await?;
    assert_eq!(ids(&page), vec![3, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn paginates_with_where() -> Result<()> {
    let request = PageRequest::new(5)
        .order(order(json!([["counter", "asc"]])))
        .filter(parse_where(r#"{"extra": 3}"#)?);
    let page = tests_table().paginate(request).await?;
    assert_eq!(ids(&page), vec![5, 4, 3]);
    assert_eq!(page.total_count, 3);
    Ok(())
}

#[tokio::test]
async fn paginates_boolean_columns_with_null_placement() -> Result<()> {
    let tests = tests_table();
    let cases = [
        // null, then true, then false
        ("DESC NULLS FIRST", vec![3, 5, 1, 2, 4]),
        // false, then true, then null
        ("ASC NULLS LAST", vec![2, 4, 1, 3, 5]),
        // true, then false, then null
        ("DESC NULLS LAST", vec![1, 2, 4, 3, 5]),
    ];
    for (direction, expected) in cases {
        let request = PageRequest::new(5).order(order(json!([["isValid", direction]])));
        let page = tests.paginate(request).await?;
        assert_eq!(ids(&page), expected, "{direction}");
        assert_eq!(page.total_count, 5);
    }
    Ok(())
}

#[tokio::test]
async fn walks_null_groups_one_row_at_a_time() -> Result<()> {
    let tests = tests_table();
    for direction in ["DESC NULLS FIRST", "ASC NULLS LAST", "DESC NULLS LAST", "ASC NULLS FIRST"] {
        let items = order(json!([["isValid", direction]]));
        let full = tests.paginate(PageRequest::new(5).order(items.clone())).await?;
        let request = PageRequest::new(1).order(items);

        let mut walked = Vec::new();
        let mut page = tests.paginate(request.clone()).await?;
        walked.extend(ids(&page));
        while page.page_info.has_next_page {
            let after = page.page_info.end_cursor.clone().unwrap();
            page = tests.paginate(request.clone().after(after)).await?;
            walked.extend(ids(&page));
        }
        assert_eq!(walked, ids(&full), "forward {direction}");

        let mut walked_back = ids(&page);
        while page.page_info.has_previous_page {
            let before = page.page_info.start_cursor.clone().unwrap();
            page = tests.paginate(request.clone().before(before)).await?;
            walked_back = [ids(&page), walked_back].concat();
        }
        assert_eq!(walked_back, ids(&full), "backward {direction}");
    }
    Ok(())
}

#[tokio::test]
async fn accepts_different_order_formats() -> Result<()> {
    let tests = tests_table();
    for (order_json, expected) in [
        (json!([["counter"]]), vec![5, 4, 1, 2, 3]),
        (json!(["counter"]), vec![5, 4, 1, 2, 3]),
        (json!([["counter", "asc"]]), vec![5, 4, 1, 2, 3]),
        (json!([["counter", "desc"]]), vec![2, 3, 1, 4, 5]),
    ] {
        let page = tests.paginate(PageRequest::new(5).order(order(order_json))).await?;
        assert_eq!(ids(&page), expected);
    }
    Ok(())
}

#[tokio::test]
async fn paginates_on_associated_column() -> Result<()> {
    let tests = tests_table();
    let request =
        PageRequest::new(3).order(order(json!([[{"model": "Person", "as": "persons"}, "name", "asc"]])));

    let page = tests.paginate(request.clone()).await?;
    assert_eq!(ids(&page), vec![2, 3, 5]);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(request.clone().after(after)).await?;
    assert_eq!(ids(&page), vec![4, 1]);

    let before = page.page_info.start_cursor.unwrap();
    let page = tests.paginate(request.before(before)).await?;
    assert_eq!(ids(&page), vec![2, 3, 5]);
    Ok(())
}

#[tokio::test]
async fn paginates_on_complex_order_with_associated_column() -> Result<()> {
    let tests = tests_table();
    let request = PageRequest::new(3).order(order(json!([
        ["counter", "desc"],
        ["extra", "asc"],
        [{"model": "Person", "as": "persons"}, "name", "asc"]
    ])));

    let page = tests.paginate(request.clone()).await?;
    assert_eq!(ids(&page), vec![3, 2, 1]);

    let after = page.page_info.end_cursor.unwrap();
    let page = tests.paginate(request.clone().after(after)).await?;
    assert_eq!(ids(&page), vec![4, 5]);

    let before = page.page_info.start_cursor.unwrap();
    let page = tests.paginate(request.before(before)).await?;
    assert_eq!(ids(&page), vec![3, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn joined_cursor_carries_association_value() -> Result<()> {
    let request = PageRequest::new(1).order(order(json!([[{"as": "persons"}, "name", "desc"]])));
    let page = tests_table().paginate(request).await?;
    let cursor = Cursor::decode(&page.edges[0].cursor)?;
    assert_eq!(cursor.values(), &[Value::from("little"), Value::Int(1)]);
    Ok(())
}

#[tokio::test]
async fn concurrent_calls_do_not_interfere() -> Result<()> {
    let tests = tests_table();
    let (a, b) = tokio::join!(
        tests.paginate(PageRequest::new(2)),
        tests.paginate(PageRequest::new(3).order(order(json!([["counter", "desc"]])))),
    );
    assert_eq!(ids(&a?), vec![1, 2]);
    assert_eq!(ids(&b?), vec![2, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn walks_float_column_without_skipping_ties() -> Result<()> {
    let store = MemoryStore::new(vec![
        json!({"id": 1, "score": -99_610_794.962_942_97}),
        json!({"id": 2, "score": -99_610_794.962_942_97}),
        json!({"id": 3, "score": 0.5}),
    ]);
    let scores = with_pagination(PaginateConfig::default()).attach(store);
    let request = PageRequest::new(1).order(order(json!([["score", "asc"]])));

    let mut page = scores.paginate(request.clone()).await?;
    let mut walked = ids(&page);
    while page.page_info.has_next_page {
        let after = page.page_info.end_cursor.clone().unwrap();
        page = scores.paginate(request.clone().after(after)).await?;
        walked.extend(ids(&page));
    }
    assert_eq!(walked, vec![1, 2, 3]);
    Ok(())
}
