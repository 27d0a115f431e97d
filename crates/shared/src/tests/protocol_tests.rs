use super::*;

#[test]
fn rejects_page_zero() {
    let err = ListQuery::new(0, ItemsPerPage::Five, None).expect_err("page zero");
    assert_eq!(err.code, crate::error::ErrorCode::Validation);
}

#[test]
fn offset_follows_page_and_size() {
    let query = ListQuery::new(3, ItemsPerPage::Ten, None).expect("query");
    assert_eq!(query.offset(), 20);
    assert_eq!(ListQuery::default().offset(), 0);
}

#[test]
fn absent_and_empty_search_read_the_same() {
    let absent = ListQuery::new(1, ItemsPerPage::Five, None).expect("query");
    assert_eq!(absent.search_text(), "");
    assert_eq!(ListQuery::default().search_text(), "");
}

#[test]
fn page_size_accepts_only_selector_values() {
    assert_eq!(ItemsPerPage::try_from(20).expect("20"), ItemsPerPage::Twenty);
    assert!(ItemsPerPage::try_from(7).is_err());
    assert_eq!(
        ItemsPerPage::ALL.map(u32::from),
        [5, 10, 20],
    );
}

#[test]
fn wire_names_match_backend_payloads() {
    let result = ListResult {
        total_matching_count: 1,
        items: vec![UserRecord::new("u12", "Kirill G.", false)],
    };
    let json = serde_json::to_value(&result).expect("json");
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["items"][0]["user_name"], "Kirill G.");
    assert_eq!(json["items"][0]["is_active"], false);

    let query: ListQuery =
        serde_json::from_str(r#"{"pageNumber":2,"itemsPerPage":10,"search":"iv"}"#)
            .expect("query");
    assert_eq!(query.items_per_page, ItemsPerPage::Ten);
    assert_eq!(query.search_text(), "iv");

    let bad = serde_json::from_str::<ListQuery>(r#"{"pageNumber":1,"itemsPerPage":3}"#);
    assert!(bad.is_err());
}
