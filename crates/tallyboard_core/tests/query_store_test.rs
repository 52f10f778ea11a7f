//! Query store transitions and URL round trips

use tallyboard_core::{
    FilterPill, ParamValue, QueryDefaults, QueryStore, QueryUpdate, SortOrder, compile_filter,
    decode_query, encode_query,
};

fn store() -> QueryStore {
    QueryStore::new(QueryDefaults::new("critValue"))
}

#[test]
fn test_sort_by_active_field_flips_order() {
    let mut store = store();
    assert!(store.apply(QueryUpdate::SortBy("critValue".into())));
    assert_eq!(*store.state().order(), SortOrder::Ascending);
    assert!(store.apply(QueryUpdate::SortBy("critValue".into())));
    assert_eq!(*store.state().order(), SortOrder::Descending);
}

#[test]
fn test_sort_by_new_field_resets_to_descending() {
    let mut store = store();
    store.apply(QueryUpdate::SortBy("critValue".into()));
    assert_eq!(*store.state().order(), SortOrder::Ascending);

    store.apply(QueryUpdate::SortBy("stats.critRate".into()));
    assert_eq!(store.state().sort(), "stats.critRate");
    assert_eq!(*store.state().order(), SortOrder::Descending);
}

#[test]
fn test_filter_change_resets_page() {
    let mut store = store();
    store.apply(QueryUpdate::Page(7));
    assert_eq!(*store.state().page(), 7);

    let filter = compile_filter(&[FilterPill::new("name", "Nahida")]);
    assert!(store.apply(QueryUpdate::Filter(filter)));
    assert_eq!(*store.state().page(), 1);
}

#[test]
fn test_identical_filter_is_not_a_change() {
    let mut store = store();
    let filter = compile_filter(&[FilterPill::new("name", "Nahida")]);
    store.apply(QueryUpdate::Filter(filter.clone()));
    store.apply(QueryUpdate::Page(3));

    assert!(!store.apply(QueryUpdate::Filter(filter)));
    assert_eq!(*store.state().page(), 3);
}

#[test]
fn test_param_change_resets_page_and_empty_value_removes() {
    let mut store = store();
    store.apply(QueryUpdate::Page(5));
    store.apply(QueryUpdate::Param {
        key: "variant".into(),
        value: ParamValue::from("profile"),
    });
    assert_eq!(*store.state().page(), 1);

    store.apply(QueryUpdate::Param {
        key: "variant".into(),
        value: ParamValue::from(""),
    });
    assert!(store.state().external().is_empty());
}

#[test]
fn test_functional_update_cannot_keep_stale_page() {
    let mut store = store();
    store.apply(QueryUpdate::Page(4));
    store.update(|prev| prev.clone().with_size(50).with_page(9));
    assert_eq!(*store.state().size(), 50);
    assert_eq!(*store.state().page(), 1);
}

#[test]
fn test_page_and_size_are_clamped() {
    let mut store = store();
    store.apply(QueryUpdate::PageSize(0));
    store.apply(QueryUpdate::Page(0));
    assert_eq!(*store.state().size(), 1);
    assert_eq!(*store.state().page(), 1);
}

#[test]
fn test_url_round_trip_on_fresh_store() {
    let defaults = QueryDefaults::new("critValue");
    let mut original = QueryStore::new(defaults.clone());
    original.apply(QueryUpdate::SortBy("stats.critDMG".into()));
    original.apply(QueryUpdate::SortBy("stats.critDMG".into()));
    original.apply(QueryUpdate::Filter("[name]Raiden Shogun".into()));
    original.apply(QueryUpdate::Param {
        key: "uid".into(),
        value: ParamValue::from(701464050i64),
    });
    original.apply(QueryUpdate::Page(3));

    let search = encode_query(original.state(), &defaults);

    let mut fresh = QueryStore::new(defaults.clone());
    let hydrated = decode_query(&format!("?{}", search), fresh.state(), &defaults);
    fresh.replace(hydrated);

    assert_eq!(
        defaults.non_default_params(fresh.state()),
        defaults.non_default_params(original.state())
    );
    assert_eq!(fresh.state(), original.state());
}

#[test]
fn test_default_state_writes_nothing() {
    let defaults = QueryDefaults::new("critValue");
    let mut store = QueryStore::new(defaults.clone());
    store.apply(QueryUpdate::Page(2));
    store.apply(QueryUpdate::Page(1));
    assert_eq!(encode_query(store.state(), &defaults), "");
}
