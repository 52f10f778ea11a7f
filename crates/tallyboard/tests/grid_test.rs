//! Grid wiring: address bar projection, events and refetch decisions

use async_trait::async_trait;
use serde_json::Map;
use std::sync::Arc;
use std::sync::Mutex;
use tallyboard::{
    AddressBar, CollectionSource, ColumnSpec, FetchPhase, FilterOptionGroup, FilterPill, Grid,
    GridEvent, GridOptions, MemoryAddressBar, ParamValue, Row, RowId, SortOrder,
};
use tallyboard_core::{CollectionPage, CollectionRequest, CountRequest};
use tallyboard_error::TallyboardResult;

/// Records every page request and answers with three rows.
#[derive(Default)]
struct RecordingSource {
    requests: Mutex<Vec<CollectionRequest>>,
}

impl RecordingSource {
    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_param(&self, key: &str) -> Option<ParamValue> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|request| request.get(key).cloned())
    }
}

#[async_trait]
impl CollectionSource for RecordingSource {
    async fn fetch_page(
        &self,
        _url: &str,
        request: &CollectionRequest,
    ) -> TallyboardResult<CollectionPage> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CollectionPage {
            data: ["a", "b", "c"]
                .iter()
                .map(|id| Row::new(*id, Map::new()))
                .collect(),
            total_rows_hash: Some("hash".to_string()),
        })
    }

    async fn fetch_total_rows(&self, _request: &CountRequest) -> TallyboardResult<u64> {
        Ok(43)
    }

    async fn fetch_filter_options(&self, _url: &str) -> TallyboardResult<Vec<FilterOptionGroup>> {
        Ok(serde_json::from_value(serde_json::json!([
            {
                "fieldName": "Character",
                "fieldKey": "name",
                "options": [{ "name": "Nahida", "value": "Nahida" }]
            }
        ]))
        .unwrap())
    }
}

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::builder().name("Owner").build().unwrap(),
        ColumnSpec::builder()
            .name("Crit Value")
            .sortable(true)
            .sort_field("critValue")
            .build()
            .unwrap(),
    ]
}

fn options() -> GridOptions {
    GridOptions::default()
        .with_fetch_url("https://api.example/api/builds")
        .with_filters_url("https://api.example/api/filters/builds")
        .with_default_sort("critValue")
        .with_expandable_rows(true)
        .with_project_params_to_path(true)
}

fn mount(source: &Arc<RecordingSource>, search: &str) -> Grid {
    Grid::mount(
        options(),
        columns(),
        source.clone(),
        Some(Box::new(MemoryAddressBar::new(search))),
    )
}

fn search(grid: &Grid) -> String {
    grid.address_bar().map(AddressBar::search).unwrap_or_default()
}

#[tokio::test]
async fn test_mount_hydrates_from_address_bar() {
    let source = Arc::new(RecordingSource::default());
    let grid = mount(&source, "?page=3&filter=%5Bname%5DNahida&uid=701464050");
    grid.settle().await;

    assert_eq!(*grid.state().page(), 3);
    assert_eq!(grid.pills(), &[FilterPill::new("name", "Nahida")]);
    assert_eq!(source.request_count(), 1);
    assert_eq!(source.last_param("page"), Some(ParamValue::from(3i64)));
    assert_eq!(
        source.last_param("uid"),
        Some(ParamValue::Number(701_464_050.0))
    );

    let data = grid.data();
    assert_eq!(*data.phase(), FetchPhase::Succeeded);
    assert_eq!(*data.total_rows(), 43);
}

#[tokio::test]
async fn test_header_click_sorts_and_writes_url() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "");
    grid.settle().await;

    assert!(!grid.handle(GridEvent::HeaderClicked(0)));
    assert!(grid.handle(GridEvent::HeaderClicked(1)));
    grid.settle().await;

    assert_eq!(*grid.state().order(), SortOrder::Ascending);
    assert_eq!(search(&grid), "order=1");
    assert_eq!(source.request_count(), 2);

    let view = grid.view();
    assert!(*view.headers()[1].highlighted());
    assert_eq!(*view.headers()[1].order(), Some(SortOrder::Ascending));
}

#[tokio::test]
async fn test_pill_change_resets_page() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "page=5");
    grid.settle().await;

    assert!(grid.handle(GridEvent::PillsChanged(vec![
        FilterPill::new("name", "Nahida"),
        FilterPill::new("", "ignored"),
    ])));
    grid.settle().await;

    assert_eq!(*grid.state().page(), 1);
    assert_eq!(grid.state().filter(), "[name]Nahida");
    assert_eq!(search(&grid), "filter=%5Bname%5DNahida");
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_equivalent_pills_do_not_refetch() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "filter=%5Bname%5DNahida&page=2");
    grid.settle().await;

    let changed = grid.handle(GridEvent::PillsChanged(vec![
        FilterPill::new("name", "Nahida"),
        FilterPill::new("stats.critRate", ""),
    ]));
    grid.settle().await;

    assert!(!changed);
    assert_eq!(*grid.state().page(), 2);
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_incomplete_pill_survives_other_events() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "");
    grid.settle().await;

    let pills = vec![
        FilterPill::new("name", "Nahida"),
        FilterPill::new("stats.critRate", ""),
    ];
    assert!(grid.handle(GridEvent::PillsChanged(pills.clone())));
    assert_eq!(grid.pills(), pills.as_slice());

    assert!(grid.handle(GridEvent::PageChanged(2)));
    grid.settle().await;

    assert_eq!(grid.pills(), pills.as_slice());
    assert_eq!(grid.state().filter(), "[name]Nahida");
    assert_eq!(*grid.state().page(), 2);
}

#[tokio::test]
async fn test_row_click_expands_only_when_enabled() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "");
    grid.settle().await;

    grid.handle(GridEvent::RowClicked(RowId::from("b")));
    let rows = grid.view().rows().clone();
    assert_eq!(rows.len(), 4);
    assert!(rows[2].is_expand_row());
    assert_eq!(source.request_count(), 1);

    let mut fixed = Grid::mount(
        options().with_expandable_rows(false),
        columns(),
        source.clone(),
        None,
    );
    fixed.settle().await;
    fixed.handle(GridEvent::RowClicked(RowId::from("b")));
    assert_eq!(fixed.view().rows().len(), 3);
}

#[tokio::test]
async fn test_fetch_params_change_refetches_from_page_one() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = mount(&source, "page=4");
    grid.settle().await;

    let mut params = tallyboard::ExternalParams::new();
    params.insert("uids".into(), ParamValue::from("1,2,3"));
    grid.handle(GridEvent::FetchParamsChanged(params.clone()));
    grid.settle().await;

    assert_eq!(source.request_count(), 2);
    assert_eq!(source.last_param("uids"), Some(ParamValue::from("1,2,3")));
    assert_eq!(source.last_param("page"), Some(ParamValue::from(1i64)));
    assert_eq!(search(&grid), "");

    grid.handle(GridEvent::FetchParamsChanged(params));
    grid.settle().await;
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_pagination_view_and_hiding() {
    let source = Arc::new(RecordingSource::default());
    let grid = mount(&source, "size=3");
    grid.settle().await;

    let view = grid.view();
    let pagination = view.pagination().as_ref().expect("pagination shown");
    assert_eq!(pagination.page_count(), 15);
    assert_eq!(pagination.filler_rows(), 0);

    let hidden = Grid::mount(
        options().with_hide_pagination(true),
        columns(),
        source.clone(),
        None,
    );
    hidden.settle().await;
    assert!(hidden.view().pagination().is_none());
}

#[tokio::test]
async fn test_grid_without_fetch_url_stays_idle() {
    let source = Arc::new(RecordingSource::default());
    let mut grid = Grid::mount(
        GridOptions::default().with_default_sort("critValue"),
        columns(),
        source.clone(),
        None,
    );
    grid.handle(GridEvent::PageChanged(2));
    grid.settle().await;

    assert_eq!(source.request_count(), 0);
    assert!(grid.refresh().is_err());
    assert_eq!(*grid.data().phase(), FetchPhase::Idle);
}

#[tokio::test]
async fn test_selected_filter_options_follow_pills() {
    let source = Arc::new(RecordingSource::default());
    let grid = mount(&source, "filter=%5Bname%5DNahida");
    let groups = grid.load_filter_options().await.unwrap();
    let selected = grid.selected_filter_options(&groups);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label(), "Nahida");
}
