//! Integration tests for the grid processing pipeline.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tabula_core::proto::{Column, Order, Request, Search, ROW_CLASS_KEY, ROW_ID_KEY};
use tabula_core::{
    fields_of, get_value, process, serialize_rows, Mappable, Processor, ProcessorConfig, Record,
    Response, RowHooks, Value,
};

#[derive(Debug, Clone, Record)]
struct Purchase {
    #[record(rename = "Number")]
    pub number: i32,
    #[record(rename = "Text")]
    pub text: String,
    #[record(rename = "Placed")]
    pub placed: NaiveDateTime,
    #[record(rename = "Note")]
    pub note: Option<String>,
    #[allow(dead_code)]
    secret: u64,
}

fn at(day: u32, hour: u32, milli: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_milli_opt(hour, 30, 15, milli)
        .unwrap()
}

fn purchase(number: i32, text: &str) -> Purchase {
    Purchase {
        number,
        text: text.to_string(),
        placed: at(1 + (number as u32 % 28), 8, 250),
        note: None,
        secret: 0,
    }
}

fn dataset(n: i32) -> Vec<Purchase> {
    (0..n).map(|i| purchase(i, &format!("Text{i}"))).collect()
}

fn base_request() -> Request {
    Request::new(5)
        .with_column(Column::new("Number"))
        .with_column(Column::new("Text"))
        .with_column(Column::new("Placed"))
        .with_column(Column::new("Note"))
}

fn numbers(response: &Response) -> Vec<i32> {
    response
        .data
        .iter()
        .map(|row| match row.get("Number") {
            Some(Value::Int32(n)) => *n,
            other => panic!("unexpected Number value {other:?}"),
        })
        .collect()
}

fn assert_counts(response: &Response) {
    assert!(response.records_filtered <= response.records_total);
    assert!(response.data.len() <= response.records_filtered);
}

#[test]
fn test_derived_model_lists_visible_fields() {
    let names: Vec<_> = fields_of::<Purchase>().names().collect();
    assert_eq!(names, vec!["Number", "Text", "Placed", "Note"]);
    assert_eq!(get_value(&purchase(4, "x"), "secret"), Value::Null);
}

#[test]
fn test_round_trip_ascending_number() {
    let data = vec![purchase(3, "c"), purchase(1, "a"), purchase(2, "b")];
    let request = base_request().with_order(Order::asc(0)).with_window(0, 3);

    let response = process(&data, &request);
    assert_eq!(response.draw, 5);
    assert_eq!(numbers(&response), vec![1, 2, 3]);
    assert_eq!(response.records_total, 3);
    assert_eq!(response.records_filtered, 3);
}

#[test]
fn test_no_search_preserves_order_and_counts() {
    let data = vec![purchase(9, "z"), purchase(2, "y"), purchase(5, "x")];
    let response = process(&data, &base_request().with_window(0, 10));

    assert_eq!(response.records_filtered, response.records_total);
    assert_eq!(numbers(&response), vec![9, 2, 5]);
    assert_counts(&response);
}

#[test]
fn test_pagination_boundaries() {
    let data = dataset(25);
    let sorted = base_request().with_order(Order::asc(0));

    let first = process(&data, &sorted.clone().with_window(0, 10));
    assert_eq!(numbers(&first), (0..10).collect::<Vec<_>>());

    let last = process(&data, &sorted.clone().with_window(20, 10));
    assert_eq!(numbers(&last), vec![20, 21, 22, 23, 24]);
    assert_eq!(last.records_filtered, 25);

    let past = process(&data, &sorted.with_window(25, 10));
    assert!(past.error.is_some());
    assert_eq!(past.draw, 5);
    assert_eq!(past.records_total, 0);
    assert_eq!(past.records_filtered, 0);
    assert!(past.data.is_empty());
}

#[test]
fn test_empty_result_is_not_an_error() {
    let data = dataset(10);
    let response = process(
        &data,
        &base_request()
            .with_search(Search::plain("no such text"))
            .with_window(0, 10),
    );

    assert!(response.is_ok());
    assert_eq!(response.records_total, 10);
    assert_eq!(response.records_filtered, 0);
    assert!(response.data.is_empty());
}

#[test]
fn test_case_insensitive_substring_search() {
    let data = vec![purchase(1, "Text2"), purchase(2, "Other")];

    let hit = process(&data, &base_request().with_search(Search::plain("tex")).with_window(0, 10));
    assert_eq!(numbers(&hit), vec![1]);

    let miss = process(&data, &base_request().with_search(Search::plain("TEX9")).with_window(0, 10));
    assert_eq!(miss.records_filtered, 0);
}

#[test]
fn test_regex_search() {
    let data = vec![purchase(1, "Apple9"), purchase(2, "apple"), purchase(3, "Banana9")];
    let response = process(
        &data,
        &base_request()
            .with_search(Search::regex("^A.*9$"))
            .with_window(0, 10),
    );
    assert_eq!(numbers(&response), vec![1]);
}

#[test]
fn test_malformed_regex_becomes_error_response() {
    let data = dataset(3);
    let response = process(
        &data,
        &base_request()
            .with_search(Search::regex("[unclosed"))
            .with_window(0, 3),
    );

    assert!(!response.is_ok());
    assert!(response.data.is_empty());
    assert_eq!(response.records_total, 0);
}

#[test]
fn test_search_uses_display_date_format() {
    let mut data = dataset(3);
    data[1].placed = at(17, 23, 9);

    let response = process(
        &data,
        &base_request()
            .with_search(Search::plain("2024/05/17 23:30:15:009"))
            .with_window(0, 10),
    );
    assert_eq!(numbers(&response), vec![1]);
}

#[test]
fn test_custom_date_format() {
    let mut data = dataset(3);
    data[2].placed = at(9, 10, 0);

    let processor = Processor::with_config(ProcessorConfig::new().date_format("%d.%m.%Y")).unwrap();
    let response = processor.process(
        &data,
        &base_request()
            .with_search(Search::plain("09.05.2024"))
            .with_window(0, 10),
        &RowHooks::new(),
    );
    assert_eq!(numbers(&response), vec![2]);
}

#[test]
fn test_global_and_column_search_combine() {
    let data = vec![
        purchase(1, "red apple"),
        purchase(2, "red pear"),
        purchase(3, "green apple"),
        purchase(12, "red plum"),
    ];
    let mut request = base_request()
        .with_search(Search::plain("red"))
        .with_window(0, 10);
    request.columns[0] = Column::new("Number").with_search(Search::regex("^1"));

    let response = process(&data, &request);
    assert_eq!(response.records_total, 4);
    assert_eq!(response.records_filtered, 2);
    assert_eq!(numbers(&response), vec![1, 12]);
}

#[test]
fn test_null_field_searches_as_empty() {
    let mut data = dataset(3);
    data[0].note = Some("fragile".into());

    let mut request = base_request().with_window(0, 10);
    request.columns[3] = Column::new("Note").with_search(Search::regex("^$"));

    let response = process(&data, &request);
    assert_eq!(numbers(&response), vec![1, 2]);
}

#[test]
fn test_stable_multi_key_sort() {
    let data = vec![
        purchase(3, "b"),
        purchase(1, "a"),
        purchase(3, "a"),
        purchase(2, "b"),
        purchase(3, "a"),
        purchase(1, "b"),
    ];
    let request = base_request()
        .with_order(Order::desc(0))
        .with_order(Order::asc(1))
        .with_window(0, 10);

    let response = process(&data, &request);
    let pairs: Vec<_> = response
        .data
        .iter()
        .map(|row| {
            (
                row.get("Number").cloned().unwrap(),
                row.get("Text").and_then(|v| v.as_str()).unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Value::Int32(3), "a".to_string()),
            (Value::Int32(3), "a".to_string()),
            (Value::Int32(3), "b".to_string()),
            (Value::Int32(2), "b".to_string()),
            (Value::Int32(1), "a".to_string()),
            (Value::Int32(1), "b".to_string()),
        ]
    );
}

#[test]
fn test_stability_with_equal_keys() {
    let mut data = dataset(6);
    for item in &mut data {
        item.text = "same".into();
    }
    let response = process(&data, &base_request().with_order(Order::asc(1)).with_window(0, 10));
    assert_eq!(numbers(&response), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_unorderable_column_is_ignored() {
    let data = vec![purchase(3, "c"), purchase(1, "a"), purchase(2, "b")];
    let mut request = base_request().with_order(Order::asc(0)).with_window(0, 10);
    request.columns[0] = Column::new("Number").orderable(false);

    let response = process(&data, &request);
    assert_eq!(numbers(&response), vec![3, 1, 2]);
}

#[test]
fn test_out_of_range_order_column_is_error() {
    let data = dataset(3);
    let response = process(&data, &base_request().with_order(Order::asc(7)).with_window(0, 3));
    assert!(response
        .error
        .as_deref()
        .is_some_and(|e| e.contains("column 7")));
}

#[test]
fn test_dates_sort_chronologically() {
    let mut data = dataset(3);
    data[0].placed = at(20, 0, 0);
    data[1].placed = at(3, 0, 0);
    data[2].placed = at(11, 0, 0);

    let response = process(&data, &base_request().with_order(Order::asc(2)).with_window(0, 10));
    assert_eq!(numbers(&response), vec![1, 2, 0]);
}

#[test]
fn test_row_id_comes_first() {
    let data = dataset(3);
    let hooks = RowHooks::new()
        .row_id(|o: &Purchase| format!("order_{}", o.number))
        .row_class(|_: &Purchase| "grid-row".to_string());

    let response = Processor::new().process(&data, &base_request().with_window(0, 3), &hooks);
    for (i, row) in response.data.iter().enumerate() {
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys[0], ROW_ID_KEY);
        assert_eq!(keys[1], ROW_CLASS_KEY);
        assert_eq!(row.get(ROW_ID_KEY), Some(&Value::String(format!("order_{i}"))));
    }
}

#[derive(Debug, Record)]
struct Shadowed {
    #[record(rename = "DT_RowId")]
    pub row_id: String,
    pub label: String,
}

#[test]
fn test_row_id_is_not_overwritten_by_field() {
    let data = vec![Shadowed {
        row_id: "from-field".into(),
        label: "x".into(),
    }];
    let hooks = RowHooks::new().row_id(|_: &Shadowed| "from-hook".to_string());

    let rows = serialize_rows(&data, &hooks);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec![ROW_ID_KEY, "label"]);
    assert_eq!(rows[0].get(ROW_ID_KEY), Some(&Value::from("from-hook")));

    let plain = serialize_rows(&data, &RowHooks::new());
    assert_eq!(plain[0].get(ROW_ID_KEY), Some(&Value::from("from-field")));
}

#[derive(Debug, Record)]
#[record(mappable)]
struct Reading {
    pub sensor: String,
    #[record(include)]
    celsius: f64,
}

impl Mappable for Reading {
    fn map_value(&self, name: &str) -> Value {
        match name {
            "sensor" => Value::String(self.sensor.to_uppercase()),
            "celsius" => Value::Float64(self.celsius),
            "fahrenheit" => Value::Float64(self.celsius * 9.0 / 5.0 + 32.0),
            _ => Value::Null,
        }
    }
}

#[test]
fn test_mappable_records() {
    let data = vec![
        Reading {
            sensor: "north".into(),
            celsius: 21.5,
        },
        Reading {
            sensor: "south".into(),
            celsius: -3.0,
        },
    ];
    let request = Request::new(2)
        .with_column(Column::new("sensor"))
        .with_column(Column::new("fahrenheit"))
        .with_order(Order::asc(1))
        .with_search(Search::plain("SOUTH"))
        .with_window(0, 10);

    let response = process(&data, &request);
    assert_eq!(response.records_filtered, 1);
    let row = &response.data[0];
    assert_eq!(row.keys().collect::<Vec<_>>(), vec!["sensor", "celsius"]);
    assert_eq!(row.get("sensor"), Some(&Value::from("SOUTH")));
    assert_eq!(get_value(&data[0], "fahrenheit"), Value::Float64(21.5 * 9.0 / 5.0 + 32.0));
}

#[test]
fn test_response_json() {
    let data = vec![purchase(1, "a")];
    let hooks = RowHooks::new().row_data(|o: &Purchase| Value::Json(serde_json::json!({"pk": o.number})));
    let response = Processor::new().process(&data, &base_request().with_window(0, 1), &hooks);

    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(json["draw"], 5);
    assert_eq!(json["recordsTotal"], 1);
    assert_eq!(json["data"][0]["DT_RowData"]["pk"], 1);
    assert_eq!(json["data"][0]["Text"], "a");
    assert_eq!(json["data"][0]["Note"], serde_json::Value::Null);
    assert!(json.get("error").is_none());
}

#[test]
fn test_concurrent_processing_shares_cache() {
    let data = Arc::new(dataset(50));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let data = Arc::clone(&data);
            std::thread::spawn(move || {
                let request = base_request()
                    .with_order(Order::desc(0))
                    .with_window(i, 5);
                process(&data, &request)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let response = handle.join().unwrap();
        let expected: Vec<i32> = (0..5).map(|k| 49 - i as i32 - k).collect();
        assert_eq!(numbers(&response), expected);
        assert_counts(&response);
    }
}

#[test]
fn test_show_all_length() {
    let data = dataset(30);
    let response = process(&data, &base_request().with_window(5, -1));
    assert_eq!(response.data.len(), 25);
}

#[test]
fn test_typed_parameters_are_ignored_by_pipeline() {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Scope {
        tenant: &'static str,
    }

    let data = dataset(4);
    let request = base_request()
        .with_window(0, 2)
        .with_parameters(Scope { tenant: "acme" });
    assert_eq!(request.parameters.tenant, "acme");

    let response = process(&data, &request);
    assert_eq!(numbers(&response), vec![0, 1]);
}

#[derive(Debug, Record)]
struct Loose {
    pub id: u32,
    pub v: Value,
}

#[test]
fn test_mixed_kind_sort_column_becomes_error_response() {
    let data: Vec<Loose> = (0..64)
        .map(|id| Loose {
            id,
            v: if id % 2 == 0 {
                Value::String(format!("s{id}"))
            } else {
                Value::Int64(id as i64)
            },
        })
        .collect();
    let request = Request::new(9)
        .with_column(Column::new("v"))
        .with_order(Order::asc(0))
        .with_window(0, 10);

    let response = process(&data, &request);
    assert_eq!(response.draw, 9);
    assert!(response
        .error
        .as_deref()
        .is_some_and(|e| e.contains("cannot order column 'v'")));
    assert!(response.data.is_empty());
}

#[test]
fn test_mixed_numeric_widths_sort_by_magnitude() {
    let data = vec![
        Loose { id: 1, v: Value::Float64(2.5) },
        Loose { id: 2, v: Value::Int64(-7) },
        Loose { id: 3, v: Value::Null },
        Loose { id: 4, v: Value::UInt64(3) },
        Loose { id: 5, v: Value::Float32(-0.5) },
    ];
    let request = Request::new(1)
        .with_column(Column::new("id"))
        .with_column(Column::new("v"))
        .with_order(Order::asc(1))
        .with_window(0, 10);

    let response = process(&data, &request);
    let ids: Vec<_> = response.data.iter().map(|r| r.get("id").cloned().unwrap()).collect();
    assert_eq!(
        ids,
        [3, 2, 5, 1, 4].map(|id: u32| Value::from(id)).to_vec()
    );
}

#[derive(Debug, Record)]
struct Device {
    pub serial: uuid::Uuid,
    pub label: &'static str,
}

#[test]
fn test_uuid_column_search_and_sort() {
    let data = vec![
        Device {
            serial: uuid::Uuid::from_u128(0xbeef),
            label: "b",
        },
        Device {
            serial: uuid::Uuid::from_u128(0xa11),
            label: "a",
        },
        Device {
            serial: uuid::Uuid::from_u128(0xcafe_0000),
            label: "c",
        },
    ];
    let request = Request::new(3)
        .with_column(Column::new("serial"))
        .with_column(Column::new("label"))
        .with_order(Order::asc(0))
        .with_window(0, 10);

    let sorted = process(&data, &request);
    let labels: Vec<_> = sorted
        .data
        .iter()
        .map(|r| r.get("label").and_then(|v| v.as_str()).unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["a", "b", "c"]);

    let searched = process(&data, &request.with_search(Search::plain("BEEF")));
    assert_eq!(searched.records_filtered, 1);
    assert_eq!(
        searched.data[0].get("serial"),
        Some(&Value::Uuid(uuid::Uuid::from_u128(0xbeef)))
    );
}
