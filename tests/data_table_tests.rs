use chart_playground::core::{DataTable, Dataset, format_cell};
use serde_json::json;

#[test]
fn table_columns_come_from_the_first_record() {
    let dataset = Dataset::from_value(&json!([
        { "genre": "Sports", "sold": 275 },
        { "genre": "Strategy", "sold": null, "extra": true },
        { "genre": "Action" },
    ]))
    .expect("records");
    let table = DataTable::from_dataset(&dataset);

    assert_eq!(table.columns, ["genre", "sold"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["Sports".to_owned(), "275".to_owned()],
            vec!["Strategy".to_owned(), "-".to_owned()],
            vec!["Action".to_owned(), "-".to_owned()],
        ]
    );
    assert_eq!(table.summary(), "3 records");
}

#[test]
fn nested_cells_render_as_json() {
    assert_eq!(format_cell(Some(&json!({ "a": [1, 2] }))), r#"{"a":[1,2]}"#);
    assert_eq!(format_cell(Some(&json!(2.5))), "2.5");
    assert_eq!(format_cell(Some(&json!(false))), "false");
    assert_eq!(format_cell(None), "-");
}

#[test]
fn only_arrays_of_objects_are_datasets() {
    assert!(Dataset::from_value(&json!([{ "a": 1 }, 2])).is_none());
    assert!(Dataset::from_value(&json!({ "a": 1 })).is_none());
    assert!(Dataset::from_value(&json!("rows")).is_none());

    let empty = Dataset::from_value(&json!([])).expect("empty array");
    assert!(empty.is_empty());
    assert_eq!(DataTable::from_dataset(&empty).summary(), "0 records");
}

#[test]
fn dataset_round_trips_to_json_value() {
    let value = json!([{ "x": 1, "y": "a" }]);
    let dataset = Dataset::from_value(&value).expect("records");
    assert_eq!(dataset.to_value(), value);
    assert_eq!(DataTable::from_dataset(&dataset).summary(), "1 record");
}
