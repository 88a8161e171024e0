use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, LargeListArray, ListArray, StringArray};
use arrow::datatypes::{DataType, Int64Type};

use rowfan_source::{Error, ExplodeSource, Value};

fn nested(rows: Vec<Option<Vec<Option<i64>>>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Int64Type, _, _>(rows))
}

fn large_nested(rows: Vec<Option<Vec<Option<i64>>>>) -> ArrayRef {
    Arc::new(LargeListArray::from_iter_primitive::<Int64Type, _, _>(rows))
}

fn scalar(values: Vec<i64>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

/// Drive the full host protocol over one slot and collect every exploded
/// `(i, v)` pair in flat order.
fn explode_all(mut source: ExplodeSource) -> Vec<(i64, i64)> {
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("initialize");
    let ranges = source.take_entry_ranges().expect("take ranges");
    let mut records = Vec::new();
    for range in ranges {
        for flat in range.begin..range.end {
            assert!(source.set_entry(0, flat).expect("set entry"));
            let i = source
                .slot_value("i", 0)
                .expect("read i")
                .as_i64()
                .expect("i is i64");
            let v = source
                .slot_value("v", 0)
                .expect("read v")
                .as_i64()
                .expect("v is i64");
            records.push((i, v));
        }
    }
    records
}

#[test]
fn explodes_nested_column_with_broadcast_scalar() {
    let source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![0, 1, 2])),
        (
            "v".to_string(),
            nested(vec![
                Some(vec![Some(9)]),
                Some(vec![Some(7), Some(8)]),
                Some(vec![Some(5)]),
            ]),
        ),
    ])
    .expect("build source");

    assert_eq!(
        explode_all(source),
        vec![(0, 9), (1, 7), (1, 8), (2, 5)],
        "flat index 2 must resolve to row 1 offset 1"
    );
}

#[test]
fn zero_element_rows_do_not_generate_records() {
    let source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![0, 1, 2])),
        (
            "v".to_string(),
            nested(vec![Some(vec![]), Some(vec![Some(0)]), Some(vec![Some(0), Some(1)])]),
        ),
    ])
    .expect("build source");

    // Row 0 contributes nothing; total = 3 with thresholds [0, 1, 3].
    assert_eq!(explode_all(source), vec![(1, 0), (2, 0), (2, 1)]);
}

#[test]
fn large_list_representation_behaves_like_list() {
    let rows = vec![
        Some(vec![Some(9)]),
        Some(vec![Some(7), Some(8)]),
        Some(vec![Some(5)]),
    ];
    let with_list = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![0, 1, 2])),
        ("v".to_string(), nested(rows.clone())),
    ])
    .expect("list source");
    let with_large_list = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![0, 1, 2])),
        ("v".to_string(), large_nested(rows)),
    ])
    .expect("large list source");

    assert_eq!(explode_all(with_list), explode_all(with_large_list));
}

#[test]
fn scalar_broadcast_depends_only_on_source_row() {
    let mut source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![10, 20])),
        (
            "v".to_string(),
            nested(vec![Some(vec![Some(1), Some(2), Some(3)]), Some(vec![Some(4)])]),
        ),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("initialize");

    // Flat 0..3 all resolve to source row 0; the scalar must repeat.
    let mut broadcast = Vec::new();
    for flat in 0..4 {
        source.set_entry(0, flat).expect("set entry");
        broadcast.push(source.slot_value("i", 0).expect("read i").clone());
    }
    assert_eq!(
        broadcast,
        vec![
            Value::Int64(10),
            Value::Int64(10),
            Value::Int64(10),
            Value::Int64(20)
        ]
    );
}

#[test]
fn utf8_inner_values_materialize_as_strings() {
    let names: ArrayRef = Arc::new(StringArray::from(vec!["a", "b"]));
    let mut source = ExplodeSource::try_new(vec![
        ("name".to_string(), names),
        (
            "v".to_string(),
            nested(vec![Some(vec![Some(1)]), Some(vec![Some(2), None])]),
        ),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("initialize");

    source.set_entry(0, 2).expect("set entry");
    assert_eq!(source.slot_value("name", 0).unwrap().as_str().unwrap(), "b");
    // Null inner elements materialize as Value::Null.
    assert!(source.slot_value("v", 0).unwrap().is_null());
}

#[test]
fn column_metadata_is_idempotent() {
    let source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![1])),
        ("v".to_string(), nested(vec![Some(vec![Some(1)])])),
    ])
    .expect("build source");

    assert_eq!(source.column_names(), &["i".to_string(), "v".to_string()]);
    assert_eq!(source.column_names(), &["i".to_string(), "v".to_string()]);
    assert!(source.has_column("i"));
    assert!(!source.has_column("w"));
    assert_eq!(source.value_type_name("v").unwrap(), DataType::Int64.to_string());
    assert_eq!(source.value_type_name("v").unwrap(), DataType::Int64.to_string());
    assert_eq!(source.inner_data_type("i").unwrap(), DataType::Int64);
    assert_eq!(source.label(), "ExplodedDS");
}

#[test]
fn unknown_column_and_access_type_errors() {
    let source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![1])),
        ("v".to_string(), nested(vec![Some(vec![Some(1)])])),
    ])
    .expect("build source");

    assert!(matches!(
        source.value_type_name("missing").unwrap_err(),
        Error::UnknownColumn(name) if name == "missing"
    ));
    source
        .check_access_type("v", &DataType::Int64)
        .expect("inner type of v is Int64");
    let err = source.check_access_type("v", &DataType::Utf8).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn length_mismatch_stops_initialization() {
    let mut source = ExplodeSource::try_new(vec![
        ("v".to_string(), nested(vec![Some(vec![Some(1)])])),
        (
            "w".to_string(),
            nested(vec![Some(vec![Some(1)]), Some(vec![Some(2)])]),
        ),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");

    let err = source.initialize().unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            left_len: 1,
            right_len: 2,
            ..
        }
    ));
    // Initialization did not proceed: no ranges to hand out.
    assert!(source.take_entry_ranges().is_err());
}

#[test]
fn nested_columns_with_equal_shapes_pass_validation() {
    let mut source = ExplodeSource::try_new(vec![
        (
            "v".to_string(),
            nested(vec![Some(vec![Some(1), Some(2)]), Some(vec![Some(3)])]),
        ),
        (
            "w".to_string(),
            nested(vec![Some(vec![Some(4), Some(5)]), Some(vec![Some(6)])]),
        ),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("agreeing nested columns initialize");
    assert_eq!(source.total_records(), Some(3));
}

#[test]
fn per_row_cardinality_disagreement_is_rejected() {
    let mut source = ExplodeSource::try_new(vec![
        ("v".to_string(), nested(vec![Some(vec![Some(1), Some(2)])])),
        ("w".to_string(), nested(vec![Some(vec![Some(3)])])),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");

    assert!(matches!(
        source.initialize().unwrap_err(),
        Error::ElementCountMismatch { row: 0, .. }
    ));
}

#[test]
fn entry_ranges_are_handed_off_exactly_once() {
    let mut source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar((0..10).collect())),
        (
            "v".to_string(),
            nested((0..10).map(|n| Some(vec![Some(n)])).collect()),
        ),
    ])
    .expect("build source");
    source.set_slot_count(3).expect("set slot count");
    source.initialize().expect("initialize");

    let ranges = source.take_entry_ranges().expect("first hand-off");
    assert_eq!(
        ranges
            .iter()
            .map(|r| (r.begin, r.end))
            .collect::<Vec<_>>(),
        vec![(0, 4), (4, 7), (7, 10)]
    );
    assert!(matches!(
        source.take_entry_ranges().unwrap_err(),
        Error::RangesAlreadyConsumed
    ));
}

#[test]
fn setup_protocol_misuse_is_rejected() {
    let build = || {
        ExplodeSource::try_new(vec![
            ("i".to_string(), scalar(vec![1])),
            ("v".to_string(), nested(vec![Some(vec![Some(1)])])),
        ])
        .expect("build source")
    };

    // initialize before set_slot_count
    let mut source = build();
    assert!(matches!(
        source.initialize().unwrap_err(),
        Error::InvalidArgument(_)
    ));

    // zero slots
    let mut source = build();
    assert!(source.set_slot_count(0).is_err());

    // repeated set_slot_count
    let mut source = build();
    source.set_slot_count(2).expect("first call");
    assert!(source.set_slot_count(2).is_err());

    // repeated initialize
    let mut source = build();
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("first initialize");
    assert!(source.initialize().is_err());

    // set_entry before initialize
    let mut source = build();
    source.set_slot_count(1).expect("set slot count");
    assert!(source.set_entry(0, 0).is_err());
}

#[test]
fn out_of_range_entry_and_slot_are_defined_errors() {
    let mut source = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![0, 1])),
        (
            "v".to_string(),
            nested(vec![Some(vec![Some(1)]), Some(vec![Some(2)])]),
        ),
    ])
    .expect("build source");
    source.set_slot_count(1).expect("set slot count");
    source.initialize().expect("initialize");

    assert!(matches!(
        source.set_entry(0, 2).unwrap_err(),
        Error::IndexOutOfRange { index: 2, len: 2 }
    ));
    assert!(matches!(
        source.set_entry(5, 0).unwrap_err(),
        Error::IndexOutOfRange { index: 5, len: 1 }
    ));
}

#[test]
fn duplicate_column_names_are_rejected_at_construction() {
    let err = ExplodeSource::try_new(vec![
        ("i".to_string(), scalar(vec![1])),
        ("i".to_string(), scalar(vec![2])),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn partition_sizes_differ_by_at_most_one() {
    for total in [0u64, 1, 5, 16, 97] {
        for n_slots in [1usize, 2, 3, 7, 16] {
            let mut source = ExplodeSource::try_new(vec![(
                "v".to_string(),
                nested((0..total).map(|n| Some(vec![Some(n as i64)])).collect()),
            )])
            .expect("build source");
            source.set_slot_count(n_slots).expect("set slot count");
            source.initialize().expect("initialize");
            let ranges = source.take_entry_ranges().expect("take ranges");

            let sum: u64 = ranges.iter().map(|r| r.len()).sum();
            assert_eq!(sum, total);
            let min = ranges.iter().map(|r| r.len()).min().unwrap();
            let max = ranges.iter().map(|r| r.len()).max().unwrap();
            assert!(max - min <= 1, "total {total} slots {n_slots}");
        }
    }
}
