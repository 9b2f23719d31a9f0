//! Integration tests for Guapo.

use std::io::Write;
use tempfile::NamedTempFile;

use guapo::transform::{
    self, ArithmeticOp, CapitalizationMode, OperationKind, WhitespaceMode,
};
use guapo::{
    build, read_lines, BuildOptions, CellValue, DataType, ErrorKind, GuapoConfig, GuapoError,
    RowPolicy, Session, TableBuilder, TransformEngine, TransformOperation,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn countries() -> Vec<&'static str> {
    vec![
        "Country,Area,Population,Capital",
        "Brazil,8515767,212000000,Brasilia",
        "Chile,756102,19000000,Santiago",
    ]
}

fn column(dataset: &guapo::Dataset, index: usize) -> Vec<CellValue> {
    dataset.rows().iter().map(|row| row[index].clone()).collect()
}

// =============================================================================
// Ingestion Tests
// =============================================================================

#[test]
fn test_build_countries_scenario() {
    let ds = build(&countries(), None, true).expect("Build failed");

    assert_eq!(ds.delimiter(), ",");
    assert_eq!(ds.column_count(), 4);
    assert_eq!(
        ds.column_types(),
        &[DataType::Text, DataType::Integer, DataType::Integer, DataType::Text]
    );
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.get(0, 1), Some(&CellValue::Integer(8515767)));
    assert_eq!(ds.get(1, 3), Some(&CellValue::from("Santiago")));
}

#[test]
fn test_build_each_single_delimiter() {
    for delimiter in [",", ";", ":", "\t", "|"] {
        let lines: Vec<String> = ["id,name,score", "1,ana,2.5", "2,bea,3.5", "3,cid,4.5"]
            .iter()
            .map(|line| line.replace(',', delimiter))
            .collect();

        let ds = build(&lines, None, true).expect("Build failed");
        assert_eq!(ds.delimiter(), delimiter, "delimiter {:?}", delimiter);
        assert_eq!(ds.column_count(), 3);
        assert_eq!(
            ds.column_types(),
            &[DataType::Integer, DataType::Text, DataType::Float]
        );
    }
}

#[test]
fn test_build_without_header() {
    let ds = build(&["1,2", "3,4"], None, false).expect("Build failed");
    assert_eq!(ds.columns(), &["1", "2"]);
    assert_eq!(ds.row_count(), 2);
}

#[test]
fn test_build_insufficient_data() {
    let err = build(&["Country,Area"], None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_build_from_file_with_config() {
    let file = create_test_file("  city | pop \nLima|10\nQuito|3\n\n");
    let (lines, metadata) = read_lines(file.path()).expect("Read failed");
    assert_eq!(lines, vec!["city | pop", "Lima|10", "Quito|3"]);
    assert_eq!(metadata.line_count, 3);
    assert!(metadata.hash.starts_with("sha256:"));

    let config = GuapoConfig::new();
    let ds = TableBuilder::from_config(&config.inference)
        .build(&lines, &BuildOptions::new().with_delimiter("|"))
        .expect("Build failed");
    assert_eq!(ds.columns(), &["city ", " pop"]);
    assert_eq!(ds.column_type(1).unwrap(), DataType::Integer);
}

#[test]
fn test_read_lines_errors() {
    let empty = create_test_file("\n\n");
    assert!(matches!(
        read_lines(empty.path()),
        Err(GuapoError::EmptyData(_))
    ));
    assert!(matches!(
        read_lines("/nonexistent/data.csv"),
        Err(GuapoError::Io { .. })
    ));
}

#[test]
fn test_reject_ragged_rows() {
    let lines = ["a,b", "1,2", "3"];
    let err = TableBuilder::new()
        .build(&lines, &BuildOptions::new().with_row_policy(RowPolicy::Reject))
        .unwrap_err();
    assert!(matches!(err, GuapoError::RaggedRow { line: 3, .. }));
}

// =============================================================================
// Operator Tests
// =============================================================================

#[test]
fn test_doubles_scenario() {
    // Explicit delimiter, otherwise the spaces would be picked up as one.
    let mut ds = build(&["City", "Rio   de   Janeiro", "Rio   de Janeiro"], Some(","), true)
        .expect("Build failed");
    transform::remove_whitespace(&mut ds, 0, WhitespaceMode::Doubles).unwrap();
    assert_eq!(
        column(&ds, 0),
        vec![CellValue::from("RiodeJaneiro"), CellValue::from("Riode Janeiro")]
    );
}

#[test]
fn test_add_five_on_integer_and_float() {
    let mut ints = build(&["n", "1", "2", "3"], None, true).unwrap();
    assert_eq!(ints.column_type(0).unwrap(), DataType::Integer);
    let preview = transform::arithmetic(&ints, 0, ArithmeticOp::Add, 5.0).unwrap();
    transform::commit(&mut ints, preview).unwrap();
    assert_eq!(
        column(&ints, 0),
        vec![CellValue::Integer(6), CellValue::Integer(7), CellValue::Integer(8)]
    );

    let mut floats = build(&["x", "1.5", "2.5"], None, true).unwrap();
    assert_eq!(floats.column_type(0).unwrap(), DataType::Float);
    let preview = transform::arithmetic(&floats, 0, ArithmeticOp::Add, 5.0).unwrap();
    transform::commit(&mut floats, preview).unwrap();
    assert_eq!(
        column(&floats, 0),
        vec![CellValue::Float(6.5), CellValue::Float(7.5)]
    );
}

#[test]
fn test_wrong_type_leaves_column_unchanged() {
    let mut ds = build(&countries(), None, true).unwrap();
    let before = ds.clone();

    let err = transform::capitalization(&mut ds, 1, CapitalizationMode::All).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongColumnType);

    let err = transform::arithmetic(&ds, 0, ArithmeticOp::Add, 5.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongColumnType);

    assert_eq!(ds, before);
    assert!(ds.log().is_empty());
}

#[test]
fn test_division_by_zero_surfaces_cell_errors() {
    let mut ds = build(&countries(), None, true).unwrap();
    let preview = transform::arithmetic(&ds, 2, ArithmeticOp::Divide, 0.0).unwrap();
    assert_eq!(preview.errors.len(), 2);

    let err = transform::commit(&mut ds, preview).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComputationError);
    assert_eq!(ds.get(0, 2), Some(&CellValue::Integer(212000000)));
}

#[test]
fn test_search_and_statistics() {
    let ds = build(&countries(), None, true).unwrap();
    assert_eq!(transform::search(&ds, 3, "sant").unwrap(), vec![1]);

    let stats = transform::word_statistics(&ds, 0).unwrap();
    assert_eq!(stats.count("Chile"), Some(1));
    assert!(ds.log().is_empty());
}

// =============================================================================
// Script and Session Tests
// =============================================================================

#[test]
fn test_operation_script_from_json() {
    let script = r#"[
        {"op": "capitalization", "column": 3, "mode": "all"},
        {"op": "clamp", "column": 1, "low": 0, "high": 1000000},
        {"op": "cast_column", "column": 2, "data_type": "float", "format": "1eN"}
    ]"#;
    let operations = TransformOperation::parse_script(script).unwrap();

    let mut ds = build(&countries(), None, true).unwrap();
    let result = TransformEngine::new().apply_all(&mut ds, &operations).unwrap();

    assert_eq!(result.operations_applied, 3);
    assert_eq!(ds.get(0, 3), Some(&CellValue::from("BRASILIA")));
    assert_eq!(ds.get(0, 1), Some(&CellValue::Integer(1000000)));
    assert_eq!(ds.get(1, 1), Some(&CellValue::Integer(756102)));
    assert_eq!(ds.column_type(2).unwrap(), DataType::Float);
    assert_eq!(ds.column_formats()[2].as_ref().unwrap().as_str(), "1eN");

    let log = ds.log();
    assert_eq!(log.len(), 3);
    assert_eq!(log.entries()[1].kind, OperationKind::Clamp);
    assert_eq!(log.entries()[1].column_name, "Area");
}

#[test]
fn test_session_workflow() {
    let file = create_test_file("Country;Capital\nPeru;  Lima \nEcuador; Quito\n");
    let mut session = Session::new();
    let (index, _) = session.open_file(file.path()).expect("Open failed");

    let ds = session.current_mut().expect("No selection");
    transform::remove_whitespace(ds, 1, WhitespaceMode::Both).unwrap();

    let ds = session.get(index).unwrap();
    assert_eq!(ds.get(0, 1), Some(&CellValue::from("Lima")));

    session.rename(index, "andes").unwrap();
    assert_eq!(session.datasets()[0].name(), "andes");
    assert_eq!(session.column_type(index, 1).unwrap(), DataType::Text);
}

#[test]
fn test_dataset_serializes_for_display() {
    let ds = build(&countries(), None, true).unwrap();
    let value = serde_json::to_value(&ds).unwrap();
    assert_eq!(value["column_types"][1], "integer");
    assert_eq!(value["rows"][0][1], 8515767);
    assert_eq!(value["rows"][0][0], "Brazil");
}
