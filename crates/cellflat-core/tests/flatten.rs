//! Scenario tests for the flattening engine.

use std::collections::BTreeMap;

use cellflat_core::{FlattenError, Flattener};
use cellflat_model::{AnnotationDb, Cell, Column, FlattenOptions, Interval, Schema};

fn schema(
    code_map: &[(&str, &[&str])],
    static_columns: &[&str],
    nested: &[&str],
    sequential: &[&str],
) -> Schema {
    let to_vec = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
    Schema {
        code_map: code_map
            .iter()
            .map(|(column, codes)| ((*column).to_string(), to_vec(codes)))
            .collect::<BTreeMap<_, _>>(),
        static_columns: to_vec(static_columns),
        nested_columns: to_vec(nested),
        sequential_columns: to_vec(sequential),
    }
}

/// `static=[ID{sub}]`, `nested=[Trial{ordinal}]`, `sequential=[Look{onset,offset}]`.
fn trial_look_schema() -> Schema {
    schema(
        &[
            ("ID", &["sub"]),
            ("Trial", &["ordinal"]),
            ("Look", &["onset", "offset"]),
        ],
        &["ID"],
        &["Trial"],
        &["Look"],
    )
}

fn cell(ordinal: u32, onset: i64, offset: i64) -> Cell {
    Cell::new(ordinal, Interval::new(onset, offset).expect("valid interval"))
}

fn spans(name: &str, spans: &[(i64, i64)]) -> Column {
    let mut column = Column::new(name, Vec::<String>::new());
    for (index, (onset, offset)) in spans.iter().enumerate() {
        column.push_cell(cell(index as u32 + 1, *onset, *offset));
    }
    column
}

fn id_column(sub: &str) -> Column {
    Column::new("ID", ["sub"]).with_cell(cell(1, 0, 0).with_code("sub", sub))
}

fn session(trials: &[(i64, i64)], looks: &[(i64, i64)]) -> AnnotationDb {
    AnnotationDb::new("session.opf")
        .with_column(id_column("5"))
        .with_column(spans("Trial", trials))
        .with_column(spans("Look", looks))
}

fn flattener(schema: Schema, ensure_rows: bool) -> Flattener {
    Flattener::new(schema, FlattenOptions::new().with_ensure_rows(ensure_rows))
        .expect("valid schema")
}

#[test]
fn looks_inside_trial_produce_one_row_each() {
    let db = session(&[(0, 100)], &[(10, 20), (30, 40)]);
    let outcome = flattener(trial_look_schema(), false)
        .flatten(&db)
        .expect("flatten");

    assert_eq!(
        outcome.rows,
        [["5", "1", "10", "20"], ["5", "1", "30", "40"]]
    );
}

#[test]
fn empty_trial_with_ensure_rows_emits_blank_row() {
    let db = session(&[(0, 100)], &[(200, 300)]);
    let outcome = flattener(trial_look_schema(), true)
        .flatten(&db)
        .expect("flatten");

    assert_eq!(outcome.rows, [["5", "1", "", ""]]);
    assert_eq!(outcome.padded_rows, 1);
}

#[test]
fn empty_trial_without_ensure_rows_emits_nothing() {
    let db = session(&[(0, 100)], &[(200, 300)]);
    let outcome = flattener(trial_look_schema(), false)
        .flatten(&db)
        .expect("flatten");

    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.nested_cells, 1);
}

#[test]
fn blank_value_fills_padded_rows() {
    let db = session(&[(0, 100)], &[]);
    let flattener = Flattener::new(
        trial_look_schema(),
        FlattenOptions::new()
            .with_blank_value("NA")
            .with_ensure_rows(true),
    )
    .expect("valid schema");

    let outcome = flattener.flatten(&db).expect("flatten");
    assert_eq!(outcome.rows, [["5", "1", "NA", "NA"]]);
}

#[test]
fn look_equal_to_trial_is_contained() {
    let db = session(&[(0, 100)], &[(0, 100), (50, 150)]);
    let outcome = flattener(trial_look_schema(), false)
        .flatten(&db)
        .expect("flatten");

    assert_eq!(outcome.rows, [["5", "1", "0", "100"]]);
}

#[test]
fn trial_outside_every_block_aborts() {
    let schema = schema(
        &[
            ("ID", &["sub"]),
            ("Block", &["ordinal"]),
            ("Trial", &["ordinal"]),
            ("Look", &["onset", "offset"]),
        ],
        &["ID"],
        &["Block", "Trial"],
        &["Look"],
    );
    let db = AnnotationDb::new("session.opf")
        .with_column(id_column("5"))
        .with_column(spans("Block", &[(0, 100)]))
        .with_column(spans("Trial", &[(10, 50), (150, 200)]))
        .with_column(spans("Look", &[(20, 30)]));

    let err = flattener(schema, false).flatten(&db).unwrap_err();
    assert_eq!(
        err,
        FlattenError::NoContainingCell {
            column: "Trial".to_string(),
            ordinal: 2,
            container: "Block".to_string(),
        }
    );
}

#[test]
fn sequential_slots_are_blank_for_other_columns() {
    let schema = schema(
        &[
            ("ID", &["sub"]),
            ("Trial", &["ordinal"]),
            ("Look", &["onset"]),
            ("Reach", &["hand"]),
        ],
        &["ID"],
        &["Trial"],
        &["Look", "Reach"],
    );
    let reach = Column::new("Reach", ["hand"])
        .with_cell(cell(1, 15, 18).with_code("hand", "left"))
        .with_cell(cell(2, 500, 600).with_code("hand", "right"));
    let db = AnnotationDb::new("session.opf")
        .with_column(id_column("7"))
        .with_column(spans("Trial", &[(0, 100)]))
        .with_column(spans("Look", &[(10, 20)]))
        .with_column(reach);

    let outcome = flattener(schema, false).flatten(&db).expect("flatten");
    assert_eq!(
        outcome.rows,
        [["7", "1", "10", ""], ["7", "1", "", "left"]]
    );
}

/// Slots follow `sequential_columns`, not the alphabetical order of `code_map`.
#[test]
fn sequential_slots_follow_schema_order() {
    let schema = schema(
        &[
            ("ID", &["sub"]),
            ("Trial", &["ordinal"]),
            ("Look", &["onset"]),
            ("Reach", &["hand"]),
        ],
        &["ID"],
        &["Trial"],
        &["Reach", "Look"],
    );
    let reach =
        Column::new("Reach", ["hand"]).with_cell(cell(1, 15, 18).with_code("hand", "left"));
    let db = AnnotationDb::new("session.opf")
        .with_column(id_column("7"))
        .with_column(spans("Trial", &[(0, 100)]))
        .with_column(spans("Look", &[(10, 20)]))
        .with_column(reach);

    let flattener = flattener(schema, false);
    assert_eq!(
        flattener.header(),
        ["ID_sub", "Trial_ordinal", "Reach_hand", "Look_onset"]
    );
    let outcome = flattener.flatten(&db).expect("flatten");
    assert_eq!(
        outcome.rows,
        [["7", "1", "left", ""], ["7", "1", "", "10"]]
    );
}

/// Without nested columns every sequential cell is emitted, with no containment filter.
#[test]
fn no_nested_columns_takes_every_sequential_cell() {
    let schema = schema(
        &[("ID", &["sub"]), ("Look", &["onset", "offset"]), ("Reach", &["ordinal"])],
        &["ID"],
        &[],
        &["Look", "Reach"],
    );
    let db = AnnotationDb::new("session.opf")
        .with_column(id_column("5"))
        .with_column(spans("Look", &[(10, 20), (5_000, 6_000)]))
        .with_column(spans("Reach", &[(0, 1)]));

    let outcome = flattener(schema, true).flatten(&db).expect("flatten");
    assert_eq!(
        outcome.rows,
        [
            ["5", "10", "20", ""],
            ["5", "5000", "6000", ""],
            ["5", "", "", "1"],
        ]
    );
    assert_eq!(outcome.nested_cells, 0);
    assert_eq!(outcome.padded_rows, 0);
}

#[test]
fn static_values_come_from_first_cell() {
    let id = Column::new("ID", ["sub"])
        .with_cell(cell(1, 0, 0).with_code("sub", "first"))
        .with_cell(cell(2, 10, 10).with_code("sub", "second"));
    let db = AnnotationDb::new("session.opf")
        .with_column(id)
        .with_column(spans("Trial", &[(0, 100), (100, 200)]))
        .with_column(spans("Look", &[(10, 20), (110, 120)]));

    let outcome = flattener(trial_look_schema(), false)
        .flatten(&db)
        .expect("flatten");
    assert_eq!(outcome.rows.len(), 2);
    assert!(outcome.rows.iter().all(|row| row[0] == "first"));
}

#[test]
fn missing_code_on_sequential_cell_aborts() {
    let schema = schema(
        &[("ID", &["sub"]), ("Trial", &["ordinal"]), ("Look", &["direction"])],
        &["ID"],
        &["Trial"],
        &["Look"],
    );
    let looks = Column::new("Look", ["direction"])
        .with_cell(cell(1, 10, 20).with_code("direction", "left"))
        .with_cell(cell(2, 30, 40));
    let db = AnnotationDb::new("session.opf")
        .with_column(id_column("5"))
        .with_column(spans("Trial", &[(0, 100)]))
        .with_column(looks);

    let err = flattener(schema, false).flatten(&db).unwrap_err();
    assert_eq!(
        err,
        FlattenError::MissingCode {
            column: "Look".to_string(),
            ordinal: 2,
            code: "direction".to_string(),
        }
    );
}

#[test]
fn flattening_is_deterministic() {
    let db = session(&[(0, 100), (100, 200)], &[(10, 20), (30, 40), (150, 160)]);
    let flattener = flattener(trial_look_schema(), true);

    let first = flattener.flatten(&db).expect("flatten");
    let second = flattener.flatten(&db).expect("flatten");
    assert_eq!(first, second);
}
