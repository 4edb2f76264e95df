//! End-to-end scenarios against `FwfTable`, covering the record layout used
//! throughout the unit tests (record width 82: 81 data bytes + `\n`).

use fwfdb::{
    Bound, Coordinate, FileSpec, FilterSet, FwfTable, Key, KeyKind, Predicate,
};
use std::fs::File;
use std::io::Write as _;

const DATA_WIDTH: usize = 81;

fn sample_records() -> Vec<&'static [u8]> {
    vec![
        b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n",
        b"US       MI19690322Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       WI19770101Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       MD19570526Fbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       PA19570526Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       VT19570526Fbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       OK19570526Fbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       NV19570526Fbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       RI19570526Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        b"US       ME19570526Fbe56008be36eJohn Doe                 Whatever    Medic        \n",
    ]
}

fn write_records(name: &str, records: &[&[u8]]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = File::create(&path).unwrap();
    for record in records {
        file.write_all(record).unwrap();
    }
    path
}

fn sample_spec() -> FileSpec {
    // Sample records are 81 data bytes wide; the trailing filler field makes
    // the derived record width (82, including the newline) match them.
    FileSpec::from_json(
        r#"{
            "fields": [
                {"name": "country", "start": 0, "len": 9},
                {"name": "state", "start": 9, "len": 2},
                {"name": "birthday", "start": 11, "len": 8},
                {"name": "sex", "start": 19, "len": 1},
                {"name": "filler", "start": 20, "len": 61}
            ],
            "newline": "lf"
        }"#,
    )
    .unwrap()
}

#[test]
fn s1_filter_scenario_matches_expected_line_numbers() {
    let path = write_records("fwfdb_s1.txt", &sample_records());
    let table = FwfTable::open(&path, &sample_spec()).unwrap();

    let sex = table.fields().get("sex").unwrap();
    let lower = Predicate::on_field(sex, b"F".to_vec(), Bound::Lower, true).unwrap();
    let upper = Predicate::on_field(sex, b"F".to_vec(), Bound::Upper, true).unwrap();
    let filters = FilterSet::new().with(lower).with(upper);

    let lines = table.scan_line_numbers(&filters).unwrap();
    assert_eq!(lines, vec![0, 3, 5, 6, 7, 9]);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn s2_unique_index_matches_expected_map() {
    let path = write_records("fwfdb_s2.txt", &sample_records());
    let table = FwfTable::open(&path, &sample_spec()).unwrap();

    let index = table.build_unique_index("state", &FilterSet::new(), KeyKind::Bytes).unwrap();
    let expected = [
        ("AR", 0u64),
        ("MI", 1),
        ("WI", 2),
        ("MD", 3),
        ("PA", 4),
        ("VT", 5),
        ("OK", 6),
        ("NV", 7),
        ("RI", 8),
        ("ME", 9),
    ];
    for (state, line_no) in expected {
        assert_eq!(
            index.get(&Key::Bytes(state.as_bytes().to_vec())),
            Some(Coordinate::local(line_no)),
            "state {state}"
        );
    }

    std::fs::remove_file(path).unwrap();
}

#[test]
fn s3_multi_index_with_duplicate_record() {
    let mut records = sample_records();
    records.push(records[0]); // duplicate record 0, appended as record 10
    let path = write_records("fwfdb_s3.txt", &records);
    let table = FwfTable::open(&path, &sample_spec()).unwrap();

    let multi = table.build_multi_index("state", &FilterSet::new(), KeyKind::Bytes).unwrap();
    assert_eq!(
        multi.get(&Key::Bytes(b"AR".to_vec())),
        &[Coordinate::local(0), Coordinate::local(10)]
    );
    assert_eq!(multi.get(&Key::Bytes(b"MI".to_vec())), &[Coordinate::local(1)]);

    let unique = table.build_unique_index("state", &FilterSet::new(), KeyKind::Bytes).unwrap();
    assert_eq!(
        unique.get(&Key::Bytes(b"AR".to_vec())),
        Some(Coordinate::local(10))
    );

    std::fs::remove_file(path).unwrap();
}

#[test]
fn s4_sentinel_record_passes_regardless_of_bounds() {
    let mut record = vec![b'x'; DATA_WIDTH];
    record[11..19].copy_from_slice(b"        "); // birthday all-spaces sentinel
    record.push(b'\n');
    let records: Vec<&[u8]> = vec![&record];
    let path = write_records("fwfdb_s4.txt", &records);
    let table = FwfTable::open(&path, &sample_spec()).unwrap();

    let birthday = table.fields().get("birthday").unwrap();
    let lower = Predicate::on_field(birthday, b"19500101".to_vec(), Bound::Lower, true).unwrap();
    let upper = Predicate::on_field(birthday, b"19991231".to_vec(), Bound::Upper, true).unwrap();
    let filters = FilterSet::new().with(lower).with(upper);

    assert_eq!(table.scan_line_numbers(&filters).unwrap(), vec![0]);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn s5_int_column_parses_valid_and_aborts_on_invalid() {
    let path = write_records("fwfdb_s5_valid.txt", &sample_records()[..2]);
    let table = FwfTable::open(&path, &sample_spec()).unwrap();
    let values = table.scan_int_column("birthday", &FilterSet::new()).unwrap();
    assert_eq!(values, vec![19_570_526, 19_690_322]);
    std::fs::remove_file(&path).unwrap();

    let mut bad_record = vec![b' '; DATA_WIDTH];
    bad_record[11..19].copy_from_slice(b"invalid!");
    bad_record.push(b'\n');
    let bad_records: Vec<&[u8]> = vec![&bad_record];
    let path = write_records("fwfdb_s5_invalid.txt", &bad_records);
    let table = FwfTable::open(&path, &sample_spec()).unwrap();
    let err = table.scan_int_column("birthday", &FilterSet::new()).unwrap_err();
    match err {
        fwfdb::FwfError::Parse { line_no, raw } => {
            assert_eq!(line_no, 0);
            assert_eq!(raw, b"invalid!");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
    std::fs::remove_file(path).unwrap();
}

#[test]
fn s6_packed_index_matches_multi_index_at_scale() {
    // A smaller stand-in for the spec's 15M-record / 1M-key scenario: large
    // enough to exercise chains of varying length, small enough to run fast.
    let num_records = 20_000usize;
    let num_keys = 500usize;

    let path = std::env::temp_dir().join("fwfdb_s6.txt");
    {
        let mut file = File::create(&path).unwrap();
        for i in 0..num_records {
            let key = i % num_keys;
            // Exactly 9 + 9 + 8 + 1 = 27 data bytes, matching `spec` below.
            writeln!(file, "US       K{key:08}19570526F").unwrap();
        }
    }

    let spec = FileSpec::from_json(
        r#"{
            "fields": [
                {"name": "country", "start": 0, "len": 9},
                {"name": "key", "start": 9, "len": 9},
                {"name": "birthday", "start": 18, "len": 8},
                {"name": "sex", "start": 26, "len": 1}
            ],
            "newline": "lf"
        }"#,
    )
    .unwrap();
    let table = FwfTable::open(&path, &spec).unwrap();
    assert_eq!(table.record_count(), num_records as u64);

    let packed = table
        .build_packed_multi_index("key", &FilterSet::new(), KeyKind::Bytes, num_records)
        .unwrap();
    let multi = table.build_multi_index("key", &FilterSet::new(), KeyKind::Bytes).unwrap();

    assert_eq!(packed.len(), num_keys);
    assert_eq!(multi.len(), num_keys);

    for key in 0..num_keys {
        let key_bytes = format!("K{key:08}").into_bytes();
        let packed_lines: Vec<i32> = packed.lookup(&Key::Bytes(key_bytes.clone())).collect();
        let multi_lines: Vec<i32> = multi
            .get(&Key::Bytes(key_bytes))
            .iter()
            .map(|c| c.line_no as i32)
            .collect();
        assert_eq!(packed_lines, multi_lines, "key {key}");
    }

    std::fs::remove_file(path).unwrap();
}
