use std::fs;
use std::path::PathBuf;

use nutri_ingest::{IngestError, SourceFormat, read_source};
use nutri_model::{RawRecord, RawValue, SourceTag};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write source file");
    path
}

#[test]
fn reads_csv_with_header_and_ragged_rows() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "ibge.csv",
        "\u{feff}codigo,nome,calcio\n6300101,Arroz polido,\"3,51\"\n\n6300201,Arroz integral\n",
    );
    let document = read_source(&path, SourceFormat::Csv, true, SourceTag::Ibge).unwrap();
    assert_eq!(document.source, Some(SourceTag::Ibge));
    assert_eq!(
        document.columns.as_deref(),
        Some(&["codigo".to_string(), "nome".to_string(), "calcio".to_string()][..])
    );
    assert_eq!(document.records.len(), 2);
    assert_eq!(document.records[0].width(), 3);
    assert_eq!(document.records[1].width(), 2);
    if let RawRecord::Positional(values) = &document.records[0] {
        assert_eq!(values[2], RawValue::text("3,51"));
    } else {
        panic!("expected positional record");
    }
}

#[test]
fn headerless_csv_keeps_every_row() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "ibge.csv",
        "6300101,Arroz polido,\"3,51\"\n6300201,Arroz integral,\"5,12\"\n",
    );
    let document = read_source(&path, SourceFormat::Csv, false, SourceTag::Ibge).unwrap();
    assert!(document.columns.is_none());
    assert_eq!(document.records.len(), 2);
    if let RawRecord::Positional(values) = &document.records[0] {
        assert_eq!(values[0], RawValue::text("6300101"));
    } else {
        panic!("expected positional record");
    }
}

#[test]
fn json_document_with_other_tag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "taco.json", r#"{"fonte": "IBGE", "records": []}"#);
    let err = read_source(&path, SourceFormat::Json, true, SourceTag::Taco).unwrap_err();
    assert!(matches!(
        err,
        IngestError::TagMismatch {
            expected: SourceTag::Taco,
            found: SourceTag::Ibge,
            ..
        }
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let err = read_source(&path, SourceFormat::Json, true, SourceTag::Taco).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}
