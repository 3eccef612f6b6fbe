//! Loading pipeline configs from disk.

use std::fs;

use nutri_standards::{ConfigError, load_config, sha256_hex};

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("nutri.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[pipeline]
output = "out/alimentos.json"
backup_dir = "bak"

[[sources]]
tag = "ibge"
input = "raw/ibge.csv"
format = "csv"
"#,
    );
    let config = load_config(&path).unwrap();
    assert_eq!(config.pipeline.output, dir.path().join("out/alimentos.json"));
    assert_eq!(config.backup_dir(), dir.path().join("bak"));
    assert_eq!(config.sources[0].input, dir.path().join("raw/ibge.csv"));
}

#[test]
fn pinned_checksum_is_verified() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("taco.json"), b"[]").unwrap();
    let good = sha256_hex(b"[]");
    let path = write_config(
        dir.path(),
        &format!(
            r#"
[pipeline]
output = "alimentos.json"

[[sources]]
tag = "TACO"
input = "taco.json"
sha256 = "{good}"
"#
        ),
    );
    let config = load_config(&path).unwrap();
    config.verify_pins().unwrap();

    fs::write(dir.path().join("taco.json"), b"[{}]").unwrap();
    assert!(matches!(
        config.verify_pins(),
        Err(ConfigError::Sha256Mismatch { .. })
    ));
}

#[test]
fn config_without_sources_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[pipeline]\noutput = \"a.json\"\n");
    assert!(matches!(
        load_config(&path),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn missing_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}
