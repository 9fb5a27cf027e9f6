use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wb_config::{
    ConfigError, load_definitions, load_existing_paths, load_schema, load_settings,
    read_csv_headers,
};
use wb_model::MappingPath;

const SCHEMA: &str = r#"{
  "tables": [
    {
      "name": "accession",
      "friendly_name": "Accession",
      "fields": [
        { "name": "accessionnumber", "friendly_name": "Accession Number", "is_required": true }
      ],
      "relationships": [
        { "name": "accessionagents", "target_table": "accessionagent",
          "kind": "one-to-many", "inverse_name": "accession" }
      ]
    },
    {
      "name": "accessionagent",
      "friendly_name": "Accession Agent",
      "fields": [ { "name": "remarks", "friendly_name": "Remarks" } ]
    }
  ]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn loads_valid_schema() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "schema.json", SCHEMA);
    let schema = load_schema(&path).expect("load schema");
    assert_eq!(schema.len(), 2);
    let accession = schema.table("Accession").expect("accession table");
    assert!(accession.fields[0].is_required);
}

#[test]
fn dangling_relationship_fails_schema_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "schema.json",
        r#"{"tables": [{"name": "a", "friendly_name": "A",
            "relationships": [{"name": "b", "target_table": "missing", "kind": "many-to-one"}]}]}"#,
    );
    let err = load_schema(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn missing_file_reports_path() {
    let err = load_schema(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn bad_regex_fails_definitions_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "definitions.json",
        r#"{"shortcuts": {"accession": [{"scope": "automapper",
            "headers": {"regex": ["(open"]}, "mapping_path": ["accessionnumber"]}]}}"#,
    );
    let err = load_definitions(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Definitions { .. }));
}

#[test]
fn loads_definitions() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "definitions.json",
        r#"{"synonyms": {"Accession": {"AccessionNumber": {"scope": "automapper",
            "headers": {"string": ["acc no"]}}}}}"#,
    );
    let definitions = load_definitions(&path).expect("load definitions");
    assert!(
        definitions
            .synonym("accession", "accessionnumber", "automapper")
            .is_some()
    );
}

#[test]
fn loads_existing_paths() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "existing.json",
        r##"[["accessionagents", "#1", "remarks"], ["accessionnumber"]]"##,
    );
    let paths = load_existing_paths(&path).expect("load existing");
    let expected: MappingPath = "accessionagents > #1 > remarks".parse().expect("path");
    assert!(paths.contains(&expected));
    assert_eq!(paths.len(), 2);
}

#[test]
fn reads_csv_header_row() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "data.csv",
        "\u{feff}Accession Number, Accession Agent Remarks 1 ,Notes\nA-1,x,y\n",
    );
    let headers = read_csv_headers(&path).expect("read headers");
    assert_eq!(
        headers,
        ["Accession Number", "Accession Agent Remarks 1", "Notes"]
    );
}

#[test]
fn empty_csv_has_no_header_row() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "empty.csv", "");
    let err = read_csv_headers(&path).unwrap_err();
    assert!(matches!(err, ConfigError::MissingHeaderRow { .. }));
}

#[test]
fn settings_file_overrides_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "settings.toml",
        "[automapper]\nscope = \"batch\"\nmax_depth = 4\n",
    );
    let settings = load_settings(&path).expect("load settings");
    let options = settings.automapper.to_options();
    assert_eq!(options.scope, "batch");
    assert_eq!(options.max_depth, 4);
    assert!(!options.check_for_existing_mappings);
}
