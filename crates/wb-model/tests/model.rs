//! Tests for wb-model types.

use wb_model::{AutoMapResult, HeaderMapping, MappingPath, RelationshipKind, SchemaGraph};

const SCHEMA_JSON: &str = r#"{
  "tables": [
    {
      "name": "accession",
      "friendly_name": "Accession",
      "fields": [
        { "name": "accessionnumber", "friendly_name": "Accession Number", "is_required": true },
        { "name": "guid", "friendly_name": "GUID", "is_hidden": true }
      ],
      "relationships": [
        { "name": "accessionagents", "friendly_name": "Accession Agents",
          "target_table": "accessionagent", "kind": "one-to-many", "inverse_name": "accession" }
      ]
    },
    {
      "name": "accessionagent",
      "friendly_name": "Accession Agent",
      "fields": [ { "name": "remarks", "friendly_name": "Remarks" } ],
      "relationships": [
        { "name": "accession", "target_table": "accession", "kind": "many-to-one",
          "inverse_name": "accessionagents" }
      ]
    },
    {
      "name": "taxon",
      "friendly_name": "Taxon",
      "fields": [ { "name": "name", "friendly_name": "Name" } ],
      "ranks": [ { "name": "Kingdom", "is_required": true }, { "name": "Phylum" } ]
    }
  ]
}"#;

#[test]
fn schema_deserializes_from_json() {
    let schema: SchemaGraph = serde_json::from_str(SCHEMA_JSON).expect("parse schema");
    assert_eq!(schema.len(), 3);

    let accession = schema.table("Accession").expect("accession table");
    assert_eq!(accession.visible_fields().count(), 1);
    let relationship = accession.relationship("accessionagents").expect("relationship");
    assert_eq!(relationship.kind, RelationshipKind::OneToMany);
    assert_eq!(relationship.inverse_name.as_deref(), Some("accession"));

    let taxon = schema.table("taxon").expect("taxon table");
    assert!(taxon.is_tree());
    assert_eq!(taxon.ranks().len(), 2);
    assert!(!accession.is_tree());
}

#[test]
fn schema_with_dangling_target_fails_to_deserialize() {
    let json = r#"{"tables": [{"name": "a", "friendly_name": "A",
        "relationships": [{"name": "b", "target_table": "missing", "kind": "many-to-one"}]}]}"#;
    assert!(serde_json::from_str::<SchemaGraph>(json).is_err());
}

#[test]
fn result_serializes() {
    let result = AutoMapResult {
        mappings: vec![HeaderMapping {
            header: "Accession Agent Remarks 1".to_string(),
            paths: vec!["accessionagents > #1 > remarks".parse::<MappingPath>().unwrap()],
        }],
        unmapped_headers: vec!["Unknown".to_string()],
    };
    let json = serde_json::to_string(&result).expect("serialize result");
    assert!(json.contains(r##"["accessionagents","#1","remarks"]"##));
    let round: AutoMapResult = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(round, result);
}
