#![allow(dead_code)]

use wb_map::CompiledDefinitions;
use wb_model::{
    DefinitionSet, Field, HeaderMatchers, Rank, Relationship, RelationshipKind, SchemaGraph,
    Shortcut, Synonym, Table, TableSynonym,
};

pub const SCOPE: &str = "automapper";

/// A small collections schema: accessions with agents, collection objects
/// with determinations, and a taxon tree.
pub fn sample_schema() -> SchemaGraph {
    SchemaGraph::new(vec![
        Table::new("accession", "Accession")
            .with_field(Field::new("accessionnumber", "Accession Number").required())
            .with_field(Field::new("remarks", "Remarks"))
            .with_field(Field::new("guid", "GUID").hidden())
            .with_relationship(
                Relationship::new("accessionagents", "accessionagent", RelationshipKind::OneToMany)
                    .with_friendly_name("Accession Agents")
                    .with_inverse("accession"),
            ),
        Table::new("accessionagent", "Accession Agent")
            .with_field(Field::new("remarks", "Remarks"))
            .with_field(Field::new("role", "Role").required())
            .with_relationship(
                Relationship::new("accession", "accession", RelationshipKind::ManyToOne)
                    .with_inverse("accessionagents"),
            )
            .with_relationship(Relationship::new("agent", "agent", RelationshipKind::ManyToOne)),
        Table::new("agent", "Agent")
            .with_field(Field::new("lastname", "Last Name"))
            .with_field(Field::new("firstname", "First Name"))
            .with_relationship(
                Relationship::new("addresses", "address", RelationshipKind::OneToMany)
                    .with_inverse("agent"),
            ),
        Table::new("address", "Address")
            .with_field(Field::new("city", "City"))
            .with_relationship(
                Relationship::new("agent", "agent", RelationshipKind::ManyToOne)
                    .with_inverse("addresses"),
            ),
        Table::new("collectionobject", "Collection Object")
            .with_field(Field::new("catalognumber", "Catalog Number").required())
            .with_field(Field::new("remarks", "Remarks"))
            .with_relationship(Relationship::new("cataloger", "agent", RelationshipKind::ManyToOne))
            .with_relationship(
                Relationship::new("determinations", "determination", RelationshipKind::OneToMany)
                    .with_inverse("collectionobject"),
            )
            .with_relationship(Relationship::new(
                "accession",
                "accession",
                RelationshipKind::ManyToOne,
            )),
        Table::new("determination", "Determination")
            .with_field(Field::new("iscurrent", "Is Current"))
            .with_relationship(
                Relationship::new("collectionobject", "collectionobject", RelationshipKind::ManyToOne)
                    .with_inverse("determinations"),
            )
            .with_relationship(Relationship::new("determiner", "agent", RelationshipKind::ManyToOne))
            .with_relationship(Relationship::new("taxon", "taxon", RelationshipKind::ManyToOne)),
        Table::new("taxon", "Taxon")
            .with_field(Field::new("name", "Name"))
            .with_field(Field::new("author", "Author"))
            .with_rank(Rank::new("Kingdom").required())
            .with_rank(Rank::new("Phylum"))
            .with_rank(Rank::new("Family"))
            .with_rank(Rank::new("Genus"))
            .with_rank(Rank::new("Species")),
    ])
    .expect("sample schema is valid")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

pub fn shortcut(regex: &[&str], string: &[&str], mapping_path: &[&str]) -> Shortcut {
    Shortcut {
        scope: SCOPE.to_string(),
        headers: HeaderMatchers {
            regex: strings(regex),
            string: strings(string),
            contains: Vec::new(),
        },
        mapping_path: strings(mapping_path),
    }
}

pub fn synonym(string: &[&str], contains: &[&str]) -> Synonym {
    Synonym {
        scope: SCOPE.to_string(),
        headers: HeaderMatchers {
            regex: Vec::new(),
            string: strings(string),
            contains: strings(contains),
        },
    }
}

pub fn sample_definitions() -> DefinitionSet {
    let mut set = DefinitionSet::default();
    set.shortcuts.insert(
        "CollectionObject".to_string(),
        vec![
            shortcut(&["^cat(alog)? ?(no|num)"], &[], &["catalognumber"]),
            shortcut(&[], &["collector"], &["cataloger", "lastname"]),
        ],
    );
    set.synonyms
        .entry("collectionobject".to_string())
        .or_default()
        .insert("remarks".to_string(), synonym(&[], &["notes"]));
    set.synonyms
        .entry("taxon".to_string())
        .or_default()
        .insert("species".to_string(), synonym(&["epithet"], &[]));
    set.table_synonyms.insert(
        "accessionagent".to_string(),
        vec![TableSynonym {
            scope: SCOPE.to_string(),
            preceding_mapping_path: strings(&["accessionagents"]),
            synonym: "Accession Agent".to_string(),
        }],
    );
    set
}

pub fn compiled(set: &DefinitionSet) -> CompiledDefinitions {
    CompiledDefinitions::compile(set).expect("definitions compile")
}
