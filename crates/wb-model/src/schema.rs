//! Read-only description of the target database schema.
//!
//! A [`SchemaGraph`] is a set of [`Table`]s connected by [`Relationship`]s.
//! Tables that carry a rank list are hierarchical "tree" tables whose levels
//! are addressed with `$Rank` path tokens.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Cardinality of a relationship, seen from the table that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    /// Returns true if following this relationship yields a collection.
    pub fn is_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub friendly_name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: friendly_name.into(),
            is_hidden: false,
            is_required: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    /// Display name; falls back to `name` when absent from the source document.
    #[serde(default)]
    pub friendly_name: Option<String>,
    pub target_table: String,
    pub kind: RelationshipKind,
    /// Name of the relationship on `target_table` that points back here.
    #[serde(default)]
    pub inverse_name: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        target_table: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            target_table: target_table.into(),
            kind,
            inverse_name: None,
            is_hidden: false,
        }
    }

    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    pub fn with_inverse(mut self, inverse_name: impl Into<String>) -> Self {
        self.inverse_name = Some(inverse_name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn display_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.name)
    }
}

/// A level of a tree table (e.g. `Kingdom`, `Family`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    #[serde(default)]
    pub is_required: bool,
}

impl Rank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub friendly_name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Present only on tree tables, ordered from the top of the hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<Vec<Rank>>,
}

impl Table {
    pub fn new(name: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: friendly_name.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
            ranks: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.ranks.get_or_insert_with(Vec::new).push(rank);
        self
    }

    pub fn is_tree(&self) -> bool {
        self.ranks.is_some()
    }

    pub fn ranks(&self) -> &[Rank] {
        self.ranks.as_deref().unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_hidden)
    }

    pub fn visible_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| !r.is_hidden)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaDocument {
    tables: Vec<Table>,
}

/// The full schema: tables addressable case-insensitively by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDocument", into = "SchemaDocument")]
pub struct SchemaGraph {
    tables: Vec<Table>,
    index: BTreeMap<String, usize>,
}

impl SchemaGraph {
    /// Builds a graph, rejecting duplicate table names and dangling
    /// relationship targets.
    pub fn new(tables: Vec<Table>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, table) in tables.iter().enumerate() {
            if index.insert(table.name.to_lowercase(), position).is_some() {
                return Err(ModelError::DuplicateTable(table.name.clone()));
            }
        }
        for table in &tables {
            for relationship in &table.relationships {
                if !index.contains_key(&relationship.target_table.to_lowercase()) {
                    return Err(ModelError::UnknownRelationshipTarget {
                        table: table.name.clone(),
                        relationship: relationship.name.clone(),
                        target: relationship.target_table.clone(),
                    });
                }
            }
        }
        Ok(Self { tables, index })
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.index
            .get(&name.to_lowercase())
            .map(|&position| &self.tables[position])
    }

    pub fn require_table(&self, name: &str) -> Result<&Table> {
        self.table(name)
            .ok_or_else(|| ModelError::UnknownTable(name.to_string()))
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TryFrom<SchemaDocument> for SchemaGraph {
    type Error = ModelError;

    fn try_from(document: SchemaDocument) -> Result<Self> {
        Self::new(document.tables)
    }
}

impl From<SchemaGraph> for SchemaDocument {
    fn from(graph: SchemaGraph) -> Self {
        Self {
            tables: graph.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_ignores_case() {
        let schema = SchemaGraph::new(vec![Table::new("Accession", "Accession")]).unwrap();
        assert!(schema.table("accession").is_some());
        assert!(schema.table("ACCESSION").is_some());
        assert!(schema.table("agent").is_none());
    }

    #[test]
    fn rejects_dangling_relationship() {
        let table = Table::new("accession", "Accession").with_relationship(Relationship::new(
            "agents",
            "agent",
            RelationshipKind::OneToMany,
        ));
        let err = SchemaGraph::new(vec![table]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownRelationshipTarget { .. }));
    }

    #[test]
    fn rejects_duplicate_tables() {
        let err = SchemaGraph::new(vec![
            Table::new("agent", "Agent"),
            Table::new("Agent", "Agent"),
        ])
        .unwrap_err();
        assert_eq!(err, ModelError::DuplicateTable("Agent".to_string()));
    }

    #[test]
    fn to_many_kinds() {
        assert!(RelationshipKind::OneToMany.is_to_many());
        assert!(RelationshipKind::ManyToMany.is_to_many());
        assert!(!RelationshipKind::ManyToOne.is_to_many());
        assert!(!RelationshipKind::OneToOne.is_to_many());
    }
}
