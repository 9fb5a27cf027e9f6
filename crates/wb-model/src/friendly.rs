//! Human-readable rendering of mapping paths.

use crate::error::{ModelError, Result};
use crate::path::{MappingPath, PathToken};
use crate::schema::{SchemaGraph, Table};

/// Renders `path` as display names, starting with the root table's name.
///
/// `accessionagents > #1 > agent > lastname` from `accession` becomes
/// `["Accession", "Accession Agents", "#1", "Agent", "Last Name"]`. Rendering
/// stops at the first field, like the path itself does.
pub fn friendly_path(schema: &SchemaGraph, root: &str, path: &MappingPath) -> Result<Vec<String>> {
    let table = schema.require_table(root)?;
    let mut names = vec![table.friendly_name.clone()];
    render(schema, table, path.tokens(), &mut names)?;
    Ok(names)
}

fn render(
    schema: &SchemaGraph,
    table: &Table,
    tokens: &[PathToken],
    names: &mut Vec<String>,
) -> Result<()> {
    let Some((token, rest)) = tokens.split_first() else {
        return Ok(());
    };
    match token {
        PathToken::Reference(_) => {
            names.push(token.to_string());
            render(schema, table, rest, names)
        }
        PathToken::TreeRank(rank) => {
            names.push(rank.clone());
            render(schema, table, rest, names)
        }
        PathToken::Name(name) => {
            if let Some(field) = table.field(name) {
                names.push(field.friendly_name.clone());
                return Ok(());
            }
            let relationship =
                table
                    .relationship(name)
                    .ok_or_else(|| ModelError::UnknownPathElement {
                        table: table.name.clone(),
                        element: name.clone(),
                    })?;
            names.push(relationship.display_name().to_string());
            let target = schema.require_table(&relationship.target_table)?;
            render(schema, target, rest, names)
        }
    }
}

/// Short label for a mapped header, built from [`friendly_path`] output.
///
/// Keeps the last element and prefixes it with the element before when that
/// disambiguates it: `#1 Remarks`, `Kingdom Name`.
pub fn friendly_preview(friendly: &[String], path: &MappingPath, root_is_tree: bool) -> String {
    let Some((_, friendly)) = friendly.split_first() else {
        return String::new();
    };
    let tokens = path.tokens();
    if friendly.is_empty() || friendly.len() != tokens.len() {
        return String::new();
    }
    let last = &friendly[friendly.len() - 1];
    if friendly.len() == 1 {
        return last.clone();
    }
    let previous = friendly.len() - 2;
    if friendly.len() == 2 && root_is_tree {
        return format!("{} {last}", friendly[0]);
    }
    match &tokens[previous] {
        PathToken::Reference(_) | PathToken::TreeRank(_) => {
            format!("{} {last}", friendly[previous])
        }
        PathToken::Name(_) => last.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Relationship, RelationshipKind};

    fn schema() -> SchemaGraph {
        SchemaGraph::new(vec![
            Table::new("accession", "Accession")
                .with_field(Field::new("accessionnumber", "Accession Number"))
                .with_relationship(
                    Relationship::new("accessionagents", "accessionagent", RelationshipKind::OneToMany)
                        .with_friendly_name("Accession Agents"),
                ),
            Table::new("accessionagent", "Accession Agent")
                .with_field(Field::new("remarks", "Remarks"))
                .with_relationship(Relationship::new("agent", "agent", RelationshipKind::ManyToOne)),
            Table::new("agent", "Agent").with_field(Field::new("lastname", "Last Name")),
        ])
        .unwrap()
    }

    #[test]
    fn renders_through_relationships() {
        let path: MappingPath = "accessionagents > #1 > agent > lastname".parse().unwrap();
        let names = friendly_path(&schema(), "accession", &path).unwrap();
        assert_eq!(
            names,
            vec!["Accession", "Accession Agents", "#1", "agent", "Last Name"]
        );
    }

    #[test]
    fn unknown_element_is_an_error() {
        let path: MappingPath = "nope".parse().unwrap();
        let err = friendly_path(&schema(), "accession", &path).unwrap_err();
        assert!(matches!(err, ModelError::UnknownPathElement { .. }));
    }

    #[test]
    fn preview_prefixes_reference_marker() {
        let path: MappingPath = "accessionagents > #1 > remarks".parse().unwrap();
        let names = friendly_path(&schema(), "accession", &path).unwrap();
        assert_eq!(friendly_preview(&names, &path, false), "#1 Remarks");
    }

    #[test]
    fn preview_for_tree_rank() {
        let names = vec!["Taxon".to_string(), "Kingdom".to_string(), "Name".to_string()];
        let path: MappingPath = "$Kingdom > name".parse().unwrap();
        assert_eq!(friendly_preview(&names, &path, true), "Kingdom Name");
    }

    #[test]
    fn preview_of_plain_field() {
        let path: MappingPath = "accessionnumber".parse().unwrap();
        let names = friendly_path(&schema(), "accession", &path).unwrap();
        assert_eq!(friendly_preview(&names, &path, false), "Accession Number");
    }
}
