//! Breadth-first schema traversal.
//!
//! Each pass starts at the root table and expands relationships round by
//! round. Within a round, queued entries are visited in ascending path length
//! so shallower matches are recorded first.

use tracing::{debug, trace};
use wb_model::{MappingPath, PathToken, Relationship, RelationshipKind, Table};

use crate::context::{MappingContext, QueueEntry};
use crate::matcher::{FieldNames, SynonymMatch, match_table_synonym};
use crate::normalize::{NormalizedHeader, normalize_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Shortcuts and table synonyms; tables may be visited more than once.
    ShortcutsAndTableSynonyms,
    /// Synonyms and direct name matches; each table is visited once.
    SynonymsAndMatches,
}

impl<'a> MappingContext<'a> {
    pub(crate) fn run_pass(&mut self, pass: Pass) {
        self.searched_tables.clear();
        self.queue.clear();
        self.queue.insert(
            0,
            vec![QueueEntry {
                table: self.root,
                path: self.options.path.clone(),
                parent_table: None,
                parent_kind: None,
            }],
        );

        let mut visited = 0_usize;
        while !self.queue.is_empty() {
            let round = std::mem::take(&mut self.queue);
            for entry in round.into_values().flatten() {
                if self.visit(pass, &entry) {
                    visited += 1;
                }
            }
        }
        debug!(?pass, visited, "pass finished");
    }

    /// Searches one table. Returns false if the entry was skipped.
    fn visit(&mut self, pass: Pass, entry: &QueueEntry<'a>) -> bool {
        let table = entry.table;
        if entry.path.len() > self.options.max_depth {
            return false;
        }
        let key = table.name.to_lowercase();
        if pass == Pass::SynonymsAndMatches && self.searched_tables.contains(&key) {
            return false;
        }
        self.searched_tables.insert(key);
        trace!(table = %table.name, path = %entry.path, ?pass, "visiting table");

        if pass == Pass::ShortcutsAndTableSynonyms {
            self.match_shortcuts(table, &entry.path);
        }
        if table.is_tree() {
            if pass == Pass::SynonymsAndMatches {
                self.match_tree_ranks(table, &entry.path);
            }
            return true;
        }
        self.match_fields(pass, table, &entry.path);
        self.enqueue_relationships(pass, entry);
        true
    }

    fn match_shortcuts(&mut self, table: &Table, path: &MappingPath) {
        let definitions = self.definitions;
        let options = self.options;
        for shortcut in definitions.shortcuts(&table.name, &options.scope) {
            self.match_definition(&shortcut.matchers, path, &shortcut.mapping_path);
        }
    }

    /// Ranks act as pseudo-fields: `Kingdom` maps to `$Kingdom > name` and
    /// `Kingdom Author` to `$Kingdom > author`.
    fn match_tree_ranks(&mut self, table: &Table, path: &MappingPath) {
        let definitions = self.definitions;
        let options = self.options;
        let inside_rank = match path.last() {
            Some(PathToken::TreeRank(rank)) => Some(rank.as_str()),
            _ => None,
        };
        let ranks: Vec<&str> = match inside_rank {
            Some(rank) => vec![rank],
            None => table.ranks().iter().map(|rank| rank.name.as_str()).collect(),
        };
        let fields: Vec<FieldNames<'_>> = table
            .visible_fields()
            .map(|field| FieldNames::new(&field.name, &field.friendly_name))
            .collect();

        for rank in ranks {
            let rank_names = normalize_header(rank);
            let suffix = |field: &str| {
                let field = PathToken::name(field);
                if inside_rank.is_some() {
                    vec![field]
                } else {
                    vec![PathToken::rank(rank), field]
                }
            };

            if let Some(synonym) = definitions.synonym(&table.name, &rank.to_lowercase(), &options.scope)
            {
                self.match_definition(&synonym.matchers, path, &suffix("name"));
            }

            for field in &fields {
                let is_name_field = field.label == "name";
                let labelled = format!("{} {}", rank_names.collapsed, field.label);
                let compact = field
                    .compact
                    .as_ref()
                    .map(|_| format!("{}{}", rank_names.compact, field.lowercase));
                let field_suffix = suffix(field.name);
                for header in self.active_headers() {
                    let normalized = &self.headers[header].header;
                    let hit = (is_name_field
                        && (rank_names.collapsed == normalized.collapsed
                            || rank_names.spaced == normalized.spaced))
                        || labelled == normalized.collapsed
                        || labelled == normalized.spaced
                        || compact.as_ref() == Some(&normalized.compact);
                    if hit {
                        self.record(path, &field_suffix, header, None);
                        if !options.allow_multiple_mappings {
                            break;
                        }
                    }
                }
            }
        }
    }

    fn match_fields(&mut self, pass: Pass, table: &Table, path: &MappingPath) {
        let definitions = self.definitions;
        let options = self.options;
        let table_synonyms: Vec<&NormalizedHeader> = match pass {
            Pass::ShortcutsAndTableSynonyms => definitions
                .table_synonyms(&table.name, &self.root.name, path, &options.scope)
                .into_iter()
                .filter(|synonym| !synonym.spaced.is_empty())
                .collect(),
            Pass::SynonymsAndMatches => Vec::new(),
        };

        for field in table.visible_fields() {
            let suffix = [PathToken::name(field.name.as_str())];
            match pass {
                Pass::SynonymsAndMatches => {
                    if let Some(synonym) = definitions.synonym(&table.name, &field.name, &options.scope)
                    {
                        self.match_definition(&synonym.matchers, path, &suffix);
                    }
                }
                Pass::ShortcutsAndTableSynonyms if table_synonyms.is_empty() => continue,
                Pass::ShortcutsAndTableSynonyms => {}
            }

            let names = FieldNames::new(&field.name, &field.friendly_name);
            for header in self.active_headers() {
                let normalized = &self.headers[header].header;
                let found = if names.matches(normalized) {
                    Some(None)
                } else if table_synonyms.iter().any(|synonym| {
                    normalized.collapsed.starts_with(&synonym.collapsed)
                        || normalized.spaced.starts_with(&synonym.spaced)
                        || normalized.compact.starts_with(&synonym.compact)
                }) {
                    table_synonyms
                        .iter()
                        .find_map(|synonym| match_table_synonym(synonym, &names, normalized))
                        .map(|found| match found {
                            SynonymMatch::Plain => None,
                            SynonymMatch::Indexed(index) => Some(index),
                        })
                } else {
                    None
                };
                if let Some(reference) = found {
                    self.record(path, &suffix, header, reference);
                }
            }
        }
    }

    fn enqueue_relationships(&mut self, pass: Pass, entry: &QueueEntry<'a>) {
        let schema = self.schema;
        let max_depth = self.options.max_depth;
        let arriving = arriving_name(&entry.path);

        for relationship in entry.table.visible_relationships() {
            let Some(target) = schema.table(&relationship.target_table) else {
                continue;
            };
            let mut child = entry.path.child(PathToken::name(relationship.name.as_str()));
            if relationship.kind.is_to_many() {
                child.push(PathToken::Reference(1));
            }
            let depth = child.len();
            if depth > max_depth {
                continue;
            }

            let redundant = match pass {
                Pass::SynonymsAndMatches => {
                    self.searched_tables.contains(&target.name.to_lowercase())
                        || self.queue.get(&depth).is_some_and(|bucket| {
                            bucket
                                .iter()
                                .any(|queued| queued.table.name.eq_ignore_ascii_case(&target.name))
                        })
                }
                Pass::ShortcutsAndTableSynonyms => {
                    is_cycle_to_parent(entry.parent_table, relationship, arriving)
                }
            };
            let nested_to_many = relationship.kind.is_to_many()
                && entry.parent_kind.is_some_and(RelationshipKind::is_to_many);
            if redundant || nested_to_many {
                trace!(
                    table = %entry.table.name,
                    relationship = %relationship.name,
                    redundant,
                    nested_to_many,
                    "skipping relationship"
                );
                continue;
            }

            self.queue.entry(depth).or_default().push(QueueEntry {
                table: target,
                path: child,
                parent_table: Some(entry.table),
                parent_kind: Some(relationship.kind),
            });
        }
    }
}

/// Name of the relationship the path arrived through, looking past a
/// trailing reference or rank marker.
fn arriving_name(path: &MappingPath) -> Option<&str> {
    let mut names = path.tokens().iter().rev();
    match names.next()? {
        PathToken::Name(name) => Some(name.as_str()),
        PathToken::Reference(_) | PathToken::TreeRank(_) => names.next()?.as_name(),
    }
}

/// True when `relationship` leads straight back to `parent` through the
/// relationship pair that was just followed.
fn is_cycle_to_parent(
    parent: Option<&Table>,
    relationship: &Relationship,
    arriving: Option<&str>,
) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    if !relationship.target_table.eq_ignore_ascii_case(&parent.name) {
        return false;
    }
    let Some(inverse) = relationship.inverse_name.as_deref() else {
        return false;
    };
    let paired = parent
        .relationship(inverse)
        .and_then(|back| back.inverse_name.as_deref())
        .is_some_and(|back| back.eq_ignore_ascii_case(&relationship.name));
    paired || arriving.is_some_and(|name| name.eq_ignore_ascii_case(inverse))
}
