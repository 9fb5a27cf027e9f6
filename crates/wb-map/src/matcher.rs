//! Header comparisons: dictionary matchers, direct names, table synonyms.

use wb_model::{MappingPath, PathToken};

use crate::context::MappingContext;
use crate::definitions::CompiledMatchers;
use crate::normalize::NormalizedHeader;

/// A schema field prepared for comparison against headers.
pub(crate) struct FieldNames<'t> {
    pub(crate) name: &'t str,
    pub(crate) lowercase: String,
    /// Lowercased friendly name, whitespace collapsed, digits and
    /// punctuation kept.
    pub(crate) label: String,
    /// `label` without spaces, only when it holds nothing but letters.
    pub(crate) compact: Option<String>,
}

impl<'t> FieldNames<'t> {
    pub(crate) fn new(name: &'t str, friendly_name: &str) -> Self {
        let label = friendly_name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let compact = label
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch == ' ')
            .then(|| label.replace(' ', ""))
            .filter(|compact| !compact.is_empty());
        Self {
            name,
            lowercase: name.to_lowercase(),
            label,
            compact,
        }
    }

    /// Machine name against every header form. The friendly label against
    /// the collapsed and spaced forms, and against the compact form when the
    /// label is letters only.
    pub(crate) fn matches(&self, header: &NormalizedHeader) -> bool {
        header.forms().contains(&self.lowercase.as_str())
            || (!self.label.is_empty()
                && (self.label == header.collapsed || self.label == header.spaced))
            || self
                .compact
                .as_ref()
                .is_some_and(|compact| *compact == header.compact)
    }
}

/// Outcome of comparing a header against a table synonym.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SynonymMatch {
    /// `<synonym> <field>`.
    Plain,
    /// `<synonym> <N> <field>` or `<synonym> <field> <N>`.
    Indexed(u32),
}

pub(crate) fn match_table_synonym(
    synonym: &NormalizedHeader,
    field: &FieldNames<'_>,
    header: &NormalizedHeader,
) -> Option<SynonymMatch> {
    if let Some(index) = reference_index(&header.collapsed, &synonym.collapsed, &field.label) {
        return Some(SynonymMatch::Indexed(index));
    }
    let labelled = format!("{} {}", synonym.collapsed, field.label);
    let compact = field
        .compact
        .as_ref()
        .map(|_| format!("{}{}", synonym.compact, field.lowercase));
    let hit = labelled == header.collapsed
        || labelled == header.spaced
        || compact.is_some_and(|compact| compact == header.compact);
    hit.then_some(SynonymMatch::Plain)
}

/// Finds `"{synonym} N {friendly}"` or `"{synonym} {friendly} N"` anywhere in
/// `header` and returns `N`. Zero is not a valid reference index.
pub(crate) fn reference_index(header: &str, synonym: &str, friendly: &str) -> Option<u32> {
    if synonym.is_empty() || friendly.is_empty() {
        return None;
    }
    let leading = format!("{synonym} ");
    for (start, _) in header.match_indices(&leading) {
        let rest = &header[start + leading.len()..];
        if let Some((index, after)) = split_number(rest)
            && after
                .strip_prefix(' ')
                .and_then(|tail| tail.strip_prefix(friendly))
                .is_some_and(|remainder| remainder.is_empty() || remainder.starts_with(' '))
        {
            return Some(index);
        }
        if let Some(after) = rest
            .strip_prefix(friendly)
            .and_then(|tail| tail.strip_prefix(' '))
            && let Some((index, _)) = split_number(after)
        {
            return Some(index);
        }
    }
    None
}

fn split_number(raw: &str) -> Option<(u32, &str)> {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let index: u32 = raw[..end].parse().ok()?;
    (index > 0).then_some((index, &raw[end..]))
}

impl MappingContext<'_> {
    /// Runs `matchers` over every active header and records `path + suffix`
    /// for each hit.
    pub(crate) fn match_definition(
        &mut self,
        matchers: &CompiledMatchers,
        path: &MappingPath,
        suffix: &[PathToken],
    ) {
        for header in self.active_headers() {
            if matchers.find(&self.headers[header].header).is_some() {
                self.record(path, suffix, header, None);
            }
        }
    }
}
