//! Header normalization.

/// Comparable forms of one raw header (or any name compared against headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeader {
    /// The header as supplied.
    pub raw: String,
    /// `raw` lowercased, punctuation and digits kept.
    pub lowercase: String,
    /// `lowercase` with whitespace runs collapsed and trimmed.
    pub collapsed: String,
    /// Lowercase letters and single spaces only, trimmed.
    pub spaced: String,
    /// `spaced` without spaces.
    pub compact: String,
}

impl NormalizedHeader {
    /// The forms definition matchers are evaluated against, in order.
    pub fn forms(&self) -> [&str; 3] {
        [&self.lowercase, &self.spaced, &self.compact]
    }
}

/// Normalizes a raw header.
///
/// `"Accession #: Number "` gives spaced form `"accession number"` and
/// compact form `"accessionnumber"`.
pub fn normalize_header(raw: &str) -> NormalizedHeader {
    let lowercase = raw.to_lowercase();
    let collapsed = lowercase.split_whitespace().collect::<Vec<_>>().join(" ");
    let letters: String = lowercase
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_whitespace())
        .collect();
    let spaced = letters.split_whitespace().collect::<Vec<_>>().join(" ");
    let compact = spaced.replace(' ', "");
    NormalizedHeader {
        raw: raw.to_string(),
        lowercase,
        collapsed,
        spaced,
        compact,
    }
}
