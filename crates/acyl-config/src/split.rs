//! Splitting of delimiter-encoded configuration strings.
//!
//! Every list-valued option is a `,`-separated sequence of tokens, each token
//! optionally a `key=value` pair. Splitting keeps empty tokens: `""` yields a
//! single empty field, and a trailing `,` yields an empty last field. Whether
//! an empty token is skipped or rejected is up to the caller.

/// Separates entries in a list.
pub const FIELD_DELIMITER: char = ',';
/// Separates the key and value of a pair.
pub const PAIR_DELIMITER: char = '=';
/// Separates the owner and name of a repository.
pub const REPO_DELIMITER: char = '/';

/// A single token of a delimited list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Zero-based position of the token in the list.
    pub offset: usize,
    /// The token text, untrimmed.
    pub raw: &'a str,
}

impl Field<'_> {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Lazily split `raw` into fields on `delimiter`.
pub fn fields(raw: &str, delimiter: char) -> impl Iterator<Item = Field<'_>> {
    raw.split(delimiter)
        .enumerate()
        .map(|(offset, raw)| Field { offset, raw })
}

/// Split `token` into exactly two parts on `delimiter`.
///
/// Returns `None` when the token has no delimiter or more than one. Either
/// part may be empty.
pub fn pair(token: &str, delimiter: char) -> Option<(&str, &str)> {
    let mut parts = token.split(delimiter);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Some((first, second)),
        _ => None,
    }
}
