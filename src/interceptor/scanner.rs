//! Best-effort scan of a SET clause for the columns it already assigns.
//!
//! Not a SQL parser: the clause is split on commas that sit outside quotes
//! and parentheses, and each piece contributes the text left of its first
//! top-level `=`.

use std::collections::HashSet;

/// Columns targeted by `sql_set`, normalized with [`normalize_column`].
///
/// A qualified column such as `users.updated_by` also contributes its last
/// segment, so it matches an unqualified metadata column.
pub fn already_assigned_columns(sql_set: Option<&str>, case_insensitive: bool) -> HashSet<String> {
    let Some(sql_set) = sql_set else {
        return HashSet::new();
    };

    let mut columns = HashSet::new();
    for column in split_top_level(sql_set).into_iter().filter_map(assigned_column) {
        let segments = column_segments(column, case_insensitive);
        if segments.iter().any(String::is_empty) {
            continue;
        }
        if let [_, .., last] = segments.as_slice() {
            columns.insert(last.clone());
        }
        columns.insert(segments.join("."));
    }
    columns
}

/// Strip identifier quoting from each dotted segment and, optionally, fold
/// ASCII case
pub fn normalize_column(column: &str, case_insensitive: bool) -> String {
    column_segments(column, case_insensitive).join(".")
}

fn column_segments(column: &str, case_insensitive: bool) -> Vec<String> {
    let column = column.trim();
    let mut segments = Vec::new();
    let mut start = 0;

    for idx in top_level_positions(column, '.') {
        segments.push(unquote(&column[start..idx], case_insensitive));
        start = idx + 1;
    }
    segments.push(unquote(&column[start..], case_insensitive));

    segments
}

fn unquote(segment: &str, case_insensitive: bool) -> String {
    let segment = segment.trim();
    let unquoted = match (segment.chars().next(), segment.chars().last()) {
        (Some('"'), Some('"')) | (Some('`'), Some('`')) | (Some('['), Some(']')) if segment.len() >= 2 => {
            &segment[1..segment.len() - 1]
        }
        _ => segment,
    };

    if case_insensitive {
        unquoted.to_ascii_lowercase()
    } else {
        unquoted.to_string()
    }
}

/// Byte offsets of `target` at parenthesis depth 0 and outside quoted or
/// bracketed text
fn top_level_positions(text: &str, target: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if let Some(close) = quote {
            if ch == close {
                // doubled closing delimiter is an escape
                if chars.peek().is_some_and(|&(_, next)| next == close) {
                    chars.next();
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '[' => quote = Some(']'),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == target && depth == 0 => positions.push(idx),
            _ => {}
        }
    }

    positions
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for idx in top_level_positions(text, ',') {
        parts.push(&text[start..idx]);
        start = idx + 1;
    }
    parts.push(&text[start..]);

    parts
}

/// Left-hand side of the first top-level assignment `=` in `fragment`
fn assigned_column(fragment: &str) -> Option<&str> {
    let bytes = fragment.as_bytes();

    top_level_positions(fragment, '=')
        .into_iter()
        .find(|&idx| {
            let prev = idx.checked_sub(1).map(|i| bytes[i]);
            let next = bytes.get(idx + 1).copied();
            !matches!(prev, Some(b'<' | b'>' | b'!' | b'=' | b':')) && next != Some(b'=')
        })
        .map(|idx| fragment[..idx].trim())
        .filter(|column| !column.is_empty())
}
