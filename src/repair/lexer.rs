//! Minimal quote-aware lexer.
//!
//! Splits SQL text into code, double-quoted identifiers and single-quoted
//! literals. That is all the enhancer and validator need to tell a bare column
//! fragment from one that is already quoted. Doubled quotes inside a quoted
//! run are treated as escapes; an unterminated run extends to the end.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    Code,
    Identifier,
    Literal
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str
}

pub(crate) fn segments(sql: &str) -> Vec<Segment<'_>> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let quote = bytes[pos];
        let kind = match quote {
            b'"' => SegmentKind::Identifier,
            b'\'' => SegmentKind::Literal,
            _ => {
                pos += 1;
                continue;
            }
        };
        if pos > start {
            out.push(Segment {
                kind: SegmentKind::Code,
                text: &sql[start..pos]
            });
        }
        let open = pos;
        pos += 1;
        loop {
            match bytes.get(pos) {
                None => break,
                Some(&b) if b == quote => {
                    if bytes.get(pos + 1) == Some(&quote) {
                        pos += 2;
                    } else {
                        pos += 1;
                        break;
                    }
                }
                Some(_) => pos += 1
            }
        }
        out.push(Segment {
            kind,
            text: &sql[open..pos]
        });
        start = pos;
    }
    if start < bytes.len() {
        out.push(Segment {
            kind: SegmentKind::Code,
            text: &sql[start..]
        });
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets of `needle` in `text`, optionally only where it is not
/// adjacent to a word character
fn occurrences(text: &str, needle: &str, bounded: bool) -> Vec<usize> {
    text.match_indices(needle)
        .map(|(idx, _)| idx)
        .filter(|&idx| {
            !bounded
                || (!text[..idx].chars().next_back().is_some_and(is_word_char)
                    && !text[idx + needle.len()..]
                        .chars()
                        .next()
                        .is_some_and(is_word_char))
        })
        .collect()
}

/// Replace `needle` with `replacement` inside code segments only
pub(crate) fn replace_in_code(sql: &str, needle: &str, replacement: &str, bounded: bool) -> String {
    let mut out = String::with_capacity(sql.len());
    for segment in segments(sql) {
        if segment.kind != SegmentKind::Code {
            out.push_str(segment.text);
            continue;
        }
        let mut last = 0;
        for idx in occurrences(segment.text, needle, bounded) {
            out.push_str(&segment.text[last..idx]);
            out.push_str(replacement);
            last = idx + needle.len();
        }
        out.push_str(&segment.text[last..]);
    }
    out
}

/// Whether `needle` occurs as a bare word inside a code segment
pub(crate) fn contains_bare(sql: &str, needle: &str) -> bool {
    segments(sql)
        .iter()
        .filter(|s| s.kind == SegmentKind::Code)
        .any(|s| !occurrences(s.text, needle, true).is_empty())
}

/// Whether `keyword` occurs as a bare word inside a code segment, ignoring
/// ASCII case
pub(crate) fn contains_keyword(sql: &str, keyword: &str) -> bool {
    let keyword = keyword.to_ascii_uppercase();
    segments(sql)
        .iter()
        .filter(|s| s.kind == SegmentKind::Code)
        .any(|s| !occurrences(&s.text.to_ascii_uppercase(), &keyword, true).is_empty())
}

/// Whether anything besides whitespace and `;` follows the first `;` in code
pub(crate) fn has_trailing_statement(sql: &str) -> bool {
    let mut terminated = false;
    for segment in segments(sql) {
        if segment.kind != SegmentKind::Code {
            if terminated {
                return true;
            }
            continue;
        }
        for c in segment.text.chars() {
            if c == ';' {
                terminated = true;
            } else if terminated && !c.is_whitespace() {
                return true;
            }
        }
    }
    false
}
