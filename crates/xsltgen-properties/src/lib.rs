//! Parser for Java `.properties` files, as used by resource bundles.
//!
//! Follows the `java.util.Properties` line format: `#`/`!` comments, `=`, `:`
//! or whitespace separators, backslash line continuations and `\uXXXX`
//! escapes. Decoding bytes to text is the caller's job.

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    pub entries: Vec<PropertyEntry>,
}

impl PropertiesFile {
    #[must_use]
    pub fn by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a PropertyEntry> + 'a {
        self.entries.iter().filter(move |e| e.key == key)
    }

    /// Effective value of `key`: the last definition wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Effective key/value pairs (later definitions override earlier ones).
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }
}

/// Parse a `.properties` file into key/value entries, in file order.
#[must_use]
pub fn parse(text: &str) -> PropertiesFile {
    let chars: Vec<char> = text.chars().collect();
    let mut offset = 0usize;
    let mut entries = Vec::new();

    while offset < chars.len() {
        let line_start = offset;
        let logical = read_logical_line(&chars, &mut offset);
        if let Some(entry) = parse_logical_line(&logical) {
            entries.push(entry);
        }

        // Ensure we always make progress even on pathological inputs.
        if offset == line_start {
            offset += 1;
        }
    }

    PropertiesFile { entries }
}

fn is_line_end(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C')
}

/// Reads one logical line starting at `offset`, joining continuation lines.
fn read_logical_line(chars: &[char], offset: &mut usize) -> Vec<char> {
    let mut out = Vec::new();
    let mut continuation = false;

    loop {
        if continuation {
            while *offset < chars.len() && is_whitespace(chars[*offset]) {
                *offset += 1;
            }
        }

        let segment_start = *offset;
        let mut line_end = segment_start;
        while line_end < chars.len() && !is_line_end(chars[line_end]) {
            line_end += 1;
        }
        let segment = &chars[segment_start..line_end];

        // Consume `\n`, `\r` or `\r\n`.
        *offset = line_end;
        if *offset < chars.len() && chars[*offset] == '\r' {
            *offset += 1;
        }
        if *offset < chars.len() && chars[*offset] == '\n' && (*offset == line_end || chars[line_end] == '\r') {
            *offset += 1;
        }

        // Comment lines never continue, even with a trailing backslash.
        let is_comment = !continuation
            && segment
                .iter()
                .find(|c| !is_whitespace(**c))
                .is_some_and(|c| *c == '#' || *c == '!');
        if is_comment {
            return Vec::new();
        }

        let continues = ends_with_unescaped_backslash(segment);
        let copy_end = if continues {
            segment.len() - 1
        } else {
            segment.len()
        };
        out.extend_from_slice(&segment[..copy_end]);

        if !continues || *offset >= chars.len() {
            return out;
        }
        continuation = true;
    }
}

fn ends_with_unescaped_backslash(line: &[char]) -> bool {
    line.iter().rev().take_while(|c| **c == '\\').count() % 2 == 1
}

fn parse_logical_line(line: &[char]) -> Option<PropertyEntry> {
    let mut i = 0usize;
    while i < line.len() && is_whitespace(line[i]) {
        i += 1;
    }
    if i >= line.len() {
        return None;
    }

    let key_start = i;
    while i < line.len() {
        match line[i] {
            '\\' => i += 2,
            '=' | ':' => break,
            c if is_whitespace(c) => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(line.len());

    // Skip whitespace between key and separator.
    while i < line.len() && is_whitespace(line[i]) {
        i += 1;
    }

    // Optional `:` / `=`.
    if i < line.len() && (line[i] == '=' || line[i] == ':') {
        i += 1;
    }

    // Skip whitespace after separator.
    while i < line.len() && is_whitespace(line[i]) {
        i += 1;
    }
    let value_start = i.min(line.len());

    Some(PropertyEntry {
        key: unescape(&line[key_start..key_end]),
        value: unescape(&line[value_start..]),
    })
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        i += 1;
        let Some(&escaped) = chars.get(i) else {
            break;
        };
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0C'),
            'u' => {
                let hex: String = chars.iter().skip(i + 1).take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == 4 => {
                        out.push(ch);
                        i += 4;
                    }
                    _ => out.push('u'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }

    out
}
