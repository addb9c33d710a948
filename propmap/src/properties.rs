//! Reader for flat `key=value` properties text.

use crate::errors::SourceError;
use std::fs;
use std::path::Path;

/// Parsed entries, in file order. Later duplicates win once layered into a store.
pub type Entries = Vec<(String, String)>;

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Read and parse a properties file.
pub fn read_filepath<P>(path: P) -> Result<Entries, SourceError>
where
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path.as_ref()).map_err(|source| SourceError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse properties text.
pub fn parse(input: &str) -> Result<Entries, SourceError> {
    let mut entries = Vec::new();
    let mut lines = input.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let lineno = idx + 1;
        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        entries.push((unescape(key, lineno)?, unescape(value, lineno)?));
    }

    Ok(entries)
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let value = match rest.chars().next() {
        Some('=') | Some(':') => rest[1..].trim_start_matches(is_blank),
        _ => rest,
    };
    (&line[..key_end], value)
}

fn unescape(raw: &str, line: usize) -> Result<String, SourceError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    // UTF-16 units from consecutive `\uXXXX` escapes, decoded together for surrogate pairs.
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                        return Err(SourceError::MalformedEscape { line });
                    }
                    let unit = u16::from_str_radix(&hex, 16)
                        .map_err(|_| SourceError::MalformedEscape { line })?;
                    units.push(unit);
                    continue;
                }
                escaped => {
                    flush_units(&mut units, &mut out, line)?;
                    match escaped {
                        Some('t') => out.push('\t'),
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('f') => out.push('\x0c'),
                        Some(other) => out.push(other),
                        None => {}
                    }
                }
            }
        } else {
            flush_units(&mut units, &mut out, line)?;
            out.push(c);
        }
    }
    flush_units(&mut units, &mut out, line)?;

    Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String, line: usize) -> Result<(), SourceError> {
    for decoded in std::char::decode_utf16(units.drain(..)) {
        out.push(decoded.map_err(|_| SourceError::MalformedEscape { line })?);
    }
    Ok(())
}
