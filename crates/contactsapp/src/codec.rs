//! # Tabular Codec
//!
//! Pure conversion between a contact list and the comma-separated text stored
//! on disk. Nothing here touches I/O.
//!
//! ## Format
//!
//! ```text
//! id,firstName,lastName,email,phone,avatarUrl
//! 0b9c…,Ada,Lovelace,ada@example.com,09123456789,
//! ```
//!
//! - The first non-blank line is the header. Columns may appear in any order;
//!   unknown columns are ignored and `avatarUrl` may be missing entirely.
//! - Records are separated by `\r\n` when encoding. Decoding accepts `\n`,
//!   `\r\n` and `\r`.
//! - A value is wrapped in double quotes when it contains a comma, a quote, a
//!   line break, or leading/trailing whitespace. Embedded quotes are doubled.
//!   Quoted values may span lines.
//! - Blank lines are skipped and do not count as rows.
//! - An empty avatar is written as an empty value and read back as `None`.
//!
//! ## Errors
//!
//! Corrupt content is never silently dropped. A data row with the wrong
//! number of values, an id that is not a UUID, or an unterminated quote yields
//! [`ContactsError::MalformedRecord`] carrying the zero-based row index
//! (header excluded) and the raw text of that row. A header that lacks a
//! required column or names one twice yields
//! [`ContactsError::MalformedHeader`].

use crate::error::{ContactsError, Result};
use crate::model::{Contact, ContactField};
use std::collections::HashMap;
use uuid::Uuid;

const DELIMITER: char = ',';
const QUOTE: char = '"';
const LINE_BREAK: &str = "\r\n";

/// Encode contacts as header + one line per record.
pub fn encode(records: &[Contact]) -> String {
    let mut out = ContactField::ALL
        .iter()
        .map(|f| escape(f.column_name()))
        .collect::<Vec<_>>()
        .join(",");

    for contact in records {
        out.push_str(LINE_BREAK);
        let line = ContactField::ALL
            .iter()
            .map(|f| escape(&contact.field(*f)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
    }
    out
}

/// Decode text produced by [`encode`] (or any compatible CSV writer).
pub fn decode(text: &str) -> Result<Vec<Contact>> {
    let mut rows = tokenize(text).into_iter().filter(|r| !r.is_blank());

    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = parse_header(&header)?;

    let mut contacts = Vec::new();
    for (row, record) in rows.enumerate() {
        contacts.push(parse_record(row, record, &columns)?);
    }
    Ok(contacts)
}

fn escape(value: &str) -> String {
    let needs_quotes = value.contains([DELIMITER, QUOTE, '\n', '\r'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", value.replace(QUOTE, "\"\""))
    } else {
        value.to_string()
    }
}

/// One physical record as split by the tokenizer.
#[derive(Debug)]
struct RawRecord {
    fields: Vec<String>,
    raw: String,
    /// The input ended inside a quoted value.
    unterminated: bool,
}

impl RawRecord {
    fn is_blank(&self) -> bool {
        !self.unterminated && self.raw.trim().is_empty()
    }
}

fn tokenize(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut start = 0;

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if matches!(chars.peek(), Some((_, QUOTE))) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' | '\n' => {
                let mut end = i + c.len_utf8();
                if c == '\r' {
                    if let Some((j, '\n')) = chars.peek().copied() {
                        chars.next();
                        end = j + 1;
                    }
                }
                fields.push(std::mem::take(&mut field));
                records.push(RawRecord {
                    fields: std::mem::take(&mut fields),
                    raw: text[start..i].to_string(),
                    unterminated: false,
                });
                start = end;
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes || start < text.len() || !fields.is_empty() {
        fields.push(field);
        records.push(RawRecord {
            fields,
            raw: text[start..].to_string(),
            unterminated: in_quotes,
        });
    }
    records
}

fn parse_header(header: &RawRecord) -> Result<Vec<Option<ContactField>>> {
    if header.unterminated {
        return Err(ContactsError::MalformedHeader(format!(
            "unterminated quote in {:?}",
            header.raw
        )));
    }

    let mut seen = HashMap::new();
    let mut columns = Vec::with_capacity(header.fields.len());
    for (pos, name) in header.fields.iter().enumerate() {
        let name = name.trim_start_matches('\u{feff}').trim();
        let field = ContactField::from_column_name(name);
        if let Some(field) = field {
            if seen.insert(field, pos).is_some() {
                return Err(ContactsError::MalformedHeader(format!(
                    "duplicate column `{}`",
                    field
                )));
            }
        }
        columns.push(field);
    }

    for field in ContactField::ALL {
        if !field.is_optional() && !seen.contains_key(&field) {
            return Err(ContactsError::MalformedHeader(format!(
                "missing column `{}`",
                field
            )));
        }
    }
    Ok(columns)
}

fn parse_record(row: usize, record: RawRecord, columns: &[Option<ContactField>]) -> Result<Contact> {
    let malformed = |raw: String| ContactsError::MalformedRecord { row, raw };

    if record.unterminated || record.fields.len() != columns.len() {
        return Err(malformed(record.raw));
    }

    let mut values: HashMap<ContactField, String> = HashMap::new();
    for (column, value) in columns.iter().zip(record.fields) {
        if let Some(field) = column {
            values.insert(*field, value);
        }
    }
    let mut take = |field: ContactField| values.remove(&field).unwrap_or_default();

    let Ok(id) = Uuid::parse_str(&take(ContactField::Id)) else {
        return Err(malformed(record.raw));
    };

    Ok(Contact::with_id(
        id,
        take(ContactField::FirstName),
        take(ContactField::LastName),
        take(ContactField::Email),
        take(ContactField::Phone),
        Some(take(ContactField::AvatarUrl)),
    ))
}
