//! The fixed line-oriented document rendering.
//!
//! Format, one entry per header line:
//!
//! ```text
//! profile: Admin
//! [objectPermissions] Account
//!   allowCreate = false
//!   allowRead = true
//! [fieldPermissions] Account.Name
//!   readable = true
//! ```
//!
//! Consecutive entries with the same tag belong to one block; a tag change
//! starts a new block, so block order and entry order survive a round trip.
//! Fields render sorted by name, which keeps the output deterministic for
//! line diffing.

use permsync_types::{Block, BlockKind, Document, Entry, EntryKey, FieldValue};

use crate::error::{ParseError, ParseResult};
use crate::traits::DocumentCodec;

const HEADER_PREFIX: &str = "profile: ";

/// The built-in plain-text codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextCodec;

impl PlainTextCodec {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentCodec for PlainTextCodec {
    fn parse(&self, raw: &str) -> ParseResult<Document> {
        let mut lines = raw.lines().enumerate();

        let name = loop {
            match lines.next() {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) => match line.strip_prefix(HEADER_PREFIX) {
                    Some(name) if !name.trim().is_empty() => break name.trim().to_string(),
                    _ => return Err(ParseError::MissingHeader),
                },
                None => return Err(ParseError::MissingHeader),
            }
        };

        let mut doc = Document::new(name);
        let mut current_block: Option<Block> = None;

        for (idx, line) in lines {
            let number = idx + 1;
            let trimmed = line.trim_end();
            if trimmed.trim().is_empty() {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                // Entry header: "[tag] key"
                let Some((tag, key)) = rest.split_once(']') else {
                    return Err(ParseError::MalformedLine {
                        line: number,
                        content: trimmed.to_string(),
                    });
                };
                let kind = BlockKind::from_tag(tag).ok_or_else(|| ParseError::UnknownBlockTag {
                    line: number,
                    tag: tag.to_string(),
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(ParseError::MalformedLine {
                        line: number,
                        content: trimmed.to_string(),
                    });
                }

                let starts_new_block = match &current_block {
                    Some(block) => block.kind != kind,
                    None => true,
                };
                if starts_new_block {
                    if let Some(done) = current_block.take() {
                        doc.blocks.push(done);
                    }
                    current_block = Some(Block::new(kind));
                }
                current_block
                    .as_mut()
                    .expect("block initialized above")
                    .entries
                    .push(Entry::new(EntryKey::parse(key)));
            } else if line.starts_with(' ') || line.starts_with('\t') {
                // Field line: "  name = value"
                let Some((field, value)) = trimmed.split_once('=') else {
                    return Err(ParseError::MalformedLine {
                        line: number,
                        content: trimmed.to_string(),
                    });
                };
                let field = field.trim();
                if field.is_empty() {
                    return Err(ParseError::MalformedLine {
                        line: number,
                        content: trimmed.to_string(),
                    });
                }
                let entry = current_block
                    .as_mut()
                    .and_then(|b| b.entries.last_mut())
                    .ok_or(ParseError::OrphanField { line: number })?;
                entry
                    .fields
                    .insert(field.to_string(), FieldValue::parse(value.trim()));
            } else {
                return Err(ParseError::MalformedLine {
                    line: number,
                    content: trimmed.to_string(),
                });
            }
        }

        if let Some(done) = current_block.take() {
            doc.blocks.push(done);
        }
        Ok(doc)
    }

    fn render(&self, document: &Document) -> String {
        let mut out = String::new();
        out.push_str(HEADER_PREFIX);
        out.push_str(&document.name);
        out.push('\n');

        for block in &document.blocks {
            for entry in &block.entries {
                out.push('[');
                out.push_str(block.kind.tag());
                out.push_str("] ");
                out.push_str(&entry.key.to_string());
                out.push('\n');
                for (field, value) in &entry.fields {
                    out.push_str("  ");
                    out.push_str(field);
                    out.push_str(" = ");
                    out.push_str(&value.to_string());
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new("Admin")
            .with_block(
                Block::new(BlockKind::ObjectPermissions)
                    .with_entry(
                        Entry::new("Account")
                            .with_field("allowCreate", false)
                            .with_field("allowRead", true),
                    )
                    .with_entry(Entry::new("Contact").with_field("allowRead", true)),
            )
            .with_block(
                Block::new(BlockKind::FieldPermissions)
                    .with_entry(Entry::new("Account.Name").with_field("readable", true)),
            )
            .with_block(
                Block::new(BlockKind::LayoutAssignments).with_entry(
                    Entry::new("Account").with_field("layout", "Account Layout"),
                ),
            )
    }

    #[test]
    fn render_parse_round_trip() {
        let codec = PlainTextCodec::new();
        let doc = sample();
        let rendered = codec.render(&doc);
        let reparsed = codec.parse(&rendered).unwrap();
        assert_eq!(reparsed, doc);
        // Rendering must be a fixpoint.
        assert_eq!(codec.render(&reparsed), rendered);
    }

    #[test]
    fn empty_document_renders_header_only() {
        let codec = PlainTextCodec::new();
        let rendered = codec.render(&Document::new("Empty"));
        assert_eq!(rendered, "profile: Empty\n");
        let doc = codec.parse(&rendered).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.name, "Empty");
    }

    #[test]
    fn consecutive_same_tag_entries_share_a_block() {
        let codec = PlainTextCodec::new();
        let doc = codec
            .parse("profile: P\n[classAccesses] A\n[classAccesses] B\n")
            .unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].entries.len(), 2);
    }

    #[test]
    fn tag_change_starts_new_block() {
        let codec = PlainTextCodec::new();
        let doc = codec
            .parse("profile: P\n[classAccesses] A\n[pageAccesses] B\n[classAccesses] C\n")
            .unwrap();
        assert_eq!(doc.blocks.len(), 3);
    }

    #[test]
    fn missing_header_rejected() {
        let codec = PlainTextCodec::new();
        assert_eq!(codec.parse("").unwrap_err(), ParseError::MissingHeader);
        assert_eq!(
            codec.parse("[classAccesses] A\n").unwrap_err(),
            ParseError::MissingHeader
        );
    }

    #[test]
    fn unknown_tag_rejected() {
        let codec = PlainTextCodec::new();
        let err = codec.parse("profile: P\n[noSuch] A\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownBlockTag { line: 2, .. }));
    }

    #[test]
    fn orphan_field_rejected() {
        let codec = PlainTextCodec::new();
        let err = codec.parse("profile: P\n  enabled = true\n").unwrap_err();
        assert_eq!(err, ParseError::OrphanField { line: 2 });
    }

    #[test]
    fn malformed_lines_rejected() {
        let codec = PlainTextCodec::new();
        assert!(matches!(
            codec.parse("profile: P\nstray text\n").unwrap_err(),
            ParseError::MalformedLine { line: 2, .. }
        ));
        assert!(matches!(
            codec.parse("profile: P\n[classAccesses] A\n  no equals here\n")
                .unwrap_err(),
            ParseError::MalformedLine { line: 3, .. }
        ));
    }

    #[test]
    fn duplicate_keys_survive_parsing() {
        // Duplicates are a validation concern, not a parse-time invariant.
        let codec = PlainTextCodec::new();
        let doc = codec
            .parse("profile: P\n[classAccesses] A\n[classAccesses] A\n")
            .unwrap();
        assert_eq!(doc.blocks[0].duplicate_keys().len(), 1);
    }
}
