//! Tree snapshots.
//!
//! A snapshot keeps the tree's shape (node kinds, token kinds and lengths),
//! its checkpoints and its diagnostics, postcard-encoded behind a small
//! header. Token text is not stored: loading needs the source the tree was
//! built from, checked by length and CRC-32.
//!
//! The header is decoded on its own first, so a snapshot written by another
//! format or grammar version is rejected before its body is looked at.

use std::sync::Arc;

use rowan::{GreenNode, GreenNodeData, GreenToken, Language, NodeOrToken, TextRange, TextSize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cst::{SyntaxKind, XshLang};
use crate::diagnostics::{DiagnosticKind, DiagnosticMessage, Diagnostics, Fix, RelatedInfo};
use crate::grammar::GRAMMAR_VERSION;
use crate::tree::{Checkpoint, ReuseStats, Tree};
use crate::{Error, Result};

pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Header {
    format: u16,
    grammar: u16,
}

impl Header {
    const CURRENT: Header = Header {
        format: SNAPSHOT_FORMAT_VERSION,
        grammar: GRAMMAR_VERSION,
    };
}

#[derive(Debug, Serialize, Deserialize)]
struct Body {
    source_len: u32,
    source_crc: u32,
    root: Element,
    checkpoints: Vec<StoredCheckpoint>,
    diagnostics: Vec<StoredDiagnostic>,
}

#[derive(Debug, Serialize, Deserialize)]
enum Element {
    Node { kind: u16, children: Vec<Element> },
    Token { kind: u16, len: u32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCheckpoint {
    offset: u32,
    state: Vec<u8>,
}

type Span = (u32, u32);

#[derive(Debug, Serialize, Deserialize)]
struct StoredDiagnostic {
    kind: DiagnosticKind,
    range: Span,
    suppression: Span,
    message: String,
    fix: Option<(String, String)>,
    related: Vec<(Span, String)>,
}

impl Tree {
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        let body = Body {
            source_len: self.source().len() as u32,
            source_crc: crc32fast::hash(self.source().as_bytes()),
            root: store_node(self.green()),
            checkpoints: self
                .checkpoints()
                .iter()
                .map(|c| StoredCheckpoint {
                    offset: c.offset.into(),
                    state: c.state.to_vec(),
                })
                .collect(),
            diagnostics: self.diagnostics().iter().map(store_diagnostic).collect(),
        };
        let bytes = postcard::to_allocvec(&Header::CURRENT).map_err(snapshot_error)?;
        postcard::to_extend(&body, bytes).map_err(snapshot_error)
    }

    /// Restores a tree saved by [`to_snapshot`](Self::to_snapshot) for the
    /// same `source`.
    pub fn from_snapshot(bytes: &[u8], source: &str) -> Result<Tree> {
        let (header, rest) = postcard::take_from_bytes::<Header>(bytes).map_err(snapshot_error)?;
        if header != Header::CURRENT {
            return Err(Error::SnapshotVersion {
                format: header.format,
                grammar: header.grammar,
            });
        }
        let body: Body = postcard::from_bytes(rest).map_err(snapshot_error)?;
        if body.source_len as usize != source.len()
            || body.source_crc != crc32fast::hash(source.as_bytes())
        {
            return Err(Error::SnapshotSourceMismatch);
        }

        let mut offset = 0;
        let green = match restore(&body.root, source, &mut offset)? {
            NodeOrToken::Node(node) if node.kind() == rowan::SyntaxKind::from(SyntaxKind::Module) => node,
            _ => return Err(malformed("root is not a module")),
        };
        if offset != source.len() {
            return Err(malformed("tree does not cover the source"));
        }

        let eof = source.len() as u32;
        let mut checkpoints = Vec::with_capacity(body.checkpoints.len());
        for stored in body.checkpoints {
            if stored.offset > eof {
                return Err(malformed("checkpoint past the end of the source"));
            }
            checkpoints.push(Checkpoint {
                offset: TextSize::from(stored.offset),
                state: stored.state.into_boxed_slice(),
            });
        }
        let mut diagnostics = Diagnostics::new();
        for stored in body.diagnostics {
            diagnostics.push(restore_diagnostic(stored, eof)?);
        }

        debug!(
            bytes = bytes.len(),
            checkpoints = checkpoints.len(),
            "tree restored from snapshot"
        );
        Ok(Tree::new(
            green,
            Arc::from(source),
            checkpoints,
            diagnostics,
            ReuseStats::default(),
        ))
    }
}

fn store_node(node: &GreenNodeData) -> Element {
    Element::Node {
        kind: node.kind().0,
        children: node
            .children()
            .map(|child| match child {
                NodeOrToken::Node(node) => store_node(node),
                NodeOrToken::Token(token) => Element::Token {
                    kind: token.kind().0,
                    len: token.text_len().into(),
                },
            })
            .collect(),
    }
}

fn restore(
    element: &Element,
    source: &str,
    offset: &mut usize,
) -> Result<NodeOrToken<GreenNode, GreenToken>> {
    match element {
        Element::Token { kind, len } => {
            let kind = checked_kind(*kind).filter(|k| k.is_token());
            let kind = kind.ok_or_else(|| malformed("unknown token kind"))?;
            let end = *offset + *len as usize;
            let text = source
                .get(*offset..end)
                .ok_or_else(|| malformed("token outside the source"))?;
            *offset = end;
            Ok(NodeOrToken::Token(GreenToken::new(kind.into(), text)))
        }
        Element::Node { kind, children } => {
            let kind = checked_kind(*kind).filter(|k| !k.is_token());
            let kind = kind.ok_or_else(|| malformed("unknown node kind"))?;
            let children = children
                .iter()
                .map(|child| restore(child, source, offset))
                .collect::<Result<Vec<_>>>()?;
            Ok(NodeOrToken::Node(GreenNode::new(kind.into(), children)))
        }
    }
}

fn checked_kind(raw: u16) -> Option<SyntaxKind> {
    (raw < SyntaxKind::__LAST as u16).then(|| XshLang::kind_from_raw(rowan::SyntaxKind(raw)))
}

fn store_diagnostic(message: &DiagnosticMessage) -> StoredDiagnostic {
    StoredDiagnostic {
        kind: message.kind,
        range: span(message.range),
        suppression: span(message.suppression_range),
        message: message.message.clone(),
        fix: message
            .fix
            .as_ref()
            .map(|fix| (fix.replacement.clone(), fix.description.clone())),
        related: message
            .related
            .iter()
            .map(|r| (span(r.range), r.message.clone()))
            .collect(),
    }
}

fn restore_diagnostic(stored: StoredDiagnostic, eof: u32) -> Result<DiagnosticMessage> {
    let range = |(start, end): Span| {
        if start <= end && end <= eof {
            Ok(TextRange::new(start.into(), end.into()))
        } else {
            Err(malformed("diagnostic range outside the source"))
        }
    };
    let mut related = Vec::with_capacity(stored.related.len());
    for (span, message) in stored.related {
        related.push(RelatedInfo::new(range(span)?, message));
    }
    let mut message = DiagnosticMessage::new(stored.kind, range(stored.range)?, stored.message);
    message.suppression_range = range(stored.suppression)?;
    message.fix = stored
        .fix
        .map(|(replacement, description)| Fix::new(replacement, description));
    message.related = related;
    Ok(message)
}

fn span(range: TextRange) -> Span {
    (range.start().into(), range.end().into())
}

fn snapshot_error(err: postcard::Error) -> Error {
    Error::Snapshot(err.to_string())
}

fn malformed(what: &str) -> Error {
    Error::Snapshot(what.to_string())
}
