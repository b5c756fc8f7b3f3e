//! Binary serialization of syntax trees.
//!
//! Layout: every optional node is preceded by an existence byte. A node starts
//! with its [`SerializedTypeId`]:
//!
//! - token: kind (`u16`), text, missing flag (V2 only), leading and trailing
//!   trivia as optional nodes
//! - trivia: kind, text
//! - structured trivia: kind, then its structure
//! - list: separated flag, a [`ListShape`] byte, the count for `Many` (`u8`)
//!   and `Lots` (`u32`), then the children
//! - composite: slot count (`u8`), then each slot as an optional node
//!
//! Strings are a LEB128 length followed by UTF-8 bytes. Integers are
//! little-endian.

use std::fmt;
use std::io::{self, Read, Write};

use tracing::debug;

use crate::{ListShape, NodeId, SyntaxKind, SyntaxTree};

/// Serialization layout version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FormatVersion {
    /// Token missingness is not stored; an empty token other than end of
    /// file reads back as missing.
    V1,
    /// Tokens carry an explicit missing flag.
    #[default]
    V2,
}

impl FormatVersion {
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
        }
    }
}

/// The leading byte of every serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializedTypeId {
    Token,
    Trivia,
    StructuredTrivia,
    List,
    Composite(SyntaxKind),
}

const FIRST_COMPOSITE_ID: u8 = 4;

impl SerializedTypeId {
    pub fn to_byte(self) -> u8 {
        match self {
            SerializedTypeId::Token => 0,
            SerializedTypeId::Trivia => 1,
            SerializedTypeId::StructuredTrivia => 2,
            SerializedTypeId::List => 3,
            SerializedTypeId::Composite(kind) => {
                FIRST_COMPOSITE_ID + (kind.to_raw() - SyntaxKind::DOCUMENT.to_raw()) as u8
            }
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => SerializedTypeId::Token,
            1 => SerializedTypeId::Trivia,
            2 => SerializedTypeId::StructuredTrivia,
            3 => SerializedTypeId::List,
            _ => {
                let raw = SyntaxKind::DOCUMENT.to_raw() + u16::from(byte - FIRST_COMPOSITE_ID);
                let kind = SyntaxKind::from_raw(raw)?;
                SerializedTypeId::Composite(kind)
            }
        })
    }

    fn of(tree: &SyntaxTree, node: NodeId) -> Self {
        let kind = tree.kind(node);
        if tree.is_token(node) {
            SerializedTypeId::Token
        } else if tree.structure(node).is_some() {
            SerializedTypeId::StructuredTrivia
        } else if tree.is_trivia(node) {
            SerializedTypeId::Trivia
        } else if tree.is_list(node) {
            SerializedTypeId::List
        } else {
            SerializedTypeId::Composite(kind)
        }
    }
}

/// Error reading or writing a serialized tree.
#[derive(Debug)]
pub enum SerializeError {
    Io(io::Error),
    InvalidTypeId(u8),
    InvalidKind(u16),
    /// A valid kind in a position that does not allow it.
    UnexpectedKind {
        kind: SyntaxKind,
        expected: &'static str,
    },
    InvalidFlag(u8),
    InvalidListShape(u8),
    SlotCount {
        kind: SyntaxKind,
        expected: usize,
        found: usize,
    },
    InvalidUtf8,
    LengthOverflow,
    /// Input left over after the root node.
    TrailingBytes(usize),
    /// Nodes nested deeper than [`MAX_DEPTH`].
    TooDeep,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Io(e) => write!(f, "I/O error: {e}"),
            SerializeError::InvalidTypeId(id) => write!(f, "invalid node type id {id}"),
            SerializeError::InvalidKind(raw) => write!(f, "invalid syntax kind {raw}"),
            SerializeError::UnexpectedKind { kind, expected } => {
                write!(f, "expected {expected}, found {kind:?}")
            }
            SerializeError::InvalidFlag(byte) => write!(f, "invalid flag byte {byte}"),
            SerializeError::InvalidListShape(byte) => write!(f, "invalid list shape {byte}"),
            SerializeError::SlotCount {
                kind,
                expected,
                found,
            } => write!(f, "{kind:?} has {expected} slots, found {found}"),
            SerializeError::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            SerializeError::LengthOverflow => write!(f, "length does not fit in memory"),
            SerializeError::TrailingBytes(count) => {
                write!(f, "{count} trailing bytes after the root node")
            }
            SerializeError::TooDeep => {
                write!(f, "nodes nested deeper than {MAX_DEPTH} levels")
            }
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SerializeError {
    fn from(e: io::Error) -> Self {
        SerializeError::Io(e)
    }
}

/// Serialize `node` (or its absence) into a new buffer.
pub fn serialize(
    tree: &SyntaxTree,
    node: Option<NodeId>,
    version: FormatVersion,
) -> Result<Vec<u8>, SerializeError> {
    let mut out = Vec::new();
    write_node(&mut out, tree, node, version)?;
    debug!(bytes = out.len(), ?version, "serialized tree");
    Ok(out)
}

/// Deserialize a buffer produced by [`serialize`] into a fresh arena.
pub fn deserialize(
    bytes: &[u8],
    version: FormatVersion,
) -> Result<(SyntaxTree, Option<NodeId>), SerializeError> {
    let mut tree = SyntaxTree::new();
    let mut reader = bytes;
    let root = read_node(&mut reader, &mut tree, version)?;
    if !reader.is_empty() {
        return Err(SerializeError::TrailingBytes(reader.len()));
    }
    debug!(nodes = tree.len(), ?version, "deserialized tree");
    Ok((tree, root))
}

// ========== WRITING ==========

/// Write an optional node: an existence byte, then the node.
pub fn write_node<W: Write>(
    writer: &mut W,
    tree: &SyntaxTree,
    node: Option<NodeId>,
    version: FormatVersion,
) -> Result<(), SerializeError> {
    match node {
        None => write_u8(writer, 0),
        Some(node) => {
            write_u8(writer, 1)?;
            write_present(writer, tree, node, version)
        }
    }
}

fn write_present<W: Write>(
    writer: &mut W,
    tree: &SyntaxTree,
    node: NodeId,
    version: FormatVersion,
) -> Result<(), SerializeError> {
    let type_id = SerializedTypeId::of(tree, node);
    write_u8(writer, type_id.to_byte())?;
    match type_id {
        SerializedTypeId::Token => {
            write_u16(writer, tree.kind(node).to_raw())?;
            write_string(writer, tree.text(node))?;
            if version >= FormatVersion::V2 {
                write_u8(writer, u8::from(tree.is_missing(node)))?;
            }
            write_node(writer, tree, tree.leading_slot(node), version)?;
            write_node(writer, tree, tree.trailing_slot(node), version)
        }
        SerializedTypeId::Trivia => {
            write_u16(writer, tree.kind(node).to_raw())?;
            write_string(writer, tree.text(node))
        }
        SerializedTypeId::StructuredTrivia => {
            write_u16(writer, tree.kind(node).to_raw())?;
            match tree.structure(node) {
                Some(structure) => write_present(writer, tree, structure, version),
                None => Ok(()),
            }
        }
        SerializedTypeId::List => {
            let children = tree.list_children(node);
            write_u8(writer, u8::from(tree.is_separated_list(node)))?;
            let shape = ListShape::for_count(children.len());
            write_u8(writer, shape_byte(shape))?;
            match shape {
                ListShape::Many => write_u8(writer, children.len() as u8)?,
                ListShape::Lots => write_u32(writer, children.len() as u32)?,
                ListShape::Empty | ListShape::Single | ListShape::Two => {}
            }
            for &child in children {
                write_present(writer, tree, child, version)?;
            }
            Ok(())
        }
        SerializedTypeId::Composite(_) => {
            let count = tree.slot_count(node);
            write_u8(writer, count as u8)?;
            for index in 0..count {
                let slot = tree.slot(node, index).ok().flatten();
                write_node(writer, tree, slot, version)?;
            }
            Ok(())
        }
    }
}

fn shape_byte(shape: ListShape) -> u8 {
    match shape {
        ListShape::Empty => 0,
        ListShape::Single => 1,
        ListShape::Two => 2,
        ListShape::Many => 3,
        ListShape::Lots => 4,
    }
}

fn write_u8<W: Write>(writer: &mut W, value: u8) -> Result<(), SerializeError> {
    writer.write_all(&[value])?;
    Ok(())
}

fn write_u16<W: Write>(writer: &mut W, value: u16) -> Result<(), SerializeError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<(), SerializeError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_string<W: Write>(writer: &mut W, text: &str) -> Result<(), SerializeError> {
    let mut len = text.len() as u64;
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            write_u8(writer, byte)?;
            break;
        }
        write_u8(writer, byte | 0x80)?;
    }
    writer.write_all(text.as_bytes())?;
    Ok(())
}

// ========== READING ==========

/// Deepest node nesting accepted by [`read_node`].
pub const MAX_DEPTH: usize = 256;

/// Read an optional node written by [`write_node`] into `tree`.
pub fn read_node<R: Read>(
    reader: &mut R,
    tree: &mut SyntaxTree,
    version: FormatVersion,
) -> Result<Option<NodeId>, SerializeError> {
    read_optional(reader, tree, version, 0)
}

fn read_optional<R: Read>(
    reader: &mut R,
    tree: &mut SyntaxTree,
    version: FormatVersion,
    depth: usize,
) -> Result<Option<NodeId>, SerializeError> {
    if read_flag(reader)? {
        read_present(reader, tree, version, depth).map(Some)
    } else {
        Ok(None)
    }
}

fn read_present<R: Read>(
    reader: &mut R,
    tree: &mut SyntaxTree,
    version: FormatVersion,
    depth: usize,
) -> Result<NodeId, SerializeError> {
    if depth >= MAX_DEPTH {
        return Err(SerializeError::TooDeep);
    }
    let depth = depth + 1;
    let byte = read_u8(reader)?;
    let type_id = SerializedTypeId::from_byte(byte).ok_or(SerializeError::InvalidTypeId(byte))?;
    match type_id {
        SerializedTypeId::Token => {
            let kind = read_kind(reader)?;
            expect_kind(kind, kind.is_token(), "a token kind")?;
            let text = read_string(reader)?;
            let missing = match version {
                FormatVersion::V1 => text.is_empty() && kind != SyntaxKind::END_OF_FILE_TOKEN,
                FormatVersion::V2 => read_flag(reader)?,
            };
            let leading = read_optional(reader, tree, version, depth)?;
            let trailing = read_optional(reader, tree, version, depth)?;
            Ok(tree.token_with_slots(kind, text, leading, trailing, missing))
        }
        SerializedTypeId::Trivia => {
            let kind = read_kind(reader)?;
            expect_kind(
                kind,
                kind.is_trivia() && !kind.is_structured_trivia(),
                "a trivia kind",
            )?;
            let text = read_string(reader)?;
            Ok(tree.trivia(kind, text))
        }
        SerializedTypeId::StructuredTrivia => {
            let kind = read_kind(reader)?;
            expect_kind(kind, kind.is_structured_trivia(), "a structured trivia kind")?;
            let structure = read_present(reader, tree, version, depth)?;
            Ok(tree.structured_trivia(kind, structure))
        }
        SerializedTypeId::List => {
            let separated = read_flag(reader)?;
            let shape = read_u8(reader)?;
            let count = match shape {
                1 => 1,
                2 => 2,
                3 => usize::from(read_u8(reader)?),
                4 => read_u32(reader)? as usize,
                _ => return Err(SerializeError::InvalidListShape(shape)),
            };
            let mut children = Vec::new();
            for _ in 0..count {
                children.push(read_present(reader, tree, version, depth)?);
            }
            if children.is_empty() {
                return Err(SerializeError::InvalidListShape(shape));
            }
            Ok(tree.alloc_list(children, separated))
        }
        SerializedTypeId::Composite(kind) => {
            let expected = kind.slots().len();
            let found = usize::from(read_u8(reader)?);
            if found != expected {
                return Err(SerializeError::SlotCount {
                    kind,
                    expected,
                    found,
                });
            }
            let mut slots = Vec::with_capacity(expected);
            for _ in 0..expected {
                slots.push(read_optional(reader, tree, version, depth)?);
            }
            Ok(tree.node(kind, slots))
        }
    }
}

fn expect_kind(kind: SyntaxKind, ok: bool, expected: &'static str) -> Result<(), SerializeError> {
    if ok {
        Ok(())
    } else {
        Err(SerializeError::UnexpectedKind { kind, expected })
    }
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, SerializeError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_flag<R: Read>(reader: &mut R) -> Result<bool, SerializeError> {
    match read_u8(reader)? {
        0 => Ok(false),
        1 => Ok(true),
        byte => Err(SerializeError::InvalidFlag(byte)),
    }
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, SerializeError> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, SerializeError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_kind<R: Read>(reader: &mut R) -> Result<SyntaxKind, SerializeError> {
    let raw = read_u16(reader)?;
    SyntaxKind::from_raw(raw).ok_or(SerializeError::InvalidKind(raw))
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, SerializeError> {
    let mut len: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = read_u8(reader)?;
        if shift >= 64 {
            return Err(SerializeError::LengthOverflow);
        }
        len |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    let len = usize::try_from(len).map_err(|_| SerializeError::LengthOverflow)?;

    let mut bytes = Vec::new();
    reader.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    String::from_utf8(bytes).map_err(|_| SerializeError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SOURCE: &str = "\
// header
$culture { en-US }
Button > #Label.big:hover, .x |Foo.Bar[0] as Thing {
    Width: 100 !important;
    transition (Opacity, Normal): 0:0:1 linear 0 1;
    trigger event Click (handled, set-handled) { play-sfx {click} }
    trigger property IsEnabled = {false} { set Opacity (#x) {0.5} }
}
@Fade loop {
    target Button (#y) {
        animation Opacity { keyframe 0 {0} keyframe 1000 ease-in {1} }
    }
}
~ broken { a: ; b
";

    fn dump(tree: &SyntaxTree, node: NodeId) -> String {
        format!("{:#?}", tree.syntax(node))
    }

    fn roundtrip(source: &str, version: FormatVersion) {
        let parse = parse(source);
        let bytes = serialize(parse.tree(), Some(parse.root_id()), version).unwrap();
        let (tree, root) = deserialize(&bytes, version).unwrap();
        let root = root.unwrap();
        assert_eq!(tree.to_full_string(root), source);
        assert_eq!(dump(&tree, root), dump(parse.tree(), parse.root_id()));
    }

    #[test]
    fn roundtrip_v1() {
        roundtrip(SOURCE, FormatVersion::V1);
    }

    #[test]
    fn roundtrip_v2() {
        roundtrip(SOURCE, FormatVersion::V2);
    }

    #[test]
    fn missing_tokens_survive_both_versions() {
        for version in [FormatVersion::V1, FormatVersion::V2] {
            let parse = parse("#foo { ");
            let bytes = serialize(parse.tree(), Some(parse.root_id()), version).unwrap();
            let (tree, root) = deserialize(&bytes, version).unwrap();
            let root = tree.syntax(root.unwrap());
            let missing: Vec<_> = root
                .tokens()
                .filter(|token| token.is_missing())
                .map(|token| token.kind())
                .collect();
            assert_eq!(missing, [SyntaxKind::CLOSE_CURLY_BRACE_TOKEN], "{version:?}");
            let eof = root.last_token().unwrap();
            assert!(!eof.is_missing());
        }
    }

    #[test]
    fn v2_stores_a_flag_per_token() {
        let parse = parse("a { }");
        let v1 = serialize(parse.tree(), Some(parse.root_id()), FormatVersion::V1).unwrap();
        let v2 = serialize(parse.tree(), Some(parse.root_id()), FormatVersion::V2).unwrap();
        let tokens = parse.root().tokens().count();
        assert_eq!(v2.len() - v1.len(), tokens);
    }

    #[test]
    fn long_lists_use_lots_shape() {
        let source: String = (0..12).map(|i| format!("a{i} {{ }}\n")).collect();
        roundtrip(&source, FormatVersion::V2);
    }

    #[test]
    fn absent_root() {
        let tree = SyntaxTree::new();
        let bytes = serialize(&tree, None, FormatVersion::V2).unwrap();
        assert_eq!(bytes, [0]);
        let (tree, root) = deserialize(&bytes, FormatVersion::V2).unwrap();
        assert!(root.is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        let parse = parse("a { b: c; }");
        let bytes = serialize(parse.tree(), Some(parse.root_id()), FormatVersion::V2).unwrap();

        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(
            deserialize(truncated, FormatVersion::V2),
            Err(SerializeError::Io(_))
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(
            deserialize(&trailing, FormatVersion::V2),
            Err(SerializeError::TrailingBytes(1))
        ));

        assert!(matches!(
            deserialize(&[1, 200], FormatVersion::V2),
            Err(SerializeError::InvalidTypeId(200))
        ));
        assert!(matches!(
            deserialize(&[2], FormatVersion::V2),
            Err(SerializeError::InvalidFlag(2))
        ));

        // A trivia node claiming a token kind.
        let kind = SyntaxKind::IDENTIFIER_TOKEN.to_raw().to_le_bytes();
        assert!(matches!(
            deserialize(&[1, 1, kind[0], kind[1], 0], FormatVersion::V2),
            Err(SerializeError::UnexpectedKind { .. })
        ));

        // A composite with the wrong slot count.
        let document = SerializedTypeId::Composite(SyntaxKind::DOCUMENT).to_byte();
        assert!(matches!(
            deserialize(&[1, document, 3], FormatVersion::V2),
            Err(SerializeError::SlotCount { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn write_errors_propagate() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::StorageFull, "full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let parse = parse("a { b: c; }");
        let result = write_node(&mut Full, parse.tree(), Some(parse.root_id()), FormatVersion::V2);
        assert!(matches!(result, Err(SerializeError::Io(_))));
    }

    #[test]
    fn rejects_deep_nesting() {
        let kind = SyntaxKind::SKIPPED_TOKENS_TRIVIA.to_raw().to_le_bytes();
        let structured = SerializedTypeId::StructuredTrivia.to_byte();
        let mut bytes = vec![1];
        for _ in 0..200_000 {
            bytes.extend_from_slice(&[structured, kind[0], kind[1]]);
        }
        assert!(matches!(
            deserialize(&bytes, FormatVersion::V2),
            Err(SerializeError::TooDeep)
        ));

        let list = SerializedTypeId::List.to_byte();
        let mut bytes = vec![1];
        for _ in 0..MAX_DEPTH {
            bytes.extend_from_slice(&[list, 0, 1]);
        }
        assert!(matches!(
            deserialize(&bytes, FormatVersion::V1),
            Err(SerializeError::TooDeep)
        ));
    }

    #[test]
    fn type_ids_roundtrip() {
        for &kind in SyntaxKind::ALL.iter().filter(|k| k.is_composite()) {
            let id = SerializedTypeId::Composite(kind);
            assert_eq!(SerializedTypeId::from_byte(id.to_byte()), Some(id));
        }
        assert_eq!(SerializedTypeId::from_byte(255), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const FRAGMENTS: &[&str] = &[
            "a", "#b", ".c", " ", "\n", "\t", "{", "}", ":", ";", ",", ">", ">>", "|", "as",
            "/* x */", "// y\n", "trigger", "property", "=", "@", "$d", "~", "1", "!important",
        ];

        fn source_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec(prop::sample::select(FRAGMENTS), 0..50)
                .prop_map(|parts| parts.concat())
        }

        proptest! {
            #[test]
            fn serialization_roundtrip(source in source_strategy()) {
                let parse = parse(&source);
                for version in [FormatVersion::V1, FormatVersion::V2] {
                    let bytes = serialize(parse.tree(), Some(parse.root_id()), version).unwrap();
                    let (tree, root) = deserialize(&bytes, version).unwrap();
                    let root = root.unwrap();
                    prop_assert_eq!(tree.to_full_string(root), source.clone());
                    prop_assert_eq!(dump(&tree, root), dump(parse.tree(), parse.root_id()));
                }
            }
        }
    }
}
