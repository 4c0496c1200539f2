//! Версионированное бинарное представление дерева смещений.
//!
//! ```text
//! magic "U301IDX" | version u8 | node count u32
//! node* (pre-order): kind u8 | flags u8 | begin u64 | start-end u64 | end u64 | child count u32
//! adler32 u32 over the node records
//! ```
//! Целые числа little-endian.

use crate::{
    error::{Result, Uic301Error},
    index::tree::{IndexTree, Tag, TagKind},
};
use adler2::adler32_slice;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;

pub const MAGIC: &[u8; 7] = b"U301IDX";
pub const VERSION: u8 = 1;

const PREAMBLE_LEN: usize = MAGIC.len() + 1 + 4;
const NODE_LEN: usize = 1 + 1 + 8 + 8 + 8 + 4;
const FLAG_SELF_CLOSING: u8 = 0x01;

pub fn encode(tree: &IndexTree) -> Vec<u8> {
    let count = tree.node_count();
    let mut nodes = Vec::with_capacity(count * NODE_LEN);
    let mut stack = vec![tree.root()];
    while let Some(tag) = stack.pop() {
        write_node(&mut nodes, tag);
        stack.extend(tag.children.iter().rev());
    }

    let mut out = Vec::with_capacity(PREAMBLE_LEN + nodes.len() + 4);
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    // Vec<u8> writes cannot fail.
    let _ = out.write_u32::<LittleEndian>(count as u32);
    let checksum = adler32_slice(&nodes);
    out.extend_from_slice(&nodes);
    let _ = out.write_u32::<LittleEndian>(checksum);
    out
}

fn write_node(buf: &mut Vec<u8>, tag: &Tag) {
    let flags = if tag.self_closing { FLAG_SELF_CLOSING } else { 0 };
    buf.push(tag.kind.code());
    buf.push(flags);
    let _ = buf.write_u64::<LittleEndian>(tag.begin);
    let _ = buf.write_u64::<LittleEndian>(tag.start_end);
    let _ = buf.write_u64::<LittleEndian>(tag.end);
    let _ = buf.write_u32::<LittleEndian>(tag.children.len() as u32);
}

fn invalid(message: impl Into<String>) -> Uic301Error {
    Uic301Error::Index(message.into())
}

pub fn decode(bytes: &[u8]) -> Result<IndexTree> {
    if bytes.len() < PREAMBLE_LEN + 4 {
        return Err(invalid(format!("index file too short: {} bytes", bytes.len())));
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(invalid("bad magic"));
    }
    let version = bytes[MAGIC.len()];
    if version != VERSION {
        return Err(invalid(format!("unsupported index version {version}")));
    }
    let mut preamble = &bytes[MAGIC.len() + 1..PREAMBLE_LEN];
    let count = preamble.read_u32::<LittleEndian>()? as usize;

    let (nodes, mut trailer) = bytes[PREAMBLE_LEN..].split_at(bytes.len() - PREAMBLE_LEN - 4);
    let expected = trailer.read_u32::<LittleEndian>()?;
    let actual = adler32_slice(nodes);
    if expected != actual {
        return Err(invalid(format!(
            "checksum mismatch: expected={expected:#010x}, actual={actual:#010x}"
        )));
    }
    if nodes.len() != count * NODE_LEN {
        return Err(invalid(format!(
            "node count {count} does not match {} bytes of nodes",
            nodes.len()
        )));
    }

    let mut reader = nodes;
    let (root, children) = read_node(&mut reader)?;
    if root.kind != TagKind::Documents {
        return Err(invalid(format!("root node is <{}>", root.kind.name())));
    }

    // Pre-order rebuild with an explicit stack of (node, children still due).
    let mut stack = vec![(root, children)];
    let mut seen = 1;
    loop {
        let Some((_, due)) = stack.last() else {
            return Err(invalid("empty node stack"));
        };
        if *due == 0 {
            let Some((done, _)) = stack.pop() else {
                return Err(invalid("empty node stack"));
            };
            match stack.last_mut() {
                Some((parent, due)) => {
                    parent.children.push(done);
                    *due -= 1;
                }
                None => {
                    if seen != count || !reader.is_empty() {
                        return Err(invalid("trailing node records"));
                    }
                    return Ok(IndexTree::new(done));
                }
            }
            continue;
        }
        let (node, children) = read_node(&mut reader)
            .map_err(|_| invalid(format!("truncated after {seen} of {count} nodes")))?;
        seen += 1;
        let parent = stack.last().map(|(p, _)| p.kind);
        if !parent.is_some_and(|p| p.expects(node.kind)) {
            return Err(invalid(format!("<{}> cannot be a child here", node.kind.name())));
        }
        stack.push((node, children));
    }
}

fn read_node(reader: &mut impl Read) -> Result<(Tag, u32)> {
    let code = reader.read_u8()?;
    let kind = TagKind::from_code(code).ok_or_else(|| invalid(format!("unknown node kind {code}")))?;
    let flags = reader.read_u8()?;
    if flags & !FLAG_SELF_CLOSING != 0 {
        return Err(invalid(format!("unknown node flags {flags:#04x}")));
    }
    let mut tag = Tag::new(kind, reader.read_u64::<LittleEndian>()?);
    tag.start_end = reader.read_u64::<LittleEndian>()?;
    tag.end = reader.read_u64::<LittleEndian>()?;
    tag.self_closing = flags & FLAG_SELF_CLOSING != 0;
    let children = reader.read_u32::<LittleEndian>()?;
    if tag.start_end < tag.begin || tag.end < tag.start_end {
        return Err(invalid(format!("node at {} has inverted offsets", tag.begin)));
    }
    Ok((tag, children))
}
