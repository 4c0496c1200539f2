//! Произвольный доступ к сериализованному дереву через индекс смещений.
//!
//! Файл `<source>.index` принимается, если он корректно декодируется. Размер и время
//! изменения исходника НЕ сверяются: после изменения исходника удалите индекс или
//! откройте с `force_rebuild`.

use crate::{
    error::{Result, Uic301Error},
    formats::xml::{DocumentAttributes, Fragment, Xml},
    index::{
        builder::IndexBuilder,
        codec,
        scanner::TagScanner,
        tree::{IndexTree, Tag, TagKind},
    },
    model::{Detail, Document, Header, Total},
    validate::CrossChecks,
};
use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Owns one read handle on the source. Reads are positional, so a shared
/// `&IndexStore` serves any number of readers.
#[derive(Debug)]
pub struct IndexStore {
    source: PathBuf,
    file: File,
    tree: IndexTree,
    rebuilt: bool,
}

impl IndexStore {
    pub fn index_path(source: impl AsRef<Path>) -> PathBuf {
        let mut name = source.as_ref().as_os_str().to_owned();
        name.push(".index");
        PathBuf::from(name)
    }

    pub fn open(source: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(source, false)
    }

    /// Loads the side file, or rebuilds it when it is missing, undecodable or
    /// `force_rebuild` is set. Only a failed rebuild is an error.
    pub fn open_with(source: impl AsRef<Path>, force_rebuild: bool) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let file = File::open(&source).map_err(Uic301Error::file("open", &source))?;
        let index_path = Self::index_path(&source);

        let loaded = if force_rebuild {
            None
        } else {
            match load(&index_path) {
                Ok(tree) => Some(tree),
                Err(e) => {
                    warn!("index {} unusable, rebuilding: {e}", index_path.display());
                    None
                }
            }
        };

        let (tree, rebuilt) = match loaded {
            Some(tree) => {
                debug!(nodes = tree.node_count(), "index loaded from {}", index_path.display());
                (tree, false)
            }
            None => {
                let tree = Self::build(&source)?;
                save(&index_path, &tree)?;
                (tree, true)
            }
        };
        Ok(Self { source, file, tree, rebuilt })
    }

    /// Scans `source` into an offset tree without touching the side file.
    pub fn build(source: impl AsRef<Path>) -> Result<IndexTree> {
        let source = source.as_ref();
        info!("Indexing {}", source.display());
        let file = File::open(source).map_err(Uic301Error::file("open", source))?;
        let mut builder = IndexBuilder::new();
        let tree = TagScanner::new(BufReader::new(file))
            .run(&mut builder)?
            .ok_or_else(|| Uic301Error::Index(format!("{}: no <documents> root", source.display())))?;
        info!(
            documents = tree.document_count(),
            nodes = tree.node_count(),
            "index built"
        );
        Ok(tree)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn tree(&self) -> &IndexTree {
        &self.tree
    }

    /// The tree was scanned by this `open` rather than loaded.
    pub fn was_rebuilt(&self) -> bool {
        self.rebuilt
    }

    pub fn document(&self, idx: usize) -> Result<&Tag> {
        self.tree
            .document(idx)
            .ok_or_else(|| Uic301Error::Index(format!("no document #{idx}")))
    }

    /// Bytes of the start tag alone.
    pub fn read_start_tag(&self, tag: &Tag) -> Result<Vec<u8>> {
        self.read_range(tag.start_tag_range())
    }

    /// Bytes from the start tag through the matching end tag.
    pub fn read_element(&self, tag: &Tag) -> Result<Vec<u8>> {
        self.read_range(tag.range())
    }

    fn read_range(&self, range: std::ops::Range<u64>) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; (range.end - range.start) as usize];
        read_at(&self.file, &mut buf, range.start).map_err(Uic301Error::file("read", &self.source))?;
        Ok(buf)
    }

    /// Attributes of document `idx` from its start tag only.
    pub fn document_attributes(&self, idx: usize) -> Result<DocumentAttributes> {
        let tag = self.document(idx)?;
        Xml::read_document_attributes(&self.read_start_tag(tag)?)
    }

    pub fn load_document(&self, idx: usize) -> Result<Document> {
        self.load_document_with(idx, &CrossChecks::default())
    }

    /// Materializes document `idx` and seals it with `checks`.
    pub fn load_document_with(&self, idx: usize, checks: &CrossChecks) -> Result<Document> {
        let tag = self.document(idx)?;
        self.fragment(tag, checks)?
            .documents
            .pop()
            .ok_or_else(|| missing(TagKind::Document, idx))
    }

    pub fn load_header(&self, document: usize) -> Result<Header> {
        let tag = self
            .document(document)?
            .header()
            .ok_or_else(|| missing(TagKind::Header, document))?;
        self.fragment(tag, &CrossChecks::default())?
            .headers
            .pop()
            .ok_or_else(|| missing(TagKind::Header, document))
    }

    pub fn load_detail(&self, document: usize, idx: usize) -> Result<Detail> {
        let tag = self
            .document(document)?
            .detail(idx)
            .ok_or_else(|| missing(TagKind::Details, idx))?;
        self.fragment(tag, &CrossChecks::default())?
            .details
            .pop()
            .ok_or_else(|| missing(TagKind::Details, idx))
    }

    pub fn load_total(&self, document: usize, idx: usize) -> Result<Total> {
        let tag = self
            .document(document)?
            .total(idx)
            .ok_or_else(|| missing(TagKind::Total, idx))?;
        self.fragment(tag, &CrossChecks::default())?
            .totals
            .pop()
            .ok_or_else(|| missing(TagKind::Total, idx))
    }

    fn fragment(&self, tag: &Tag, checks: &CrossChecks) -> Result<Fragment> {
        let bytes = self.read_element(tag)?;
        debug!(kind = tag.kind.name(), begin = tag.begin, len = bytes.len(), "fragment read");
        Xml::read_fragment(bytes.as_slice(), checks)
    }
}

fn missing(kind: TagKind, idx: usize) -> Uic301Error {
    Uic301Error::Index(format!("no <{}> #{idx}", kind.name()))
}

fn load(path: &Path) -> Result<IndexTree> {
    let bytes = fs::read(path).map_err(Uic301Error::file("read", path))?;
    codec::decode(&bytes)
}

fn save(path: &Path, tree: &IndexTree) -> Result<()> {
    fs::write(path, codec::encode(tree)).map_err(Uic301Error::file("write", path))?;
    info!("index saved to {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                let rest = buf;
                buf = &mut rest[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
