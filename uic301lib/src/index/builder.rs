use crate::{
    error::{Result, Uic301Error},
    index::{
        scanner::TagListener,
        tree::{IndexTree, Tag, TagKind},
    },
};
use tracing::trace;

/// Stack listener assembling the offset tree.
///
/// A tag that is not an expected child of the open element closes that
/// element implicitly and is retried against its parent.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    stack: Vec<Tag>,
    finished: bool,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the top element into its parent. Returns the element when it was
    /// the root.
    fn close_top(&mut self) -> Option<Tag> {
        let tag = self.stack.pop()?;
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(tag);
                None
            }
            None => {
                self.finished = true;
                Some(tag)
            }
        }
    }
}

fn kind_of(name: &str, offset: u64) -> Result<TagKind> {
    TagKind::from_name(name).ok_or_else(|| Uic301Error::Scan {
        offset,
        message: format!("unknown element <{name}>"),
    })
}

impl TagListener for IndexBuilder {
    type Output = IndexTree;

    fn start_tag_begin(&mut self, name: &str, offset: u64) -> Result<()> {
        let kind = kind_of(name, offset)?;
        if self.stack.is_empty() {
            if self.finished {
                return Err(Uic301Error::Scan {
                    offset,
                    message: format!("unexpected <{name}> after the root element"),
                });
            }
            if kind != TagKind::Documents {
                return Err(Uic301Error::Scan {
                    offset,
                    message: format!("root element must be <documents>, found <{name}>"),
                });
            }
        }
        while let Some(top) = self.stack.last_mut() {
            if top.kind.expects(kind) {
                break;
            }
            trace!(offset, parent = top.kind.name(), child = name, "implicit close");
            // Closes at its own start tag.
            top.end = top.start_end;
            if self.close_top().is_some() {
                return Err(Uic301Error::Scan {
                    offset,
                    message: format!("<{name}> is not allowed in <documents>"),
                });
            }
        }
        self.stack.push(Tag::new(kind, offset));
        Ok(())
    }

    fn start_tag_end(&mut self, name: &str, offset: u64, self_closing: bool) -> Result<()> {
        let kind = kind_of(name, offset)?;
        match self.stack.last_mut() {
            Some(top) if top.kind == kind => {
                top.start_end = offset;
                top.end = offset;
                top.self_closing = self_closing;
                Ok(())
            }
            _ => Err(Uic301Error::Scan {
                offset,
                message: format!("start tag <{name}> ends outside its element"),
            }),
        }
    }

    fn end_tag_end(
        &mut self,
        name: &str,
        offset: u64,
        _self_closing: bool,
    ) -> Result<Option<IndexTree>> {
        let kind = kind_of(name, offset)?;
        if !self.stack.iter().any(|t| t.kind == kind) {
            return Err(Uic301Error::Scan {
                offset,
                message: format!("</{name}> closes no open element"),
            });
        }
        while let Some(top) = self.stack.last_mut() {
            if top.kind == kind {
                top.end = offset;
                return Ok(self.close_top().map(IndexTree::new));
            }
            top.end = top.start_end;
            // `kind` is open further down, so this never pops the root.
            self.close_top();
        }
        Ok(None)
    }
}
