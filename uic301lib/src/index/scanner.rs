//! Однопроходный сканер тегов с точными байтовыми смещениями.
//!
//! Вход не нормализуется: каждое смещение, переданное слушателю, это позиция байта
//! в исходном потоке.

use crate::error::{Result, Uic301Error};
use std::io::BufRead;

/// Receives tag events in document order.
pub trait TagListener {
    type Output;

    /// `offset` is the position of `<`.
    fn start_tag_begin(&mut self, name: &str, offset: u64) -> Result<()>;

    /// `offset` is the position of the closing `>`.
    fn start_tag_end(&mut self, name: &str, offset: u64, self_closing: bool) -> Result<()>;

    /// `offset` is the position of the closing `>`. Self-closing tags report
    /// this right after [`TagListener::start_tag_end`] with the same offset.
    fn end_tag_end(
        &mut self,
        name: &str,
        offset: u64,
        self_closing: bool,
    ) -> Result<Option<Self::Output>>;
}

struct ByteSource<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> ByteSource<R> {
    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    fn bump(&mut self) -> Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.inner.consume(1);
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Next byte; end of input inside a construct is malformed.
    fn expect(&mut self, open: u64, what: &str) -> Result<u8> {
        self.bump()?
            .ok_or_else(|| scan_error(open, format!("unterminated {what}")))
    }
}

fn scan_error(offset: u64, message: impl Into<String>) -> Uic301Error {
    Uic301Error::Scan { offset, message: message.into() }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

pub struct TagScanner<R> {
    src: ByteSource<R>,
}

impl<R: BufRead> TagScanner<R> {
    pub fn new(reader: R) -> Self {
        Self { src: ByteSource { inner: reader, offset: 0 } }
    }

    /// Scans to the end of the input. Returns the first output the listener
    /// produced, if any.
    pub fn run<L: TagListener>(mut self, listener: &mut L) -> Result<Option<L::Output>> {
        let mut output = None;
        while let Some(byte) = self.src.bump()? {
            if byte != b'<' {
                continue;
            }
            let open = self.src.offset - 1;
            match self.src.peek()? {
                Some(b'?') => self.skip_until(open, b"?>", "processing instruction")?,
                Some(b'!') => self.skip_markup(open)?,
                Some(b'/') => {
                    self.src.bump()?;
                    let (name, close) = self.end_tag(open)?;
                    let produced = listener.end_tag_end(&name, close, false)?;
                    if output.is_none() {
                        output = produced;
                    }
                }
                _ => {
                    let name = self.name(open)?;
                    listener.start_tag_begin(&name, open)?;
                    let (close, self_closing) = self.attributes(open)?;
                    listener.start_tag_end(&name, close, self_closing)?;
                    if self_closing {
                        let produced = listener.end_tag_end(&name, close, true)?;
                        if output.is_none() {
                            output = produced;
                        }
                    }
                }
            }
        }
        Ok(output)
    }

    fn name(&mut self, open: u64) -> Result<String> {
        let mut name = Vec::new();
        while let Some(b) = self.src.peek()? {
            if !is_name_byte(b) {
                break;
            }
            name.push(b);
            self.src.bump()?;
        }
        if name.is_empty() {
            return Err(scan_error(open, "tag without a name"));
        }
        String::from_utf8(name).map_err(|_| scan_error(open, "tag name is not UTF-8"))
    }

    /// Consumes attributes through the closing `>`, honoring quotes.
    fn attributes(&mut self, open: u64) -> Result<(u64, bool)> {
        let mut quote: Option<u8> = None;
        let mut slash = false;
        loop {
            let b = self.src.expect(open, "start tag")?;
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => {
                    quote = Some(b);
                    slash = false;
                }
                (None, b'>') => return Ok((self.src.offset - 1, slash)),
                (None, b'<') => {
                    return Err(scan_error(self.src.offset - 1, "'<' inside a start tag"))
                }
                (None, b'/') => slash = true,
                (None, b) if b.is_ascii_whitespace() => {}
                (None, _) => {
                    if slash {
                        return Err(scan_error(self.src.offset - 1, "'/' inside a start tag"));
                    }
                }
            }
        }
    }

    fn end_tag(&mut self, open: u64) -> Result<(String, u64)> {
        let name = self.name(open)?;
        loop {
            match self.src.expect(open, "end tag")? {
                b'>' => return Ok((name, self.src.offset - 1)),
                b if b.is_ascii_whitespace() => {}
                _ => return Err(scan_error(self.src.offset - 1, "garbage in an end tag")),
            }
        }
    }

    fn skip_markup(&mut self, open: u64) -> Result<()> {
        let mut head = [0u8; 3];
        for slot in &mut head {
            *slot = self.src.expect(open, "markup declaration")?;
            if *slot == b'>' {
                return Ok(());
            }
        }
        if &head == b"!--" {
            self.skip_until(open, b"-->", "comment")
        } else {
            self.skip_until(open, b">", "markup declaration")
        }
    }

    fn skip_until(&mut self, open: u64, terminator: &[u8], what: &str) -> Result<()> {
        let mut matched = 0;
        while matched < terminator.len() {
            let b = self.src.expect(open, what)?;
            matched = if b == terminator[matched] {
                matched + 1
            } else if b == terminator[0] {
                1
            } else {
                0
            };
        }
        Ok(())
    }
}
