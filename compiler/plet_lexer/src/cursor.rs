//! Byte cursor with line and column tracking.
//!
//! The reader looks at most three bytes ahead. Bulk advances (text runs)
//! count newlines with `memchr` instead of stepping byte by byte.

use memchr::{memchr, memchr3, memrchr, Memchr};
use plet_ir::Pos;

#[derive(Clone)]
pub(crate) struct Cursor<'src> {
    source: &'src [u8],
    pos: Pos,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src [u8]) -> Self {
        Cursor {
            source,
            pos: Pos::START,
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    fn offset(&self) -> usize {
        self.pos.offset as usize
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.offset() >= self.source.len()
    }

    /// Current byte, if any.
    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.source.get(self.offset()).copied()
    }

    /// Byte `n` positions ahead; `peek_n(0)` is `peek()`.
    #[inline]
    pub(crate) fn peek_n(&self, n: usize) -> Option<u8> {
        self.source.get(self.offset() + n).copied()
    }

    /// Whether the remaining input starts with `prefix`.
    #[inline]
    pub(crate) fn starts_with(&self, prefix: &[u8]) -> bool {
        self.rest().starts_with(prefix)
    }

    #[inline]
    pub(crate) fn rest(&self) -> &'src [u8] {
        &self.source[self.offset().min(self.source.len())..]
    }

    /// Consume one byte.
    pub(crate) fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos.offset += 1;
        if byte == b'\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(byte)
    }

    /// Consume `n` bytes (clamped to the end of input) and return them.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn advance_by(&mut self, n: usize) -> &'src [u8] {
        let start = self.offset();
        let end = (start + n).min(self.source.len());
        let consumed = &self.source[start..end];
        let lines = Memchr::new(b'\n', consumed).count();
        if lines > 0 {
            let last = memrchr(b'\n', consumed).unwrap_or(0);
            self.pos.line += lines as u32;
            self.pos.column = (consumed.len() - last) as u32;
        } else {
            self.pos.column += consumed.len() as u32;
        }
        self.pos.offset = end as u32;
        consumed
    }

    /// Consume bytes while `pred` holds.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'src [u8] {
        let len = self.rest().iter().take_while(|&&b| pred(b)).count();
        self.advance_by(len)
    }

    /// Length of the run before the next `{`, or to end of input.
    pub(crate) fn text_run(&self) -> usize {
        let rest = self.rest();
        memchr(b'{', rest).unwrap_or(rest.len())
    }

    /// Length of the run before the next `{`, `\` or `"`.
    pub(crate) fn quoted_text_run(&self) -> usize {
        let rest = self.rest();
        memchr3(b'{', b'\\', b'"', rest).unwrap_or(rest.len())
    }

    /// Skip to the byte after the next `#}`, or to end of input.
    pub(crate) fn skip_block_comment(&mut self) {
        let rest = self.rest();
        let mut from = 0;
        while let Some(i) = memchr(b'#', &rest[from..]) {
            let hash = from + i;
            if rest.get(hash + 1) == Some(&b'}') {
                self.advance_by(hash + 2);
                return;
            }
            from = hash + 1;
        }
        self.advance_by(rest.len());
    }

    /// Skip to (not past) the next newline.
    pub(crate) fn skip_line(&mut self) {
        let rest = self.rest();
        self.advance_by(memchr(b'\n', rest).unwrap_or(rest.len()));
    }
}
