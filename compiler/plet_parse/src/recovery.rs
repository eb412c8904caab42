//! Error recovery for the parser.
//!
//! After a syntax error the parser skips to the next statement boundary.
//! Token sets are bitsets over [`tag`] for O(1) membership tests.

use plet_ir::{Keyword, TokenKind};
use tracing::trace;

use crate::cursor::Cursor;

const TAG_TEXT: u32 = 5;
const TAG_LINE_FEED: u32 = 6;
const TAG_END_QUOTE: u32 = 8;
const TAG_EOF: u32 = 10;
const TAG_KEYWORD: u32 = 11;

/// Dense index of a token kind. Keywords get one index each.
pub fn tag(kind: &TokenKind) -> u32 {
    match kind {
        TokenKind::Name(_) => 0,
        TokenKind::Operator(_) => 1,
        TokenKind::Int(_) => 2,
        TokenKind::Float(_) => 3,
        TokenKind::String(_) => 4,
        TokenKind::Text(_) => TAG_TEXT,
        TokenKind::LineFeed => TAG_LINE_FEED,
        TokenKind::StartQuote => 7,
        TokenKind::EndQuote => TAG_END_QUOTE,
        TokenKind::Punct(_) => 9,
        TokenKind::Eof => TAG_EOF,
        TokenKind::Keyword(keyword) => TAG_KEYWORD + keyword_tag(*keyword),
    }
}

const fn keyword_tag(keyword: Keyword) -> u32 {
    match keyword {
        Keyword::If => 0,
        Keyword::Then => 1,
        Keyword::Else => 2,
        Keyword::For => 3,
        Keyword::In => 4,
        Keyword::Switch => 5,
        Keyword::Case => 6,
        Keyword::Default => 7,
        Keyword::End => 8,
        Keyword::And => 9,
        Keyword::Or => 10,
        Keyword::Not => 11,
        Keyword::Do => 12,
        Keyword::Export => 13,
        Keyword::Return => 14,
        Keyword::Break => 15,
        Keyword::Continue => 16,
    }
}

/// A set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    #[inline]
    #[must_use]
    const fn with_tag(self, tag: u32) -> Self {
        Self(self.0 | (1u64 << tag))
    }

    #[inline]
    #[must_use]
    pub const fn with_keyword(self, keyword: Keyword) -> Self {
        self.with_tag(TAG_KEYWORD + keyword_tag(keyword))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u64 << tag(kind))) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Keywords that close or continue an enclosing block.
pub const BLOCK_END: TokenSet = TokenSet::EMPTY
    .with_keyword(Keyword::End)
    .with_keyword(Keyword::Else)
    .with_keyword(Keyword::Case)
    .with_keyword(Keyword::Default);

/// Where a statement may end and the next one begin.
pub const STMT_BOUNDARY: TokenSet = BLOCK_END
    .with_tag(TAG_LINE_FEED)
    .with_tag(TAG_TEXT)
    .with_tag(TAG_END_QUOTE)
    .with_tag(TAG_EOF);

/// Advance the cursor until reaching a token in `recovery` or EOF.
///
/// Returns `true` if a recovery token was found, `false` if EOF was reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    let from = cursor.position();
    while !cursor.is_at_end() {
        if recovery.contains(cursor.current_kind()) {
            trace!(skipped = cursor.position() - from, "synchronized");
            return true;
        }
        cursor.advance();
    }
    false
}
