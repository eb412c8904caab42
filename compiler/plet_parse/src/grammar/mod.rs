//! Grammar productions.
//!
//! Each module extends [`Parser`](crate::Parser) with methods for one part
//! of the language:
//!
//! - [`stmt`]: statement lists, statements and assignment
//! - [`expr`]: expressions, from lambdas down to primaries, and the block
//!   expressions `if`, `for`, `switch` and `do`
//!
//! Expression productions return `Result`; a statement that fails is
//! recorded and skipped up to the next statement boundary. Missing block
//! keywords (`then`, `do`, `end`) are reported without failing the
//! construct, so one forgotten keyword yields one error.

mod expr;
mod stmt;
