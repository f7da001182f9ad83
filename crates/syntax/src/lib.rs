//! This library provides a strict RFC 5234 parser for ABNF grammars,
//! producing the rulelist AST of the [`abnfc`] crate. Rules can then be
//! compiled into finite automata with [`abnfc::Compiler`].
//!
//! The accepted dialect is deliberately strict: input is a byte sequence,
//! grammar text is ASCII, every rule line ends with CRLF (the last line
//! included), and rules continue across lines only through leading
//! whitespace on the continuation line.
//!
//! ```
//! let rules = abnfc_syntax::parse_rulelist(b"greeting = \"Hello\" CRLF\r\n").unwrap();
//! let dfa: abnfc::automata::RangeDFA<u8> = abnfc::compile(&rules, "greeting").unwrap();
//! assert!(dfa.accepts(*b"hello\r\n"));
//! ```
//!
//! [`abnfc`]: <https://crates.io/crates/abnfc>
mod parsing;
pub use parsing::*;
