//! `abnfc` models ABNF (RFC 5234) grammars and compiles their rules into
//! finite automata. A rulelist is parsed from source text by the
//! [`abnfc-syntax`] crate into the [`ast`] defined here; the [`Compiler`]
//! then resolves rule references and compiles every rule of the regular
//! subset into a deterministic automaton from the [`abnfc-automata`]
//! crate, either symbol-indexed or range-partitioned, chosen at the call
//! site.
//!
//! Rules that recurse (directly or through a reference cycle) denote
//! non-regular languages and are reported as [`CompileError::NonRegular`]
//! rather than approximated.
//!
//! [`abnfc-syntax`]: <https://crates.io/crates/abnfc-syntax>
//! [`abnfc-automata`]: <https://crates.io/crates/abnfc-automata>
pub use abnfc_automata as automata;

pub mod ast;

mod compile;
pub use compile::{compile, to_closed_range_pattern, CompileError, Compiler};

mod core_rules;
