//! This library provides deterministic finite automata and transducers over
//! arbitrary discrete symbol alphabets, together with the closure
//! operations of regular languages, Hopcroft-style minimization to a
//! canonical form, and regular expression emission. It is used by the
//! [`abnfc`] crate to represent compiled ABNF rules.
//!
//! Two semantically equivalent automaton representations are provided:
//! [`SymbolDFA`], indexing transitions by single symbols, and [`RangeDFA`],
//! indexing them by closed symbol ranges, which stays compact on sparse
//! alphabets such as Unicode scalar values. The [`RegularLanguage`] trait
//! captures their shared capability set.
//!
//! [`abnfc`]: <https://crates.io/crates/abnfc>
pub use btree_range_map::{AnyRange, RangeSet};

/// Automaton state identifier.
pub type StateId = u32;

pub mod symbol;
pub use symbol::{Symbol, Width};

pub mod class;

pub mod nfa;
pub use nfa::NFA;

pub mod symbol_dfa;
pub use symbol_dfa::SymbolDFA;

pub mod range_dfa;
pub use range_dfa::RangeDFA;

mod language;
pub use language::RegularLanguage;

mod minimize;

pub mod partitioned;
pub use partitioned::{Join, PartitionedDFA};

pub mod transducer;
pub use transducer::{Action, Transducer};

mod regex;

#[cfg(feature = "dot")]
pub mod dot;
