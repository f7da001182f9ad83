use crate::{RangeDFA, Symbol, SymbolDFA};

/// The capability set shared by the two deterministic automaton
/// representations.
///
/// Consumers generic over this trait (notably the ABNF rule compiler) can
/// target either [`SymbolDFA`] or [`RangeDFA`] at the call site; both
/// recognize the same languages, differing only in how transitions are
/// stored. Every operation is a pure function returning a new value.
pub trait RegularLanguage<T: Symbol>: Clone {
	/// The automaton accepting only the empty string.
	fn epsilon() -> Self;

	/// The automaton accepting nothing.
	fn empty() -> Self;

	/// The automaton accepting the single one-symbol string `symbol`.
	fn literal(symbol: T) -> Self;

	/// The automaton accepting exactly the given symbol sequence.
	fn word(word: &[T]) -> Self;

	/// The automaton accepting every one-symbol string drawn from
	/// `lo..=hi`.
	fn from_range(lo: T, hi: T) -> Self;

	/// The automaton accepting the union of both languages.
	fn union(&self, other: &Self) -> Self;

	/// The automaton accepting the intersection of both languages.
	fn intersection(&self, other: &Self) -> Self;

	/// The automaton accepting the concatenation of both languages.
	fn concatenation(&self, other: &Self) -> Self;

	/// The automaton accepting zero or more repetitions of the language.
	fn star(&self) -> Self;

	/// The automaton accepting one or more repetitions of the language.
	fn plus(&self) -> Self;

	/// The automaton also accepting the empty string.
	fn optional(&self) -> Self;

	/// The automaton accepting the complement of the language.
	fn complement(&self) -> Self;

	/// The automaton accepting the strings of `self` not accepted by
	/// `other`.
	fn difference(&self, other: &Self) -> Self;

	/// The canonical minimal automaton accepting the same language.
	fn minimized(&self) -> Self;

	/// The number of states.
	fn state_count(&self) -> usize;

	/// Checks if the accepted language is empty.
	fn is_empty(&self) -> bool;

	/// Checks if both automata accept the same language.
	fn is_equivalent(&self, other: &Self) -> bool;

	/// Checks if the automaton accepts the given input.
	fn contains<I: IntoIterator<Item = T>>(&self, input: I) -> bool;

	/// Renders the language as a regular expression by state elimination
	/// over the minimized automaton.
	fn to_regex(&self) -> String;
}

impl<T: Symbol> RegularLanguage<T> for SymbolDFA<T> {
	fn epsilon() -> Self {
		Self::epsilon()
	}

	fn empty() -> Self {
		Self::empty()
	}

	fn literal(symbol: T) -> Self {
		Self::literal(symbol)
	}

	fn word(word: &[T]) -> Self {
		Self::word(word)
	}

	fn from_range(lo: T, hi: T) -> Self {
		Self::from_range(lo, hi)
	}

	fn union(&self, other: &Self) -> Self {
		Self::union(self, other)
	}

	fn intersection(&self, other: &Self) -> Self {
		Self::intersection(self, other)
	}

	fn concatenation(&self, other: &Self) -> Self {
		Self::concatenation(self, other)
	}

	fn star(&self) -> Self {
		Self::star(self)
	}

	fn plus(&self) -> Self {
		Self::plus(self)
	}

	fn optional(&self) -> Self {
		Self::optional(self)
	}

	fn complement(&self) -> Self {
		Self::complement(self)
	}

	fn difference(&self, other: &Self) -> Self {
		Self::difference(self, other)
	}

	fn minimized(&self) -> Self {
		Self::minimized(self)
	}

	fn state_count(&self) -> usize {
		Self::state_count(self)
	}

	fn is_empty(&self) -> bool {
		Self::is_empty(self)
	}

	fn is_equivalent(&self, other: &Self) -> bool {
		Self::is_equivalent(self, other)
	}

	fn contains<I: IntoIterator<Item = T>>(&self, input: I) -> bool {
		self.accepts(input)
	}

	fn to_regex(&self) -> String {
		self.to_ranges().to_regex()
	}
}

impl<T: Symbol> RegularLanguage<T> for RangeDFA<T> {
	fn epsilon() -> Self {
		Self::epsilon()
	}

	fn empty() -> Self {
		Self::empty()
	}

	fn literal(symbol: T) -> Self {
		Self::literal(symbol)
	}

	fn word(word: &[T]) -> Self {
		Self::word(word)
	}

	fn from_range(lo: T, hi: T) -> Self {
		Self::from_range(lo, hi)
	}

	fn union(&self, other: &Self) -> Self {
		Self::union(self, other)
	}

	fn intersection(&self, other: &Self) -> Self {
		Self::intersection(self, other)
	}

	fn concatenation(&self, other: &Self) -> Self {
		Self::concatenation(self, other)
	}

	fn star(&self) -> Self {
		Self::star(self)
	}

	fn plus(&self) -> Self {
		Self::plus(self)
	}

	fn optional(&self) -> Self {
		Self::optional(self)
	}

	fn complement(&self) -> Self {
		Self::complement(self)
	}

	fn difference(&self, other: &Self) -> Self {
		Self::difference(self, other)
	}

	fn minimized(&self) -> Self {
		Self::minimized(self)
	}

	fn state_count(&self) -> usize {
		Self::state_count(self)
	}

	fn is_empty(&self) -> bool {
		Self::is_empty(self)
	}

	fn is_equivalent(&self, other: &Self) -> bool {
		Self::is_equivalent(self, other)
	}

	fn contains<I: IntoIterator<Item = T>>(&self, input: I) -> bool {
		self.accepts(input)
	}

	fn to_regex(&self) -> String {
		Self::to_regex(self)
	}
}
