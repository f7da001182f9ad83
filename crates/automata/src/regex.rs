//! Regular expression emission by state elimination.
//!
//! The emitted dialect uses juxtaposition for concatenation, `|` for
//! alternation, `(...)` for grouping, the `*`, `+` and `?` postfix
//! operators, and character classes `[a-z...]` whose non-printable symbols
//! are escaped as `\xHH`, `\uHHHH` or `\u{HHHHHH}` depending on the
//! alphabet width. The empty language is rendered as the sentinel `[]` and
//! the empty string as the empty regular expression.

use btree_range_map::RangeSet;
use core::fmt;
use educe::Educe;
use range_traits::{Enum, Measure};
use std::collections::BTreeMap;

use crate::{class, RangeDFA, Symbol, Width};

/// Regular expression term manipulated during state elimination.
#[derive(Debug, Clone, Educe)]
#[educe(PartialEq(bound(T: Measure + Enum)), Eq)]
enum Term<T> {
	Empty,
	Epsilon,
	Set(RangeSet<T>),
	Sequence(Vec<Self>),
	Union(Vec<Self>),
	Star(Box<Self>),
}

impl<T: Symbol> Term<T> {
	fn range(lo: T, hi: T) -> Self {
		Self::Set(class::of(lo, hi))
	}

	fn union(self, other: Self) -> Self {
		match (self, other) {
			(Self::Empty, e) | (e, Self::Empty) => e,
			(Self::Set(a), Self::Set(b)) => Self::Set(class::union(&a, &b)),
			(Self::Union(mut items), Self::Union(others)) => {
				for e in others {
					if !items.contains(&e) {
						items.push(e);
					}
				}
				Self::Union(items)
			}
			(Self::Union(mut items), e) => {
				if !items.contains(&e) {
					items.push(e);
				}
				Self::Union(items)
			}
			(e, Self::Union(mut items)) => {
				if !items.contains(&e) {
					items.insert(0, e);
				}
				Self::Union(items)
			}
			(a, b) => {
				if a == b {
					a
				} else {
					Self::Union(vec![a, b])
				}
			}
		}
	}

	fn sequence(self, other: Self) -> Self {
		match (self, other) {
			(Self::Empty, _) | (_, Self::Empty) => Self::Empty,
			(Self::Epsilon, e) | (e, Self::Epsilon) => e,
			(Self::Sequence(mut items), Self::Sequence(others)) => {
				items.extend(others);
				Self::Sequence(items)
			}
			(Self::Sequence(mut items), e) => {
				items.push(e);
				Self::Sequence(items)
			}
			(e, Self::Sequence(mut items)) => {
				items.insert(0, e);
				Self::Sequence(items)
			}
			(a, b) => Self::Sequence(vec![a, b]),
		}
	}

	fn star(self) -> Self {
		match self {
			Self::Empty | Self::Epsilon => Self::Epsilon,
			star @ Self::Star(_) => star,
			e => Self::Star(Box::new(e)),
		}
	}

	/// Displays this term as the operand of a postfix operator,
	/// parenthesizing anything that is not a single atom.
	fn display_sub(&self) -> DisplaySub<T> {
		DisplaySub(self)
	}

	/// Displays this term as a concatenation item, parenthesizing
	/// alternations.
	fn display_item(&self) -> DisplayItem<T> {
		DisplayItem(self)
	}
}

impl<T: Symbol> fmt::Display for Term<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Empty => write!(f, "[]"),
			Self::Epsilon => Ok(()),
			Self::Set(set) => fmt_set(set, f),
			Self::Sequence(items) => {
				let mut i = 0;
				while i < items.len() {
					// Fold `e e*` into `e+`.
					if let Some(Self::Star(inner)) = items.get(i + 1) {
						if **inner == items[i] {
							write!(f, "{}+", items[i].display_sub())?;
							i += 2;
							continue;
						}
					}

					items[i].display_item().fmt(f)?;
					i += 1;
				}

				Ok(())
			}
			Self::Union(items) => {
				let rest: Vec<&Self> = items
					.iter()
					.filter(|e| !matches!(e, Self::Epsilon))
					.collect();

				if rest.len() < items.len() {
					// One branch is the empty string: render as `?`.
					if rest.len() == 1 {
						write!(f, "{}?", rest[0].display_sub())
					} else {
						write!(f, "(")?;
						for (i, item) in rest.iter().enumerate() {
							if i > 0 {
								write!(f, "|")?;
							}
							item.fmt(f)?;
						}
						write!(f, ")?")
					}
				} else {
					for (i, item) in rest.iter().enumerate() {
						if i > 0 {
							write!(f, "|")?;
						}
						item.fmt(f)?;
					}

					Ok(())
				}
			}
			Self::Star(e) => write!(f, "{}*", e.display_sub()),
		}
	}
}

struct DisplaySub<'a, T>(&'a Term<T>);

impl<'a, T: Symbol> fmt::Display for DisplaySub<'a, T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.0 {
			atom @ (Term::Empty | Term::Set(_)) => atom.fmt(f),
			e => write!(f, "({e})"),
		}
	}
}

struct DisplayItem<'a, T>(&'a Term<T>);

impl<'a, T: Symbol> fmt::Display for DisplayItem<'a, T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.0 {
			u @ Term::Union(items) => {
				// Unions holding the empty string render as a postfix `?`
				// group, which needs no further parenthesizing.
				if items.iter().any(|e| matches!(e, Term::Epsilon)) {
					u.fmt(f)
				} else {
					write!(f, "({u})")
				}
			}
			e => e.fmt(f),
		}
	}
}

fn fmt_set<T: Symbol>(set: &RangeSet<T>, f: &mut fmt::Formatter) -> fmt::Result {
	let mut ranges = set.iter();
	let first = ranges.next();
	let single = match (first, ranges.next()) {
		(Some(r), None) => {
			let lo = r.first().unwrap();
			if lo == r.last().unwrap() {
				Some(lo)
			} else {
				None
			}
		}
		_ => None,
	};

	match single {
		Some(symbol) => fmt_symbol(symbol, f),
		None => {
			write!(f, "[")?;
			for r in set.iter() {
				let lo = r.first().unwrap();
				let hi = r.last().unwrap();

				fmt_symbol(lo, f)?;
				if lo != hi {
					if lo.next() != Some(hi) {
						write!(f, "-")?;
					}
					fmt_symbol(hi, f)?;
				}
			}
			write!(f, "]")
		}
	}
}

fn fmt_symbol<T: Symbol>(symbol: T, f: &mut fmt::Formatter) -> fmt::Result {
	let code = symbol.code();

	if (0x21..=0x7e).contains(&code) {
		let c = char::from_u32(code).unwrap();
		if "()[]{}?*+-^|\\.".contains(c) {
			return write!(f, "\\{c}");
		}
		return write!(f, "{c}");
	}

	match T::WIDTH {
		Width::Octet => write!(f, "\\x{code:02X}"),
		Width::Unit => write!(f, "\\u{code:04X}"),
		Width::Scalar => write!(f, "\\u{{{code:X}}}"),
	}
}

impl<T: Symbol> RangeDFA<T> {
	/// Renders the accepted language as a regular expression.
	///
	/// The automaton is minimized first; interior states are then
	/// eliminated in ascending id order, so the output is a canonical
	/// function of the accepted language.
	pub fn to_regex(&self) -> String {
		let m = self.minimized();
		let n = m.state_count();
		let start = n;
		let end = n + 1;

		let mut arcs: BTreeMap<(usize, usize), Term<T>> = BTreeMap::new();

		fn merge<T: Symbol>(
			arcs: &mut BTreeMap<(usize, usize), Term<T>>,
			key: (usize, usize),
			term: Term<T>,
		) {
			let merged = match arcs.remove(&key) {
				Some(e) => e.union(term),
				None => term,
			};
			arcs.insert(key, merged);
		}

		merge(&mut arcs, (start, m.initial_state() as usize), Term::Epsilon);
		for q in m.final_states() {
			merge(&mut arcs, (*q as usize, end), Term::Epsilon);
		}

		for q in 0..n {
			for (range, target) in m.transitions_from(q as u32) {
				let term = Term::range(range.first().unwrap(), range.last().unwrap());
				merge(&mut arcs, (q, *target as usize), term);
			}
		}

		for k in 0..n {
			let loop_term = match arcs.remove(&(k, k)) {
				Some(e) => e.star(),
				None => Term::Epsilon,
			};

			let incoming: Vec<(usize, Term<T>)> = {
				let keys: Vec<_> = arcs
					.keys()
					.filter(|(_, j)| *j == k)
					.copied()
					.collect();
				keys.into_iter()
					.map(|key| (key.0, arcs.remove(&key).unwrap()))
					.collect()
			};

			let outgoing: Vec<(usize, Term<T>)> = {
				let keys: Vec<_> = arcs
					.keys()
					.filter(|(i, _)| *i == k)
					.copied()
					.collect();
				keys.into_iter()
					.map(|key| (key.1, arcs.remove(&key).unwrap()))
					.collect()
			};

			for (i, a) in &incoming {
				for (j, b) in &outgoing {
					let term = a
						.clone()
						.sequence(loop_term.clone())
						.sequence(b.clone());
					merge(&mut arcs, (*i, *j), term);
				}
			}
		}

		match arcs.remove(&(start, end)) {
			Some(term) => term.to_string(),
			None => Term::<T>::Empty.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::RangeDFA;

	// Each pair is of the form `(automaton, emitted)`. Emission runs on the
	// minimized automaton, so the output only depends on the language.
	#[test]
	fn emission() {
		let vectors: [(RangeDFA<u8>, &str); 8] = [
			(RangeDFA::empty(), "[]"),
			(RangeDFA::epsilon(), ""),
			(RangeDFA::word(b"abc"), "abc"),
			(RangeDFA::literal(b'a').union(&RangeDFA::literal(b'b')), "[ab]"),
			(RangeDFA::from_range(b'a', b'z').star(), "[a-z]*"),
			(RangeDFA::literal(b'a').optional(), "a?"),
			(RangeDFA::literal(b'a').plus(), "a+"),
			(RangeDFA::word(b"ab").star(), "(a(ba)*b)?"),
		];

		for (dfa, expected) in vectors {
			assert_eq!(dfa.to_regex(), expected);
		}
	}

	#[test]
	fn escapes_follow_the_alphabet_width() {
		assert_eq!(RangeDFA::literal(0x0au8).to_regex(), "\\x0A");
		assert_eq!(RangeDFA::literal(0x0au16).to_regex(), "\\u000A");
		assert_eq!(RangeDFA::literal('\n').to_regex(), "\\u{A}");
		assert_eq!(RangeDFA::literal(b'*').to_regex(), "\\*");
		assert_eq!(
			RangeDFA::from_range(0x00u8, 0x0f).to_regex(),
			"[\\x00-\\x0F]"
		);
	}

	#[test]
	fn emission_is_canonical() {
		let left = RangeDFA::from_range(b'a', b'b').star();
		let right = RangeDFA::literal(b'b')
			.union(&RangeDFA::literal(b'a'))
			.star();
		assert_eq!(left.to_regex(), right.to_regex());
	}
}
