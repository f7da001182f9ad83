//! Property tests for the algebraic laws of the automaton operations,
//! over random finite languages on a small alphabet.

use abnfc_automata::{RangeDFA, SymbolDFA};
use proptest::prelude::*;

fn words() -> impl Strategy<Value = Vec<Vec<u8>>> {
	prop::collection::vec(prop::collection::vec(0u8..3, 0..4), 0..5)
}

fn dfa(words: &[Vec<u8>]) -> RangeDFA<u8> {
	RangeDFA::from_words(words.iter().map(Vec::as_slice))
}

proptest! {
	#[test]
	fn minimization_is_idempotent(ws in words()) {
		let m = dfa(&ws).minimized();
		prop_assert_eq!(&m.minimized(), &m);
	}

	#[test]
	fn minimization_preserves_the_language(ws in words()) {
		let a = dfa(&ws);
		prop_assert!(a.is_equivalent(&a.minimized()));
	}

	#[test]
	fn union_is_commutative(a in words(), b in words()) {
		let (a, b) = (dfa(&a), dfa(&b));
		prop_assert_eq!(a.union(&b).minimized(), b.union(&a).minimized());
	}

	#[test]
	fn union_is_associative(a in words(), b in words(), c in words()) {
		let (a, b, c) = (dfa(&a), dfa(&b), dfa(&c));
		prop_assert_eq!(
			a.union(&b).union(&c).minimized(),
			a.union(&b.union(&c)).minimized()
		);
	}

	#[test]
	fn intersection_is_commutative(a in words(), b in words()) {
		let (a, b) = (dfa(&a), dfa(&b));
		prop_assert_eq!(a.intersection(&b).minimized(), b.intersection(&a).minimized());
	}

	#[test]
	fn complement_partitions_the_monoid(ws in words()) {
		let a = dfa(&ws);
		let c = a.complement();
		prop_assert!(a.intersection(&c).is_empty());

		let everything = RangeDFA::from_range(0u8, 0xff).star();
		prop_assert!(a.union(&c).is_equivalent(&everything));
	}

	#[test]
	fn epsilon_is_the_concatenation_identity(ws in words()) {
		let a = dfa(&ws);
		let e = RangeDFA::epsilon();
		prop_assert_eq!(e.concatenation(&a).minimized(), a.minimized());
		prop_assert_eq!(a.concatenation(&e).minimized(), a.minimized());
	}

	#[test]
	fn star_unrolls_once(ws in words()) {
		let a = dfa(&ws);
		let unrolled = RangeDFA::epsilon().union(&a.concatenation(&a.star()));
		prop_assert!(a.star().is_equivalent(&unrolled));
	}

	#[test]
	fn difference_agrees_with_complement(a in words(), b in words()) {
		let (a, b) = (dfa(&a), dfa(&b));
		prop_assert!(a.difference(&b).is_equivalent(&a.intersection(&b.complement())));
	}

	#[test]
	fn representations_recognize_the_same_language(
		ws in words(),
		input in prop::collection::vec(0u8..4, 0..6),
	) {
		let r = dfa(&ws);
		let s = SymbolDFA::from_words(ws.iter().map(Vec::as_slice));
		prop_assert_eq!(
			r.accepts(input.iter().copied()),
			s.accepts(input.iter().copied())
		);
	}

	#[test]
	fn emitted_regex_is_a_function_of_the_language(a in words(), b in words()) {
		let (a, b) = (dfa(&a), dfa(&b));
		if a.is_equivalent(&b) {
			prop_assert_eq!(a.to_regex(), b.to_regex());
		}
	}
}
