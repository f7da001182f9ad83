use btree_range_map::{AnyRange, RangeSet};
use educe::Educe;
use range_traits::{Enum, Measure};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::{class, minimize, StateId, Symbol, SymbolDFA, NFA};

/// Deterministic finite automaton with range-partitioned transitions.
///
/// States are numbered densely from zero; `transitions[q]` is an ordered
/// sequence of disjoint closed ranges, each mapping to a target state. The
/// transition relation is partial: symbols not covered by any range lead to
/// an implicit dead state. This representation is semantically equivalent to
/// [`SymbolDFA`] but stays compact on sparse alphabets such as Unicode
/// scalar values.
#[derive(Debug, Clone, Educe)]
#[educe(PartialEq(bound(T: Measure + Enum)), Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeDFA<T> {
	initial: StateId,
	finals: BTreeSet<StateId>,
	rows: Vec<Vec<(AnyRange<T>, StateId)>>,
}

/// Sorts a transition row and merges adjacent ranges with equal targets.
fn normalize_row<T: Symbol>(mut row: Vec<(AnyRange<T>, StateId)>) -> Vec<(AnyRange<T>, StateId)> {
	row.sort_by(|(a, _), (b, _)| a.first().unwrap().cmp(&b.first().unwrap()));

	let mut result: Vec<(AnyRange<T>, StateId)> = Vec::with_capacity(row.len());
	for (range, target) in row {
		let lo = range.first().unwrap();
		let hi = range.last().unwrap();

		if let Some((last, last_target)) = result.last_mut() {
			if *last_target == target && last.last().unwrap().next() == Some(lo) {
				*last = class::range(last.first().unwrap(), hi);
				continue;
			}
		}

		result.push((class::range(lo, hi), target));
	}

	result
}

impl<T: Symbol> RangeDFA<T> {
	/// Creates an automaton from its internal representation.
	///
	/// Rows are renormalized: sorted by range start with adjacent
	/// equal-target ranges merged. Ranges within a row must be disjoint.
	pub fn from_parts(
		initial: StateId,
		finals: BTreeSet<StateId>,
		rows: Vec<Vec<(AnyRange<T>, StateId)>>,
	) -> Self {
		Self {
			initial,
			finals,
			rows: rows.into_iter().map(normalize_row).collect(),
		}
	}

	/// The automaton accepting only the empty string.
	pub fn epsilon() -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::from([0]),
			rows: vec![Vec::new()],
		}
	}

	/// The automaton accepting nothing.
	pub fn empty() -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::new(),
			rows: vec![Vec::new()],
		}
	}

	/// The automaton accepting the single one-symbol string `symbol`.
	pub fn literal(symbol: T) -> Self {
		Self::from_range(symbol, symbol)
	}

	/// The automaton accepting every one-symbol string drawn from
	/// `lo..=hi`, as a single transition.
	pub fn from_range(lo: T, hi: T) -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::from([1]),
			rows: vec![vec![(class::range(lo, hi), 1)], Vec::new()],
		}
	}

	/// The automaton accepting every one-symbol string of the given class.
	pub fn from_class(set: &RangeSet<T>) -> Self {
		let rows = vec![
			set.iter()
				.map(|r| (class::range(r.first().unwrap(), r.last().unwrap()), 1))
				.collect(),
			Vec::new(),
		];

		Self {
			initial: 0,
			finals: BTreeSet::from([1]),
			rows,
		}
	}

	/// The automaton accepting exactly the given symbol sequence.
	pub fn word(word: &[T]) -> Self {
		NFA::singleton(word.iter().copied()).determinize()
	}

	/// The automaton accepting exactly the given finite set of words.
	pub fn from_words<'a>(words: impl IntoIterator<Item = &'a [T]>) -> Self
	where
		T: 'a,
	{
		let mut nfa = NFA::new();
		nfa.add_initial_state(0);

		let mut next = 1;
		for word in words {
			let mut q = 0;
			for symbol in word {
				nfa.add(q, class::range(*symbol, *symbol), next);
				q = next;
				next += 1;
			}
			nfa.add_final_state(q);
		}

		nfa.determinize()
	}

	/// Returns the initial state.
	pub fn initial_state(&self) -> StateId {
		self.initial
	}

	/// Returns the set of final states.
	pub fn final_states(&self) -> &BTreeSet<StateId> {
		&self.finals
	}

	/// Checks if the given state is a final state.
	pub fn is_final_state(&self, q: StateId) -> bool {
		self.finals.contains(&q)
	}

	/// Returns the number of states.
	pub fn state_count(&self) -> usize {
		self.rows.len()
	}

	/// Returns the number of transitions (one per range).
	pub fn transition_count(&self) -> usize {
		self.rows.iter().map(Vec::len).sum()
	}

	/// Returns the outgoing transitions of the given state, ordered by
	/// range start.
	pub fn transitions_from(&self, q: StateId) -> &[(AnyRange<T>, StateId)] {
		&self.rows[q as usize]
	}

	/// Returns the target of the transition of `q` covering `symbol`, if
	/// any.
	pub fn target(&self, q: StateId, symbol: T) -> Option<StateId> {
		for (range, target) in &self.rows[q as usize] {
			let lo = range.first().unwrap();
			if symbol < lo {
				break;
			}

			if symbol <= range.last().unwrap() {
				return Some(*target);
			}
		}

		None
	}

	/// Checks if the automaton accepts the given input.
	pub fn accepts<I: IntoIterator<Item = T>>(&self, input: I) -> bool {
		let mut q = self.initial;

		for symbol in input {
			match self.target(q, symbol) {
				Some(r) => q = r,
				None => return false,
			}
		}

		self.is_final_state(q)
	}

	/// Splices this automaton into `nfa`, shifting every state by `offset`.
	fn to_nfa_into(&self, nfa: &mut NFA<T>, offset: StateId) {
		for (q, row) in self.rows.iter().enumerate() {
			let q = q as StateId + offset;
			nfa.add_state(q);

			for (range, target) in row {
				nfa.add(q, *range, *target + offset);
			}
		}
	}

	/// The automaton accepting the union of both languages.
	pub fn union(&self, other: &Self) -> Self {
		let mut nfa = NFA::new();
		nfa.add_initial_state(0);

		self.to_nfa_into(&mut nfa, 1);
		let offset = 1 + self.rows.len() as StateId;
		other.to_nfa_into(&mut nfa, offset);

		nfa.add_epsilon(0, self.initial + 1);
		nfa.add_epsilon(0, other.initial + offset);

		for q in &self.finals {
			nfa.add_final_state(q + 1);
		}
		for q in &other.finals {
			nfa.add_final_state(q + offset);
		}

		nfa.determinize()
	}

	/// The automaton accepting the concatenation of both languages.
	pub fn concatenation(&self, other: &Self) -> Self {
		let mut nfa = NFA::new();
		self.to_nfa_into(&mut nfa, 0);
		let offset = self.rows.len() as StateId;
		other.to_nfa_into(&mut nfa, offset);

		nfa.add_initial_state(self.initial);
		for q in &self.finals {
			nfa.add_epsilon(*q, other.initial + offset);
		}
		for q in &other.finals {
			nfa.add_final_state(q + offset);
		}

		nfa.determinize()
	}

	/// The automaton accepting zero or more repetitions of the language.
	pub fn star(&self) -> Self {
		let mut nfa = NFA::new();
		nfa.add_initial_state(0);
		nfa.add_final_state(0);

		self.to_nfa_into(&mut nfa, 1);
		nfa.add_epsilon(0, self.initial + 1);
		for q in &self.finals {
			nfa.add_epsilon(q + 1, 0);
		}

		nfa.determinize()
	}

	/// The automaton accepting one or more repetitions of the language.
	pub fn plus(&self) -> Self {
		let mut nfa = NFA::new();
		self.to_nfa_into(&mut nfa, 0);

		nfa.add_initial_state(self.initial);
		for q in &self.finals {
			nfa.add_final_state(*q);
			nfa.add_epsilon(*q, self.initial);
		}

		nfa.determinize()
	}

	/// The automaton also accepting the empty string.
	pub fn optional(&self) -> Self {
		let mut nfa = NFA::new();
		let offset = 1;
		self.to_nfa_into(&mut nfa, offset);

		nfa.add_initial_state(0);
		nfa.add_final_state(0);
		nfa.add_epsilon(0, self.initial + offset);
		for q in &self.finals {
			nfa.add_final_state(q + offset);
		}

		nfa.determinize()
	}

	/// The automaton accepting the intersection of both languages, by
	/// product construction over pairwise-refined ranges.
	pub fn intersection(&self, other: &Self) -> Self {
		let mut ids: HashMap<(StateId, StateId), StateId> = HashMap::new();
		ids.insert((self.initial, other.initial), 0);

		let mut queue = VecDeque::new();
		queue.push_back((self.initial, other.initial));

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, qb)) = queue.pop_front() {
			let q = rows.len() as StateId;

			if self.is_final_state(qa) && other.is_final_state(qb) {
				finals.insert(q);
			}

			let mut row = Vec::new();
			for (ra, ta) in &self.rows[qa as usize] {
				for (rb, tb) in &other.rows[qb as usize] {
					if let Some(r) = class::range_intersection(ra, rb) {
						let next = ids.len() as StateId;
						let target = match ids.get(&(*ta, *tb)) {
							Some(t) => *t,
							None => {
								ids.insert((*ta, *tb), next);
								queue.push_back((*ta, *tb));
								next
							}
						};

						row.push((r, target));
					}
				}
			}

			rows.push(normalize_row(row));
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// The automaton accepting the strings of `self` not accepted by
	/// `other`.
	pub fn difference(&self, other: &Self) -> Self {
		let mut ids: HashMap<(StateId, Option<StateId>), StateId> = HashMap::new();
		ids.insert((self.initial, Some(other.initial)), 0);

		let mut queue = VecDeque::new();
		queue.push_back((self.initial, Some(other.initial)));

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, qb)) = queue.pop_front() {
			let q = rows.len() as StateId;

			let b_final = qb.map(|qb| other.is_final_state(qb)).unwrap_or(false);
			if self.is_final_state(qa) && !b_final {
				finals.insert(q);
			}

			let mut row = Vec::new();
			let mut push = |ids: &mut HashMap<_, StateId>,
			                queue: &mut VecDeque<_>,
			                range: AnyRange<T>,
			                pair: (StateId, Option<StateId>)| {
				let next = ids.len() as StateId;
				let target = match ids.get(&pair) {
					Some(t) => *t,
					None => {
						ids.insert(pair, next);
						queue.push_back(pair);
						next
					}
				};
				row.push((range, target));
			};

			for (ra, ta) in &self.rows[qa as usize] {
				match qb {
					Some(qb) => {
						let mut rest = RangeSet::new();
						rest.insert(*ra);

						for (rb, tb) in &other.rows[qb as usize] {
							if let Some(r) = class::range_intersection(ra, rb) {
								rest.remove(r);
								push(&mut ids, &mut queue, r, (*ta, Some(*tb)));
							}
						}

						for r in rest.iter() {
							let r = class::range(r.first().unwrap(), r.last().unwrap());
							push(&mut ids, &mut queue, r, (*ta, None));
						}
					}
					None => push(&mut ids, &mut queue, *ra, (*ta, None)),
				}
			}

			rows.push(normalize_row(row));
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// The automaton accepting the complement of the language, relative to
	/// all strings over the alphabet.
	///
	/// The implicit dead state is materialized with a single full-alphabet
	/// transition, then the final states are flipped.
	pub fn complement(&self) -> Self {
		let dead = self.rows.len() as StateId;
		let mut rows = self.rows.clone();

		for row in &mut rows {
			let mut covered = RangeSet::new();
			for (range, _) in row.iter() {
				covered.insert(*range);
			}

			for gap in class::complement(&covered).iter() {
				let r = class::range(gap.first().unwrap(), gap.last().unwrap());
				row.push((r, dead));
			}

			let normalized = normalize_row(std::mem::take(row));
			*row = normalized;
		}

		rows.push(vec![(class::range(T::MIN, T::MAX), dead)]);

		let finals = (0..=dead).filter(|q| !self.finals.contains(q)).collect();

		Self {
			initial: self.initial,
			finals,
			rows,
		}
	}

	/// The automaton accepting the suffixes that complete a string of
	/// `prefix` into a string of `self`: the left quotient of `self` by
	/// `prefix`'s language.
	pub fn derivative(&self, prefix: &Self) -> Self {
		// Collect every state of `self` reachable by a string of `prefix`.
		let mut seeds = BTreeSet::new();
		let mut visited = HashSet::new();
		let mut stack = vec![(self.initial, prefix.initial)];

		while let Some((qa, qb)) = stack.pop() {
			if visited.insert((qa, qb)) {
				if prefix.is_final_state(qb) {
					seeds.insert(qa);
				}

				for (ra, ta) in &self.rows[qa as usize] {
					for (rb, tb) in &prefix.rows[qb as usize] {
						if class::range_intersection(ra, rb).is_some() {
							stack.push((*ta, *tb));
						}
					}
				}
			}
		}

		self.subset_from(seeds)
	}

	/// The automaton of strings labeling a path from `source` to any state
	/// of `targets`.
	pub fn subpaths(&self, source: StateId, targets: &BTreeSet<StateId>) -> Self {
		Self {
			initial: source,
			finals: targets.clone(),
			rows: self.rows.clone(),
		}
		.trimmed()
	}

	/// Subset construction over `self` started from the given state set.
	fn subset_from(&self, seeds: BTreeSet<StateId>) -> Self {
		if seeds.is_empty() {
			return Self::empty();
		}

		let mut ids: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
		ids.insert(seeds.clone(), 0);

		let mut queue = VecDeque::new();
		queue.push_back(seeds);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some(set) = queue.pop_front() {
			let q = rows.len() as StateId;

			if set.iter().any(|s| self.is_final_state(*s)) {
				finals.insert(q);
			}

			let segments = class::refine(
				set.iter()
					.flat_map(|s| self.rows[*s as usize].iter().map(|(r, _)| *r)),
			);

			let mut row = Vec::new();
			for segment in segments {
				let rep = segment.first().unwrap();
				let targets: BTreeSet<StateId> =
					set.iter().filter_map(|s| self.target(*s, rep)).collect();
				debug_assert!(!targets.is_empty());

				let next = ids.len() as StateId;
				let target = match ids.get(&targets) {
					Some(t) => *t,
					None => {
						ids.insert(targets.clone(), next);
						queue.push_back(targets);
						next
					}
				};

				row.push((segment, target));
			}

			rows.push(normalize_row(row));
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// Restricts the automaton to the states reachable from the initial
	/// state, renumbered in breadth-first order.
	pub fn trimmed(&self) -> Self {
		let mut order: HashMap<StateId, StateId> = HashMap::new();
		order.insert(self.initial, 0);

		let mut queue = VecDeque::new();
		queue.push_back(self.initial);

		let mut visit = Vec::new();
		while let Some(q) = queue.pop_front() {
			visit.push(q);

			for (_, target) in &self.rows[q as usize] {
				if !order.contains_key(target) {
					order.insert(*target, order.len() as StateId);
					queue.push_back(*target);
				}
			}
		}

		let rows = visit
			.iter()
			.map(|q| {
				self.rows[*q as usize]
					.iter()
					.map(|(range, target)| (*range, order[target]))
					.collect()
			})
			.collect();

		let finals = self
			.finals
			.iter()
			.filter_map(|q| order.get(q).copied())
			.collect();

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// Checks if the accepted language is empty.
	pub fn is_empty(&self) -> bool {
		let mut visited = HashSet::new();
		let mut stack = vec![self.initial];

		while let Some(q) = stack.pop() {
			if visited.insert(q) {
				if self.is_final_state(q) {
					return false;
				}

				for (_, target) in &self.rows[q as usize] {
					stack.push(*target);
				}
			}
		}

		true
	}

	/// Checks if both automata accept the same language.
	pub fn is_equivalent(&self, other: &Self) -> bool {
		self.difference(other).is_empty() && other.difference(self).is_empty()
	}

	/// Returns the canonical minimal automaton accepting the same language.
	///
	/// Unreachable states are removed, equivalent states are merged by
	/// Hopcroft partition refinement over the refined transition ranges,
	/// and the blocks are renumbered by breadth-first order from the
	/// initial state, following transitions in range order. Two automata
	/// accepting the same language minimize to identical values.
	pub fn minimized(&self) -> Self {
		let t = self.trimmed();
		let n = t.rows.len();
		let dead = n;

		let classes = class::refine(t.rows.iter().flatten().map(|(r, _)| *r));
		if classes.is_empty() {
			return if t.finals.contains(&t.initial) {
				Self::epsilon()
			} else {
				Self::empty()
			};
		}

		let reps: Vec<T> = classes.iter().map(|c| c.first().unwrap()).collect();

		// Total transition table over the alphabet classes, dead state
		// included.
		let mut table = vec![vec![dead; reps.len()]; n + 1];
		for (q, row) in table.iter_mut().enumerate().take(n) {
			for (ci, rep) in reps.iter().enumerate() {
				if let Some(target) = t.target(q as StateId, *rep) {
					row[ci] = target as usize;
				}
			}
		}

		let mut accepting = vec![false; n + 1];
		for q in &t.finals {
			accepting[*q as usize] = true;
		}

		let block_of = minimize::equivalence_classes(&table, &accepting);

		let dead_block = block_of[dead];
		let initial_block = block_of[t.initial as usize];
		if initial_block == dead_block {
			return Self::empty();
		}

		// Smallest member of each block serves as its representative.
		let block_count = block_of.iter().max().unwrap() + 1;
		let mut rep_state = vec![usize::MAX; block_count];
		for (q, b) in block_of.iter().enumerate() {
			if rep_state[*b] == usize::MAX {
				rep_state[*b] = q;
			}
		}

		// Canonical renumbering by breadth-first order over the alphabet
		// classes.
		let mut order: HashMap<usize, StateId> = HashMap::new();
		order.insert(initial_block, 0);

		let mut queue = VecDeque::new();
		queue.push_back(initial_block);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some(b) = queue.pop_front() {
			let q = rows.len() as StateId;
			let rep = rep_state[b];

			if accepting[rep] {
				finals.insert(q);
			}

			let mut row = Vec::new();
			for (ci, segment) in classes.iter().enumerate() {
				let tb = block_of[table[rep][ci]];
				if tb == dead_block {
					continue;
				}

				let next = order.len() as StateId;
				let target = match order.get(&tb) {
					Some(t) => *t,
					None => {
						order.insert(tb, next);
						queue.push_back(tb);
						next
					}
				};

				row.push((*segment, target));
			}

			rows.push(normalize_row(row));
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// Converts to the symbol-indexed representation by enumerating every
	/// range. Expensive for wide ranges.
	pub fn to_symbols(&self) -> SymbolDFA<T> {
		let rows = self
			.rows
			.iter()
			.map(|row| {
				let mut map = BTreeMap::new();
				for (range, target) in row {
					let mut s = range.first().unwrap();
					let hi = range.last().unwrap();
					loop {
						map.insert(s, *target);
						if s == hi {
							break;
						}
						s = s.next().unwrap();
					}
				}
				map
			})
			.collect();

		SymbolDFA::from_parts(self.initial, self.finals.clone(), rows)
	}
}

#[cfg(test)]
mod tests {
	use super::RangeDFA;
	use std::collections::BTreeSet;

	fn ab_star() -> RangeDFA<u8> {
		RangeDFA::from_range(b'a', b'b').star()
	}

	#[test]
	fn from_range_of_one_symbol_is_literal() {
		assert_eq!(RangeDFA::from_range(b'x', b'x'), RangeDFA::literal(b'x'));
	}

	#[test]
	fn epsilon_and_empty() {
		let eps = RangeDFA::<u8>::epsilon();
		assert!(eps.accepts([]));
		assert!(!eps.accepts([b'a']));
		assert!(!eps.is_empty());

		let empty = RangeDFA::<u8>::empty();
		assert!(!empty.accepts([]));
		assert!(empty.is_empty());
	}

	#[test]
	fn star_and_plus() {
		let a = RangeDFA::literal(b'a');
		assert!(a.star().accepts([]));
		assert!(a.star().accepts([b'a', b'a', b'a']));
		assert!(!a.plus().accepts([]));
		assert!(a.plus().accepts([b'a']));
	}

	#[test]
	fn concatenation_orders_factors() {
		let ab = RangeDFA::literal(b'a').concatenation(&RangeDFA::literal(b'b'));
		assert!(ab.accepts(*b"ab"));
		assert!(!ab.accepts(*b"ba"));
		assert!(!ab.accepts(*b"a"));
	}

	#[test]
	fn union_of_disjoint_ranges() {
		let d = RangeDFA::from_range(0xa0u16, 0xd7ff)
			.union(&RangeDFA::from_range(0xf900, 0xfdcf))
			.union(&RangeDFA::from_range(0xfdf0, 0xffef));

		assert!(d.accepts([0xa0]));
		assert!(d.accepts([0xd7ff]));
		assert!(d.accepts([0xfa00]));
		assert!(d.accepts([0xffef]));
		assert!(!d.accepts([0x9f]));
		assert!(!d.accepts([0xe000]));
		assert!(!d.accepts([0xa0, 0xa0]));
		assert!(!d.accepts([]));
	}

	#[test]
	fn full_scalar_alphabet_stays_compact() {
		let any = RangeDFA::from_range('\u{0}', char::MAX).star();
		assert!(any.state_count() <= 2);
		assert!(any.transition_count() <= 2);
		assert!(any.accepts("héllo \u{10ffff}".chars()));
	}

	#[test]
	fn complement_flips_membership() {
		let a = RangeDFA::literal(b'a');
		let c = a.complement();
		assert!(!c.accepts(*b"a"));
		assert!(c.accepts(*b""));
		assert!(c.accepts(*b"b"));
		assert!(c.accepts(*b"aa"));

		assert!(a.intersection(&c).is_empty());
		assert!(!a.union(&c).complement().accepts(*b"anything"));
	}

	#[test]
	fn difference_and_equivalence() {
		let ab = ab_star();
		let a = RangeDFA::literal(b'a').star();
		let diff = ab.difference(&a);

		assert!(diff.accepts(*b"ab"));
		assert!(!diff.accepts(*b"aa"));
		assert!(!diff.accepts(*b""));

		assert!(ab.is_equivalent(&ab.minimized()));
		assert!(!ab.is_equivalent(&a));
	}

	#[test]
	fn minimization_is_canonical() {
		// Two structurally different constructions of the same language
		// minimize to identical automata.
		let left = ab_star();
		let right = RangeDFA::literal(b'a')
			.union(&RangeDFA::literal(b'b'))
			.star();

		assert_eq!(left.minimized(), right.minimized());
		assert_eq!(left.minimized().minimized(), left.minimized());
	}

	#[test]
	fn word_trie_minimizes_to_expected_states() {
		let d = RangeDFA::from_words([b"a".as_slice(), b"ab", b"abc"]).minimized();

		assert_eq!(d.state_count(), 4);
		assert!(d.accepts(*b"a"));
		assert!(d.accepts(*b"ab"));
		assert!(d.accepts(*b"abc"));
		assert!(!d.accepts(*b""));
		assert!(!d.accepts(*b"abcc"));
		assert!(!d.accepts(*b"b"));
	}

	#[test]
	fn derivative_is_the_left_quotient() {
		let d = RangeDFA::word(b"abc").derivative(&RangeDFA::word(b"a"));
		assert!(d.accepts(*b"bc"));
		assert!(!d.accepts(*b"abc"));

		let none = RangeDFA::word(b"abc").derivative(&RangeDFA::word(b"x"));
		assert!(none.is_empty());
	}

	#[test]
	fn subpaths_between_states() {
		let d = RangeDFA::word(b"abc");
		// States of a word automaton are numbered along the chain.
		let sub = d.subpaths(1, &BTreeSet::from([3]));
		assert!(sub.accepts(*b"bc"));
		assert!(!sub.accepts(*b"abc"));
	}

	#[test]
	fn symbol_and_range_representations_agree() {
		let range = ab_star().concatenation(&RangeDFA::literal(b'c'));
		let symbol = range.to_symbols();

		for input in [&b"c"[..], b"abc", b"aabbc", b"", b"ab", b"cc"] {
			assert_eq!(
				range.accepts(input.iter().copied()),
				symbol.accepts(input.iter().copied())
			);
		}
	}
}
