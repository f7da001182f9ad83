use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::{class, minimize, RangeDFA, StateId, Symbol};

/// Deterministic finite automaton with symbol-indexed transitions.
///
/// States are numbered densely from zero; `transitions[q]` maps single
/// symbols to target states. The transition relation is partial: symbols
/// without an entry lead to an implicit dead state. This representation
/// suits small, dense alphabets; prefer [`RangeDFA`] for sparse alphabets
/// such as Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SymbolDFA<T: Ord> {
	initial: StateId,
	finals: BTreeSet<StateId>,
	rows: Vec<BTreeMap<T, StateId>>,
}

impl<T: Symbol> SymbolDFA<T> {
	/// Creates an automaton from its internal representation.
	pub fn from_parts(
		initial: StateId,
		finals: BTreeSet<StateId>,
		rows: Vec<BTreeMap<T, StateId>>,
	) -> Self {
		Self {
			initial,
			finals,
			rows,
		}
	}

	/// The automaton accepting only the empty string.
	pub fn epsilon() -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::from([0]),
			rows: vec![BTreeMap::new()],
		}
	}

	/// The automaton accepting nothing.
	pub fn empty() -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::new(),
			rows: vec![BTreeMap::new()],
		}
	}

	/// The automaton accepting the single one-symbol string `symbol`.
	pub fn literal(symbol: T) -> Self {
		Self {
			initial: 0,
			finals: BTreeSet::from([1]),
			rows: vec![BTreeMap::from([(symbol, 1)]), BTreeMap::new()],
		}
	}

	/// The automaton accepting every one-symbol string drawn from
	/// `lo..=hi`, one transition per symbol.
	///
	/// Expensive for wide ranges; prefer [`RangeDFA::from_range`].
	pub fn from_range(lo: T, hi: T) -> Self {
		let mut row = BTreeMap::new();
		let mut s = lo;
		loop {
			row.insert(s, 1);
			if s == hi {
				break;
			}
			s = s.next().unwrap();
		}

		Self {
			initial: 0,
			finals: BTreeSet::from([1]),
			rows: vec![row, BTreeMap::new()],
		}
	}

	/// The automaton accepting exactly the given symbol sequence.
	pub fn word(word: &[T]) -> Self {
		let mut rows = vec![BTreeMap::new()];
		for (i, symbol) in word.iter().enumerate() {
			rows[i].insert(*symbol, i as StateId + 1);
			rows.push(BTreeMap::new());
		}

		Self {
			initial: 0,
			finals: BTreeSet::from([word.len() as StateId]),
			rows,
		}
	}

	/// The automaton accepting exactly the given finite set of words,
	/// built as a trie.
	pub fn from_words<'a>(words: impl IntoIterator<Item = &'a [T]>) -> Self
	where
		T: 'a,
	{
		let mut rows: Vec<BTreeMap<T, StateId>> = vec![BTreeMap::new()];
		let mut finals = BTreeSet::new();

		for word in words {
			let mut q = 0usize;
			for symbol in word {
				q = match rows[q].get(symbol) {
					Some(r) => *r as usize,
					None => {
						let r = rows.len();
						rows[q].insert(*symbol, r as StateId);
						rows.push(BTreeMap::new());
						r
					}
				};
			}
			finals.insert(q as StateId);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
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

	/// Returns the outgoing transitions of the given state, in symbol
	/// order.
	pub fn transitions_from(&self, q: StateId) -> impl Iterator<Item = (&T, &StateId)> {
		self.rows[q as usize].iter()
	}

	/// Returns the target of the transition of `q` on `symbol`, if any.
	pub fn target(&self, q: StateId, symbol: T) -> Option<StateId> {
		self.rows[q as usize].get(&symbol).copied()
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

	/// The automaton accepting the union of both languages, by product
	/// construction over the disjoint union of both state spaces.
	pub fn union(&self, other: &Self) -> Self {
		let start = (Some(self.initial), Some(other.initial));

		let mut ids = HashMap::new();
		ids.insert(start, 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, qb)) = queue.pop_front() {
			let q = rows.len() as StateId;

			let a_final = qa.map(|q| self.is_final_state(q)).unwrap_or(false);
			let b_final = qb.map(|q| other.is_final_state(q)).unwrap_or(false);
			if a_final || b_final {
				finals.insert(q);
			}

			let mut alphabet = BTreeSet::new();
			if let Some(qa) = qa {
				alphabet.extend(self.rows[qa as usize].keys().copied());
			}
			if let Some(qb) = qb {
				alphabet.extend(other.rows[qb as usize].keys().copied());
			}

			let mut row = BTreeMap::new();
			for symbol in alphabet {
				let pair = (
					qa.and_then(|q| self.target(q, symbol)),
					qb.and_then(|q| other.target(q, symbol)),
				);

				let next = ids.len() as StateId;
				let target = match ids.get(&pair) {
					Some(t) => *t,
					None => {
						ids.insert(pair, next);
						queue.push_back(pair);
						next
					}
				};

				row.insert(symbol, target);
			}

			rows.push(row);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// The automaton accepting the intersection of both languages.
	pub fn intersection(&self, other: &Self) -> Self {
		let start = (self.initial, other.initial);

		let mut ids = HashMap::new();
		ids.insert(start, 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, qb)) = queue.pop_front() {
			let q = rows.len() as StateId;

			if self.is_final_state(qa) && other.is_final_state(qb) {
				finals.insert(q);
			}

			let mut row = BTreeMap::new();
			for (symbol, ta) in &self.rows[qa as usize] {
				if let Some(tb) = other.target(qb, *symbol) {
					let pair = (*ta, tb);

					let next = ids.len() as StateId;
					let target = match ids.get(&pair) {
						Some(t) => *t,
						None => {
							ids.insert(pair, next);
							queue.push_back(pair);
							next
						}
					};

					row.insert(*symbol, target);
				}
			}

			rows.push(row);
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
		let start = (self.initial, Some(other.initial));

		let mut ids = HashMap::new();
		ids.insert(start, 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, qb)) = queue.pop_front() {
			let q = rows.len() as StateId;

			let b_final = qb.map(|q| other.is_final_state(q)).unwrap_or(false);
			if self.is_final_state(qa) && !b_final {
				finals.insert(q);
			}

			let mut row = BTreeMap::new();
			for (symbol, ta) in &self.rows[qa as usize] {
				let pair = (*ta, qb.and_then(|q| other.target(q, *symbol)));

				let next = ids.len() as StateId;
				let target = match ids.get(&pair) {
					Some(t) => *t,
					None => {
						ids.insert(pair, next);
						queue.push_back(pair);
						next
					}
				};

				row.insert(*symbol, target);
			}

			rows.push(row);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// The automaton accepting the complement of the language.
	///
	/// Totalizes the transition relation by enumerating the whole alphabet
	/// in every state, then flips the final states. Expensive for wide
	/// alphabets; prefer [`RangeDFA::complement`].
	pub fn complement(&self) -> Self {
		let dead = self.rows.len() as StateId;
		let mut rows = self.rows.clone();
		rows.push(BTreeMap::new());

		for row in &mut rows {
			let mut s = T::MIN;
			loop {
				row.entry(s).or_insert(dead);
				match s.next() {
					Some(r) => s = r,
					None => break,
				}
			}
		}

		let finals = (0..=dead).filter(|q| !self.finals.contains(q)).collect();

		Self {
			initial: self.initial,
			finals,
			rows,
		}
	}

	/// The automaton accepting the concatenation of both languages, by
	/// subset construction after ε-linking the final states of `self` to
	/// the initial state of `other`.
	pub fn concatenation(&self, other: &Self) -> Self {
		let mut b_start = BTreeSet::new();
		if self.is_final_state(self.initial) {
			b_start.insert(other.initial);
		}
		let start = (Some(self.initial), b_start);

		let mut ids = HashMap::new();
		ids.insert(start.clone(), 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((qa, set)) = queue.pop_front() {
			let q = rows.len() as StateId;

			if set.iter().any(|s| other.is_final_state(*s)) {
				finals.insert(q);
			}

			let mut alphabet = BTreeSet::new();
			if let Some(qa) = qa {
				alphabet.extend(self.rows[qa as usize].keys().copied());
			}
			for s in &set {
				alphabet.extend(other.rows[*s as usize].keys().copied());
			}

			let mut row = BTreeMap::new();
			for symbol in alphabet {
				let ta = qa.and_then(|q| self.target(q, symbol));
				let mut next_set: BTreeSet<StateId> =
					set.iter().filter_map(|s| other.target(*s, symbol)).collect();
				if ta.map(|t| self.is_final_state(t)).unwrap_or(false) {
					next_set.insert(other.initial);
				}

				if ta.is_none() && next_set.is_empty() {
					continue;
				}

				let state = (ta, next_set);

				let next = ids.len() as StateId;
				let target = match ids.get(&state) {
					Some(t) => *t,
					None => {
						ids.insert(state.clone(), next);
						queue.push_back(state);
						next
					}
				};

				row.insert(symbol, target);
			}

			rows.push(row);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	fn repeat_subset(&self, accept_empty: bool) -> Self {
		let start = (accept_empty, BTreeSet::from([self.initial]));

		let mut ids = HashMap::new();
		ids.insert(start.clone(), 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some((is_start, set)) = queue.pop_front() {
			let q = rows.len() as StateId;

			if is_start || set.iter().any(|s| self.is_final_state(*s)) {
				finals.insert(q);
			}

			let mut alphabet = BTreeSet::new();
			for s in &set {
				alphabet.extend(self.rows[*s as usize].keys().copied());
			}

			let mut row = BTreeMap::new();
			for symbol in alphabet {
				let mut next_set: BTreeSet<StateId> =
					set.iter().filter_map(|s| self.target(*s, symbol)).collect();
				if next_set.is_empty() {
					continue;
				}

				// Completing one repetition allows starting the next.
				if next_set.iter().any(|s| self.is_final_state(*s)) {
					next_set.insert(self.initial);
				}

				let state = (false, next_set);

				let next = ids.len() as StateId;
				let target = match ids.get(&state) {
					Some(t) => *t,
					None => {
						ids.insert(state.clone(), next);
						queue.push_back(state);
						next
					}
				};

				row.insert(symbol, target);
			}

			rows.push(row);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// The automaton accepting zero or more repetitions of the language.
	pub fn star(&self) -> Self {
		self.repeat_subset(true)
	}

	/// The automaton accepting one or more repetitions of the language.
	pub fn plus(&self) -> Self {
		self.repeat_subset(false)
	}

	/// The automaton also accepting the empty string.
	pub fn optional(&self) -> Self {
		let mut rows = self.rows.clone();
		let fresh = rows.len() as StateId;
		rows.push(self.rows[self.initial as usize].clone());

		let mut finals = self.finals.clone();
		finals.insert(fresh);

		Self {
			initial: fresh,
			finals,
			rows,
		}
	}

	/// The automaton accepting the suffixes that complete a string of
	/// `prefix` into a string of `self`: the left quotient of `self` by
	/// `prefix`'s language.
	pub fn derivative(&self, prefix: &Self) -> Self {
		let mut seeds = BTreeSet::new();
		let mut visited = HashSet::new();
		let mut stack = vec![(self.initial, prefix.initial)];

		while let Some((qa, qb)) = stack.pop() {
			if visited.insert((qa, qb)) {
				if prefix.is_final_state(qb) {
					seeds.insert(qa);
				}

				for (symbol, ta) in &self.rows[qa as usize] {
					if let Some(tb) = prefix.target(qb, *symbol) {
						stack.push((*ta, tb));
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

	fn subset_from(&self, seeds: BTreeSet<StateId>) -> Self {
		if seeds.is_empty() {
			return Self::empty();
		}

		let mut ids = HashMap::new();
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

			let mut alphabet = BTreeSet::new();
			for s in &set {
				alphabet.extend(self.rows[*s as usize].keys().copied());
			}

			let mut row = BTreeMap::new();
			for symbol in alphabet {
				let next_set: BTreeSet<StateId> =
					set.iter().filter_map(|s| self.target(*s, symbol)).collect();

				let next = ids.len() as StateId;
				let target = match ids.get(&next_set) {
					Some(t) => *t,
					None => {
						ids.insert(next_set.clone(), next);
						queue.push_back(next_set);
						next
					}
				};

				row.insert(symbol, target);
			}

			rows.push(row);
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

			for target in self.rows[q as usize].values() {
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
					.map(|(symbol, target)| (*symbol, order[target]))
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

				for target in self.rows[q as usize].values() {
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
	/// Works like [`RangeDFA::minimized`], refining over the symbols
	/// observed on transitions: symbols never mentioned reach the dead
	/// state from every state and cannot distinguish any pair.
	pub fn minimized(&self) -> Self {
		let t = self.trimmed();
		let n = t.rows.len();
		let dead = n;

		let symbols: BTreeSet<T> = t.rows.iter().flat_map(|row| row.keys().copied()).collect();
		if symbols.is_empty() {
			return if t.finals.contains(&t.initial) {
				Self::epsilon()
			} else {
				Self::empty()
			};
		}

		let symbols: Vec<T> = symbols.into_iter().collect();

		let mut table = vec![vec![dead; symbols.len()]; n + 1];
		for (q, row) in table.iter_mut().enumerate().take(n) {
			for (si, symbol) in symbols.iter().enumerate() {
				if let Some(target) = t.target(q as StateId, *symbol) {
					row[si] = target as usize;
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

			let mut row = BTreeMap::new();
			for (si, symbol) in symbols.iter().enumerate() {
				let tb = block_of[table[rep][si]];
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

				row.insert(*symbol, target);
			}

			rows.push(row);
		}

		Self {
			initial: 0,
			finals,
			rows,
		}
	}

	/// Converts to the range-partitioned representation, merging runs of
	/// consecutive symbols sharing a target.
	pub fn to_ranges(&self) -> RangeDFA<T> {
		let rows = self
			.rows
			.iter()
			.map(|row| {
				row.iter()
					.map(|(symbol, target)| (class::range(*symbol, *symbol), *target))
					.collect()
			})
			.collect();

		RangeDFA::from_parts(self.initial, self.finals.clone(), rows)
	}
}

#[cfg(test)]
mod tests {
	use super::SymbolDFA;

	#[test]
	fn from_range_of_one_symbol_is_literal() {
		assert_eq!(SymbolDFA::from_range(b'x', b'x'), SymbolDFA::literal(b'x'));
	}

	#[test]
	fn epsilon_and_empty() {
		let eps = SymbolDFA::<u8>::epsilon();
		assert!(eps.accepts([]));
		assert!(!eps.accepts([b'a']));

		let empty = SymbolDFA::<u8>::empty();
		assert!(!empty.accepts([]));
		assert!(empty.is_empty());
	}

	#[test]
	fn union_and_intersection() {
		let a = SymbolDFA::word(b"cat");
		let b = SymbolDFA::word(b"car");
		let either = a.union(&b);

		assert!(either.accepts(*b"cat"));
		assert!(either.accepts(*b"car"));
		assert!(!either.accepts(*b"ca"));

		assert!(a.intersection(&b).is_empty());
		assert!(either.intersection(&a).is_equivalent(&a));
	}

	#[test]
	fn concatenation_links_finals() {
		let d = SymbolDFA::word(b"ab").concatenation(&SymbolDFA::word(b"cd"));
		assert!(d.accepts(*b"abcd"));
		assert!(!d.accepts(*b"ab"));
		assert!(!d.accepts(*b"cd"));

		let e = SymbolDFA::<u8>::epsilon();
		let a = SymbolDFA::word(b"a");
		assert!(e.concatenation(&a).is_equivalent(&a));
		assert!(a.concatenation(&e).is_equivalent(&a));
	}

	#[test]
	fn star_allows_restarts() {
		let d = SymbolDFA::word(b"ab").star();
		assert!(d.accepts(*b""));
		assert!(d.accepts(*b"ab"));
		assert!(d.accepts(*b"abab"));
		assert!(!d.accepts(*b"aba"));

		let p = SymbolDFA::word(b"ab").plus();
		assert!(!p.accepts(*b""));
		assert!(p.accepts(*b"abab"));
	}

	#[test]
	fn optional_only_adds_the_empty_string() {
		let d = SymbolDFA::word(b"ab").optional();
		assert!(d.accepts(*b""));
		assert!(d.accepts(*b"ab"));
		assert!(!d.accepts(*b"abab"));
	}

	#[test]
	fn complement_over_a_byte_alphabet() {
		let a = SymbolDFA::literal(b'a');
		let c = a.complement();
		assert!(!c.accepts(*b"a"));
		assert!(c.accepts(*b""));
		assert!(c.accepts(*b"b"));
		assert!(c.accepts(*b"ab"));
		assert!(a.intersection(&c).is_empty());
	}

	#[test]
	fn difference_of_star_languages() {
		let any = SymbolDFA::from_range(b'a', b'b').star();
		let only_a = SymbolDFA::literal(b'a').star();
		let diff = any.difference(&only_a);

		assert!(diff.accepts(*b"b"));
		assert!(diff.accepts(*b"ab"));
		assert!(!diff.accepts(*b""));
		assert!(!diff.accepts(*b"aa"));
	}

	#[test]
	fn minimization_merges_equivalent_states() {
		let d = SymbolDFA::from_words([b"ac".as_slice(), b"bc"]);
		// The trie has distinct middle states for "a" and "b" carrying the
		// same residual language.
		assert_eq!(d.state_count(), 5);
		let m = d.minimized();
		assert_eq!(m.state_count(), 3);
		assert!(m.accepts(*b"ac"));
		assert!(m.accepts(*b"bc"));
		assert!(!m.accepts(*b"ab"));

		assert_eq!(m.minimized(), m);
	}

	#[test]
	fn derivative_and_subpaths() {
		let d = SymbolDFA::word(b"abc");
		let suffix = d.derivative(&SymbolDFA::word(b"ab"));
		assert!(suffix.accepts(*b"c"));
		assert!(!suffix.accepts(*b"bc"));

		let sub = d.subpaths(1, &std::collections::BTreeSet::from([3]));
		assert!(sub.accepts(*b"bc"));
	}

	#[test]
	fn range_roundtrip_preserves_the_language() {
		let d = SymbolDFA::from_range(0u8, 0x0f).star();
		let r = d.to_ranges();
		assert!(r.accepts([0x00, 0x0f, 0x07]));
		assert!(!r.accepts([0x10]));
		assert_eq!(r.to_symbols(), d);
	}
}
