use btree_range_map::AnyRange;
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{class, RangeDFA, StateId, Symbol};

/// Nondeterministic finite automaton over the symbol type `T`.
///
/// States live in a dense arena indexed by [`StateId`]; each state holds
/// its ε-successors and a plain list of closed-range edges, which may
/// overlap freely. Determinization refines every state set's outgoing
/// ranges into disjoint segments with [`class::refine`] and walks
/// ε-closures as bitmask sweeps over the arena.
///
/// This automaton is the construction vehicle for [`RangeDFA`]: the
/// closure operations splice deterministic automata together with ε-edges
/// and determinize the result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NFA<T> {
	states: Vec<State<T>>,
	initial_states: BTreeSet<StateId>,
	final_states: BTreeSet<StateId>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct State<T> {
	epsilon: Vec<StateId>,
	edges: Vec<(AnyRange<T>, StateId)>,
}

impl<T> Default for State<T> {
	fn default() -> Self {
		Self {
			epsilon: Vec::new(),
			edges: Vec::new(),
		}
	}
}

impl<T> Default for NFA<T> {
	fn default() -> Self {
		Self {
			states: Vec::new(),
			initial_states: BTreeSet::new(),
			final_states: BTreeSet::new(),
		}
	}
}

impl<T> NFA<T> {
	/// Creates a new empty nondeterministic finite automaton.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the set of initial states.
	pub fn initial_states(&self) -> &BTreeSet<StateId> {
		&self.initial_states
	}

	/// Returns the set of final states.
	pub fn final_states(&self) -> &BTreeSet<StateId> {
		&self.final_states
	}

	/// Returns the number of states in the arena.
	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	/// Grows the state arena so that `q` is a valid state.
	pub fn add_state(&mut self, q: StateId) {
		if self.states.len() <= q as usize {
			self.states.resize_with(q as usize + 1, State::default);
		}
	}

	/// Sets the given state as an initial state.
	pub fn add_initial_state(&mut self, q: StateId) -> bool {
		self.add_state(q);
		self.initial_states.insert(q)
	}

	/// Checks if the given state is a final state.
	pub fn is_final_state(&self, q: StateId) -> bool {
		self.final_states.contains(&q)
	}

	/// Adds a final state to the automaton.
	pub fn add_final_state(&mut self, q: StateId) -> bool {
		self.add_state(q);
		self.final_states.insert(q)
	}

	/// Adds an edge consuming any symbol of the given range.
	pub fn add(&mut self, source: StateId, range: AnyRange<T>, target: StateId) {
		self.add_state(source.max(target));
		self.states[source as usize].edges.push((range, target));
	}

	/// Adds an ε-edge.
	pub fn add_epsilon(&mut self, source: StateId, target: StateId) {
		self.add_state(source.max(target));
		self.states[source as usize].epsilon.push(target);
	}

	/// Closes the given states over ε-edges.
	///
	/// The closure is computed as a single marking sweep over the arena
	/// and comes back in ascending state order, so equal state sets have
	/// equal representations.
	pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
		let mut in_closure = vec![false; self.states.len()];
		let mut stack = Vec::new();

		for q in seeds {
			if !in_closure[q as usize] {
				in_closure[q as usize] = true;
				stack.push(q);
			}
		}

		while let Some(q) = stack.pop() {
			for &r in &self.states[q as usize].epsilon {
				if !in_closure[r as usize] {
					in_closure[r as usize] = true;
					stack.push(r);
				}
			}
		}

		in_closure
			.iter()
			.enumerate()
			.filter_map(|(q, reached)| reached.then_some(q as StateId))
			.collect()
	}
}

impl<T: Symbol> NFA<T> {
	/// Builds the automaton recognizing exactly the given symbol sequence.
	pub fn singleton(word: impl IntoIterator<Item = T>) -> Self {
		let mut nfa = Self::new();
		nfa.add_initial_state(0);

		let mut q = 0;
		for symbol in word {
			nfa.add(q, class::range(symbol, symbol), q + 1);
			q += 1;
		}

		nfa.add_final_state(q);
		nfa
	}

	/// Turns this automaton into a deterministic one by subset
	/// construction.
	///
	/// The outgoing edges of every deterministic state set are first
	/// refined into disjoint segments; each segment then maps to the
	/// ε-closure of the reachable targets. Deterministic states are
	/// numbered in breadth-first discovery order, following segments in
	/// range order, so the numbering is a function of the recognized
	/// language alone.
	pub fn determinize(&self) -> RangeDFA<T> {
		let initial = self.epsilon_closure(self.initial_states.iter().copied());

		let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
		ids.insert(initial.clone(), 0);

		let mut queue = VecDeque::new();
		queue.push_back(initial);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();

		while let Some(set) = queue.pop_front() {
			let q = rows.len() as StateId;

			if set.iter().any(|s| self.final_states.contains(s)) {
				finals.insert(q);
			}

			let segments = class::refine(
				set.iter()
					.flat_map(|s| self.states[*s as usize].edges.iter().map(|(r, _)| *r)),
			);

			let mut row = Vec::new();
			for segment in segments {
				let rep = segment.first().unwrap();
				let targets = self.epsilon_closure(set.iter().flat_map(|s| {
					self.states[*s as usize]
						.edges
						.iter()
						.filter(|(r, _)| class::range_contains(r, rep))
						.map(|(_, target)| *target)
				}));

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

			rows.push(row);
		}

		RangeDFA::from_parts(0, finals, rows)
	}
}

#[cfg(test)]
mod tests {
	use super::NFA;
	use crate::class;

	#[test]
	fn singleton_chain() {
		let aut = NFA::singleton("foo".chars());
		assert_eq!(aut.state_count(), 4);

		let dfa = aut.determinize();
		assert!(dfa.accepts("foo".chars()));
		assert!(!dfa.accepts("fo".chars()));
		assert!(!dfa.accepts("fooo".chars()));
	}

	#[test]
	fn epsilon_closure_is_transitive() {
		let mut aut = NFA::new();
		aut.add_initial_state(0);
		aut.add_epsilon(0, 1);
		aut.add_epsilon(1, 2);
		aut.add(2, class::range('a', 'z'), 3);
		aut.add_final_state(3);

		assert_eq!(aut.epsilon_closure([0]), vec![0, 1, 2]);
		assert_eq!(aut.epsilon_closure([3]), vec![3]);

		let dfa = aut.determinize();
		assert!(dfa.accepts("q".chars()));
		assert!(!dfa.accepts("".chars()));
	}

	#[test]
	fn overlapping_edges_are_refined() {
		// Two overlapping edges from the same state must end up in a
		// deterministic automaton agreeing with both.
		let mut aut = NFA::new();
		aut.add_initial_state(0);
		aut.add(0, class::range(b'a', b'm'), 1);
		aut.add(0, class::range(b'h', b'z'), 2);
		aut.add_final_state(1);
		aut.add_final_state(2);

		let dfa = aut.determinize();
		for b in [b'a', b'h', b'm', b'z'] {
			assert!(dfa.accepts([b]));
		}
		assert!(!dfa.accepts([b'0']));
	}
}
