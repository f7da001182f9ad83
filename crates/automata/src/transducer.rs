use btree_range_map::AnyRange;
use educe::Educe;
use range_traits::{Enum, Measure};
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{class, RangeDFA, StateId, Symbol};

/// Output behavior of a transducer transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Action<U> {
	/// Emit the given sequence, possibly empty.
	Emit(Vec<U>),

	/// Emit the consumed input symbol itself.
	Echo,
}

/// Deterministic finite transducer mapping strings over `T` to strings
/// over `U`.
///
/// Transitions carry an input range and an output [`Action`]. Determinism
/// on the input side makes the transducer functional: every accepted input
/// has exactly one output. The two distinguished construction modes are
/// [`top`](Transducer::top), which accepts a language while emitting
/// nothing, and [`bottom`](Transducer::bottom), which accepts a language
/// while emitting its input unchanged.
#[derive(Debug, Clone, Educe)]
#[educe(PartialEq(bound(T: Measure + Enum, U: PartialEq)), Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Transducer<T, U = T> {
	initial: StateId,
	finals: BTreeSet<StateId>,
	rows: Vec<Vec<(AnyRange<T>, StateId, Action<U>)>>,
}

impl<T: Symbol, U> Transducer<T, U> {
	/// Creates a transducer from its internal representation.
	///
	/// Input ranges within a row must be disjoint.
	pub fn from_parts(
		initial: StateId,
		finals: BTreeSet<StateId>,
		rows: Vec<Vec<(AnyRange<T>, StateId, Action<U>)>>,
	) -> Self {
		Self {
			initial,
			finals,
			rows,
		}
	}

	/// The transducer accepting exactly the language of `dfa` and emitting
	/// the empty output on every accepted input.
	pub fn top(dfa: &RangeDFA<T>) -> Self {
		Self::project(dfa, |_| Action::Emit(Vec::new()))
	}

	fn project(dfa: &RangeDFA<T>, action: impl Fn(&AnyRange<T>) -> Action<U>) -> Self {
		let rows = (0..dfa.state_count())
			.map(|q| {
				dfa.transitions_from(q as StateId)
					.iter()
					.map(|(range, target)| (*range, *target, action(range)))
					.collect()
			})
			.collect();

		Self {
			initial: dfa.initial_state(),
			finals: dfa.final_states().clone(),
			rows,
		}
	}

	/// Returns the number of states.
	pub fn state_count(&self) -> usize {
		self.rows.len()
	}

	/// Checks if the given state is a final state.
	pub fn is_final_state(&self, q: StateId) -> bool {
		self.finals.contains(&q)
	}

	fn step(&self, q: StateId, symbol: T) -> Option<(StateId, &Action<U>)> {
		for (range, target, action) in &self.rows[q as usize] {
			if symbol >= range.first().unwrap() && symbol <= range.last().unwrap() {
				return Some((*target, action));
			}
		}

		None
	}

	/// The automaton accepting the input domain of this transducer.
	pub fn domain(&self) -> RangeDFA<T> {
		let rows = self
			.rows
			.iter()
			.map(|row| {
				row.iter()
					.map(|(range, target, _)| (*range, *target))
					.collect()
			})
			.collect();

		RangeDFA::from_parts(self.initial, self.finals.clone(), rows)
	}

	/// Checks if the given input belongs to the transducer's domain.
	pub fn contains<I: IntoIterator<Item = T>>(&self, input: I) -> bool {
		let mut q = self.initial;

		for symbol in input {
			match self.step(q, symbol) {
				Some((target, _)) => q = target,
				None => return false,
			}
		}

		self.is_final_state(q)
	}
}

impl<T: Symbol, U: Clone + From<T>> Transducer<T, U> {
	/// Maps the given input to its output, or `None` if the input is
	/// outside the domain.
	pub fn map<I: IntoIterator<Item = T>>(&self, input: I) -> Option<Vec<U>> {
		let mut q = self.initial;
		let mut output = Vec::new();

		for symbol in input {
			let (target, action) = self.step(q, symbol)?;
			match action {
				Action::Emit(w) => output.extend(w.iter().cloned()),
				Action::Echo => output.push(U::from(symbol)),
			}
			q = target;
		}

		if self.is_final_state(q) {
			Some(output)
		} else {
			None
		}
	}

	/// Runs the transducer from state `q` over a concrete symbol sequence.
	fn run(&self, q: StateId, input: &[T]) -> Option<(StateId, Vec<U>)> {
		let mut q = q;
		let mut output = Vec::new();

		for symbol in input {
			let (target, action) = self.step(q, *symbol)?;
			match action {
				Action::Emit(w) => output.extend(w.iter().cloned()),
				Action::Echo => output.push(U::from(*symbol)),
			}
			q = target;
		}

		Some((q, output))
	}
}

impl<T: Symbol, U: Clone + PartialEq + From<T>> Transducer<T, U> {
	/// Checks if two inputs are mapped to the same output.
	///
	/// Returns `false` when either input is outside the domain.
	pub fn is_equivalent<I, J>(&self, a: I, b: J) -> bool
	where
		I: IntoIterator<Item = T>,
		J: IntoIterator<Item = T>,
	{
		match (self.map(a), self.map(b)) {
			(Some(x), Some(y)) => x == y,
			_ => false,
		}
	}
}

impl<T: Symbol> Transducer<T, T> {
	/// The transducer accepting exactly the language of `dfa` and emitting
	/// every accepted input unchanged.
	pub fn bottom(dfa: &RangeDFA<T>) -> Self {
		Self::project(dfa, |_| Action::Echo)
	}

	/// Composes this transducer with `other`: the result maps `s` to
	/// `other.map(self.map(s))`, defined whenever both steps are.
	///
	/// Product construction on states; an emitting transition of `self`
	/// drives `other` over its concrete output, while an echoing
	/// transition is refined against `other`'s input ranges.
	pub fn compose<V: Clone + From<T>>(&self, other: &Transducer<T, V>) -> Transducer<T, V> {
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

			let mut row = Vec::new();
			let mut push = |ids: &mut HashMap<_, StateId>,
			                queue: &mut VecDeque<_>,
			                range: AnyRange<T>,
			                pair: (StateId, StateId),
			                action: Action<V>| {
				let next = ids.len() as StateId;
				let target = match ids.get(&pair) {
					Some(t) => *t,
					None => {
						ids.insert(pair, next);
						queue.push_back(pair);
						next
					}
				};
				row.push((range, target, action));
			};

			for (range, ta, action) in &self.rows[qa as usize] {
				match action {
					Action::Emit(w) => {
						if let Some((tb, output)) = other.run(qb, w) {
							push(&mut ids, &mut queue, *range, (*ta, tb), Action::Emit(output));
						}
					}
					Action::Echo => {
						for (rb, tb, action_b) in &other.rows[qb as usize] {
							if let Some(seg) = class::range_intersection(range, rb) {
								let action = match action_b {
									Action::Emit(w) => Action::Emit(w.clone()),
									Action::Echo => Action::Echo,
								};
								push(&mut ids, &mut queue, seg, (*ta, *tb), action);
							}
						}
					}
				}
			}

			rows.push(row);
		}

		Transducer {
			initial: 0,
			finals,
			rows,
		}
	}
}
