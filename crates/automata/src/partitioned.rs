use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::{class, RangeDFA, StateId, Symbol};

/// Join-semilattice of classification tags.
///
/// When a state of a [`PartitionedDFA`] is final for several of the
/// original automata, its tag is the join of their tags.
pub trait Join {
	fn join(self, other: Self) -> Self;
}

macro_rules! ord_join {
	($($ty:ty),*) => {
		$(
			impl Join for $ty {
				fn join(self, other: Self) -> Self {
					self.max(other)
				}
			}
		)*
	};
}

ord_join!(u8, u16, u32, u64, usize, String, &'static str);

impl<X: Ord> Join for BTreeSet<X> {
	fn join(mut self, other: Self) -> Self {
		self.extend(other);
		self
	}
}

/// Deterministic automaton whose final states carry a classification tag.
///
/// Built from a list of tagged automata, it accepts the union of their
/// languages; looking up an input yields the tag of the automaton (or the
/// join of the tags of the automata) that accepted it, or `None` when no
/// automaton does.
#[derive(Debug, Clone)]
pub struct PartitionedDFA<T, G> {
	dfa: RangeDFA<T>,
	tags: BTreeMap<StateId, G>,
}

impl<T: Symbol, G: Clone + Join> PartitionedDFA<T, G> {
	/// Builds the partitioned automaton of the given tagged parts.
	///
	/// Product construction over all operands at once, refining the
	/// outgoing ranges of the live operands at every product state.
	pub fn from_parts(parts: impl IntoIterator<Item = (RangeDFA<T>, G)>) -> Self {
		let parts: Vec<(RangeDFA<T>, G)> = parts.into_iter().collect();

		let start: Vec<Option<StateId>> = parts
			.iter()
			.map(|(dfa, _)| Some(dfa.initial_state()))
			.collect();

		let mut ids = HashMap::new();
		ids.insert(start.clone(), 0);

		let mut queue = VecDeque::new();
		queue.push_back(start);

		let mut rows = Vec::new();
		let mut finals = BTreeSet::new();
		let mut tags = BTreeMap::new();

		while let Some(state) = queue.pop_front() {
			let q = rows.len() as StateId;

			let mut tag: Option<G> = None;
			for ((dfa, part_tag), part_state) in parts.iter().zip(&state) {
				if part_state.map(|s| dfa.is_final_state(s)).unwrap_or(false) {
					tag = Some(match tag {
						Some(t) => t.join(part_tag.clone()),
						None => part_tag.clone(),
					});
				}
			}
			if let Some(tag) = tag {
				finals.insert(q);
				tags.insert(q, tag);
			}

			let segments = class::refine(parts.iter().zip(&state).flat_map(
				|((dfa, _), part_state)| {
					part_state
						.into_iter()
						.flat_map(|s| dfa.transitions_from(*s).iter().map(|(r, _)| *r))
				},
			));

			let mut row = Vec::new();
			for segment in segments {
				let rep = segment.first().unwrap();
				let targets: Vec<Option<StateId>> = parts
					.iter()
					.zip(&state)
					.map(|((dfa, _), part_state)| part_state.and_then(|s| dfa.target(s, rep)))
					.collect();

				if targets.iter().all(Option::is_none) {
					continue;
				}

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

		Self {
			dfa: RangeDFA::from_parts(0, finals, rows),
			tags,
		}
	}

	/// Classifies the given input: the tag of the reached final state, or
	/// `None` when the input is accepted by none of the parts.
	pub fn classify<I: IntoIterator<Item = T>>(&self, input: I) -> Option<&G> {
		let mut q = self.dfa.initial_state();

		for symbol in input {
			q = self.dfa.target(q, symbol)?;
		}

		self.tags.get(&q)
	}

	/// Returns the underlying automaton, accepting the union of the
	/// parts' languages.
	pub fn automaton(&self) -> &RangeDFA<T> {
		&self.dfa
	}

	/// Returns the tags of the final states.
	pub fn tags(&self) -> &BTreeMap<StateId, G> {
		&self.tags
	}
}
