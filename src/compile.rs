//! Compilation of ABNF rules into finite automata.
//!
//! A [`Compiler`] resolves rule references, merges `=/` extensions, and
//! compiles every needed rule bottom-up into the automaton representation
//! chosen at the call site. Recursive rules cannot be expressed by a finite
//! automaton and are rejected.

use mown::Mown;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use abnfc_automata::{RangeDFA, RegularLanguage, Symbol};

use crate::ast::{Alternation, Concatenation, DefinedAs, Element, NumForm, Repetition, Rulelist};
use crate::core_rules;

/// Rule compilation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
	#[error("rule <{0}> is not defined")]
	UndefinedRule(String),

	#[error("rule <{0}> is recursive and cannot be compiled to a finite automaton")]
	NonRegular(String),

	#[error("rule <{0}> uses a prose value")]
	UnimplementedProse(String),

	#[error("value {value:#x} in rule <{rule}> does not fit the alphabet")]
	SymbolOutOfRange { rule: String, value: u32 },

	#[error("rule <{rule}> exceeds the state budget of {limit}")]
	Overflow { rule: String, limit: usize },

	#[error("rule <{0}> is defined twice")]
	DuplicateRule(String),

	#[error("rule <{0}> is extended with `=/` before being defined")]
	MissingBaseRule(String),
}

/// Merged rule definition, keyed by lowercased name.
struct Definition {
	/// Name as first written in the source.
	name: String,
	alternation: Alternation,
}

/// ABNF rule compiler, generic over the symbol alphabet `T` and the
/// automaton representation `L`.
pub struct Compiler<T, L> {
	core_rules: bool,
	state_budget: Option<usize>,
	marker: PhantomData<fn() -> (T, L)>,
}

impl<T, L> Default for Compiler<T, L> {
	fn default() -> Self {
		Self {
			core_rules: true,
			state_budget: None,
			marker: PhantomData,
		}
	}
}

impl<T: Symbol, L: RegularLanguage<T>> Compiler<T, L> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Disables the built-in RFC 5234 core rules (`ALPHA`, `DIGIT`,
	/// `CRLF`, ...), which otherwise back any reference the rulelist does
	/// not define itself.
	pub fn without_core_rules(mut self) -> Self {
		self.core_rules = false;
		self
	}

	/// Fails compilation with [`CompileError::Overflow`] as soon as a
	/// compiled rule exceeds `limit` states.
	pub fn with_state_budget(mut self, limit: usize) -> Self {
		self.state_budget = Some(limit);
		self
	}

	/// Compiles the given rule and everything it references.
	pub fn rule(&self, rulelist: &Rulelist, name: &str) -> Result<L, CompileError> {
		let definitions = self.definitions(rulelist)?;
		let key = name.to_ascii_lowercase();

		let mut cache = BTreeMap::new();
		self.resolve(&key, &definitions, &mut cache, &mut Vec::new())?;

		Ok(cache.remove(&key).unwrap())
	}

	/// Compiles every rule of the rulelist, returning a dictionary keyed
	/// by the rule names as written in the source.
	pub fn rulelist(&self, rulelist: &Rulelist) -> Result<BTreeMap<String, L>, CompileError> {
		let definitions = self.definitions(rulelist)?;

		let mut cache = BTreeMap::new();
		for key in definitions.keys() {
			self.resolve(key, &definitions, &mut cache, &mut Vec::new())?;
		}

		Ok(definitions
			.into_iter()
			.map(|(key, definition)| (definition.name, cache.remove(&key).unwrap()))
			.collect())
	}

	/// Builds the name → alternation dictionary, merging `=/` extensions
	/// in order of appearance. The base rule of an extension must appear
	/// textually first.
	fn definitions(&self, rulelist: &Rulelist) -> Result<BTreeMap<String, Definition>, CompileError> {
		let mut definitions: BTreeMap<String, Definition> = BTreeMap::new();

		for rule in rulelist {
			let key = rule.name.to_ascii_lowercase();
			match rule.defined_as {
				DefinedAs::Equal => {
					if definitions.contains_key(&key) {
						return Err(CompileError::DuplicateRule(rule.name.clone()));
					}

					definitions.insert(
						key,
						Definition {
							name: rule.name.clone(),
							alternation: rule.alternation.clone(),
						},
					);
				}
				DefinedAs::Append => match definitions.get_mut(&key) {
					Some(definition) => definition
						.alternation
						.extend(rule.alternation.iter().cloned()),
					None => return Err(CompileError::MissingBaseRule(rule.name.clone())),
				},
			}
		}

		Ok(definitions)
	}

	/// Compiles the rule under `key` into the cache, after its
	/// dependencies. A reference cycle means the rule is not regular.
	fn resolve(
		&self,
		key: &str,
		definitions: &BTreeMap<String, Definition>,
		cache: &mut BTreeMap<String, L>,
		in_progress: &mut Vec<String>,
	) -> Result<(), CompileError> {
		if cache.contains_key(key) {
			return Ok(());
		}

		if in_progress.iter().any(|k| k == key) {
			return Err(CompileError::NonRegular(key.to_owned()));
		}

		let definition = match definitions.get(key) {
			Some(definition) => definition,
			None => {
				if self.core_rules {
					if let Some(pattern) = core_rules::pattern(key) {
						cache.insert(key.to_owned(), pattern);
						return Ok(());
					}
				}

				return Err(CompileError::UndefinedRule(key.to_owned()));
			}
		};

		in_progress.push(key.to_owned());

		let mut dependencies = BTreeSet::new();
		definition.alternation.rulenames(&mut dependencies);
		for dependency in &dependencies {
			self.resolve(dependency, definitions, cache, in_progress)?;
		}

		in_progress.pop();

		let pattern = self.alternation(&definition.name, &definition.alternation, cache)?;

		if let Some(limit) = self.state_budget {
			if pattern.state_count() > limit {
				return Err(CompileError::Overflow {
					rule: definition.name.clone(),
					limit,
				});
			}
		}

		cache.insert(key.to_owned(), pattern);
		Ok(())
	}

	fn alternation(
		&self,
		rule: &str,
		alternation: &Alternation,
		cache: &BTreeMap<String, L>,
	) -> Result<L, CompileError> {
		let mut result: Option<L> = None;

		for concatenation in alternation {
			let compiled = self.concatenation(rule, concatenation, cache)?;
			result = Some(match result {
				Some(previous) => previous.union(&compiled),
				None => compiled,
			});
		}

		Ok(result.unwrap_or_else(L::empty))
	}

	fn concatenation(
		&self,
		rule: &str,
		concatenation: &Concatenation,
		cache: &BTreeMap<String, L>,
	) -> Result<L, CompileError> {
		let mut result: Option<L> = None;

		for repetition in concatenation {
			let compiled = self.repetition(rule, repetition, cache)?;
			result = Some(match result {
				Some(previous) => previous.concatenation(&compiled),
				None => compiled,
			});
		}

		Ok(result.unwrap_or_else(L::epsilon))
	}

	fn repetition(
		&self,
		rule: &str,
		repetition: &Repetition,
		cache: &BTreeMap<String, L>,
	) -> Result<L, CompileError> {
		let base = self.element(rule, &repetition.element, cache)?;

		Ok(match (repetition.min, repetition.max) {
			(1, Some(1)) => base.into_owned(),
			(0, None) => base.star(),
			(1, None) => base.plus(),
			(0, Some(1)) => base.optional(),
			(min, Some(max)) if max < min => L::empty(),
			(min, max) => {
				let mut result = L::epsilon();
				for _ in 0..min {
					result = result.concatenation(base.as_ref());
				}

				match max {
					None => result.concatenation(&base.star()),
					Some(max) => {
						let optional = base.optional();
						for _ in min..max {
							result = result.concatenation(&optional);
						}
						result
					}
				}
			}
		})
	}

	fn element<'c>(
		&self,
		rule: &str,
		element: &Element,
		cache: &'c BTreeMap<String, L>,
	) -> Result<Mown<'c, L>, CompileError> {
		match element {
			Element::Rulename(name) => {
				let key = name.to_ascii_lowercase();
				match cache.get(&key) {
					Some(pattern) => Ok(Mown::Borrowed(pattern)),
					None => Err(CompileError::UndefinedRule(name.clone())),
				}
			}
			Element::Group(alternation) => {
				Ok(Mown::Owned(self.alternation(rule, alternation, cache)?))
			}
			Element::Optional(alternation) => Ok(Mown::Owned(
				self.alternation(rule, alternation, cache)?.optional(),
			)),
			Element::CharVal(char_val) => {
				let mut result = L::epsilon();

				for byte in char_val.value.bytes() {
					// Only ASCII letters fold; every other octet compares
					// exactly.
					let part = if !char_val.sensitive && byte.is_ascii_alphabetic() {
						let lower = self.symbol(rule, byte.to_ascii_lowercase().into())?;
						let upper = self.symbol(rule, byte.to_ascii_uppercase().into())?;
						L::literal(lower).union(&L::literal(upper))
					} else {
						L::literal(self.symbol(rule, byte.into())?)
					};

					result = result.concatenation(&part);
				}

				Ok(Mown::Owned(result))
			}
			Element::NumVal(num_val) => Ok(Mown::Owned(match &num_val.form {
				NumForm::Single(value) => L::literal(self.symbol(rule, *value)?),
				NumForm::Range(lo, hi) => {
					L::from_range(self.symbol(rule, *lo)?, self.symbol(rule, *hi)?)
				}
				NumForm::Sequence(values) => {
					let mut result = L::epsilon();
					for value in values {
						result = result.concatenation(&L::literal(self.symbol(rule, *value)?));
					}
					result
				}
			})),
			Element::ProseVal(_) => Err(CompileError::UnimplementedProse(rule.to_owned())),
		}
	}

	fn symbol(&self, rule: &str, value: u32) -> Result<T, CompileError> {
		T::from_code(value).ok_or_else(|| CompileError::SymbolOutOfRange {
			rule: rule.to_owned(),
			value,
		})
	}
}

/// Compiles the given rule of a rulelist into the automaton representation
/// chosen by the caller.
pub fn compile<T: Symbol, L: RegularLanguage<T>>(
	rulelist: &Rulelist,
	rule: &str,
) -> Result<L, CompileError> {
	Compiler::new().rule(rulelist, rule)
}

/// Compiles every top-level rule of a rulelist into range-partitioned
/// automata.
pub fn to_closed_range_pattern<T: Symbol>(
	rulelist: &Rulelist,
) -> Result<BTreeMap<String, RangeDFA<T>>, CompileError> {
	Compiler::new().rulelist(rulelist)
}

#[cfg(test)]
mod tests {
	use super::{compile, CompileError, Compiler};
	use crate::ast::*;
	use abnfc_automata::{RangeDFA, SymbolDFA};

	fn rule(name: &str, alternation: Alternation) -> Rule {
		Rule {
			name: name.into(),
			defined_as: DefinedAs::Equal,
			alternation,
		}
	}

	fn char_val(value: &str) -> Element {
		Element::CharVal(CharVal {
			sensitive: false,
			value: value.into(),
		})
	}

	fn reference(name: &str) -> Element {
		Element::Rulename(name.into())
	}

	#[test]
	fn char_vals_fold_ascii_letters() {
		let list: Rulelist = [rule("greeting", char_val("Hi!").into())].into_iter().collect();
		let d: RangeDFA<u8> = compile(&list, "greeting").unwrap();

		assert!(d.accepts(*b"Hi!"));
		assert!(d.accepts(*b"hI!"));
		assert!(d.accepts(*b"HI!"));
		assert!(!d.accepts(*b"Hi"));
	}

	#[test]
	fn sensitive_char_vals_do_not_fold() {
		let list: Rulelist = [rule(
			"tag",
			Element::CharVal(CharVal {
				sensitive: true,
				value: "Hi".into(),
			})
			.into(),
		)]
		.into_iter()
		.collect();
		let d: RangeDFA<u8> = compile(&list, "tag").unwrap();

		assert!(d.accepts(*b"Hi"));
		assert!(!d.accepts(*b"hi"));
	}

	#[test]
	fn rule_names_are_case_insensitive() {
		let list: Rulelist = [
			rule("value", Element::Rulename("DiGiT".into()).into()),
		]
		.into_iter()
		.collect();
		let d: RangeDFA<u8> = compile(&list, "VALUE").unwrap();

		assert!(d.accepts(*b"7"));
		assert!(!d.accepts(*b"x"));
	}

	#[test]
	fn core_rules_back_undefined_references() {
		let list: Rulelist = [rule(
			"number",
			Concatenation::from(Repetition {
				min: 1,
				max: None,
				element: reference("DIGIT"),
			})
			.into(),
		)]
		.into_iter()
		.collect();

		let d: RangeDFA<u8> = compile(&list, "number").unwrap();
		assert!(d.accepts(*b"42"));
		assert!(!d.accepts(*b""));
		assert!(!d.accepts(*b"4a"));

		let err = Compiler::<u8, RangeDFA<u8>>::new()
			.without_core_rules()
			.rule(&list, "number")
			.unwrap_err();
		assert_eq!(err, CompileError::UndefinedRule("digit".into()));
	}

	#[test]
	fn recursion_is_rejected() {
		let list: Rulelist = [rule(
			"a",
			Concatenation::from_iter([
				Repetition::once(char_val("x")),
				Repetition::once(reference("a")),
			])
			.into(),
		)]
		.into_iter()
		.collect();

		let err = compile::<u8, RangeDFA<u8>>(&list, "a").unwrap_err();
		assert_eq!(err, CompileError::NonRegular("a".into()));
	}

	#[test]
	fn mutual_recursion_is_rejected() {
		let list: Rulelist = [
			rule("a", reference("b").into()),
			rule("b", reference("a").into()),
		]
		.into_iter()
		.collect();

		assert!(matches!(
			compile::<u8, RangeDFA<u8>>(&list, "a"),
			Err(CompileError::NonRegular(_))
		));
	}

	#[test]
	fn incremental_definitions_extend_the_base_rule() {
		let mut list: Rulelist = [rule("a", char_val("x").into())].into_iter().collect();
		list.push(Rule {
			name: "A".into(),
			defined_as: DefinedAs::Append,
			alternation: char_val("y").into(),
		});

		let d: RangeDFA<u8> = compile(&list, "a").unwrap();
		assert!(d.accepts(*b"x"));
		assert!(d.accepts(*b"y"));

		let orphan: Rulelist = [Rule {
			name: "a".into(),
			defined_as: DefinedAs::Append,
			alternation: char_val("y").into(),
		}]
		.into_iter()
		.collect();
		assert_eq!(
			compile::<u8, RangeDFA<u8>>(&orphan, "a").unwrap_err(),
			CompileError::MissingBaseRule("a".into())
		);
	}

	#[test]
	fn duplicate_definitions_are_rejected() {
		let list: Rulelist = [
			rule("a", char_val("x").into()),
			rule("A", char_val("y").into()),
		]
		.into_iter()
		.collect();

		assert_eq!(
			compile::<u8, RangeDFA<u8>>(&list, "a").unwrap_err(),
			CompileError::DuplicateRule("A".into())
		);
	}

	#[test]
	fn prose_vals_are_unimplemented() {
		let list: Rulelist = [rule("a", Element::ProseVal("magic".into()).into())]
			.into_iter()
			.collect();

		assert_eq!(
			compile::<u8, RangeDFA<u8>>(&list, "a").unwrap_err(),
			CompileError::UnimplementedProse("a".into())
		);
	}

	#[test]
	fn out_of_range_values_are_rejected() {
		let list: Rulelist = [rule(
			"wide",
			Element::NumVal(NumVal {
				base: Base::Hexadecimal,
				form: NumForm::Single(0x100),
			})
			.into(),
		)]
		.into_iter()
		.collect();

		assert_eq!(
			compile::<u8, RangeDFA<u8>>(&list, "wide").unwrap_err(),
			CompileError::SymbolOutOfRange {
				rule: "wide".into(),
				value: 0x100
			}
		);

		// The same value fits a wider alphabet.
		assert!(compile::<u16, RangeDFA<u16>>(&list, "wide").is_ok());
	}

	#[test]
	fn state_budgets_abort_compilation() {
		let list: Rulelist = [rule("ab", char_val("ab").into())].into_iter().collect();

		let err = Compiler::<u8, RangeDFA<u8>>::new()
			.with_state_budget(1)
			.rule(&list, "ab")
			.unwrap_err();
		assert_eq!(
			err,
			CompileError::Overflow {
				rule: "ab".into(),
				limit: 1
			}
		);
	}

	#[test]
	fn both_representations_compile_to_the_same_language() {
		let list: Rulelist = [rule(
			"token",
			Concatenation::from_iter([
				Repetition::once(reference("ALPHA")),
				Repetition::any(Element::Group(
					[
						Concatenation::from(reference("ALPHA")),
						Concatenation::from(reference("DIGIT")),
					]
					.into_iter()
					.collect(),
				)),
			])
			.into(),
		)]
		.into_iter()
		.collect();

		let r: RangeDFA<u8> = compile(&list, "token").unwrap();
		let s: SymbolDFA<u8> = compile(&list, "token").unwrap();

		for input in [&b"a"[..], b"a1", b"z09z", b"", b"1a", b"a!"] {
			assert_eq!(
				r.accepts(input.iter().copied()),
				s.accepts(input.iter().copied()),
			);
		}

		assert!(r.is_equivalent(&s.to_ranges()));
	}

	#[test]
	fn empty_rulelist_compiles_to_an_empty_dictionary() {
		let dict = super::to_closed_range_pattern::<u8>(&Rulelist::new()).unwrap();
		assert!(dict.is_empty());
	}

	#[test]
	fn dictionaries_are_keyed_by_source_names() {
		let list: Rulelist = [
			rule("URI", char_val("u").into()),
			rule("other", reference("uri").into()),
		]
		.into_iter()
		.collect();

		let dict = super::to_closed_range_pattern::<u8>(&list).unwrap();
		assert!(dict.contains_key("URI"));
		assert!(dict.contains_key("other"));
		assert!(dict["URI"].accepts(*b"u"));
	}
}
