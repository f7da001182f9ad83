//! Abstract syntax tree of an ABNF (RFC 5234) document.

use std::collections::BTreeSet;
use std::ops::Deref;

mod display;

/// Ordered list of rule definitions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rulelist(Vec<Rule>);

impl Rulelist {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, rule: Rule) {
		self.0.push(rule)
	}

	/// Returns the first rule defined under the given name, compared
	/// case-insensitively.
	pub fn get(&self, name: &str) -> Option<&Rule> {
		self.0.iter().find(|rule| rule.name.eq_ignore_ascii_case(name))
	}
}

impl Deref for Rulelist {
	type Target = [Rule];

	fn deref(&self) -> &Self::Target {
		self.0.as_slice()
	}
}

impl<'a> IntoIterator for &'a Rulelist {
	type IntoIter = std::slice::Iter<'a, Rule>;
	type Item = &'a Rule;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl IntoIterator for Rulelist {
	type IntoIter = std::vec::IntoIter<Rule>;
	type Item = Rule;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl FromIterator<Rule> for Rulelist {
	fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
		Self(Vec::from_iter(iter))
	}
}

/// Single rule definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
	/// Rule name, case-insensitive.
	pub name: String,

	/// Definition operator this rule was written with.
	pub defined_as: DefinedAs,

	/// Right-hand side of the definition.
	pub alternation: Alternation,
}

/// Definition operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinedAs {
	/// `=`, a fresh definition.
	Equal,

	/// `=/`, appending alternatives to an earlier definition.
	Append,
}

/// Nonempty sequence of concatenations separated by `/`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Alternation(Vec<Concatenation>);

impl Alternation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, concatenation: Concatenation) {
		self.0.push(concatenation)
	}

	/// Collects every rule name referenced by this alternation, lowercased.
	pub fn rulenames(&self, names: &mut BTreeSet<String>) {
		for concatenation in self {
			for repetition in concatenation {
				match &repetition.element {
					Element::Rulename(name) => {
						names.insert(name.to_ascii_lowercase());
					}
					Element::Group(alternation) | Element::Optional(alternation) => {
						alternation.rulenames(names)
					}
					Element::CharVal(_) | Element::NumVal(_) | Element::ProseVal(_) => {}
				}
			}
		}
	}
}

impl From<Concatenation> for Alternation {
	fn from(value: Concatenation) -> Self {
		Self(vec![value])
	}
}

impl From<Element> for Alternation {
	fn from(value: Element) -> Self {
		Self(vec![value.into()])
	}
}

impl Deref for Alternation {
	type Target = [Concatenation];

	fn deref(&self) -> &Self::Target {
		self.0.as_slice()
	}
}

impl<'a> IntoIterator for &'a Alternation {
	type IntoIter = std::slice::Iter<'a, Concatenation>;
	type Item = &'a Concatenation;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl FromIterator<Concatenation> for Alternation {
	fn from_iter<I: IntoIterator<Item = Concatenation>>(iter: I) -> Self {
		Self(Vec::from_iter(iter))
	}
}

impl Extend<Concatenation> for Alternation {
	fn extend<I: IntoIterator<Item = Concatenation>>(&mut self, iter: I) {
		self.0.extend(iter)
	}
}

/// Nonempty sequence of repetitions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Concatenation(Vec<Repetition>);

impl Concatenation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, repetition: Repetition) {
		self.0.push(repetition)
	}
}

impl From<Repetition> for Concatenation {
	fn from(value: Repetition) -> Self {
		Self(vec![value])
	}
}

impl From<Element> for Concatenation {
	fn from(value: Element) -> Self {
		Self(vec![Repetition::once(value)])
	}
}

impl Deref for Concatenation {
	type Target = [Repetition];

	fn deref(&self) -> &Self::Target {
		self.0.as_slice()
	}
}

impl<'a> IntoIterator for &'a Concatenation {
	type IntoIter = std::slice::Iter<'a, Repetition>;
	type Item = &'a Repetition;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl FromIterator<Repetition> for Concatenation {
	fn from_iter<I: IntoIterator<Item = Repetition>>(iter: I) -> Self {
		Self(Vec::from_iter(iter))
	}
}

/// Repeated element: `<min>*<max>element`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
	pub min: u32,

	/// `None` when the repetition is unbounded.
	pub max: Option<u32>,

	pub element: Element,
}

impl Repetition {
	/// The element, repeated exactly once.
	pub fn once(element: Element) -> Self {
		Self {
			min: 1,
			max: Some(1),
			element,
		}
	}

	/// The element, repeated any number of times.
	pub fn any(element: Element) -> Self {
		Self {
			min: 0,
			max: None,
			element,
		}
	}
}

/// Element of a concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
	/// Reference to another rule.
	Rulename(String),

	/// Parenthesized group.
	Group(Alternation),

	/// Optional group: `[...]`, equivalent to zero or one repetitions.
	Optional(Alternation),

	/// Quoted literal.
	CharVal(CharVal),

	/// Numeric value, range or sequence.
	NumVal(NumVal),

	/// Opaque prose placeholder: `<...>`.
	ProseVal(String),
}

/// Quoted literal: case-insensitive by default, case-sensitive under `%s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharVal {
	pub sensitive: bool,

	/// Literal text, restricted to `%x20-21 / %x23-7E`.
	pub value: String,
}

/// Numeric terminal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumVal {
	/// Base the value was written in, kept for display.
	pub base: Base,

	pub form: NumForm,
}

/// Shape of a numeric terminal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumForm {
	/// A single symbol: `%x41`.
	Single(u32),

	/// An inclusive symbol range: `%x41-5A`.
	Range(u32, u32),

	/// A fixed symbol sequence: `%x0D.0A`.
	Sequence(Vec<u32>),
}

/// Numeral base of a [`NumVal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
	/// `%b`
	Binary,

	/// `%d`
	Decimal,

	/// `%x`
	Hexadecimal,
}
