//! Canonical ABNF rendering of the AST.
//!
//! A rendered rulelist terminates every rule line with CRLF and parses
//! back to an equal tree, numeric bases included.

use core::fmt;

use super::{
	Alternation, Base, CharVal, Concatenation, DefinedAs, Element, NumForm, NumVal, Repetition,
	Rule, Rulelist,
};

impl fmt::Display for Rulelist {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for rule in self {
			write!(f, "{rule}\r\n")?;
		}

		Ok(())
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} {} {}", self.name, self.defined_as, self.alternation)
	}
}

impl fmt::Display for DefinedAs {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Equal => write!(f, "="),
			Self::Append => write!(f, "=/"),
		}
	}
}

impl fmt::Display for Alternation {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, concatenation) in self.into_iter().enumerate() {
			if i > 0 {
				write!(f, " / ")?;
			}

			concatenation.fmt(f)?;
		}

		Ok(())
	}
}

impl fmt::Display for Concatenation {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, repetition) in self.into_iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}

			repetition.fmt(f)?;
		}

		Ok(())
	}
}

impl fmt::Display for Repetition {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match (self.min, self.max) {
			(1, Some(1)) => {}
			(min, Some(max)) if min == max => write!(f, "{min}")?,
			(min, max) => {
				if min > 0 {
					write!(f, "{min}")?;
				}
				write!(f, "*")?;
				if let Some(max) = max {
					write!(f, "{max}")?;
				}
			}
		}

		self.element.fmt(f)
	}
}

impl fmt::Display for Element {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Rulename(name) => write!(f, "{name}"),
			Self::Group(alternation) => write!(f, "({alternation})"),
			Self::Optional(alternation) => write!(f, "[{alternation}]"),
			Self::CharVal(value) => value.fmt(f),
			Self::NumVal(value) => value.fmt(f),
			Self::ProseVal(text) => write!(f, "<{text}>"),
		}
	}
}

impl fmt::Display for CharVal {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.sensitive {
			write!(f, "%s")?;
		}

		write!(f, "\"{}\"", self.value)
	}
}

impl fmt::Display for NumVal {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let digits = |f: &mut fmt::Formatter, value: u32| match self.base {
			Base::Binary => write!(f, "{value:b}"),
			Base::Decimal => write!(f, "{value}"),
			Base::Hexadecimal => write!(f, "{value:X}"),
		};

		self.base.fmt(f)?;
		match &self.form {
			NumForm::Single(value) => digits(f, *value),
			NumForm::Range(lo, hi) => {
				digits(f, *lo)?;
				write!(f, "-")?;
				digits(f, *hi)
			}
			NumForm::Sequence(values) => {
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						write!(f, ".")?;
					}
					digits(f, *value)?;
				}

				Ok(())
			}
		}
	}
}

impl fmt::Display for Base {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Binary => write!(f, "%b"),
			Self::Decimal => write!(f, "%d"),
			Self::Hexadecimal => write!(f, "%x"),
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::ast::*;

	#[test]
	fn renders_canonical_abnf() {
		let rule = Rule {
			name: "greeting".into(),
			defined_as: DefinedAs::Equal,
			alternation: [
				Concatenation::from_iter([
					Repetition::once(Element::CharVal(CharVal {
						sensitive: false,
						value: "hello".into(),
					})),
					Repetition {
						min: 0,
						max: Some(3),
						element: Element::NumVal(NumVal {
							base: Base::Hexadecimal,
							form: NumForm::Single(0x21),
						}),
					},
				]),
				Concatenation::from(Element::Rulename("other".into())),
			]
			.into_iter()
			.collect(),
		};

		assert_eq!(rule.to_string(), "greeting = \"hello\" *3%x21 / other");

		let list: Rulelist = [rule].into_iter().collect();
		assert_eq!(
			list.to_string(),
			"greeting = \"hello\" *3%x21 / other\r\n"
		);
	}

	#[test]
	fn renders_repetitions() {
		let element = Element::Rulename("x".into());
		let cases = [
			(Repetition::once(element.clone()), "x"),
			(Repetition::any(element.clone()), "*x"),
			(
				Repetition {
					min: 2,
					max: Some(2),
					element: element.clone(),
				},
				"2x",
			),
			(
				Repetition {
					min: 1,
					max: None,
					element: element.clone(),
				},
				"1*x",
			),
			(
				Repetition {
					min: 0,
					max: Some(4),
					element,
				},
				"*4x",
			),
		];

		for (repetition, expected) in cases {
			assert_eq!(repetition.to_string(), expected);
		}
	}

	#[test]
	fn renders_num_vals_in_their_base() {
		let v = NumVal {
			base: Base::Binary,
			form: NumForm::Range(0, 5),
		};
		assert_eq!(v.to_string(), "%b0-101");

		let v = NumVal {
			base: Base::Decimal,
			form: NumForm::Sequence(vec![13, 10]),
		};
		assert_eq!(v.to_string(), "%d13.10");
	}
}
