use abnfc::ast::{
	Alternation, Base, CharVal, Concatenation, DefinedAs, Element, NumForm, NumVal, Repetition,
	Rule, Rulelist,
};

/// Parse failure, carrying the byte offset it occurred at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct Error {
	pub offset: usize,
	pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
	#[error("expected a rule name")]
	ExpectedRulename,

	#[error("expected `=` or `=/`")]
	ExpectedDefinedAs,

	#[error("expected an element")]
	ExpectedElement,

	#[error("expected digits")]
	ExpectedDigits,

	#[error("numeric value does not fit 32 bits")]
	ValueOverflow,

	#[error("numeric range is empty")]
	EmptyNumRange,

	#[error("missing closing `)`")]
	UnclosedGroup,

	#[error("missing closing `]`")]
	UnclosedOption,

	#[error("unterminated quoted string")]
	UnclosedCharVal,

	#[error("invalid character in quoted string")]
	InvalidCharVal,

	#[error("missing closing `>`")]
	UnclosedProseVal,

	#[error("invalid character in prose value")]
	InvalidProseVal,

	#[error("rule lines must end with CRLF")]
	MissingCrlf,
}

/// Parses a strict RFC 5234 rulelist.
///
/// The input is a byte sequence; every rule line, the last included, must
/// end with CRLF. Line continuations are recognized only as leading
/// whitespace on the continuation line.
pub fn parse_rulelist(input: &[u8]) -> Result<Rulelist, Error> {
	let mut parser = Parser {
		bytes: input,
		offset: 0,
	};

	let mut rules = Rulelist::new();

	while parser.peek().is_some() {
		if matches!(parser.peek(), Some(c) if c.is_ascii_alphabetic()) {
			rules.push(parser.rule()?);
		} else {
			// Blank or comment-only line.
			parser.skip_c_wsp()?;
			parser.c_nl()?;
		}
	}

	Ok(rules)
}

struct Parser<'a> {
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.offset).copied()
	}

	fn bump(&mut self) -> Option<u8> {
		let byte = self.peek()?;
		self.offset += 1;
		Some(byte)
	}

	fn eat(&mut self, byte: u8) -> bool {
		if self.peek() == Some(byte) {
			self.offset += 1;
			true
		} else {
			false
		}
	}

	fn error(&self, kind: ErrorKind) -> Error {
		Error {
			offset: self.offset,
			kind,
		}
	}

	/// Consumes a `c-nl`: a CRLF, optionally preceded by a comment.
	fn c_nl(&mut self) -> Result<(), Error> {
		if self.eat(b';') {
			while let Some(c) = self.peek() {
				if c == b'\t' || (0x20..=0x7e).contains(&c) {
					self.offset += 1;
				} else {
					break;
				}
			}
		}

		if self.eat(b'\r') && self.eat(b'\n') {
			Ok(())
		} else {
			Err(self.error(ErrorKind::MissingCrlf))
		}
	}

	/// Consumes `*c-wsp`: whitespace, including line continuations (a
	/// `c-nl` directly followed by whitespace). The `c-nl` terminating the
	/// rule is left in place.
	fn skip_c_wsp(&mut self) -> Result<(), Error> {
		loop {
			match self.peek() {
				Some(b' ' | b'\t') => {
					self.offset += 1;
				}
				Some(b';' | b'\r') => {
					let mark = self.offset;
					self.c_nl()?;
					if matches!(self.peek(), Some(b' ' | b'\t')) {
						self.offset += 1;
					} else {
						self.offset = mark;
						break Ok(());
					}
				}
				_ => break Ok(()),
			}
		}
	}

	fn rule(&mut self) -> Result<Rule, Error> {
		let name = self.rulename()?;

		self.skip_c_wsp()?;
		if !self.eat(b'=') {
			return Err(self.error(ErrorKind::ExpectedDefinedAs));
		}
		let defined_as = if self.eat(b'/') {
			DefinedAs::Append
		} else {
			DefinedAs::Equal
		};
		self.skip_c_wsp()?;

		let alternation = self.alternation()?;

		self.skip_c_wsp()?;
		self.c_nl()?;

		Ok(Rule {
			name,
			defined_as,
			alternation,
		})
	}

	fn rulename(&mut self) -> Result<String, Error> {
		match self.peek() {
			Some(c) if c.is_ascii_alphabetic() => {}
			_ => return Err(self.error(ErrorKind::ExpectedRulename)),
		}

		let start = self.offset;
		while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'-') {
			self.offset += 1;
		}

		Ok(String::from_utf8(self.bytes[start..self.offset].to_vec()).unwrap())
	}

	fn alternation(&mut self) -> Result<Alternation, Error> {
		let mut alternation = Alternation::from(self.concatenation()?);

		loop {
			let mark = self.offset;
			self.skip_c_wsp()?;
			if self.eat(b'/') {
				self.skip_c_wsp()?;
				alternation.push(self.concatenation()?);
			} else {
				self.offset = mark;
				break;
			}
		}

		Ok(alternation)
	}

	fn concatenation(&mut self) -> Result<Concatenation, Error> {
		let mut concatenation = Concatenation::from(self.repetition()?);

		loop {
			let mark = self.offset;
			self.skip_c_wsp()?;
			if self.offset > mark && self.starts_element() {
				concatenation.push(self.repetition()?);
			} else {
				self.offset = mark;
				break;
			}
		}

		Ok(concatenation)
	}

	fn starts_element(&self) -> bool {
		matches!(
			self.peek(),
			Some(c) if c.is_ascii_alphanumeric()
				|| matches!(c, b'(' | b'[' | b'"' | b'%' | b'<' | b'*')
		)
	}

	fn repetition(&mut self) -> Result<Repetition, Error> {
		let first = self.decimal_opt()?;

		let (min, max) = if self.eat(b'*') {
			(first.unwrap_or(0), self.decimal_opt()?)
		} else {
			match first {
				Some(n) => (n, Some(n)),
				None => (1, Some(1)),
			}
		};

		Ok(Repetition {
			min,
			max,
			element: self.element()?,
		})
	}

	fn decimal_opt(&mut self) -> Result<Option<u32>, Error> {
		if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
			return Ok(None);
		}

		let mut value = 0u32;
		while let Some(c) = self.peek() {
			if !c.is_ascii_digit() {
				break;
			}

			value = value
				.checked_mul(10)
				.and_then(|v| v.checked_add((c - b'0').into()))
				.ok_or_else(|| self.error(ErrorKind::ValueOverflow))?;
			self.offset += 1;
		}

		Ok(Some(value))
	}

	fn element(&mut self) -> Result<Element, Error> {
		match self.peek() {
			Some(c) if c.is_ascii_alphabetic() => Ok(Element::Rulename(self.rulename()?)),
			Some(b'(') => {
				self.offset += 1;
				self.skip_c_wsp()?;
				let alternation = self.alternation()?;
				self.skip_c_wsp()?;
				if !self.eat(b')') {
					return Err(self.error(ErrorKind::UnclosedGroup));
				}
				Ok(Element::Group(alternation))
			}
			Some(b'[') => {
				self.offset += 1;
				self.skip_c_wsp()?;
				let alternation = self.alternation()?;
				self.skip_c_wsp()?;
				if !self.eat(b']') {
					return Err(self.error(ErrorKind::UnclosedOption));
				}
				Ok(Element::Optional(alternation))
			}
			Some(b'"') => {
				self.offset += 1;
				Ok(Element::CharVal(self.char_val(false)?))
			}
			Some(b'%') => {
				self.offset += 1;
				match self.bump() {
					Some(b's') | Some(b'S') => {
						if !self.eat(b'"') {
							return Err(self.error(ErrorKind::ExpectedElement));
						}
						Ok(Element::CharVal(self.char_val(true)?))
					}
					Some(b'i') | Some(b'I') => {
						if !self.eat(b'"') {
							return Err(self.error(ErrorKind::ExpectedElement));
						}
						Ok(Element::CharVal(self.char_val(false)?))
					}
					Some(b'b') | Some(b'B') => self.num_val(Base::Binary),
					Some(b'd') | Some(b'D') => self.num_val(Base::Decimal),
					Some(b'x') | Some(b'X') => self.num_val(Base::Hexadecimal),
					_ => Err(self.error(ErrorKind::ExpectedElement)),
				}
			}
			Some(b'<') => {
				self.offset += 1;
				self.prose_val()
			}
			_ => Err(self.error(ErrorKind::ExpectedElement)),
		}
	}

	/// Body of a quoted string, the opening DQUOTE already consumed.
	fn char_val(&mut self, sensitive: bool) -> Result<CharVal, Error> {
		let start = self.offset;

		loop {
			match self.peek() {
				Some(b'"') => {
					let value =
						String::from_utf8(self.bytes[start..self.offset].to_vec()).unwrap();
					self.offset += 1;
					break Ok(CharVal { sensitive, value });
				}
				Some(c) if matches!(c, 0x20..=0x21 | 0x23..=0x7e) => {
					self.offset += 1;
				}
				Some(_) => break Err(self.error(ErrorKind::InvalidCharVal)),
				None => break Err(self.error(ErrorKind::UnclosedCharVal)),
			}
		}
	}

	fn num_val(&mut self, base: Base) -> Result<Element, Error> {
		let first = self.base_digits(base)?;

		let form = if self.eat(b'-') {
			let hi = self.base_digits(base)?;
			if hi < first {
				return Err(self.error(ErrorKind::EmptyNumRange));
			}
			NumForm::Range(first, hi)
		} else if self.peek() == Some(b'.') {
			let mut values = vec![first];
			while self.eat(b'.') {
				values.push(self.base_digits(base)?);
			}
			NumForm::Sequence(values)
		} else {
			NumForm::Single(first)
		};

		Ok(Element::NumVal(NumVal { base, form }))
	}

	fn base_digits(&mut self, base: Base) -> Result<u32, Error> {
		let radix = match base {
			Base::Binary => 2,
			Base::Decimal => 10,
			Base::Hexadecimal => 16,
		};

		let mut value: Option<u32> = None;
		while let Some(c) = self.peek() {
			let digit = match (c as char).to_digit(radix) {
				Some(digit) => digit,
				None => break,
			};

			value = Some(
				value
					.unwrap_or(0)
					.checked_mul(radix)
					.and_then(|v| v.checked_add(digit))
					.ok_or_else(|| self.error(ErrorKind::ValueOverflow))?,
			);
			self.offset += 1;
		}

		value.ok_or_else(|| self.error(ErrorKind::ExpectedDigits))
	}

	/// Body of a prose value, the opening `<` already consumed.
	fn prose_val(&mut self) -> Result<Element, Error> {
		let start = self.offset;

		loop {
			match self.peek() {
				Some(b'>') => {
					let text =
						String::from_utf8(self.bytes[start..self.offset].to_vec()).unwrap();
					self.offset += 1;
					break Ok(Element::ProseVal(text));
				}
				Some(c) if matches!(c, 0x20..=0x3d | 0x3f..=0x7e) => {
					self.offset += 1;
				}
				Some(_) => break Err(self.error(ErrorKind::InvalidProseVal)),
				None => break Err(self.error(ErrorKind::UnclosedProseVal)),
			}
		}
	}
}
