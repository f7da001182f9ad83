//! Built-in RFC 5234 core rules.
//!
//! Grammars conventionally reference `ALPHA`, `DIGIT`, `CRLF` and friends
//! without defining them; the compiler falls back to these patterns for
//! any name its rulelist leaves undefined.

use abnfc_automata::{RegularLanguage, Symbol};

fn literal<T: Symbol, L: RegularLanguage<T>>(code: u32) -> Option<L> {
	Some(L::literal(T::from_code(code)?))
}

fn range<T: Symbol, L: RegularLanguage<T>>(lo: u32, hi: u32) -> Option<L> {
	Some(L::from_range(T::from_code(lo)?, T::from_code(hi)?))
}

/// Returns the pattern of the core rule named by the lowercased `key`, or
/// `None` if there is no such core rule or its symbols do not fit the
/// alphabet.
pub(crate) fn pattern<T: Symbol, L: RegularLanguage<T>>(key: &str) -> Option<L> {
	match key {
		// ALPHA = %x41-5A / %x61-7A
		"alpha" => Some(range::<T, L>(0x41, 0x5a)?.union(&range(0x61, 0x7a)?)),
		// BIT = "0" / "1"
		"bit" => range(0x30, 0x31),
		// CHAR = %x01-7F
		"char" => range(0x01, 0x7f),
		// CR = %x0D
		"cr" => literal(0x0d),
		// CRLF = CR LF
		"crlf" => Some(literal::<T, L>(0x0d)?.concatenation(&literal(0x0a)?)),
		// CTL = %x00-1F / %x7F
		"ctl" => Some(range::<T, L>(0x00, 0x1f)?.union(&literal(0x7f)?)),
		// DIGIT = %x30-39
		"digit" => range(0x30, 0x39),
		// DQUOTE = %x22
		"dquote" => literal(0x22),
		// HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"
		"hexdig" => Some(
			range::<T, L>(0x30, 0x39)?
				.union(&range(0x41, 0x46)?)
				.union(&range(0x61, 0x66)?),
		),
		// HTAB = %x09
		"htab" => literal(0x09),
		// LF = %x0A
		"lf" => literal(0x0a),
		// LWSP = *(WSP / CRLF WSP)
		"lwsp" => {
			let wsp: L = pattern("wsp")?;
			let crlf: L = pattern("crlf")?;
			Some(wsp.union(&crlf.concatenation(&wsp)).star())
		}
		// OCTET = %x00-FF
		"octet" => range(0x00, 0xff),
		// SP = %x20
		"sp" => literal(0x20),
		// VCHAR = %x21-7E
		"vchar" => range(0x21, 0x7e),
		// WSP = SP / HTAB
		"wsp" => Some(literal::<T, L>(0x20)?.union(&literal(0x09)?)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::pattern;
	use abnfc_automata::RangeDFA;

	#[test]
	fn core_rule_languages() {
		let alpha: RangeDFA<u8> = pattern("alpha").unwrap();
		assert!(alpha.accepts(*b"a"));
		assert!(alpha.accepts(*b"Z"));
		assert!(!alpha.accepts(*b"0"));
		assert!(!alpha.accepts(*b"ab"));

		let crlf: RangeDFA<u8> = pattern("crlf").unwrap();
		assert!(crlf.accepts(*b"\r\n"));
		assert!(!crlf.accepts(*b"\n"));

		let lwsp: RangeDFA<u8> = pattern("lwsp").unwrap();
		assert!(lwsp.accepts(*b""));
		assert!(lwsp.accepts(*b" \t"));
		assert!(lwsp.accepts(*b"\r\n "));
		assert!(!lwsp.accepts(*b"\r\n"));

		let hexdig: RangeDFA<u8> = pattern("hexdig").unwrap();
		assert!(hexdig.accepts(*b"f"));
		assert!(hexdig.accepts(*b"F"));
		assert!(hexdig.accepts(*b"9"));
		assert!(!hexdig.accepts(*b"g"));

		assert!(pattern::<u8, RangeDFA<u8>>("nope").is_none());
	}

	#[test]
	fn octet_does_not_fit_every_alphabet() {
		// Full byte range over a byte alphabet is fine.
		assert!(pattern::<u8, RangeDFA<u8>>("octet").is_some());
	}
}
