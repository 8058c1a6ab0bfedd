//! Scalar coercion for parameter values.

/// Returned by [`ConfigStore::get_int`](super::ConfigStore::get_int) when the
/// stored text isn't an integer.
pub const BAD_INT: i64 = -999_999_999;

/// Returned by [`ConfigStore::get_float`](super::ConfigStore::get_float) when
/// the stored text isn't a number.
pub const BAD_FLOAT: f64 = -999_999_999_999.0;

/// A scalar type a raw parameter value can be coerced into.
pub trait ParamValue: Sized {
	/// Type name used in "bad value" diagnostics.
	const EXPECTED: &'static str;

	/// Coerce the raw value, or `None` if the text doesn't fit the type.
	fn parse_param(raw: &str) -> Option<Self>;
}

impl ParamValue for String {
	const EXPECTED: &'static str = "string";

	fn parse_param(raw: &str) -> Option<Self> {
		Some(raw.trim().to_string())
	}
}

impl ParamValue for i64 {
	const EXPECTED: &'static str = "int";

	fn parse_param(raw: &str) -> Option<Self> {
		parse_int(raw)
	}
}

impl ParamValue for bool {
	const EXPECTED: &'static str = "bool";

	fn parse_param(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
			"0" | "f" | "false" | "n" | "no" | "off" => Some(false),
			_ => None,
		}
	}
}

impl ParamValue for f64 {
	const EXPECTED: &'static str = "float";

	fn parse_param(raw: &str) -> Option<Self> {
		raw.trim().parse().ok()
	}
}

/// Parse an integer with its base taken from the prefix.
///
/// Accepts an optional sign, `0x`/`0o`/`0b` prefixes, a bare leading `0` for
/// octal, and `_` between digits.
fn parse_int(raw: &str) -> Option<i64> {
	let text = raw.trim();
	let (negative, body) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text.strip_prefix('+').unwrap_or(text)),
	};

	let (radix, digits) = if let Some(rest) = strip_prefix_ci(body, "0x") {
		(16, rest)
	} else if let Some(rest) = strip_prefix_ci(body, "0o") {
		(8, rest)
	} else if let Some(rest) = strip_prefix_ci(body, "0b") {
		(2, rest)
	} else if body.len() > 1 && body.starts_with('0') {
		(8, &body[1..])
	} else {
		(10, body)
	};

	if digits.is_empty()
		|| digits.starts_with('_')
		|| digits.ends_with('_')
		|| digits.contains("__")
		|| !digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
	{
		return None;
	}

	let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
	let magnitude = u64::from_str_radix(&cleaned, radix).ok()?;

	if negative {
		if magnitude == i64::MIN.unsigned_abs() {
			Some(i64::MIN)
		} else {
			i64::try_from(magnitude).ok().map(|v| -v)
		}
	} else {
		i64::try_from(magnitude).ok()
	}
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
	let head = text.get(..prefix.len())?;
	head.eq_ignore_ascii_case(prefix)
		.then(|| &text[prefix.len()..])
}

/// Outcome of resolving a key across a section fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a, T> {
	/// The key was found and its value coerced.
	Found { section: &'a str, value: T },

	/// The key was found but its text doesn't fit the requested type.
	Invalid { section: &'a str, raw: &'a str },

	/// No section in the chain defines the key.
	Missing,
}

impl<T> Lookup<'_, T> {
	/// The coerced value, if the key was found and valid.
	pub fn value(self) -> Option<T> {
		match self {
			Lookup::Found { value, .. } => Some(value),
			_ => None,
		}
	}

	pub fn is_missing(&self) -> bool {
		matches!(self, Lookup::Missing)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_decimal_int() {
		assert_eq!(i64::parse_param("42"), Some(42));
		assert_eq!(i64::parse_param("  -17 "), Some(-17));
		assert_eq!(i64::parse_param("+5"), Some(5));
		assert_eq!(i64::parse_param("0"), Some(0));
		assert_eq!(i64::parse_param("1_000_000"), Some(1_000_000));
	}

	#[test]
	fn test_parse_prefixed_int() {
		assert_eq!(i64::parse_param("0x1F"), Some(31));
		assert_eq!(i64::parse_param("0X1f"), Some(31));
		assert_eq!(i64::parse_param("0o17"), Some(15));
		assert_eq!(i64::parse_param("017"), Some(15));
		assert_eq!(i64::parse_param("0b101"), Some(5));
		assert_eq!(i64::parse_param("-0x10"), Some(-16));
	}

	#[test]
	fn test_parse_int_limits() {
		assert_eq!(i64::parse_param("9223372036854775807"), Some(i64::MAX));
		assert_eq!(i64::parse_param("-9223372036854775808"), Some(i64::MIN));
		assert_eq!(i64::parse_param("9223372036854775808"), None);
	}

	#[test]
	fn test_parse_bad_int() {
		for raw in ["", "abc", "12abc", "1.5", "--1", "-+1", "08", "0x", "_1", "1__0", "1_"] {
			assert_eq!(i64::parse_param(raw), None, "{raw:?} should not parse");
		}
	}

	#[test]
	fn test_parse_bool() {
		for raw in ["1", "t", "T", "true", "TRUE", "y", "Yes", "on", "ON"] {
			assert_eq!(bool::parse_param(raw), Some(true), "{raw:?}");
		}
		for raw in ["0", "f", "False", "n", "no", "OFF"] {
			assert_eq!(bool::parse_param(raw), Some(false), "{raw:?}");
		}
		assert_eq!(bool::parse_param("maybe"), None);
		assert_eq!(bool::parse_param(""), None);
	}

	#[test]
	fn test_parse_float() {
		assert_eq!(f64::parse_param("3.25"), Some(3.25));
		assert_eq!(f64::parse_param(" -1e3 "), Some(-1000.0));
		assert_eq!(f64::parse_param("7"), Some(7.0));
		assert_eq!(f64::parse_param("inf"), Some(f64::INFINITY));
		assert_eq!(f64::parse_param("three"), None);
	}

	#[test]
	fn test_parse_string_trims() {
		assert_eq!(
			String::parse_param("  hello  "),
			Some("hello".to_string())
		);
	}

	#[test]
	fn test_lookup_value() {
		let found: Lookup<'_, i64> = Lookup::Found {
			section: "main",
			value: 3,
		};
		assert_eq!(found.value(), Some(3));

		let invalid: Lookup<'_, i64> = Lookup::Invalid {
			section: "main",
			raw: "x",
		};
		assert_eq!(invalid.value(), None);
		assert!(Lookup::<i64>::Missing.is_missing());
	}
}
