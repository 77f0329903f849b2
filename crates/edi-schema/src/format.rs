//! printf-style format patterns for field rendering
//!
//! A pattern holds literal text around exactly one conversion:
//! `%[flags][width][.precision]conv` where flags are any of `-0+ ` and the
//! conversion is `d`, `i`, `u` (integer), `f` (fixed-point) or `s` (text).
//! `%%` stands for a literal percent sign.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<prefix>(?:[^%]|%%)*)%(?P<flags>[-0+ ]*)(?P<width>\d+)?(?:\.(?P<precision>\d+))?(?P<conv>[diusf])(?P<suffix>(?:[^%]|%%)*)$",
    )
    .expect("format pattern regex is valid")
});

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)(\d+)").expect("integer regex is valid"));

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)").expect("float regex is valid")
});

/// Conversion applied to the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d`, `i`, `u`
    Integer,
    /// `f`
    Float,
    /// `s`
    Text,
}

/// A compiled printf-style pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatSpec {
    source: String,
    prefix: String,
    suffix: String,
    left_justify: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

impl FormatSpec {
    /// Compile a pattern such as `%09d` or `%-10s`
    pub fn parse(pattern: &str) -> Result<Self> {
        let captures = PATTERN.captures(pattern).ok_or_else(|| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "expected exactly one %[flags][width][.precision](d|i|u|f|s) conversion"
                .to_string(),
        })?;

        let number = |name: &str| -> Result<Option<usize>> {
            captures
                .name(name)
                .map(|m| {
                    m.as_str().parse::<usize>().map_err(|e| Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("{name}: {e}"),
                    })
                })
                .transpose()
        };

        let flags = captures.name("flags").map_or("", |m| m.as_str());
        let conversion = match captures.name("conv").map(|m| m.as_str()) {
            Some("f") => Conversion::Float,
            Some("s") => Conversion::Text,
            _ => Conversion::Integer,
        };

        Ok(Self {
            source: pattern.to_string(),
            prefix: unescape(captures.name("prefix").map_or("", |m| m.as_str())),
            suffix: unescape(captures.name("suffix").map_or("", |m| m.as_str())),
            left_justify: flags.contains('-'),
            zero_pad: flags.contains('0'),
            plus_sign: flags.contains('+'),
            space_sign: flags.contains(' '),
            width: number("width")?,
            precision: number("precision")?,
            conversion,
        })
    }

    /// Zero-padded integer of the given width, i.e. `%0{width}d`
    pub fn zero_padded(width: usize) -> Self {
        Self {
            source: format!("%0{width}d"),
            prefix: String::new(),
            suffix: String::new(),
            left_justify: false,
            zero_pad: true,
            plus_sign: false,
            space_sign: false,
            width: Some(width),
            precision: None,
            conversion: Conversion::Integer,
        }
    }

    /// The pattern text this spec was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Conversion kind
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Render a value through the pattern
    ///
    /// Numeric conversions read the leading number of the value and fall
    /// back to zero, the way printf treats non-numeric text.
    pub fn render(&self, value: &str) -> String {
        let (sign, body) = match self.conversion {
            Conversion::Integer => self.integer_parts(value),
            Conversion::Float => self.float_parts(value),
            Conversion::Text => {
                let body = match self.precision {
                    Some(limit) => value.chars().take(limit).collect(),
                    None => value.to_string(),
                };
                (String::new(), body)
            }
        };

        let len = sign.chars().count() + body.chars().count();
        let pad = self.width.map_or(0, |width| width.saturating_sub(len));

        let zero_fill = self.zero_pad
            && !self.left_justify
            && self.conversion != Conversion::Text
            && !(self.conversion == Conversion::Integer && self.precision.is_some());

        let field = if self.left_justify {
            format!("{sign}{body}{}", " ".repeat(pad))
        } else if zero_fill {
            format!("{sign}{}{body}", "0".repeat(pad))
        } else {
            format!("{}{sign}{body}", " ".repeat(pad))
        };

        format!("{}{field}{}", self.prefix, self.suffix)
    }

    fn sign_for(&self, negative: bool) -> String {
        if negative {
            "-".to_string()
        } else if self.plus_sign {
            "+".to_string()
        } else if self.space_sign {
            " ".to_string()
        } else {
            String::new()
        }
    }

    fn integer_parts(&self, value: &str) -> (String, String) {
        let (negative, digits) = match LEADING_INTEGER.captures(value) {
            Some(c) => {
                let digits = c[2].trim_start_matches('0');
                (&c[1] == "-" && !digits.is_empty(), digits.to_string())
            }
            None => (false, String::new()),
        };

        let mut body = if digits.is_empty() {
            "0".to_string()
        } else {
            digits
        };
        if let Some(precision) = self.precision {
            if body.len() < precision {
                body = format!("{}{body}", "0".repeat(precision - body.len()));
            }
        }

        (self.sign_for(negative), body)
    }

    fn float_parts(&self, value: &str) -> (String, String) {
        let number = LEADING_FLOAT
            .find(value)
            .and_then(|m| m.as_str().trim().parse::<f64>().ok())
            .unwrap_or(0.0);

        let precision = self.precision.unwrap_or(6);
        let body = format!("{:.*}", precision, number.abs());
        let negative = number.is_sign_negative() && body.chars().any(|c| c.is_ascii_digit() && c != '0');

        (self.sign_for(negative), body)
    }
}

impl TryFrom<String> for FormatSpec {
    type Error = Error;

    fn try_from(pattern: String) -> Result<Self> {
        Self::parse(&pattern)
    }
}

impl From<FormatSpec> for String {
    fn from(spec: FormatSpec) -> Self {
        spec.source
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn unescape(literal: &str) -> String {
    literal.replace("%%", "%")
}
