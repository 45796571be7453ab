//! Lexical classification of raw argv tokens.
//!
//! The shapes recognized here:
//!
//! | shape      | example        |
//! |------------|----------------|
//! | long       | `--foo-bar`    |
//! | short      | `-f`           |
//! | eq         | `--foo=bar`, `-f=bar` |
//! | squashed   | `-fba`         |
//! | short-num  | `-n12`, `-n1.5` |
//!
//! Anything else is a plain word.

/// Classification of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Long(&'a str),
    Short(&'a str),
    Eq { switch: &'a str, value: &'a str },
    /// Conjoined short flags; holds the letters without the leading dash.
    Squashed(&'a str),
    ShortNum { switch: &'a str, value: &'a str },
    Plain,
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if let Some(letters) = squashed_letters(raw) {
            return Self::Squashed(letters);
        }
        if let Some((switch, value)) = raw.split_once('=') {
            if is_long(switch) || is_short(switch) {
                return Self::Eq { switch, value };
            }
        }
        if let Some((switch, value)) = short_num(raw) {
            return Self::ShortNum { switch, value };
        }
        if is_long(raw) {
            Self::Long(raw)
        } else if is_short(raw) {
            Self::Short(raw)
        } else {
            Self::Plain
        }
    }

    pub fn is_switch_formatted(&self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// A token that value-taking switches and greedy collectors may consume:
/// anything not starting with `-`, plus signed numeric literals.
pub fn looks_like_value(raw: &str) -> bool {
    !raw.starts_with('-') || is_numeric_literal(raw)
}

/// Optionally signed `digits` or `digits? . digits`, matching the whole string.
pub fn is_numeric_literal(raw: &str) -> bool {
    let unsigned = raw
        .strip_prefix('-')
        .or_else(|| raw.strip_prefix('+'))
        .unwrap_or(raw);
    is_unsigned_numeric(unsigned)
}

/// Split `args` before the first token that starts with `-`.
///
/// Returns the leading plain words and everything from the first switch-like
/// token on.
pub fn split_leading(args: &[String]) -> (&[String], &[String]) {
    let at = args
        .iter()
        .position(|a| a.starts_with('-'))
        .unwrap_or(args.len());
    args.split_at(at)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_long(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("--") else {
        return false;
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if is_word_char(first) => {
            chars.all(|c| is_word_char(c) || c == '-' || c == '+')
        }
        _ => false,
    }
}

fn is_short(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.next().is_none()
}

fn squashed_letters(s: &str) -> Option<&str> {
    let letters = s.strip_prefix('-')?;
    (letters.len() >= 2 && letters.chars().all(|c| c.is_ascii_alphabetic())).then_some(letters)
}

fn short_num(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('-')?;
    let letter = rest.chars().next()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let (switch, value) = s.split_at(2);
    is_unsigned_numeric(value).then_some((switch, value))
}

fn is_unsigned_numeric(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((int, frac)) => all_digits(int) && !frac.is_empty() && all_digits(frac),
        None => !s.is_empty() && all_digits(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_long_and_short_switches() {
        assert_eq!(Token::classify("--foo"), Token::Long("--foo"));
        assert_eq!(Token::classify("--foo-bar"), Token::Long("--foo-bar"));
        assert_eq!(Token::classify("--foo_bar"), Token::Long("--foo_bar"));
        assert_eq!(Token::classify("-f"), Token::Short("-f"));
        assert_eq!(Token::classify("-F"), Token::Short("-F"));
    }

    #[test]
    fn classifies_eq_forms() {
        assert_eq!(
            Token::classify("--foo=bar"),
            Token::Eq {
                switch: "--foo",
                value: "bar"
            }
        );
        assert_eq!(
            Token::classify("-f=a=b"),
            Token::Eq {
                switch: "-f",
                value: "a=b"
            }
        );
        assert_eq!(
            Token::classify("--foo="),
            Token::Eq {
                switch: "--foo",
                value: ""
            }
        );
    }

    #[test]
    fn classifies_squashed_and_short_num() {
        assert_eq!(Token::classify("-fba"), Token::Squashed("fba"));
        assert_eq!(
            Token::classify("-n12"),
            Token::ShortNum {
                switch: "-n",
                value: "12"
            }
        );
        assert_eq!(
            Token::classify("-n1.5"),
            Token::ShortNum {
                switch: "-n",
                value: "1.5"
            }
        );
    }

    #[test]
    fn plain_words_are_not_switches() {
        for raw in ["foo", "-", "--", "-5", "---x", "--=x", "-f1x", "-fb=x", "name:string"] {
            assert_eq!(Token::classify(raw), Token::Plain, "{raw}");
        }
    }

    #[test]
    fn values_exclude_dash_words_but_not_negative_numbers() {
        assert!(looks_like_value("plain"));
        assert!(looks_like_value("k:v"));
        assert!(looks_like_value("-4"));
        assert!(looks_like_value("-0.5"));
        assert!(!looks_like_value("-x"));
        assert!(!looks_like_value("--"));
        assert!(!looks_like_value("-"));
    }

    #[test]
    fn numeric_literal_must_match_whole_token() {
        assert!(is_numeric_literal("42"));
        assert!(is_numeric_literal("4.2"));
        assert!(is_numeric_literal(".2"));
        assert!(is_numeric_literal("-4.2"));
        assert!(!is_numeric_literal("4."));
        assert!(!is_numeric_literal("4.2.1"));
        assert!(!is_numeric_literal("42x"));
        assert!(!is_numeric_literal("-"));
    }

    #[test]
    fn split_leading_stops_at_first_dash() {
        let args: Vec<String> = ["a", "b", "--c", "d"].iter().map(|s| s.to_string()).collect();
        let (words, rest) = split_leading(&args);
        assert_eq!(words, &args[..2]);
        assert_eq!(rest, &args[2..]);
    }
}
