//! Single-pass switch and positional argument parser.
//!
//! [`Options`] holds the declaration table and is built once. Every call to
//! [`Options::parse`] works on its own [`ParseState`], so one table can be
//! shared across threads and parses.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::argument::ArgumentDef;
use crate::error::ParseError;
use crate::option::{OptionDef, OptionType, human_name_of};
use crate::token::{Token, looks_like_value};
use crate::value::Value;

/// Declaration table for one task: switches, positional arguments and the
/// alias map derived from them.
#[derive(Debug, Clone, Default)]
pub struct Options {
    options: Vec<OptionDef>,
    arguments: Vec<ArgumentDef>,
    switches: HashMap<String, usize>,
    shorts: HashMap<String, String>,
    presets: IndexMap<String, Value>,
    check_unknown: bool,
}

impl Options {
    pub fn new<O, A>(options: O, arguments: A) -> Self
    where
        O: IntoIterator<Item = OptionDef>,
        A: IntoIterator<Item = ArgumentDef>,
    {
        let options: Vec<OptionDef> = options.into_iter().collect();
        let arguments: Vec<ArgumentDef> = arguments.into_iter().collect();

        let mut switches = HashMap::new();
        for (idx, option) in options.iter().enumerate() {
            switches.insert(normalize_switch(option.switch_name()), idx);
        }
        let shorts = build_shorts(&options, &switches);

        Self {
            options,
            arguments,
            switches,
            shorts,
            presets: IndexMap::new(),
            check_unknown: false,
        }
    }

    /// Reject undeclared switches instead of passing them through to
    /// [`Matches::trailing`].
    pub fn check_unknown(mut self, check: bool) -> Self {
        self.check_unknown = check;
        self
    }

    /// Assign a value up front, as if it had been parsed.
    ///
    /// A preset satisfies a required option of the same name and is
    /// overridden by anything given on the command line.
    pub fn preset(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.presets.insert(human_name_of(name), value.into());
        self
    }

    pub fn options(&self) -> &[OptionDef] {
        self.options.as_slice()
    }

    pub fn arguments(&self) -> &[ArgumentDef] {
        self.arguments.as_slice()
    }

    /// Alias spelling → canonical switch, including synthesized short forms.
    pub fn shorts(&self) -> &HashMap<String, String> {
        &self.shorts
    }

    pub fn is_checking_unknown(&self) -> bool {
        self.check_unknown
    }

    /// Find the option a switch spelling refers to.
    ///
    /// Aliases resolve first. An exact declaration always wins; only when
    /// `--no-x` / `--skip-x` is not itself declared does it resolve to `--x`
    /// with the negation flag set.
    pub fn lookup(&self, switch: &str) -> Option<(&OptionDef, bool)> {
        self.resolve(switch)
            .map(|(idx, negated)| (&self.options[idx], negated))
    }

    fn resolve(&self, switch: &str) -> Option<(usize, bool)> {
        let switch = self.shorts.get(switch).map(String::as_str).unwrap_or(switch);
        let switch = normalize_switch(switch);
        if let Some(&idx) = self.switches.get(&switch) {
            return Some((idx, false));
        }
        let positive = negated_switch(&switch)?;
        self.switches.get(&positive).map(|&idx| (idx, true))
    }

    fn is_known(&self, token: &Token<'_>) -> bool {
        match token {
            Token::Long(switch)
            | Token::Short(switch)
            | Token::Eq { switch, .. }
            | Token::ShortNum { switch, .. } => self.resolve(switch).is_some(),
            Token::Squashed(letters) => letters
                .chars()
                .any(|c| self.resolve(&format!("-{c}")).is_some()),
            Token::Plain => false,
        }
    }

    /// Parse `tokens` against this table.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Matches, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParseState::new(self, tokens.into_iter().map(Into::into).collect()).run()
    }
}

/// `--dry_run` → `--dry-run`.
fn normalize_switch(switch: &str) -> String {
    if switch.starts_with("--") {
        switch.replace('_', "-")
    } else {
        switch.to_string()
    }
}

/// `--no-foo` / `--skip-foo` → `--foo`.
fn negated_switch(switch: &str) -> Option<String> {
    let word = switch
        .strip_prefix("--no-")
        .or_else(|| switch.strip_prefix("--skip-"))?;
    let valid = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| format!("--{word}"))
}

/// Declared aliases first (first one wins), then a `-x` short form for
/// every alias-less option whose name is longer than one character, unless
/// that spelling is already taken.
fn build_shorts(options: &[OptionDef], switches: &HashMap<String, usize>) -> HashMap<String, String> {
    let mut shorts: HashMap<String, String> = HashMap::new();
    for option in options {
        for alias in option.aliases() {
            shorts
                .entry(alias.clone())
                .or_insert_with(|| option.switch_name().to_string());
        }
    }
    for option in options {
        if !option.aliases().is_empty() {
            continue;
        }
        let mut chars = option.human_name().chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if chars.next().is_none() {
            continue;
        }
        let short = format!("-{first}");
        if switches.contains_key(&short) || shorts.contains_key(&short) {
            continue;
        }
        shorts.insert(short, option.switch_name().to_string());
    }
    shorts
}

/// Result of a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matches {
    options: IndexMap<String, Value>,
    arguments: IndexMap<String, Value>,
    trailing: Vec<String>,
}

impl Matches {
    /// Value of an option; `name` may be given as `foo_bar`, `foo-bar` or
    /// `--foo-bar`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(&human_name_of(name))
    }

    /// Value of a positional argument.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(&human_name_of(name))
    }

    /// Whether an option has a value other than `false`.
    pub fn is_present(&self, name: &str) -> bool {
        !matches!(self.get(name), None | Some(Value::Bool(false)))
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    /// Tokens consumed neither as a switch nor as an argument, in input order.
    pub fn trailing(&self) -> &[String] {
        self.trailing.as_slice()
    }

    pub fn into_parts(self) -> (IndexMap<String, Value>, IndexMap<String, Value>, Vec<String>) {
        (self.options, self.arguments, self.trailing)
    }
}

/// Mutable state of one `parse` call.
struct ParseState<'o> {
    table: &'o Options,
    pile: VecDeque<String>,
    /// The front of `pile` was split off an `=` or `-n12` form.
    inline: bool,
    /// A bare `--` was seen; everything after it is positional.
    after_separator: bool,
    options: IndexMap<String, Value>,
    arguments: IndexMap<String, Value>,
    pending: VecDeque<&'o ArgumentDef>,
    missing_options: Vec<usize>,
    missing_arguments: Vec<usize>,
    trailing: Vec<String>,
    unknown: Vec<String>,
}

impl<'o> ParseState<'o> {
    fn new(table: &'o Options, tokens: Vec<String>) -> Self {
        let mut options = IndexMap::new();
        let mut missing_options = Vec::new();
        for (idx, option) in table.options.iter().enumerate() {
            if let Some(default) = option.default_value() {
                options.insert(option.human_name().to_string(), default.clone());
            } else if option.required() {
                missing_options.push(idx);
            }
        }
        for (name, value) in &table.presets {
            options.insert(name.clone(), value.clone());
            missing_options.retain(|&idx| table.options[idx].human_name() != name.as_str());
        }

        let mut arguments = IndexMap::new();
        let mut missing_arguments = Vec::new();
        for (idx, argument) in table.arguments.iter().enumerate() {
            if let Some(default) = argument.default_value() {
                arguments.insert(argument.human_name().to_string(), default.clone());
            } else if argument.required() {
                missing_arguments.push(idx);
            }
        }

        Self {
            table,
            pile: tokens.into(),
            inline: false,
            after_separator: false,
            options,
            arguments,
            pending: table.arguments.iter().collect(),
            missing_options,
            missing_arguments,
            trailing: Vec::new(),
            unknown: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Matches, ParseError> {
        while let Some(raw) = self.pile.pop_front() {
            if std::mem::take(&mut self.inline) {
                self.trailing.push(raw);
                continue;
            }
            if self.after_separator {
                self.positional(raw)?;
                continue;
            }
            if raw == "--" {
                self.after_separator = true;
                continue;
            }

            let token = Token::classify(&raw);
            if !token.is_switch_formatted() {
                self.positional(raw)?;
                continue;
            }
            if !self.table.is_known(&token) {
                self.unknown_switch(raw);
                continue;
            }

            let switch = match token {
                Token::Squashed(letters) => {
                    let expanded: Vec<String> = letters.chars().map(|c| format!("-{c}")).collect();
                    for flag in expanded.into_iter().rev() {
                        self.pile.push_front(flag);
                    }
                    continue;
                }
                Token::Eq { switch, value } | Token::ShortNum { switch, value } => {
                    self.pile.push_front(value.to_string());
                    self.inline = true;
                    switch.to_string()
                }
                Token::Long(switch) | Token::Short(switch) => switch.to_string(),
                Token::Plain => continue,
            };
            self.switch(&switch)?;
        }

        self.finish()
    }

    fn switch(&mut self, switch: &str) -> Result<(), ParseError> {
        let table = self.table;
        let Some((idx, negated)) = table.resolve(switch) else {
            return Ok(());
        };
        let option = &table.options[idx];
        let key = option.human_name().to_string();

        if negated && option.input_required() {
            match option.ty() {
                OptionType::String => {
                    self.options.insert(key, Value::String(String::new()));
                }
                OptionType::Array => {
                    self.options.insert(key, Value::Array(Vec::new()));
                }
                OptionType::Hash => {
                    self.options.insert(key, Value::Hash(IndexMap::new()));
                }
                _ => {
                    self.options.shift_remove(&key);
                }
            }
            self.drop_inline();
            return Ok(());
        }

        let value = match option.ty() {
            OptionType::Boolean => self.boolean(negated),
            OptionType::Default => self.default_type(negated),
            ty => {
                self.expect_value(switch)?;
                self.collect(ty, switch)?
            }
        };
        check_possible(switch, option.possible_values(), &value)?;
        self.options.insert(key, value);
        self.missing_options.retain(|&i| i != idx);
        self.drop_inline();
        Ok(())
    }

    fn positional(&mut self, raw: String) -> Result<(), ParseError> {
        let Some(argument) = self.pending.pop_front() else {
            self.trailing.push(raw);
            return Ok(());
        };
        self.pile.push_front(raw);

        let name = argument.human_name();
        // Arguments never carry `boolean` or `default` types.
        let value = match argument.ty() {
            OptionType::Numeric | OptionType::Hash | OptionType::Array => {
                self.collect(argument.ty(), name)?
            }
            OptionType::String | OptionType::Boolean | OptionType::Default => {
                Value::String(self.pile.pop_front().unwrap_or_default())
            }
        };
        // A collection that took nothing leaves the slot unfilled.
        if value.is_empty_collection() {
            return Ok(());
        }
        check_possible(name, argument.possible_values(), &value)?;
        self.arguments.insert(name.to_string(), value);
        let table = self.table;
        self.missing_arguments
            .retain(|&i| table.arguments[i].human_name() != name);
        Ok(())
    }

    fn unknown_switch(&mut self, raw: String) {
        self.unknown.push(raw.clone());
        self.trailing.push(raw);
        while self.pile.front().is_some_and(|next| looks_like_value(next)) {
            if let Some(value) = self.pile.pop_front() {
                self.trailing.push(value);
            }
        }
    }

    /// An inline value no collector consumed is passed through.
    fn drop_inline(&mut self) {
        if std::mem::take(&mut self.inline) {
            if let Some(value) = self.pile.pop_front() {
                self.trailing.push(value);
            }
        }
    }

    fn take_inline(&mut self) -> Option<String> {
        if std::mem::take(&mut self.inline) {
            self.pile.pop_front()
        } else {
            None
        }
    }

    /// Whether the front of the pile can be consumed as a value.
    fn front_is_value(&self) -> bool {
        self.pile
            .front()
            .is_some_and(|next| self.inline || self.after_separator || looks_like_value(next))
    }

    /// Inline value, or the next token if it reads as a value.
    fn take_value(&mut self) -> Option<String> {
        if self.inline {
            return self.take_inline();
        }
        if self.front_is_value() {
            self.pile.pop_front()
        } else {
            None
        }
    }

    fn expect_value(&self, switch: &str) -> Result<(), ParseError> {
        match self.pile.front() {
            None => Err(ParseError::NoValue {
                switch: switch.to_string(),
            }),
            Some(next) if !self.front_is_value() => Err(ParseError::SwitchInsteadOfValue {
                switch: switch.to_string(),
                found: next.clone(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn boolean(&mut self, negated: bool) -> Value {
        match self.take_inline() {
            Some(raw) => Value::Bool(is_truthy(&raw) != negated),
            None => Value::Bool(!negated),
        }
    }

    fn default_type(&mut self, negated: bool) -> Value {
        if negated {
            return Value::Bool(false);
        }
        match self.take_value() {
            Some(raw) => Value::String(raw),
            None => Value::Bool(true),
        }
    }

    fn collect(&mut self, ty: OptionType, name: &str) -> Result<Value, ParseError> {
        Ok(match ty {
            OptionType::Numeric => self.numeric(name)?,
            OptionType::Hash => self.hash(),
            OptionType::Array => self.array(),
            _ => self.string(),
        })
    }

    fn string(&mut self) -> Value {
        self.inline = false;
        Value::String(self.pile.pop_front().unwrap_or_default())
    }

    fn numeric(&mut self, name: &str) -> Result<Value, ParseError> {
        self.inline = false;
        let raw = self.pile.pop_front().unwrap_or_default();
        Value::parse_numeric(&raw).ok_or_else(|| ParseError::NotNumeric {
            name: name.to_string(),
            value: raw,
        })
    }

    fn hash(&mut self) -> Value {
        let mut hash = IndexMap::new();
        loop {
            let is_pair =
                self.front_is_value() && self.pile.front().is_some_and(|next| next.contains(':'));
            if !is_pair {
                break;
            }
            self.inline = false;
            if let Some((key, value)) = self.pile.pop_front().as_deref().and_then(|p| p.split_once(':')) {
                hash.insert(key.to_string(), value.to_string());
            }
        }
        Value::Hash(hash)
    }

    fn array(&mut self) -> Value {
        let mut array = Vec::new();
        while let Some(item) = self.take_value() {
            array.push(item);
        }
        Value::Array(array)
    }

    fn finish(self) -> Result<Matches, ParseError> {
        if !self.missing_options.is_empty() || !self.missing_arguments.is_empty() {
            let names = self
                .missing_options
                .iter()
                .map(|&i| self.table.options[i].switch_name().to_string())
                .chain(
                    self.missing_arguments
                        .iter()
                        .map(|&i| self.table.arguments[i].human_name().to_string()),
                )
                .collect();
            return Err(ParseError::Missing { names });
        }
        if self.table.check_unknown && !self.unknown.is_empty() {
            return Err(ParseError::Unknown {
                switches: self.unknown,
            });
        }
        Ok(Matches {
            options: self.options,
            arguments: self.arguments,
            trailing: self.trailing,
        })
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw, "true" | "TRUE" | "t" | "T")
}

fn check_possible(name: &str, possible: &[String], value: &Value) -> Result<(), ParseError> {
    if possible.is_empty() {
        return Ok(());
    }
    let candidates: Vec<String> = match value {
        Value::String(_) | Value::Integer(_) | Value::Float(_) => vec![value.to_string()],
        Value::Array(items) => items.clone(),
        Value::Bool(_) | Value::Hash(_) => Vec::new(),
    };
    match candidates.into_iter().find(|c| !possible.contains(c)) {
        Some(bad) => Err(ParseError::NotPossibleValue {
            name: name.to_string(),
            value: bad,
            possible: possible.to_vec(),
        }),
        None => Ok(()),
    }
}
