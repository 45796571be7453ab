//! Switch declarations.

use indexmap::IndexMap;
use std::fmt;

use crate::error::ConfigurationError;
use crate::value::Value;

/// Declared type of an option or argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    Boolean,
    Numeric,
    String,
    Hash,
    Array,
    /// Takes a value when one follows, otherwise acts as `true`.
    Default,
}

impl OptionType {
    pub const ALL: [OptionType; 6] = [
        Self::Boolean,
        Self::Numeric,
        Self::String,
        Self::Hash,
        Self::Array,
        Self::Default,
    ];

    /// Look up a type by its lower-case tag (`"numeric"`, `"hash"`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Hash => "hash",
            Self::Array => "array",
            Self::Default => "default",
        }
    }

    /// Every type except `boolean` and `default` needs a value after the switch.
    pub fn input_required(self) -> bool {
        matches!(self, Self::Numeric | Self::Hash | Self::Array | Self::String)
    }

    pub(crate) fn of_value(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Integer(_) | Value::Float(_) => Self::Numeric,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Hash(_) => Self::Hash,
        }
    }

    pub(crate) fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Default => matches!(value, Value::Bool(_) | Value::String(_)),
            ty => ty == Self::of_value(value),
        }
    }

    pub(crate) fn default_banner(self, human_name: &str) -> Option<String> {
        match self {
            Self::Boolean => None,
            Self::String | Self::Default => Some(human_name.to_ascii_uppercase()),
            Self::Numeric => Some("N".to_string()),
            Self::Hash => Some("key:value".to_string()),
            Self::Array => Some("one two three".to_string()),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type as given to a builder: either already typed or a raw tag to validate.
#[derive(Debug, Clone)]
pub(crate) enum TypeSpec {
    Known(OptionType),
    Tag(String),
}

impl TypeSpec {
    pub(crate) fn resolve(
        self,
        kind: &'static str,
        name: &str,
    ) -> Result<OptionType, ConfigurationError> {
        match self {
            Self::Known(ty) => Ok(ty),
            Self::Tag(tag) => OptionType::from_tag(tag.trim()).ok_or(ConfigurationError::InvalidType {
                kind,
                name: name.to_string(),
                ty: tag,
            }),
        }
    }
}

/// Checks shared by options and arguments.
pub(crate) fn validate_declaration(
    kind: &'static str,
    name: &str,
    human_name: &str,
    required: bool,
    ty: OptionType,
    default: Option<&Value>,
) -> Result<(), ConfigurationError> {
    if human_name.is_empty() {
        return Err(ConfigurationError::EmptyName { kind });
    }
    if let Some(default) = default {
        if required {
            return Err(ConfigurationError::RequiredWithDefault {
                kind,
                name: name.to_string(),
            });
        }
        if !ty.accepts(default) {
            return Err(ConfigurationError::DefaultTypeMismatch {
                name: name.to_string(),
                expected: ty.as_str(),
                found: default.kind_name(),
            });
        }
    }
    Ok(())
}

/// Dash-stripped, underscored form of a declared name.
pub(crate) fn human_name_of(name: &str) -> String {
    name.trim().trim_start_matches('-').replace('-', "_")
}

/// `--long-name` for multi-character names, `-n` for single characters.
pub fn dasherize(name: &str) -> String {
    if name.chars().count() > 1 {
        format!("--{}", name.replace('_', "-"))
    } else {
        format!("-{name}")
    }
}

fn normalize_alias(alias: &str) -> String {
    let alias = alias.trim();
    if alias.starts_with('-') {
        alias.to_string()
    } else {
        format!("-{alias}")
    }
}

/// A named switch such as `--force` or `-n`.
///
/// Immutable once built; construct with [`OptionDef::builder`] or
/// [`OptionDef::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDef {
    name: String,
    switch_name: String,
    human_name: String,
    description: String,
    required: bool,
    ty: OptionType,
    default: Option<Value>,
    banner: Option<String>,
    aliases: Vec<String>,
    possible_values: Vec<String>,
    hidden: bool,
}

impl OptionDef {
    pub fn builder(name: impl Into<String>) -> OptionBuilder {
        OptionBuilder::new(name)
    }

    /// Build an option from terse `key => value` shorthand.
    ///
    /// The kind of `value` picks the type: literals become the default of
    /// the matching type, type tags pick the type with no default, the
    /// `required` tag makes a required string, and unknown tags fall back
    /// to the `default` type.
    pub fn parse(
        key: impl Into<OptionKey>,
        value: impl Into<Shorthand>,
    ) -> Result<Self, ConfigurationError> {
        let key = key.into();
        let builder = OptionBuilder::new(key.name).aliases(key.aliases);
        let builder = match value.into() {
            Shorthand::Literal(value) => builder.ty(OptionType::of_value(&value)).default(value),
            Shorthand::Tag(tag) => match OptionType::from_tag(&tag) {
                Some(ty) => builder.ty(ty),
                None if tag == "required" => builder.ty(OptionType::String).required(true),
                None => builder.ty(OptionType::Default),
            },
        };
        builder.build()
    }

    /// Name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn ty(&self) -> OptionType {
        self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Placeholder shown for the value in usage text; `None` for booleans.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        self.aliases.as_slice()
    }

    pub fn possible_values(&self) -> &[String] {
        self.possible_values.as_slice()
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Canonical dash-prefixed spelling used as the parser's lookup key.
    pub fn switch_name(&self) -> &str {
        &self.switch_name
    }

    /// Key under which the parsed value is stored.
    pub fn human_name(&self) -> &str {
        &self.human_name
    }

    pub fn input_required(&self) -> bool {
        self.ty.input_required()
    }

    pub fn is_argument(&self) -> bool {
        false
    }

    pub fn is_boolean(&self) -> bool {
        self.ty == OptionType::Boolean
    }

    /// Usage sample, e.g. `[--count=N]` or `[--force], [--no-force]`.
    pub fn usage(&self) -> String {
        let mut sample = match self.banner() {
            Some(banner) if !banner.is_empty() => format!("{}={banner}", self.switch_name),
            _ => self.switch_name.clone(),
        };
        if !self.required {
            sample = format!("[{sample}]");
        }
        if self.is_boolean() && self.human_name != "force" && !self.human_name.starts_with("no_") {
            sample.push_str(&format!(", [{}]", dasherize(&format!("no_{}", self.human_name))));
        }
        sample
    }

    /// Alias prefix for help rows, e.g. `-f, `; empty without aliases.
    pub fn aliases_for_usage(&self) -> String {
        if self.aliases.is_empty() {
            String::new()
        } else {
            format!("{}, ", self.aliases.join(", "))
        }
    }
}

/// Builder for [`OptionDef`].
#[derive(Debug, Clone)]
pub struct OptionBuilder {
    name: String,
    description: String,
    required: bool,
    ty: Option<TypeSpec>,
    default: Option<Value>,
    banner: Option<String>,
    aliases: Vec<String>,
    possible_values: Vec<String>,
    hidden: bool,
}

impl OptionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            ty: None,
            default: None,
            banner: None,
            aliases: Vec::new(),
            possible_values: Vec::new(),
            hidden: false,
        }
    }

    pub fn desc(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn ty(mut self, ty: OptionType) -> Self {
        self.ty = Some(TypeSpec::Known(ty));
        self
    }

    /// Set the type from a tag such as `"numeric"`; validated by `build`.
    pub fn type_name(mut self, tag: impl Into<String>) -> Self {
        self.ty = Some(TypeSpec::Tag(tag.into()));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn build(self) -> Result<OptionDef, ConfigurationError> {
        let name = self.name.trim().to_string();
        let human_name = human_name_of(&name);
        if human_name.is_empty() {
            return Err(ConfigurationError::EmptyName { kind: "option" });
        }
        let ty = match self.ty {
            Some(spec) => spec.resolve("option", &name)?,
            None => OptionType::Default,
        };
        validate_declaration(
            "option",
            &name,
            &human_name,
            self.required,
            ty,
            self.default.as_ref(),
        )?;

        let switch_name = if name.starts_with('-') {
            name.clone()
        } else {
            dasherize(&name)
        };
        let banner = self.banner.or_else(|| ty.default_banner(&human_name));
        let mut aliases: Vec<String> = Vec::new();
        for alias in self.aliases.iter().map(|a| normalize_alias(a)) {
            if alias.len() > 1 && alias != switch_name && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        Ok(OptionDef {
            name,
            switch_name,
            human_name,
            description: self.description,
            required: self.required,
            ty,
            default: self.default,
            banner,
            aliases,
            possible_values: self.possible_values,
            hidden: self.hidden,
        })
    }
}

/// Key half of the shorthand form: a name, optionally followed by aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionKey {
    name: String,
    aliases: Vec<String>,
}

impl OptionKey {
    fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items = items.into_iter().map(Into::into);
        Self {
            name: items.next().unwrap_or_default(),
            aliases: items.collect(),
        }
    }
}

impl From<&str> for OptionKey {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
        }
    }
}

impl From<String> for OptionKey {
    fn from(name: String) -> Self {
        Self {
            name,
            aliases: Vec::new(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for OptionKey {
    fn from(items: [&str; N]) -> Self {
        Self::from_list(items)
    }
}

impl From<&[&str]> for OptionKey {
    fn from(items: &[&str]) -> Self {
        Self::from_list(items.iter().copied())
    }
}

impl From<Vec<String>> for OptionKey {
    fn from(items: Vec<String>) -> Self {
        Self::from_list(items)
    }
}

/// Value half of the shorthand form.
#[derive(Debug, Clone, PartialEq)]
pub enum Shorthand {
    /// A literal default; its kind picks the type.
    Literal(Value),
    /// A symbolic tag such as `numeric` or `required`.
    Tag(String),
}

impl Shorthand {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }
}

impl From<Value> for Shorthand {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Shorthand {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<i64> for Shorthand {
    fn from(n: i64) -> Self {
        Self::Literal(Value::Integer(n))
    }
}

impl From<i32> for Shorthand {
    fn from(n: i32) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<f64> for Shorthand {
    fn from(f: f64) -> Self {
        Self::Literal(Value::Float(f))
    }
}

impl From<&str> for Shorthand {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Shorthand {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

impl From<Vec<&str>> for Shorthand {
    fn from(items: Vec<&str>) -> Self {
        Self::Literal(Value::from(items))
    }
}

impl From<Vec<String>> for Shorthand {
    fn from(items: Vec<String>) -> Self {
        Self::Literal(Value::Array(items))
    }
}

impl From<IndexMap<String, String>> for Shorthand {
    fn from(map: IndexMap<String, String>) -> Self {
        Self::Literal(Value::Hash(map))
    }
}
