//! Positional argument declarations.

use crate::error::ConfigurationError;
use crate::option::{OptionType, TypeSpec, human_name_of, validate_declaration};
use crate::value::Value;

/// A positional value, filled in declaration order.
///
/// Arguments take `string` (the default), `numeric`, `hash` or `array`
/// values. They are required unless a default is supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDef {
    name: String,
    human_name: String,
    description: String,
    required: bool,
    ty: OptionType,
    default: Option<Value>,
    banner: Option<String>,
    possible_values: Vec<String>,
}

impl ArgumentDef {
    pub fn builder(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn human_name(&self) -> &str {
        &self.human_name
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

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn possible_values(&self) -> &[String] {
        self.possible_values.as_slice()
    }

    pub fn input_required(&self) -> bool {
        self.ty.input_required()
    }

    pub fn is_argument(&self) -> bool {
        true
    }

    /// `NAME` when required, `[NAME]` otherwise.
    pub fn usage(&self) -> String {
        let banner = self.banner.clone().unwrap_or_else(|| self.human_name.to_ascii_uppercase());
        if self.required {
            banner
        } else {
            format!("[{banner}]")
        }
    }
}

/// Builder for [`ArgumentDef`].
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    name: String,
    description: String,
    required: Option<bool>,
    ty: Option<TypeSpec>,
    default: Option<Value>,
    banner: Option<String>,
    possible_values: Vec<String>,
}

impl ArgumentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: None,
            ty: None,
            default: None,
            banner: None,
            possible_values: Vec::new(),
        }
    }

    pub fn desc(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn ty(mut self, ty: OptionType) -> Self {
        self.ty = Some(TypeSpec::Known(ty));
        self
    }

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

    pub fn possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<ArgumentDef, ConfigurationError> {
        let name = self.name.trim().to_string();
        let human_name = human_name_of(&name);
        if human_name.is_empty() {
            return Err(ConfigurationError::EmptyName { kind: "argument" });
        }
        let ty = match self.ty {
            Some(spec) => spec.resolve("argument", &name)?,
            None => OptionType::String,
        };
        if matches!(ty, OptionType::Boolean | OptionType::Default) {
            return Err(ConfigurationError::InvalidType {
                kind: "argument",
                name,
                ty: ty.as_str().to_string(),
            });
        }
        let required = self.required.unwrap_or(self.default.is_none());
        validate_declaration(
            "argument",
            &name,
            &human_name,
            required,
            ty,
            self.default.as_ref(),
        )?;

        let banner = self.banner.or_else(|| ty.default_banner(&human_name));
        Ok(ArgumentDef {
            name,
            human_name,
            description: self.description,
            required,
            ty,
            default: self.default,
            banner,
            possible_values: self.possible_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_unless_default_given() {
        let a = ArgumentDef::builder("file").build().unwrap();
        assert!(a.required());
        assert_eq!(a.ty(), OptionType::String);
        assert_eq!(a.usage(), "FILE");

        let a = ArgumentDef::builder("file").default("out.txt").build().unwrap();
        assert!(!a.required());
        assert_eq!(a.usage(), "[FILE]");
    }

    #[test]
    fn rejects_boolean_and_default_types() {
        for ty in [OptionType::Boolean, OptionType::Default] {
            let err = ArgumentDef::builder("flag").ty(ty).build().unwrap_err();
            match err {
                ConfigurationError::InvalidType { kind, .. } => assert_eq!(kind, "argument"),
                other => panic!("expected InvalidType, got: {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_explicit_required_with_default() {
        let err = ArgumentDef::builder("file")
            .required(true)
            .default("a")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::RequiredWithDefault { .. }));
    }

    #[test]
    fn numeric_argument_banner() {
        let a = ArgumentDef::builder("count").type_name("numeric").build().unwrap();
        assert_eq!(a.banner(), Some("N"));
        assert!(a.input_required());
        assert!(a.is_argument());
    }
}
