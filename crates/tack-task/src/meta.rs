use indexmap::IndexMap;
use tack_options::{ArgumentDef, OptionDef, Options, Value};

/// Everything known about a task before it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskMeta {
    pub name: String,
    /// One-line description shown in task listings.
    pub summary: String,
    pub description: String,
    /// Explicit usage line; derived from the declarations when empty.
    pub usage: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub options: Vec<OptionDef>,
    pub arguments: Vec<ArgumentDef>,
    /// Values applied before parsing, keyed by option name.
    pub presets: IndexMap<String, Value>,
    pub check_unknown: bool,
}

impl TaskMeta {
    /// Parser table for this task's declarations.
    pub fn options_parser(&self) -> Options {
        let mut table = Options::new(self.options.iter().cloned(), self.arguments.iter().cloned())
            .check_unknown(self.check_unknown);
        for (name, value) in &self.presets {
            table = table.preset(name, value.clone());
        }
        table
    }

    /// `name ARG [ARG] --required=X [options]`, unless an explicit usage
    /// line was given.
    pub fn usage_line(&self) -> String {
        if !self.usage.trim().is_empty() {
            return self.usage.trim().to_string();
        }
        let mut parts = vec![self.name.clone()];
        parts.extend(self.arguments.iter().map(ArgumentDef::usage));
        let visible = self.options.iter().filter(|o| !o.hidden());
        let mut optional = false;
        for option in visible {
            if option.required() {
                parts.push(option.usage());
            } else {
                optional = true;
            }
        }
        if optional {
            parts.push("[options]".to_string());
        }
        parts.join(" ")
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

/// Create a task metadata builder.
///
/// # Example
///
/// ```rust
/// use tack_options::{ArgumentDef, OptionDef};
///
/// let meta = tack_task::meta("greet")
///     .summary("Greet someone")
///     .argument(ArgumentDef::builder("name").build().unwrap())
///     .option(OptionDef::parse(["loud", "-l"], false).unwrap())
///     .build();
/// assert_eq!(meta.usage_line(), "greet NAME [options]");
/// ```
pub fn meta(name: impl Into<String>) -> MetaBuilder {
    MetaBuilder::new(name)
}

/// Builder for [`TaskMeta`].
#[derive(Default)]
pub struct MetaBuilder {
    meta: TaskMeta,
}

impl MetaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: TaskMeta {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.meta.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.meta.usage = usage.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.meta.aliases.push(alias.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.meta.hidden = true;
        self
    }

    pub fn option(mut self, option: OptionDef) -> Self {
        self.meta.options.push(option);
        self
    }

    pub fn argument(mut self, argument: ArgumentDef) -> Self {
        self.meta.arguments.push(argument);
        self
    }

    pub fn preset(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.presets.insert(name.into(), value.into());
        self
    }

    pub fn check_unknown_options(mut self) -> Self {
        self.meta.check_unknown = true;
        self
    }

    pub fn build(self) -> TaskMeta {
        self.meta
    }
}
