use tack_options::{Matches, ParseError};
use thiserror::Error;

use crate::help;
use crate::meta::TaskMeta;

/// Trait for implementing a tack task.
pub trait Task {
    /// Return task metadata.
    fn meta(&self) -> TaskMeta;

    /// Execute the task with its parsed options and arguments.
    fn run(&self, invocation: &Invocation) -> anyhow::Result<()>;
}

/// A parsed call to one task.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub task: String,
    pub matches: Matches,
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Help was requested; the rendered text.
    Help(String),
    /// The named task ran.
    Ran(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("task name '{name}' is already registered by '{existing}'")]
    Conflict { name: String, existing: String },

    #[error("could not find task '{0}'")]
    UnknownTask(String),

    #[error("ambiguous task '{name}' matches {}", .candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    #[error("{task}: {source}")]
    Parse {
        task: String,
        #[source]
        source: ParseError,
    },

    #[error("task '{task}' failed")]
    Task {
        task: String,
        #[source]
        source: anyhow::Error,
    },
}

struct Entry {
    meta: TaskMeta,
    task: Box<dyn Task>,
}

/// Ordered registry of tasks.
#[derive(Default)]
pub struct TaskSet {
    entries: Vec<Entry>,
}

const HELP_TOKENS: [&str; 3] = ["help", "-h", "--help"];

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Its name and aliases must not collide with any
    /// task registered earlier.
    pub fn register<T: Task + 'static>(&mut self, task: T) -> Result<(), DispatchError> {
        let meta = task.meta();
        let names = std::iter::once(&meta.name).chain(meta.aliases.iter());
        for name in names {
            if HELP_TOKENS.contains(&name.as_str()) {
                return Err(DispatchError::Conflict {
                    name: name.clone(),
                    existing: "help".to_string(),
                });
            }
            if let Some(existing) = self.entries.iter().find(|e| e.meta.matches_name(name)) {
                return Err(DispatchError::Conflict {
                    name: name.clone(),
                    existing: existing.meta.name.clone(),
                });
            }
        }
        tracing::trace!(task = %meta.name, "registered task");
        self.entries.push(Entry {
            meta,
            task: Box::new(task),
        });
        Ok(())
    }

    /// Look up a task by exact name or alias.
    pub fn find(&self, name: &str) -> Option<&TaskMeta> {
        self.entries
            .iter()
            .find(|e| e.meta.name == name)
            .or_else(|| self.entries.iter().find(|e| e.meta.matches_name(name)))
            .map(|e| &e.meta)
    }

    /// Metadata of every visible task, in registration order.
    pub fn list(&self) -> Vec<&TaskMeta> {
        self.entries
            .iter()
            .map(|e| &e.meta)
            .filter(|m| !m.hidden)
            .collect()
    }

    /// Render the help for `name`, or the task listing when `None`.
    pub fn help(&self, name: Option<&str>) -> Result<String, DispatchError> {
        match name {
            Some(name) => Ok(help::help(&self.resolve(name)?.meta)),
            None => Ok(help::list(self.list())),
        }
    }

    /// Run the task named by the first token with the remaining tokens.
    ///
    /// An empty `argv` or a leading `help`, `-h` or `--help` renders help
    /// instead; so does `-h`/`--help` anywhere after the task name unless
    /// the task declares that switch itself.
    pub fn dispatch<I, S>(&self, argv: I) -> Result<Outcome, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let Some((first, rest)) = argv.split_first() else {
            tracing::debug!("no task given; listing tasks");
            return self.help(None).map(Outcome::Help);
        };

        if HELP_TOKENS.contains(&first.as_str()) {
            tracing::debug!(topic = ?rest.first(), "help requested");
            return self.help(rest.first().map(String::as_str)).map(Outcome::Help);
        }

        let entry = self.resolve(first)?;
        let meta = &entry.meta;
        let table = meta.options_parser();

        let wants_help = rest
            .iter()
            .any(|t| (t == "-h" || t == "--help") && table.lookup(t).is_none());
        if wants_help {
            tracing::debug!(task = %meta.name, "task help requested");
            return Ok(Outcome::Help(help::help(meta)));
        }

        tracing::debug!(task = %meta.name, tokens = rest.len(), "dispatching");
        let matches = table
            .parse(rest.iter().cloned())
            .map_err(|source| DispatchError::Parse {
                task: meta.name.clone(),
                source,
            })?;
        tracing::trace!(task = %meta.name, ?matches, "parsed");

        let invocation = Invocation {
            task: meta.name.clone(),
            matches,
        };
        entry
            .task
            .run(&invocation)
            .map_err(|source| DispatchError::Task {
                task: meta.name.clone(),
                source,
            })?;
        Ok(Outcome::Ran(meta.name.clone()))
    }

    /// Exact name, then alias, then an unambiguous name prefix.
    fn resolve(&self, name: &str) -> Result<&Entry, DispatchError> {
        if let Some(entry) = self.entries.iter().find(|e| e.meta.name == name) {
            return Ok(entry);
        }
        if let Some(entry) = self.entries.iter().find(|e| e.meta.matches_name(name)) {
            return Ok(entry);
        }
        let candidates: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| e.meta.name.starts_with(name))
            .collect();
        match candidates.as_slice() {
            [entry] => Ok(*entry),
            [] => Err(DispatchError::UnknownTask(name.to_string())),
            many => Err(DispatchError::Ambiguous {
                name: name.to_string(),
                candidates: many.iter().map(|e| e.meta.name.clone()).collect(),
            }),
        }
    }
}
