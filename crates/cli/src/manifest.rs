use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tack_options::{ArgumentDef, OptionDef, Value};
use tack_task::TaskMeta;

pub const DEFAULT_MANIFEST_NAME: &str = "tack.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default)]
    pub tasks: Vec<TaskManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty", alias = "desc")]
    pub summary: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub check_unknown_options: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentManifest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionManifest>,

    /// Values applied before parsing, keyed by option name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub defaults: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionManifest {
    pub name: String,

    /// Type tag; inferred from `default` when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentManifest {
    pub name: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// Defaults to "no default given".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<String>,
}

impl TaskManifest {
    /// Build task metadata, validating every declaration.
    pub fn to_meta(&self) -> Result<TaskMeta> {
        let mut builder = tack_task::meta(&self.name)
            .summary(&self.summary)
            .description(&self.description)
            .usage(&self.usage);
        for alias in &self.aliases {
            builder = builder.alias(alias);
        }
        if self.hidden {
            builder = builder.hidden();
        }
        if self.check_unknown_options {
            builder = builder.check_unknown_options();
        }
        for argument in &self.arguments {
            let def = argument
                .to_def()
                .with_context(|| format!("task '{}': invalid argument '{}'", self.name, argument.name))?;
            builder = builder.argument(def);
        }
        for option in &self.options {
            let def = option
                .to_def()
                .with_context(|| format!("task '{}': invalid option '{}'", self.name, option.name))?;
            builder = builder.option(def);
        }
        for (name, value) in &self.defaults {
            builder = builder.preset(name, value.clone());
        }
        Ok(builder.build())
    }
}

impl OptionManifest {
    pub fn to_def(&self) -> Result<OptionDef> {
        let mut builder = OptionDef::builder(&self.name)
            .desc(&self.desc)
            .required(self.required)
            .aliases(self.aliases.iter().cloned())
            .possible_values(self.possible_values.iter().cloned());
        if let Some(tag) = type_tag(self.ty.as_deref(), self.default.as_ref()) {
            builder = builder.type_name(tag);
        }
        if let Some(default) = &self.default {
            builder = builder.default(default.clone());
        }
        if let Some(banner) = &self.banner {
            builder = builder.banner(banner);
        }
        if self.hidden {
            builder = builder.hidden();
        }
        Ok(builder.build()?)
    }
}

impl ArgumentManifest {
    pub fn to_def(&self) -> Result<ArgumentDef> {
        let mut builder = ArgumentDef::builder(&self.name)
            .desc(&self.desc)
            .possible_values(self.possible_values.iter().cloned());
        if let Some(tag) = type_tag(self.ty.as_deref(), self.default.as_ref()) {
            builder = builder.type_name(tag);
        }
        if let Some(required) = self.required {
            builder = builder.required(required);
        }
        if let Some(default) = &self.default {
            builder = builder.default(default.clone());
        }
        if let Some(banner) = &self.banner {
            builder = builder.banner(banner);
        }
        Ok(builder.build()?)
    }
}

/// Explicit tag, else the kind of the default value.
fn type_tag(explicit: Option<&str>, default: Option<&Value>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| default.map(|v| v.kind_name().to_string()))
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Option<LoadedManifest>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match manifest_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_MANIFEST_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("manifest not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;
    tracing::debug!(path = %path.display(), tasks = manifest.tasks.len(), "loaded manifest");

    Ok(Some(LoadedManifest { path, manifest }))
}

/// A small manifest declaring one example task.
pub fn sample_manifest() -> Manifest {
    Manifest {
        schema_version: Some(1),
        tasks: vec![TaskManifest {
            name: "greet".to_string(),
            summary: "Greet someone".to_string(),
            aliases: vec!["hi".to_string()],
            arguments: vec![ArgumentManifest {
                name: "name".to_string(),
                desc: "Who to greet".to_string(),
                ..Default::default()
            }],
            options: vec![
                OptionManifest {
                    name: "loud".to_string(),
                    ty: Some("boolean".to_string()),
                    aliases: vec!["-l".to_string()],
                    desc: "Shout the greeting".to_string(),
                    ..Default::default()
                },
                OptionManifest {
                    name: "times".to_string(),
                    default: Some(Value::Integer(1)),
                    desc: "How many times to greet".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
    }
}

pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        bail!("{DEFAULT_MANIFEST_NAME} already exists in {}", project_dir.display());
    }

    let bytes = serde_json::to_vec_pretty(&sample_manifest()).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tack_options::OptionType;

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("tack-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn manifest_deserializes_camel_case() {
        let json = r#"{
  "schemaVersion": 1,
  "tasks": [
    {
      "name": "deploy",
      "desc": "Deploy the app",
      "checkUnknownOptions": true,
      "arguments": [{ "name": "env", "possibleValues": ["staging", "prod"] }],
      "options": [
        { "name": "force", "type": "boolean", "aliases": ["-f"] },
        { "name": "ratio", "default": 0.5 },
        { "name": "token", "required": true, "type": "string" }
      ],
      "defaults": { "token": "abc" }
    }
  ]
}"#;
        let m: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(m.schema_version, Some(1));
        let task = &m.tasks[0];
        assert_eq!(task.summary, "Deploy the app");
        assert!(task.check_unknown_options);
        assert_eq!(task.arguments[0].possible_values, vec!["staging", "prod"]);
        assert_eq!(task.options[1].default, Some(Value::Float(0.5)));

        let meta = task.to_meta().unwrap();
        assert!(meta.check_unknown);
        assert_eq!(meta.options[0].ty(), OptionType::Boolean);
        assert_eq!(meta.options[1].ty(), OptionType::Numeric);
        assert_eq!(meta.presets.get("token"), Some(&Value::from("abc")));
    }

    #[test]
    fn invalid_declarations_carry_task_context() {
        let task = TaskManifest {
            name: "deploy".to_string(),
            options: vec![OptionManifest {
                name: "count".to_string(),
                ty: Some("integer".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = task.to_meta().unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("task 'deploy': invalid option 'count'"), "{text}");
        assert!(text.contains("integer"), "{text}");
    }

    #[test]
    fn load_manifest_missing_default_is_none_but_explicit_errors() {
        let dir = make_temp_dir("load");
        let missing = dir.join("nope.json");
        let err = load_manifest(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("manifest not found"));

        let path = write_default_manifest(&dir, false).unwrap();
        let loaded = load_manifest(Some(path.as_path())).unwrap().unwrap();
        assert_eq!(loaded.manifest.tasks[0].name, "greet");
        assert!(write_default_manifest(&dir, false).is_err());
        assert!(write_default_manifest(&dir, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn sample_manifest_converts() {
        for task in sample_manifest().tasks {
            let meta = task.to_meta().unwrap();
            assert_eq!(meta.usage_line(), "greet NAME [options]");
        }
    }
}
