//! Plain-text help and task listings.

use tack_options::{OptionDef, Value};

use crate::meta::TaskMeta;

/// Render the help page for one task.
pub fn help(meta: &TaskMeta) -> String {
    let mut out = String::new();
    out.push_str("Usage:\n");
    out.push_str(&format!("  {}\n", meta.usage_line()));

    if !meta.aliases.is_empty() {
        out.push_str(&format!("\nAliases: {}\n", meta.aliases.join(", ")));
    }

    let about = if meta.description.trim().is_empty() {
        meta.summary.trim()
    } else {
        meta.description.trim_end()
    };
    if !about.is_empty() {
        out.push('\n');
        out.push_str(about);
        out.push('\n');
    }

    if !meta.arguments.is_empty() {
        out.push_str("\nArguments:\n");
        let rows: Vec<(String, Vec<String>)> = meta
            .arguments
            .iter()
            .map(|a| {
                let mut notes = describe(a.description());
                push_default(&mut notes, a.default_value());
                push_possible(&mut notes, a.possible_values());
                (a.usage(), notes)
            })
            .collect();
        render_rows(&mut out, &rows);
    }

    let options: Vec<&OptionDef> = meta.options.iter().filter(|o| !o.hidden()).collect();
    if !options.is_empty() {
        out.push_str("\nOptions:\n");
        let alias_width = options
            .iter()
            .map(|o| o.aliases_for_usage().len())
            .max()
            .unwrap_or(0);
        let rows: Vec<(String, Vec<String>)> = options
            .iter()
            .map(|o| {
                let left = format!("{:>alias_width$}{}", o.aliases_for_usage(), o.usage());
                let mut notes = describe(o.description());
                push_default(&mut notes, o.default_value());
                push_possible(&mut notes, o.possible_values());
                (left, notes)
            })
            .collect();
        render_rows(&mut out, &rows);
    }

    out
}

/// Render an aligned `usage  # summary` table of tasks.
pub fn list<'a, I>(tasks: I) -> String
where
    I: IntoIterator<Item = &'a TaskMeta>,
{
    let rows: Vec<(String, Vec<String>)> = tasks
        .into_iter()
        .filter(|t| !t.hidden)
        .map(|t| (t.usage_line(), describe(&t.summary)))
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    let mut out = String::from("Tasks:\n");
    render_rows(&mut out, &rows);
    out
}

fn describe(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text.to_string()]
    }
}

fn push_default(notes: &mut Vec<String>, default: Option<&Value>) {
    match default {
        // `false` is the implicit default of every boolean.
        None | Some(Value::Bool(false)) => {}
        Some(value) => notes.push(format!("Default: {value}")),
    }
}

fn push_possible(notes: &mut Vec<String>, possible: &[String]) {
    if !possible.is_empty() {
        notes.push(format!("Possible values: {}", possible.join(", ")));
    }
}

fn render_rows(out: &mut String, rows: &[(String, Vec<String>)]) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, notes) in rows {
        let mut notes = notes.iter();
        match notes.next() {
            Some(first) => out.push_str(&format!("  {left:width$}  # {first}\n")),
            None => out.push_str(&format!("  {left}\n")),
        }
        for note in notes {
            out.push_str(&format!("  {:width$}  # {note}\n", ""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::meta;
    use tack_options::{ArgumentDef, OptionType, Shorthand};

    fn sample() -> TaskMeta {
        meta("greet")
            .summary("Greet someone")
            .alias("hi")
            .argument(ArgumentDef::builder("name").desc("Who to greet").build().unwrap())
            .option(
                OptionDef::builder("loud")
                    .ty(OptionType::Boolean)
                    .alias("-l")
                    .desc("Shout")
                    .build()
                    .unwrap(),
            )
            .option(OptionDef::parse("times", 1).unwrap())
            .option(
                OptionDef::builder("style")
                    .ty(OptionType::String)
                    .possible_values(["plain", "fancy"])
                    .build()
                    .unwrap(),
            )
            .option(
                OptionDef::builder("secret")
                    .ty(OptionType::Boolean)
                    .hidden()
                    .build()
                    .unwrap(),
            )
            .build()
    }

    #[test]
    fn help_has_usage_arguments_and_options() {
        let text = help(&sample());
        assert!(text.starts_with("Usage:\n  greet NAME [options]\n"));
        assert!(text.contains("Aliases: hi"));
        assert!(text.contains("Greet someone"));
        assert!(text.contains("Arguments:\n  NAME  # Who to greet\n"));
        assert!(text.contains("-l, [--loud], [--no-loud]"));
        assert!(text.contains("# Shout"));
        assert!(text.contains("    [--times=N]"));
        assert!(text.contains("# Default: 1"));
        assert!(text.contains("# Possible values: plain, fancy"));
    }

    #[test]
    fn help_omits_hidden_options() {
        let text = help(&sample());
        assert!(!text.contains("--secret"));
    }

    #[test]
    fn list_aligns_summaries_and_skips_hidden() {
        let tasks = vec![
            meta("build").summary("Build it").build(),
            meta("deploy")
                .summary("Ship it")
                .argument(ArgumentDef::builder("env").build().unwrap())
                .build(),
            meta("internal").hidden().build(),
            meta("noop").option(OptionDef::parse("x", Shorthand::tag("boolean")).unwrap()).build(),
        ];
        let text = list(&tasks);
        assert_eq!(
            text,
            "Tasks:\n  build           # Build it\n  deploy ENV      # Ship it\n  noop [options]\n"
        );
    }
}
