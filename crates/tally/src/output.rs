//! Run summaries printed to the terminal

use crate::site::escape;
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use serde::Serialize;
use tally_core::{Generation, ResultCount, ScenarioEntry, Status};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Render the summary of a generation in the specified format
pub fn render_summary(
    generation: &Generation,
    title: &str,
    format: OutputFormat,
    verbose: bool,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(generation, title, verbose),
        OutputFormat::Json => render_json(generation, title)?,
        OutputFormat::Markdown => render_markdown(generation, title, verbose),
        OutputFormat::Html => render_html(generation, title, verbose),
    })
}

/// Human readable duration from nanoseconds
pub(crate) fn format_duration(nanos: u64) -> String {
    const MS: u64 = 1_000_000;
    const SEC: u64 = 1_000 * MS;
    if nanos >= 60 * SEC {
        let secs = nanos / SEC;
        format!("{}m {}s", secs / 60, secs % 60)
    } else if nanos >= SEC {
        format!("{:.2}s", nanos as f64 / SEC as f64)
    } else {
        format!("{}ms", nanos / MS)
    }
}

fn with_status(generation: &Generation, status: Status) -> Vec<&ScenarioEntry> {
    generation
        .scenarios()
        .scenarios()
        .iter()
        .filter(|s| s.status == status)
        .collect()
}

fn render_text(generation: &Generation, title: &str, verbose: bool) -> String {
    let mut output = String::new();
    let total = generation.scenarios().total();

    output.push('\n');
    output.push_str(&format!("{} {}\n", "##".bold(), title.cyan().bold()));
    output.push('\n');

    let percent = total.pass_percent();
    let percent_str = format!("{:.1}%", percent);
    let color_percent = if total.failed() > 0 {
        percent_str.red().to_string()
    } else if total.skipped() > 0 {
        percent_str.yellow().to_string()
    } else {
        percent_str.green().to_string()
    };

    output.push_str(&format!(
        "Scenarios: {} passed ({}/{}), {} failed, {} skipped\n",
        color_percent,
        total.passed(),
        total.total(),
        total.failed(),
        total.skipped()
    ));
    output.push_str(&format!(
        "  Features: {}\n",
        generation.features().len().to_string().dimmed()
    ));

    let tags = generation.tags();
    if !tags.is_empty() {
        output.push_str(&format!(
            "  Tags: {}\n",
            format!(
                "{} total, {} failed, {} passed, {} skipped",
                tags.total_tags(),
                tags.failed_tags(),
                tags.passed_tags(),
                tags.skipped_tags()
            )
            .dimmed()
        ));
    }
    output.push('\n');

    let failed = with_status(generation, Status::Failed);
    if !failed.is_empty() {
        output.push_str(&format!(
            "{} Failed Scenarios ({}):\n",
            "!".red().bold(),
            failed.len()
        ));
        for entry in failed {
            output.push_str(&format!(
                "  {} {} / {}\n",
                "-".red(),
                entry.feature_name.dimmed(),
                entry.name.red()
            ));
            for step in &generation.element_of(entry).steps {
                if let Some(message) = step.error_message() {
                    output.push_str(&format!(
                        "      {}{}: {}\n",
                        step.keyword.dimmed(),
                        step.name().dimmed(),
                        message.lines().next().unwrap_or_default()
                    ));
                }
            }
        }
        output.push('\n');
    }

    let skipped = with_status(generation, Status::Skipped);
    if !skipped.is_empty() {
        output.push_str(&format!(
            "{} Skipped Scenarios ({}):\n",
            "?".yellow().bold(),
            skipped.len()
        ));
        for entry in skipped {
            output.push_str(&format!(
                "  {} {} / {}\n",
                "-".yellow(),
                entry.feature_name.dimmed(),
                entry.name.dimmed()
            ));
        }
        output.push('\n');
    }

    if verbose {
        if !generation.features().is_empty() {
            output.push_str(&format!("{} Features:\n", "◉".bold()));
            for feature in generation.features().features() {
                output.push_str(&format!(
                    "  {} {}\n",
                    feature.name.green(),
                    text_counts(&feature.counts)
                ));
            }
            output.push('\n');
        }

        if !tags.is_empty() {
            output.push_str(&format!("{} Tags:\n", "#".bold()));
            for (tag, count) in tags.iter() {
                output.push_str(&format!("  {} {}\n", tag.name.cyan(), text_counts(count)));
            }
            output.push('\n');
        }
    }

    output
}

fn text_counts(count: &ResultCount) -> String {
    format!(
        "({} scenarios: {} passed, {} failed, {} skipped)",
        count.total(),
        count.passed(),
        count.failed(),
        count.skipped()
    )
    .dimmed()
    .to_string()
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    title: &'a str,
    scenarios: ResultCount,
    pass_percent: f64,
    features: Vec<JsonCounted<'a>>,
    tags: JsonTags<'a>,
    failed: Vec<JsonScenario<'a>>,
    skipped: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonCounted<'a> {
    name: &'a str,
    #[serde(flatten)]
    counts: ResultCount,
}

#[derive(Serialize)]
struct JsonTags<'a> {
    total: usize,
    failed: usize,
    passed: usize,
    skipped: usize,
    by_tag: Vec<JsonCounted<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    index: usize,
    feature: &'a str,
    name: &'a str,
    duration: u64,
}

fn json_scenarios(entries: Vec<&ScenarioEntry>) -> Vec<JsonScenario<'_>> {
    entries
        .into_iter()
        .map(|s| JsonScenario {
            index: s.scenario_index,
            feature: &s.feature_name,
            name: &s.name,
            duration: s.duration,
        })
        .collect()
}

fn render_json(generation: &Generation, title: &str) -> Result<String> {
    let total = generation.scenarios().total();
    let tags = generation.tags();

    let summary = JsonSummary {
        title,
        scenarios: total,
        pass_percent: total.pass_percent(),
        features: generation
            .features()
            .features()
            .iter()
            .map(|f| JsonCounted {
                name: &f.name,
                counts: f.counts,
            })
            .collect(),
        tags: JsonTags {
            total: tags.total_tags(),
            failed: tags.failed_tags(),
            passed: tags.passed_tags(),
            skipped: tags.skipped_tags(),
            by_tag: tags
                .iter()
                .map(|(tag, count)| JsonCounted {
                    name: &tag.name,
                    counts: *count,
                })
                .collect(),
        },
        failed: json_scenarios(with_status(generation, Status::Failed)),
        skipped: json_scenarios(with_status(generation, Status::Skipped)),
    };

    serde_json::to_string_pretty(&summary).wrap_err("Failed to serialize summary as JSON")
}

fn render_markdown(generation: &Generation, title: &str, verbose: bool) -> String {
    let mut output = String::new();
    let total = generation.scenarios().total();

    output.push_str(&format!("# {}\n\n", title));
    output.push_str(&format!(
        "**Scenarios:** {:.1}% passed ({}/{}), {} failed, {} skipped\n\n",
        total.pass_percent(),
        total.passed(),
        total.total(),
        total.failed(),
        total.skipped()
    ));

    let failed = with_status(generation, Status::Failed);
    if !failed.is_empty() {
        output.push_str("## Failed Scenarios\n\n");
        for entry in failed {
            output.push_str(&format!("- {} / `{}`\n", entry.feature_name, entry.name));
        }
        output.push('\n');
    }

    let skipped = with_status(generation, Status::Skipped);
    if !skipped.is_empty() {
        output.push_str("## Skipped Scenarios\n\n");
        for entry in skipped {
            output.push_str(&format!("- {} / `{}`\n", entry.feature_name, entry.name));
        }
        output.push('\n');
    }

    if verbose {
        output.push_str("## Features\n\n");
        output.push_str("| Feature | Total | Passed | Failed | Skipped |\n");
        output.push_str("|---|---|---|---|---|\n");
        for feature in generation.features().features() {
            let c = &feature.counts;
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                feature.name,
                c.total(),
                c.passed(),
                c.failed(),
                c.skipped()
            ));
        }
        output.push('\n');

        if !generation.tags().is_empty() {
            output.push_str("## Tags\n\n");
            for (tag, c) in generation.tags().iter() {
                output.push_str(&format!(
                    "- `{}` ({} scenarios, {} failed)\n",
                    tag.name,
                    c.total(),
                    c.failed()
                ));
            }
            output.push('\n');
        }
    }

    output
}

fn render_html(generation: &Generation, title: &str, verbose: bool) -> String {
    let mut output = String::new();
    let total = generation.scenarios().total();

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape(title)));
    output.push_str("<style>\n");
    output.push_str("body { font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; }\n");
    output.push_str(".passed { color: green; }\n");
    output.push_str(".skipped { color: orange; }\n");
    output.push_str(".failed { color: red; }\n");
    output.push_str("</style>\n");
    output.push_str("</head>\n<body>\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape(title)));

    let class = if total.failed() > 0 {
        "failed"
    } else if total.skipped() > 0 {
        "skipped"
    } else {
        "passed"
    };
    output.push_str(&format!(
        "<p><strong>Scenarios:</strong> <span class=\"{}\">{:.1}%</span> passed ({}/{}), {} failed, {} skipped</p>\n",
        class,
        total.pass_percent(),
        total.passed(),
        total.total(),
        total.failed(),
        total.skipped()
    ));

    for (status, heading) in [
        (Status::Failed, "Failed Scenarios"),
        (Status::Skipped, "Skipped Scenarios"),
    ] {
        let entries = with_status(generation, status);
        if entries.is_empty() {
            continue;
        }
        output.push_str(&format!("<h2>{}</h2>\n<ul>\n", heading));
        for entry in entries {
            output.push_str(&format!(
                "<li>{} / <code>{}</code></li>\n",
                escape(&entry.feature_name),
                escape(&entry.name)
            ));
        }
        output.push_str("</ul>\n");
    }

    if verbose && !generation.features().is_empty() {
        output.push_str("<h2>Features</h2>\n<ul>\n");
        for feature in generation.features().features() {
            output.push_str(&format!(
                "<li>{} ({} scenarios, {} failed)</li>\n",
                escape(&feature.name),
                feature.counts.total(),
                feature.counts.failed()
            ));
        }
        output.push_str("</ul>\n");
    }

    output.push_str("</body>\n</html>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Element, Report, Step};

    fn generation() -> Generation {
        Generation::run(vec![
            Report::new("Login")
                .with_element(
                    Element::scenario("good password")
                        .with_tag("@smoke")
                        .with_step(Step::new("Given ", "a user").with_status("passed")),
                )
                .with_element(
                    Element::scenario("bad password").with_tag("@smoke").with_step({
                        let mut step = Step::new("Then ", "access is denied").with_status("failed");
                        if let Some(result) = step.result.as_mut() {
                            result.error_message = Some("expected 403\ngot 200".to_string());
                        }
                        step
                    }),
                ),
            Report::new("Search").with_element(
                Element::scenario("by name").with_step(Step::new("When ", "searching")),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn parse_formats() {
        assert_eq!(OutputFormat::parse("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(6_500_000), "6ms");
        assert_eq!(format_duration(1_500_000_000), "1.50s");
        assert_eq!(format_duration(125_000_000_000), "2m 5s");
    }

    #[test]
    fn text_lists_failures_with_messages() {
        let text = render_summary(&generation(), "Nightly", OutputFormat::Text, false).unwrap();
        assert!(text.contains("Nightly"));
        assert!(text.contains("Failed Scenarios (1)"));
        assert!(text.contains("bad password"));
        assert!(text.contains("expected 403"));
        assert!(!text.contains("got 200"));
        assert!(text.contains("Skipped Scenarios (1)"));
    }

    #[test]
    fn json_summary() {
        let json = render_summary(&generation(), "Nightly", OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Nightly");
        assert_eq!(value["scenarios"]["total"], 3);
        assert_eq!(value["scenarios"]["failed"], 1);
        assert_eq!(value["features"][1]["name"], "Search");
        assert_eq!(value["features"][1]["skipped"], 1);
        assert_eq!(value["tags"]["total"], 1);
        assert_eq!(value["tags"]["failed"], 1);
        assert_eq!(value["tags"]["by_tag"][0]["name"], "@smoke");
        assert_eq!(value["failed"][0]["name"], "bad password");
        assert_eq!(value["skipped"][0]["index"], 2);
    }

    #[test]
    fn markdown_and_html() {
        let generation = generation();
        let md = render_summary(&generation, "Nightly", OutputFormat::Markdown, true).unwrap();
        assert!(md.starts_with("# Nightly"));
        assert!(md.contains("| Login | 2 | 1 | 1 | 0 |"));

        let html = render_summary(&generation, "A & B", OutputFormat::Html, false).unwrap();
        assert!(html.contains("<h1>A &amp; B</h1>"));
        assert!(html.contains("class=\"failed\""));
    }
}
