//! Static report site
//!
//! Page file names are derived from feature indices, scenario indices and tag
//! slugs only. Changing how those are assigned renames pages, which breaks
//! links into previously published reports.

use crate::output::format_duration;
use eyre::{Result, WrapErr};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tally_core::{
    Element, FeatureSummary, Generation, Report, ScenarioEntry, Status, Tag, TagSummary,
};
use tracing::{debug, info};

/// Where every page of the site lives, relative to the output directory
#[derive(Debug, Clone)]
pub struct PageLayout {
    root: PathBuf,
}

impl PageLayout {
    pub const PAGES_DIR: &'static str = "pages";
    pub const SCENARIO_SUMMARY: &'static str = "index.html";
    pub const FEATURE_SUMMARY: &'static str = "pages/feature-summary.html";
    pub const TAG_SUMMARY: &'static str = "pages/tag-summary.html";
    pub const FEATURE_SCENARIOS_DIR: &'static str = "pages/feature-scenarios";
    pub const TAG_SCENARIOS_DIR: &'static str = "pages/tag-scenarios";
    pub const SCENARIO_DETAIL_DIR: &'static str = "pages/scenario-detail";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories that must exist before pages are written
    pub fn directories(&self) -> [PathBuf; 4] {
        [
            self.root.join(Self::PAGES_DIR),
            self.root.join(Self::FEATURE_SCENARIOS_DIR),
            self.root.join(Self::TAG_SCENARIOS_DIR),
            self.root.join(Self::SCENARIO_DETAIL_DIR),
        ]
    }

    pub fn feature_scenarios_path(index: usize) -> String {
        format!("{}/feature_{}.html", Self::FEATURE_SCENARIOS_DIR, index)
    }

    pub fn tag_scenarios_path(tag: &Tag) -> String {
        format!("{}/tag_{}.html", Self::TAG_SCENARIOS_DIR, tag.slug())
    }

    pub fn scenario_detail_path(index: usize) -> String {
        format!("{}/scenario_{}.html", Self::SCENARIO_DETAIL_DIR, index)
    }

    /// Absolute location of a page given its site-relative path
    pub fn file(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Prefix that leads from a page back to the site root
fn base_for(relative: &str) -> String {
    "../".repeat(relative.matches('/').count())
}

/// What a renderer gets to see for every page
pub struct PageContext<'a> {
    /// Report title
    pub title: &'a str,
    pub generation: &'a Generation,
    /// Relative prefix to the site root (`""`, `"../"`, `"../../"`)
    pub base: &'a str,
}

impl PageContext<'_> {
    /// Link to a page from the current one
    pub fn href(&self, relative: &str) -> String {
        format!("{}{}", self.base, relative)
    }
}

/// Turns summaries into page content
pub trait PageRenderer {
    /// A list of scenarios: the start page, one feature, or one tag
    fn scenario_list(&self, ctx: &PageContext<'_>, heading: &str, scenarios: &[&ScenarioEntry])
    -> String;

    fn feature_summary(&self, ctx: &PageContext<'_>, features: &FeatureSummary) -> String;

    fn tag_summary(&self, ctx: &PageContext<'_>, tags: &TagSummary) -> String;

    fn scenario_detail(
        &self,
        ctx: &PageContext<'_>,
        entry: &ScenarioEntry,
        report: &Report,
        element: &Element,
    ) -> String;
}

/// Pages written by [`write_site`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiteStats {
    pub pages: usize,
    pub feature_pages: usize,
    pub tag_pages: usize,
    pub scenario_pages: usize,
}

/// Write the whole site for a generation.
pub fn write_site(
    generation: &Generation,
    layout: &PageLayout,
    renderer: &impl PageRenderer,
    title: &str,
) -> Result<SiteStats> {
    for dir in layout.directories() {
        std::fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let mut stats = SiteStats::default();
    let mut write = |relative: &str, render: &dyn Fn(&PageContext<'_>) -> String| -> Result<()> {
        let base = base_for(relative);
        let ctx = PageContext {
            title,
            generation,
            base: &base,
        };
        let path = layout.file(relative);
        std::fs::write(&path, render(&ctx))
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
        stats.pages += 1;
        Ok(())
    };

    let scenarios = generation.scenarios();
    let all: Vec<&ScenarioEntry> = scenarios.scenarios().iter().collect();
    write(PageLayout::SCENARIO_SUMMARY, &|ctx: &PageContext<'_>| {
        renderer.scenario_list(ctx, "All Scenarios", &all)
    })?;

    write(PageLayout::FEATURE_SUMMARY, &|ctx: &PageContext<'_>| {
        renderer.feature_summary(ctx, generation.features())
    })?;
    for feature in generation.features().features() {
        let list: Vec<&ScenarioEntry> = scenarios.for_feature(feature.index).collect();
        let heading = format!("Feature: {}", feature.name);
        write(&PageLayout::feature_scenarios_path(feature.index), &|ctx: &PageContext<'_>| {
            renderer.scenario_list(ctx, &heading, &list)
        })?;
    }

    write(PageLayout::TAG_SUMMARY, &|ctx: &PageContext<'_>| {
        renderer.tag_summary(ctx, generation.tags())
    })?;
    for tag in generation.tags().tags() {
        let list: Vec<&ScenarioEntry> = scenarios.with_tag(&tag.name).collect();
        let heading = format!("Tag: {}", tag.name);
        write(&PageLayout::tag_scenarios_path(tag), &|ctx: &PageContext<'_>| {
            renderer.scenario_list(ctx, &heading, &list)
        })?;
    }

    for entry in scenarios.scenarios() {
        let report = generation.report_of(entry);
        let element = generation.element_of(entry);
        write(&PageLayout::scenario_detail_path(entry.scenario_index), &|ctx: &PageContext<'_>| {
            renderer.scenario_detail(ctx, entry, report, element)
        })?;
    }

    stats.feature_pages = generation.features().len();
    stats.tag_pages = generation.tags().total_tags();
    stats.scenario_pages = scenarios.len();
    info!(
        pages = stats.pages,
        root = %layout.root().display(),
        "report site written"
    );
    Ok(stats)
}

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal built-in HTML pages
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn page(&self, ctx: &PageContext<'_>, heading: &str, body: &str) -> String {
        let mut output = String::new();
        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        output.push_str("<meta charset=\"utf-8\">\n");
        output.push_str(&format!(
            "<title>{} - {}</title>\n",
            escape(ctx.title),
            escape(heading)
        ));
        output.push_str("<style>\n");
        output.push_str("body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }\n");
        output.push_str("table { border-collapse: collapse; width: 100%; }\n");
        output.push_str("td, th { border-bottom: 1px solid #ddd; padding: 0.3em 0.5em; text-align: left; }\n");
        output.push_str(".passed { color: green; }\n");
        output.push_str(".skipped { color: orange; }\n");
        output.push_str(".failed { color: red; }\n");
        output.push_str("pre { background: #f0f0f0; padding: 0.5em; }\n");
        output.push_str("</style>\n");
        output.push_str("</head>\n<body>\n");
        output.push_str(&format!(
            "<nav><a href=\"{}\">Scenarios</a> | <a href=\"{}\">Features</a> | <a href=\"{}\">Tags</a></nav>\n",
            ctx.href(PageLayout::SCENARIO_SUMMARY),
            ctx.href(PageLayout::FEATURE_SUMMARY),
            ctx.href(PageLayout::TAG_SUMMARY),
        ));
        output.push_str(&format!("<h1>{}</h1>\n", escape(heading)));
        output.push_str(body);
        output.push_str("</body>\n</html>\n");
        output
    }
}

fn status_span(status: Status) -> String {
    format!("<span class=\"{0}\">{0}</span>", status.as_str())
}

fn counts_cells(count: &tally_core::ResultCount) -> String {
    format!(
        "<td>{}</td><td class=\"passed\">{}</td><td class=\"failed\">{}</td><td class=\"skipped\">{}</td>",
        count.total(),
        count.passed(),
        count.failed(),
        count.skipped()
    )
}

impl PageRenderer for HtmlRenderer {
    fn scenario_list(
        &self,
        ctx: &PageContext<'_>,
        heading: &str,
        scenarios: &[&ScenarioEntry],
    ) -> String {
        let mut body = String::new();
        let total: tally_core::ResultCount = scenarios.iter().map(|s| s.status).collect();
        let _ = writeln!(
            body,
            "<p>{} scenarios: {} passed, {} failed, {} skipped</p>",
            total.total(),
            total.passed(),
            total.failed(),
            total.skipped()
        );
        body.push_str("<table>\n<tr><th>#</th><th>Feature</th><th>Scenario</th><th>Status</th><th>Duration</th></tr>\n");
        for s in scenarios {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
                s.scenario_index,
                ctx.href(&PageLayout::feature_scenarios_path(s.feature_index)),
                escape(&s.feature_name),
                ctx.href(&PageLayout::scenario_detail_path(s.scenario_index)),
                escape(&s.name),
                status_span(s.status),
                format_duration(s.duration),
            );
        }
        body.push_str("</table>\n");
        self.page(ctx, heading, &body)
    }

    fn feature_summary(&self, ctx: &PageContext<'_>, features: &FeatureSummary) -> String {
        let mut body = String::new();
        body.push_str("<table>\n<tr><th>Feature</th><th>Total</th><th>Passed</th><th>Failed</th><th>Skipped</th></tr>\n");
        for feature in features.features() {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{}\">{}</a></td>{}</tr>",
                ctx.href(&PageLayout::feature_scenarios_path(feature.index)),
                escape(&feature.name),
                counts_cells(&feature.counts)
            );
        }
        let _ = writeln!(
            body,
            "<tr><th>Total</th>{}</tr>",
            counts_cells(&features.total())
        );
        body.push_str("</table>\n");
        self.page(ctx, "Features", &body)
    }

    fn tag_summary(&self, ctx: &PageContext<'_>, tags: &TagSummary) -> String {
        let mut body = String::new();
        let _ = writeln!(
            body,
            "<p>{} tags: {} failed, {} passed, {} skipped</p>",
            tags.total_tags(),
            tags.failed_tags(),
            tags.passed_tags(),
            tags.skipped_tags()
        );
        body.push_str("<table>\n<tr><th>Tag</th><th>Total</th><th>Passed</th><th>Failed</th><th>Skipped</th></tr>\n");
        for (tag, count) in tags.iter() {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{}\">{}</a></td>{}</tr>",
                ctx.href(&PageLayout::tag_scenarios_path(tag)),
                escape(&tag.name),
                counts_cells(count)
            );
        }
        body.push_str("</table>\n");
        self.page(ctx, "Tags", &body)
    }

    fn scenario_detail(
        &self,
        ctx: &PageContext<'_>,
        entry: &ScenarioEntry,
        report: &Report,
        element: &Element,
    ) -> String {
        let mut body = String::new();
        let _ = writeln!(
            body,
            "<p>Feature: <a href=\"{}\">{}</a> | Status: {} | Duration: {}</p>",
            ctx.href(&PageLayout::feature_scenarios_path(entry.feature_index)),
            escape(&report.name),
            status_span(entry.status),
            format_duration(entry.duration)
        );
        if !entry.tags.is_empty() {
            body.push_str("<p>Tags:");
            for tag in &entry.tags {
                let _ = write!(
                    body,
                    " <a href=\"{}\">{}</a>",
                    ctx.href(&PageLayout::tag_scenarios_path(tag)),
                    escape(&tag.name)
                );
            }
            body.push_str("</p>\n");
        }
        if let Some(description) = element.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(body, "<p>{}</p>", escape(description));
        }

        body.push_str("<table>\n<tr><th>Line</th><th>Step</th><th>Status</th></tr>\n");
        for step in &element.steps {
            let status = step
                .status()
                .map(status_span)
                .unwrap_or_else(|e| escape(&e.to_string()));
            let _ = write!(
                body,
                "<tr><td>{}</td><td><strong>{}</strong>{}",
                step.line,
                escape(&step.keyword),
                escape(step.name())
            );
            if !step.rows.is_empty() {
                body.push_str("<table>");
                for row in &step.rows {
                    body.push_str("<tr>");
                    for cell in &row.cells {
                        let _ = write!(body, "<td>{}</td>", escape(cell));
                    }
                    body.push_str("</tr>");
                }
                body.push_str("</table>");
            }
            if let Some(message) = step.error_message() {
                let _ = write!(body, "<pre>{}</pre>", escape(message));
            }
            let _ = writeln!(body, "</td><td>{}</td></tr>", status);
        }
        body.push_str("</table>\n");

        let heading = format!("Scenario: {}", element.name);
        self.page(ctx, &heading, &body)
    }
}
