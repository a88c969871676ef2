//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Mutation outcomes print as colored one-liners on stderr -- the CLI's
//! version of a transient toast.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use bandly_core::{ListState, LoadPhase, MutationOutcome, Page};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the whole page via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_page<T, R>(
    format: &OutputFormat,
    page: &Page<T>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = page.items.iter().map(to_row).collect();
            let mut out = render_table(&rows);
            out.push_str(&format!(
                "\npage {} of {} ({} total)",
                page.page,
                page.total_pages.max(1),
                page.total
            ));
            out
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => page.items.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Render a settled list-controller state, mapping each terminal phase
/// onto its own surface:
///
/// - `Failed` becomes a [`CliError::ListFailed`] with a retry hint
/// - `Loaded` with no items prints the distinct empty state with a
///   clear-filters hint
/// - `Loaded` with items renders through [`render_page`]
pub fn render_list_state<T, R>(
    state: &ListState<T>,
    resource: &str,
    global: &GlobalOpts,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match state.phase {
        LoadPhase::Failed => Err(CliError::ListFailed {
            resource: resource.to_owned(),
            message: state
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_owned()),
        }),
        LoadPhase::Loaded if state.is_empty_result() => {
            if !global.quiet {
                let hint = if state.query.filters.is_empty() {
                    String::new()
                } else {
                    " Drop the filter/search flags to see everything.".to_owned()
                };
                eprintln!("No {resource} match the current filters.{hint}");
            }
            Ok(())
        }
        LoadPhase::Loaded => {
            let page = state.list.as_ref().expect("loaded state carries a page");
            let out = render_page(&global.output, page, to_row, id_fn);
            print_output(&out, global.quiet);
            Ok(())
        }
        LoadPhase::Idle | LoadPhase::Loading => Err(CliError::ListFailed {
            resource: resource.to_owned(),
            message: "list never settled".to_owned(),
        }),
    }
}

/// Print a mutation outcome as a colored one-liner on stderr.
pub fn print_outcome(outcome: &MutationOutcome, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    let color = should_color(&global.color);
    if outcome.is_success() {
        if color {
            eprintln!("{} {}", "ok:".green().bold(), outcome.message);
        } else {
            eprintln!("ok: {}", outcome.message);
        }
    } else if color {
        eprintln!("{} {}", "error:".red().bold(), outcome.message);
    } else {
        eprintln!("error: {}", outcome.message);
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.expect("serialization should not fail")
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
