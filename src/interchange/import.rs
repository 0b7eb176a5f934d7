use super::{InterchangeError, InterchangeResult, ProjectDocument};
use crate::dependencies::build_task_dependencies;
use crate::ids::IdIssuer;
use crate::task::{Dependency, DependencyType, Task};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

const NO_DEPENDENCY: &str = "---";

static REFERENCE_WITH_LAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\(([FS\-]+)\s+Lag([+-]?\d+)\)$").expect("static regex")
});
static REFERENCE_WITH_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\(([FS\-]+)\)$").expect("static regex"));
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("static regex"));

/// Splits a legacy cell entry such as `Design(SS Lag3)` into name, type and lag.
pub fn parse_task_reference(entry: &str) -> (String, DependencyType, i64) {
    let entry = entry.trim();
    if let Some(caps) = REFERENCE_WITH_LAG.captures(entry) {
        let kind = DependencyType::from_code(&caps[2]).unwrap_or_default();
        let lag = caps[3].parse::<i64>().unwrap_or(0);
        return (caps[1].trim().to_string(), kind, lag);
    }
    if let Some(caps) = REFERENCE_WITH_TYPE.captures(entry) {
        let kind = DependencyType::from_code(&caps[2]).unwrap_or_default();
        return (caps[1].trim().to_string(), kind, 0);
    }
    (entry.to_string(), DependencyType::FinishToStart, 0)
}

fn split_names(cell: &str) -> Vec<&str> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != NO_DEPENDENCY)
        .collect()
}

fn field(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn parse_duration(input: &str, line: u64) -> InterchangeResult<f64> {
    input
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| {
            InterchangeError::InvalidData(format!(
                "line {line}: duration must be a positive number (got '{input}')"
            ))
        })
}

/// Reads the leading integer of a lag cell, so `1.5` is 1 and `3 days` is 3.
/// Blank and placeholder cells are 0; anything else is an error.
fn parse_lag(input: &str, line: u64) -> InterchangeResult<i64> {
    let input = input.trim();
    if input.is_empty() || input == NO_DEPENDENCY {
        return Ok(0);
    }
    LEADING_INTEGER
        .find(input)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .ok_or_else(|| {
            InterchangeError::InvalidData(format!(
                "line {line}: lag must be a whole number of days (got '{input}')"
            ))
        })
}

fn push_unique(links: &mut Vec<Dependency>, dependency: Dependency) {
    if !links.iter().any(|d| d.task_id == dependency.task_id) {
        links.push(dependency);
    }
}

/// Parses the tabular task format.
///
/// The header row is skipped. Rows with at least five fields use the
/// `name, duration, predecessors, relation, lag` layout; shorter rows use
/// `name, duration, predecessors[, successors]` where each entry may carry a
/// `(TYPE)` or `(TYPE LagN)` suffix. Dependencies refer to tasks by name.
pub fn parse_tasks_csv<I: IdIssuer + ?Sized>(
    text: &str,
    issuer: &mut I,
) -> InterchangeResult<Vec<Task>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(u64, Vec<String>)> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push((line, record.iter().map(ToOwned::to_owned).collect()));
    }

    if rows.len() < 2 {
        return Err(InterchangeError::InvalidData(
            "CSV file needs a header row and at least one data row".into(),
        ));
    }
    let data_rows = &rows[1..];

    // First pass: create tasks
    let mut tasks: Vec<Task> = Vec::new();
    let mut row_task: Vec<(usize, u64, &Vec<String>)> = Vec::new();
    let mut name_to_id: HashMap<String, String> = HashMap::new();
    for (line, fields) in data_rows {
        if fields.len() < 2 {
            continue;
        }
        let name = field(fields, 0);
        let duration = field(fields, 1);
        if name.is_empty() || duration.is_empty() {
            continue;
        }
        let duration = parse_duration(duration, *line)?;
        let task = Task::new(issuer.issue(), name, duration);
        name_to_id.insert(name.to_string(), task.id.clone());
        row_task.push((tasks.len(), *line, fields));
        tasks.push(task);
    }

    let extended = data_rows
        .first()
        .map(|(_, fields)| fields.len() >= 5)
        .unwrap_or(false);

    // Second pass: resolve dependencies by name
    for (position, line, fields) in row_task {
        if extended && fields.len() >= 5 {
            let names = field(fields, 2);
            if names.is_empty() || names == NO_DEPENDENCY {
                continue;
            }
            let relation = match field(fields, 3) {
                "" => "F-S",
                other => other,
            };
            let kind = DependencyType::from_code(relation).unwrap_or_default();
            let lag = parse_lag(field(fields, 4), line)?;
            for name in split_names(names) {
                if let Some(id) = name_to_id.get(name) {
                    push_unique(
                        &mut tasks[position].predecessors,
                        Dependency::new(id.clone(), kind, lag),
                    );
                }
            }
        } else {
            for entry in split_names(field(fields, 2)) {
                let (name, kind, lag) = parse_task_reference(entry);
                if let Some(id) = name_to_id.get(&name) {
                    push_unique(
                        &mut tasks[position].predecessors,
                        Dependency::new(id.clone(), kind, lag),
                    );
                }
            }
            for entry in split_names(field(fields, 3)) {
                let (name, kind, lag) = parse_task_reference(entry);
                if let Some(id) = name_to_id.get(&name) {
                    push_unique(
                        &mut tasks[position].successors,
                        Dependency::new(id.clone(), kind, lag),
                    );
                }
            }
        }
    }

    debug!(task_count = tasks.len(), extended, "parsed task csv");
    Ok(build_task_dependencies(&tasks))
}

/// Accepts a project document or a bare task array.
///
/// Missing task fields deserialize to blanks so [`crate::validate_tasks`]
/// can name them. Resource subtotals left out of the file are filled in.
pub fn parse_project_json(text: &str) -> InterchangeResult<ProjectDocument> {
    let text = text.trim_start_matches('\u{feff}');
    let mut document = if text.trim_start().starts_with('[') {
        ProjectDocument {
            tasks: serde_json::from_str::<Vec<Task>>(text)?,
            ..ProjectDocument::default()
        }
    } else {
        serde_json::from_str::<ProjectDocument>(text)?
    };
    for task in &mut document.tasks {
        task.resources.iter_mut().for_each(|r| r.fill_total_cost());
    }
    Ok(document)
}

pub fn load_tasks_from_csv<P: AsRef<Path>, I: IdIssuer + ?Sized>(
    path: P,
    issuer: &mut I,
) -> InterchangeResult<Vec<Task>> {
    let text = fs::read_to_string(path)?;
    parse_tasks_csv(&text, issuer)
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> InterchangeResult<ProjectDocument> {
    let text = fs::read_to_string(path)?;
    parse_project_json(&text)
}
