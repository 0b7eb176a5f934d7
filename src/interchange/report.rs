use crate::metadata::ProjectMetadata;
use crate::schedule::CpmResult;
use crate::task::ScheduledTask;
use polars::prelude::*;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 50;

/// Plain-text critical path analysis.
pub fn critical_path_report(result: &CpmResult, metadata: &ProjectMetadata) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Critical Path Report: {}", metadata.project_name);
    let _ = writeln!(report, "{}\n", "=".repeat(RULE_WIDTH));

    if !result.is_ok() {
        let _ = writeln!(report, "Schedule could not be computed:");
        for error in &result.errors {
            let _ = writeln!(report, "  - {error}");
        }
        if let Some(cycle) = &result.cycle {
            let _ = writeln!(report, "  cycle: {}", cycle.join(" -> "));
        }
        return report;
    }

    let critical: Vec<&ScheduledTask> = result
        .critical_path
        .iter()
        .filter_map(|id| result.scheduled(id))
        .collect();

    let _ = writeln!(report, "Total duration: {} days", result.total_duration);
    let cost: f64 = result.tasks.iter().map(|t| t.task().resource_cost()).sum();
    if cost > 0.0 {
        let _ = writeln!(report, "Resource cost: {cost}");
    }
    let _ = writeln!(report, "Critical tasks: {}\n", critical.len());

    let _ = writeln!(report, "Critical path:");
    let chain = critical
        .iter()
        .map(|task| task.name())
        .collect::<Vec<_>>()
        .join(" -> ");
    let _ = writeln!(report, "{chain}\n");

    let _ = writeln!(report, "Critical task details:");
    let _ = writeln!(report, "{}", "-".repeat(RULE_WIDTH));
    for (idx, task) in critical.iter().enumerate() {
        let _ = writeln!(report, "{}. {}", idx + 1, task.name());
        let _ = writeln!(report, "   Duration: {} days", task.duration());
        let _ = writeln!(report, "   Earliest start: day {}", task.es);
        let _ = writeln!(report, "   Earliest finish: day {}", task.ef);
        let _ = writeln!(report, "   Latest start: day {}", task.ls);
        let _ = writeln!(report, "   Latest finish: day {}", task.lf);
        let _ = writeln!(report, "   Total float: {} days\n", task.tf);
    }

    let _ = writeln!(report, "\nOther task floats:");
    let _ = writeln!(report, "{}", "-".repeat(RULE_WIDTH));
    for task in result.scheduled_tasks().filter(|task| !task.is_critical) {
        let _ = writeln!(
            report,
            "{}: total float {} days, free float {} days",
            task.name(),
            task.tf,
            task.ff
        );
    }

    report
}

/// Schedule table as a DataFrame. Timing columns are null for unscheduled tasks.
pub fn result_frame(result: &CpmResult) -> PolarsResult<DataFrame> {
    let height = result.tasks.len();
    let mut ids: Vec<&str> = Vec::with_capacity(height);
    let mut names: Vec<&str> = Vec::with_capacity(height);
    let mut durations: Vec<f64> = Vec::with_capacity(height);
    let mut timing: [Vec<Option<f64>>; 6] = Default::default();
    let mut critical: Vec<Option<bool>> = Vec::with_capacity(height);

    for planned in &result.tasks {
        let task = planned.task();
        ids.push(task.id.as_str());
        names.push(task.name.as_str());
        durations.push(task.duration);
        let scheduled = planned.as_scheduled();
        let values = scheduled.map(|s| [s.es, s.ef, s.ls, s.lf, s.tf, s.ff]);
        for (column, slot) in timing.iter_mut().enumerate() {
            slot.push(values.map(|v| v[column]));
        }
        critical.push(scheduled.map(|s| s.is_critical));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(10);
    columns.push(Series::new(PlSmallStr::from_static("id"), ids).into_column());
    columns.push(Series::new(PlSmallStr::from_static("name"), names).into_column());
    columns.push(Series::new(PlSmallStr::from_static("duration"), durations).into_column());
    for (name, values) in ["es", "ef", "ls", "lf", "tf", "ff"].into_iter().zip(timing) {
        columns.push(Series::new(name.into(), values).into_column());
    }
    columns.push(Series::new(PlSmallStr::from_static("is_critical"), critical).into_column());

    DataFrame::new(columns)
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        other => other.to_string(),
    }
}

pub fn render_frame_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| -> String {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.len());
            let _ = write!(line, " {}{} |", value, " ".repeat(pad));
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
