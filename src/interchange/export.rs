use super::{InterchangeResult, ProjectDocument};
use crate::interchange::report::critical_path_report;
use crate::metadata::ProjectMetadata;
use crate::schedule::CpmResult;
use crate::task::{PlannedTask, Task};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const BOM: &str = "\u{feff}";
const PLACEHOLDER: &str = "---";
const MISSING: &str = "-";

pub const TASK_CSV_HEADERS: [&str; 5] = [
    "Task Name",
    "Duration (days)",
    "Predecessors",
    "Relation",
    "Lag (days)",
];

pub const RESULT_CSV_HEADERS: [&str; 9] = [
    "Task Name",
    "Duration (days)",
    "ES",
    "EF",
    "LS",
    "LF",
    "TF",
    "FF",
    "Critical",
];

/// Sample rows for a blank task sheet, in the spreadsheet-style `F-S` codes.
const TEMPLATE_ROWS: [[&str; 5]; 5] = [
    ["Site survey", "5", PLACEHOLDER, PLACEHOLDER, PLACEHOLDER],
    ["Preliminary design", "10", "Site survey", "F-S", "0"],
    ["Structural design", "15", "Preliminary design", "F-S", "0"],
    ["Tender preparation", "7", "Structural design", "S-S", "2"],
    ["Mobilization", "3", "Tender preparation", "F-S", "0"],
];

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer)
}

fn task_row(task: &Task, names: &HashMap<&str, &str>) -> [String; 5] {
    let name_of = |id: &str| names.get(id).copied().unwrap_or(id).to_string();
    let duration = task.duration.to_string();

    let Some(first) = task.predecessors.first() else {
        return [
            task.name.clone(),
            duration,
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ];
    };

    let uniform = task
        .predecessors
        .iter()
        .all(|dep| dep.kind == first.kind && dep.lag == first.lag);
    let predecessors = if uniform {
        task.predecessors
            .iter()
            .map(|dep| name_of(&dep.task_id))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        // Mixed relations cannot share one cell; keep the first and note the count.
        format!(
            "{} (and {} total)",
            name_of(&first.task_id),
            task.predecessors.len()
        )
    };

    [
        task.name.clone(),
        duration,
        predecessors,
        first.kind.to_string(),
        first.lag.to_string(),
    ]
}

/// Writes the five-column task table that [`super::parse_tasks_csv`] reads.
pub fn write_tasks_csv<W: Write>(tasks: &[Task], writer: W) -> InterchangeResult<()> {
    let names: HashMap<&str, &str> = tasks
        .iter()
        .map(|task| (task.id.as_str(), task.name.as_str()))
        .collect();
    let mut writer = csv_writer(writer);
    writer.write_record(TASK_CSV_HEADERS)?;
    for task in tasks {
        writer.write_record(task_row(task, &names))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the five-column header plus sample rows for users to fill in.
pub fn write_csv_template<W: Write>(writer: W) -> InterchangeResult<()> {
    let mut writer = csv_writer(writer);
    writer.write_record(TASK_CSV_HEADERS)?;
    for row in TEMPLATE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_result_csv<W: Write>(result: &CpmResult, writer: W) -> InterchangeResult<()> {
    let mut writer = csv_writer(writer);
    writer.write_record(RESULT_CSV_HEADERS)?;
    for planned in &result.tasks {
        let task = planned.task();
        let row = match planned {
            PlannedTask::Scheduled(s) => [
                task.name.clone(),
                task.duration.to_string(),
                s.es.to_string(),
                s.ef.to_string(),
                s.ls.to_string(),
                s.lf.to_string(),
                s.tf.to_string(),
                s.ff.to_string(),
                if s.is_critical { "yes" } else { "no" }.to_string(),
            ],
            PlannedTask::Unscheduled(_) => {
                let mut row: [String; 9] = std::array::from_fn(|_| MISSING.to_string());
                row[0] = task.name.clone();
                row[1] = task.duration.to_string();
                row[8] = "no".to_string();
                row
            }
        };
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_project_json<W: Write>(document: &ProjectDocument, writer: W) -> InterchangeResult<()> {
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

pub fn write_result_json<W: Write>(result: &CpmResult, writer: W) -> InterchangeResult<()> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

fn create_with_bom<P: AsRef<Path>>(path: P) -> InterchangeResult<BufWriter<File>> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(BOM.as_bytes())?;
    Ok(file)
}

pub fn save_tasks_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> InterchangeResult<()> {
    write_tasks_csv(tasks, create_with_bom(path)?)
}

pub fn save_csv_template<P: AsRef<Path>>(path: P) -> InterchangeResult<()> {
    write_csv_template(create_with_bom(path)?)
}

pub fn save_result_csv<P: AsRef<Path>>(result: &CpmResult, path: P) -> InterchangeResult<()> {
    write_result_csv(result, create_with_bom(path)?)
}

pub fn save_project_json<P: AsRef<Path>>(
    document: &ProjectDocument,
    path: P,
) -> InterchangeResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_project_json(document, &mut file)?;
    file.flush()?;
    Ok(())
}

pub fn save_result_json<P: AsRef<Path>>(result: &CpmResult, path: P) -> InterchangeResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_result_json(result, &mut file)?;
    file.flush()?;
    Ok(())
}

pub fn save_critical_path_report<P: AsRef<Path>>(
    result: &CpmResult,
    metadata: &ProjectMetadata,
    path: P,
) -> InterchangeResult<()> {
    let mut file = create_with_bom(path)?;
    file.write_all(critical_path_report(result, metadata).as_bytes())?;
    file.flush()?;
    Ok(())
}
