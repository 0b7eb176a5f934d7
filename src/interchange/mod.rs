//! Importer and exporter collaborators.
//!
//! These only move plain [`Task`] and [`CpmResult`](crate::CpmResult) data in
//! and out of external formats. Scheduling fields are never set here; they
//! come from the engine.

use crate::metadata::ProjectMetadata;
use crate::task::Task;
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

pub mod export;
pub mod import;
pub mod report;

pub use export::{
    RESULT_CSV_HEADERS, TASK_CSV_HEADERS, save_critical_path_report, save_csv_template,
    save_project_json, save_result_csv, save_result_json, save_tasks_csv, write_csv_template,
    write_project_json, write_result_csv, write_result_json, write_tasks_csv,
};
pub use import::{
    load_project_from_json, load_tasks_from_csv, parse_project_json, parse_task_reference,
    parse_tasks_csv,
};
pub use report::{critical_path_report, render_frame_as_text_table, result_frame};

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataframe conversion error: {0}")]
    Frame(#[from] PolarsError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type InterchangeResult<T> = Result<T, InterchangeError>;

/// Project file: metadata plus the authored task list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    pub tasks: Vec<Task>,
}

impl ProjectDocument {
    pub fn new(metadata: ProjectMetadata, tasks: Vec<Task>) -> Self {
        Self { metadata, tasks }
    }
}
