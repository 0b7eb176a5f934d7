use crate::ids::IdIssuer;
use crate::resource::Resource;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Precedence semantics of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyType {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
            DependencyType::StartToFinish => "SF",
        }
    }

    /// Parses `FS`, `f-s`, `S-S`, ... Hyphens and case are ignored.
    pub fn from_code(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "FS" => Some(DependencyType::FinishToStart),
            "SS" => Some(DependencyType::StartToStart),
            "FF" => Some(DependencyType::FinishToFinish),
            "SF" => Some(DependencyType::StartToFinish),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Id of the task on the other end of the edge.
    pub task_id: String,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
    /// Signed offset in days. Negative values allow overlap.
    #[serde(default)]
    pub lag: i64,
}

impl Dependency {
    pub fn new(task_id: impl Into<String>, kind: DependencyType, lag: i64) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
            lag,
        }
    }

    pub fn finish_to_start(task_id: impl Into<String>) -> Self {
        Self::new(task_id, DependencyType::FinishToStart, 0)
    }
}

/// An activity as authored by the caller, before any scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Duration in days. NaN when the source left it out, so the validator
    /// reports it instead of the parser.
    #[serde(default = "missing_duration", deserialize_with = "duration_or_missing")]
    pub duration: f64,
    #[serde(default)]
    pub predecessors: Vec<Dependency>,
    #[serde(default)]
    pub successors: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    /// User-entered planned dates, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

fn missing_duration() -> f64 {
    f64::NAN
}

fn duration_or_missing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            predecessors: Vec::new(),
            successors: Vec::new(),
            resources: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn resource_cost(&self) -> f64 {
        crate::resource::total_resource_cost(&self.resources)
    }

    pub fn with_predecessor(mut self, dependency: Dependency) -> Self {
        self.predecessors.push(dependency);
        self
    }

    pub fn with_successor(mut self, dependency: Dependency) -> Self {
        self.successors.push(dependency);
        self
    }
}

/// A task after the forward, backward and float passes have run.
///
/// Every timing field is required; a value of this type only exists once the
/// engine has produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    #[serde(flatten)]
    pub task: Task,
    pub es: f64,
    pub ef: f64,
    pub ls: f64,
    pub lf: f64,
    pub tf: f64,
    pub ff: f64,
    pub is_critical: bool,
    pub is_start: bool,
    pub is_end: bool,
}

impl ScheduledTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn name(&self) -> &str {
        &self.task.name
    }

    pub fn duration(&self) -> f64 {
        self.task.duration
    }
}

/// Two-phase view of a task inside a [`crate::CpmResult`].
///
/// Serialized without a tag: a scheduled task carries its timing fields, an
/// unscheduled one does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlannedTask {
    Scheduled(ScheduledTask),
    Unscheduled(Task),
}

impl PlannedTask {
    pub fn task(&self) -> &Task {
        match self {
            PlannedTask::Scheduled(scheduled) => &scheduled.task,
            PlannedTask::Unscheduled(task) => task,
        }
    }

    pub fn id(&self) -> &str {
        &self.task().id
    }

    pub fn name(&self) -> &str {
        &self.task().name
    }

    pub fn as_scheduled(&self) -> Option<&ScheduledTask> {
        match self {
            PlannedTask::Scheduled(scheduled) => Some(scheduled),
            PlannedTask::Unscheduled(_) => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, PlannedTask::Scheduled(_))
    }
}

/// Builds a new task with a freshly issued id and optional FS links.
pub fn create_task_from_input<I: IdIssuer + ?Sized>(
    issuer: &mut I,
    name: impl Into<String>,
    duration: f64,
    predecessor: Option<&str>,
    successor: Option<&str>,
) -> Task {
    let mut task = Task::new(issuer.issue(), name, duration);
    if let Some(pred) = predecessor.filter(|id| !id.trim().is_empty()) {
        task.predecessors.push(Dependency::finish_to_start(pred));
    }
    if let Some(succ) = successor.filter(|id| !id.trim().is_empty()) {
        task.successors.push(Dependency::finish_to_start(succ));
    }
    task
}
