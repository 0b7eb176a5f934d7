use crate::calculations::{BackwardPass, FloatResolver, ForwardPass};
use crate::config::EngineConfig;
use crate::graph::{GraphError, ScheduleDag, find_cycle, topological_order};
use crate::task::{PlannedTask, ScheduledTask, Task};
use crate::task_validation::validate_tasks;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const CYCLE_ERROR_MESSAGE: &str =
    "circular dependency detected; check the dependencies between tasks";

/// Outcome of one engine call. Built fresh every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpmResult {
    pub tasks: Vec<PlannedTask>,
    /// Ids of every critical task in input order. Disjoint critical chains
    /// all appear here.
    pub critical_path: Vec<String>,
    pub total_duration: f64,
    pub start_tasks: Vec<String>,
    pub end_tasks: Vec<String>,
    pub has_cycle: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// One offending loop, first id repeated at the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<String>>,
}

impl CpmResult {
    fn rejected(tasks: &[Task], errors: Vec<String>, cycle: Option<Vec<String>>) -> Self {
        Self {
            tasks: tasks.iter().cloned().map(PlannedTask::Unscheduled).collect(),
            critical_path: Vec::new(),
            total_duration: 0.0,
            start_tasks: Vec::new(),
            end_tasks: Vec::new(),
            has_cycle: cycle.is_some(),
            errors,
            cycle,
        }
    }

    fn cyclic(tasks: &[Task], cycle: Vec<String>) -> Self {
        Self::rejected(tasks, vec![CYCLE_ERROR_MESSAGE.to_string()], Some(cycle))
    }

    /// True when the tasks were scheduled.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && !self.has_cycle
    }

    pub fn scheduled_tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter().filter_map(PlannedTask::as_scheduled)
    }

    pub fn task(&self, id: &str) -> Option<&PlannedTask> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn scheduled(&self, id: &str) -> Option<&ScheduledTask> {
        self.task(id).and_then(PlannedTask::as_scheduled)
    }

    pub fn to_cli_summary(&self) -> String {
        if self.has_cycle {
            let path = self.cycle.as_deref().unwrap_or_default().join("->");
            return format!("cycle={}", path);
        }
        if !self.errors.is_empty() {
            return format!("errors={}", self.errors.len());
        }
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.tasks.len()));
        parts.push(format!("critical={}", self.critical_path.len()));
        parts.push(format!("duration={}", self.total_duration));
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join(",")));
        }
        parts.join(", ")
    }
}

/// Runs the full CPM pipeline with default settings.
pub fn calculate_cpm(tasks: &[Task]) -> CpmResult {
    calculate_cpm_with_config(tasks, &EngineConfig::default())
}

pub fn calculate_cpm_with_config(tasks: &[Task], config: &EngineConfig) -> CpmResult {
    debug!(task_count = tasks.len(), "calculating critical path");

    let errors = validate_tasks(tasks);
    if !errors.is_empty() {
        warn!(error_count = errors.len(), "task validation failed");
        return CpmResult::rejected(tasks, errors, None);
    }

    let dag = match ScheduleDag::build(tasks) {
        Ok(dag) => dag,
        Err(err) => return CpmResult::rejected(tasks, vec![err.to_string()], None),
    };

    if let Some(cycle) = find_cycle(&dag) {
        warn!(cycle = %cycle.join(" -> "), "circular dependency detected");
        return CpmResult::cyclic(tasks, cycle);
    }

    let order = match topological_order(&dag) {
        Ok(order) => order,
        Err(GraphError::Cycle(stuck)) => return CpmResult::cyclic(tasks, stuck),
        Err(err) => return CpmResult::rejected(tasks, vec![err.to_string()], None),
    };

    let early = ForwardPass::new(&dag).execute(&order);
    let backward = BackwardPass::new(&dag, &early).execute(&order);
    let floats =
        FloatResolver::new(&dag, &early, &backward.late, config.critical_tolerance).execute();
    debug!(horizon = backward.horizon, "backward pass complete");

    let scheduled: Vec<ScheduledTask> = tasks
        .iter()
        .enumerate()
        .map(|(position, task)| {
            let early = early[position];
            let late = backward.late[position];
            let float = floats[position];
            ScheduledTask {
                task: task.clone(),
                es: early.es,
                ef: early.ef,
                ls: late.ls,
                lf: late.lf,
                tf: float.tf,
                ff: float.ff,
                is_critical: float.is_critical,
                is_start: early.is_start,
                is_end: late.is_end,
            }
        })
        .collect();

    let total_duration = scheduled.iter().map(|t| t.ef).fold(0.0_f64, f64::max);
    let ids_where = |keep: fn(&ScheduledTask) -> bool| -> Vec<String> {
        scheduled
            .iter()
            .filter(|t| keep(t))
            .map(|t| t.id().to_string())
            .collect()
    };
    let critical_path = ids_where(|t| t.is_critical);
    let start_tasks = ids_where(|t| t.is_start);
    let end_tasks = ids_where(|t| t.is_end);

    debug!(
        total_duration,
        critical_count = critical_path.len(),
        "schedule computed"
    );

    CpmResult {
        tasks: scheduled.into_iter().map(PlannedTask::Scheduled).collect(),
        critical_path,
        total_duration,
        start_tasks,
        end_tasks,
        has_cycle: false,
        errors: Vec::new(),
        cycle: None,
    }
}

/// Schedules independent projects in parallel.
pub fn calculate_cpm_batch(projects: &[Vec<Task>]) -> Vec<CpmResult> {
    projects
        .par_iter()
        .map(|tasks| calculate_cpm(tasks))
        .collect()
}
