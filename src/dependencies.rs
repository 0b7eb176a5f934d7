use crate::task::{Dependency, DependencyType, Task};
use std::collections::HashMap;

fn upsert_link(links: &mut Vec<Dependency>, task_id: &str, kind: DependencyType, lag: i64) {
    match links
        .iter_mut()
        .find(|dep| dep.task_id == task_id && dep.kind == kind)
    {
        Some(existing) => existing.lag = lag,
        None => links.push(Dependency::new(task_id, kind, lag)),
    }
}

/// Returns a copy of `tasks` whose predecessor and successor lists mirror each other.
///
/// Tasks are visited in order, predecessors before successors. A mirrored
/// link is matched on `(task_id, type)`; when one already exists its lag is
/// overwritten, so the last declaration visited wins. References to ids
/// that are not in the set are left untouched for the validator to report.
pub fn build_task_dependencies(tasks: &[Task]) -> Vec<Task> {
    let mut tasks = tasks.to_vec();
    let index: HashMap<String, usize> = tasks
        .iter()
        .enumerate()
        .map(|(position, task)| (task.id.clone(), position))
        .collect();

    for position in 0..tasks.len() {
        let own_id = tasks[position].id.clone();

        let predecessors = tasks[position].predecessors.clone();
        for dep in &predecessors {
            if let Some(&pred) = index.get(&dep.task_id) {
                upsert_link(&mut tasks[pred].successors, &own_id, dep.kind, dep.lag);
            }
        }

        let successors = tasks[position].successors.clone();
        for dep in &successors {
            if let Some(&succ) = index.get(&dep.task_id) {
                upsert_link(&mut tasks[succ].predecessors, &own_id, dep.kind, dep.lag);
            }
        }
    }

    tasks
}
