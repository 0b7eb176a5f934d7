use crate::task::Task;
use std::collections::HashSet;

fn label(task: &Task, index: usize) -> String {
    if task.name.trim().is_empty() {
        format!("task {}", index + 1)
    } else {
        format!("task \"{}\"", task.name)
    }
}

fn validate_task(task: &Task, index: usize, errors: &mut Vec<String>) {
    if task.id.trim().is_empty() {
        errors.push(format!("task {}: missing id", index + 1));
    }
    if task.name.trim().is_empty() {
        errors.push(format!("task {}: missing name", index + 1));
    }
    if !task.duration.is_finite() {
        errors.push(format!("{}: missing duration", label(task, index)));
    } else if task.duration <= 0.0 {
        errors.push(format!(
            "{}: duration must be a positive number (got {})",
            label(task, index),
            task.duration
        ));
    }
}

/// Checks a raw task set and returns every problem found. Empty means valid.
pub fn validate_tasks(tasks: &[Task]) -> Vec<String> {
    let mut errors = Vec::new();
    if tasks.is_empty() {
        errors.push("at least one task is required".to_string());
        return errors;
    }

    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        validate_task(task, index, &mut errors);
        if !seen_ids.insert(task.id.as_str()) {
            errors.push(format!(
                "{}: duplicate id \"{}\"",
                label(task, index),
                task.id
            ));
        }
    }

    for (index, task) in tasks.iter().enumerate() {
        for dep in &task.predecessors {
            if !seen_ids.contains(dep.task_id.as_str()) {
                errors.push(format!(
                    "{}: predecessor \"{}\" does not exist",
                    label(task, index),
                    dep.task_id
                ));
            }
        }
        for dep in &task.successors {
            if !seen_ids.contains(dep.task_id.as_str()) {
                errors.push(format!(
                    "{}: successor \"{}\" does not exist",
                    label(task, index),
                    dep.task_id
                ));
            }
        }
    }

    errors
}
