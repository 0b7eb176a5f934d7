use cpm_scheduler::interchange::{
    critical_path_report, load_project_from_json, load_tasks_from_csv, render_frame_as_text_table,
    result_frame, save_critical_path_report, save_csv_template, save_project_json,
    save_result_csv, save_result_json, save_tasks_csv,
};
use cpm_scheduler::{
    CpmResult, Dependency, DependencyType, EngineConfig, IdIssuer, ProjectDocument,
    ProjectMetadata, SequentialIdIssuer, Task, build_task_dependencies,
    calculate_cpm_with_config, create_task_from_input,
};
use polars::prelude::*;
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Session {
    tasks: Vec<Task>,
    metadata: ProjectMetadata,
    config: EngineConfig,
    issuer: SequentialIdIssuer,
}

impl Session {
    fn new(config: EngineConfig) -> Self {
        Self {
            tasks: Vec::new(),
            metadata: ProjectMetadata::default(),
            config,
            issuer: SequentialIdIssuer::new(),
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Issues an id that does not collide with imported ones.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.issuer.issue();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn compute(&self) -> CpmResult {
        calculate_cpm_with_config(&self.tasks, &self.config)
    }
}

fn tasks_frame(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let durations: Vec<f64> = tasks.iter().map(|t| t.duration).collect();
    let predecessors: Vec<String> = tasks
        .iter()
        .map(|t| {
            t.predecessors
                .iter()
                .map(|d| format!("{}({} {})", d.task_id, d.kind, d.lag))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    let predecessors: Vec<&str> = predecessors.iter().map(String::as_str).collect();
    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
        Series::new(PlSmallStr::from_static("predecessors"), predecessors).into_column(),
    ])
}

fn print_tasks(tasks: &[Task]) {
    match tasks_frame(tasks) {
        Ok(df) => println!("{}", render_frame_as_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_result(result: &CpmResult) {
    if result.has_cycle {
        let path = result.cycle.as_deref().unwrap_or_default().join(" -> ");
        println!("Circular dependency: {}", path);
        return;
    }
    if !result.errors.is_empty() {
        println!("Schedule has errors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
        return;
    }
    println!("Schedule computed: {}", result.to_cli_summary());
    match result_frame(result) {
        Ok(df) => println!("{}", render_frame_as_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current tasks\n  add <name> <duration> [pred_id] [succ_id]\n                                     Add a task (FS links to existing ids)\n  link <pred_id> <succ_id> [FS|SS|FF|SF] [lag]\n                                     Add or update a dependency\n  unlink <pred_id> <succ_id>         Remove all dependencies between two tasks\n  delete <id>                        Delete a task and clean up dependencies\n  meta show                          Show project metadata\n  meta name <text...>                Update project name\n  meta desc <text...>                Update project description\n  config <json_path>                 Load engine config from JSON file\n  compute                            Run the critical path calculation\n  report                             Print the critical path report\n  import <csv|json> <path>           Replace tasks from a file\n  export <tasks|template|result|result-json|json|report> <path>\n                                     Write tasks, results or report to a file\n  quit|exit                          Exit"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::var("CPM_CONFIG") {
        Ok(path) => match EngineConfig::load(&path) {
            Ok(config) => {
                info!(%path, "loaded engine config");
                config
            }
            Err(e) => {
                warn!(%path, error = %e, "ignoring engine config");
                EngineConfig::default()
            }
        },
        Err(_) => EngineConfig::default(),
    };
    let mut session = Session::new(config);

    println!("CPM Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };

        match cmd {
            "quit" | "exit" => break,
            "help" => print_help(),
            "show" => print_tasks(&session.tasks),
            "add" => {
                let name = parts.next();
                let duration = parts.next();
                match (name, duration) {
                    (Some(name), Some(duration_s)) => {
                        let duration: f64 = match duration_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid duration");
                                continue;
                            }
                        };
                        let pred = parts.next();
                        let succ = parts.next();
                        if let Some(missing) = [pred, succ]
                            .into_iter()
                            .flatten()
                            .find(|id| !session.contains(id))
                        {
                            println!("Task {} not found.", missing);
                            continue;
                        }
                        let id = session.fresh_id();
                        let mut issuer = move || id.clone();
                        let task = create_task_from_input(&mut issuer, name, duration, pred, succ);
                        println!("Added task {} ({}).", task.id, task.name);
                        session.tasks.push(task);
                        session.tasks = build_task_dependencies(&session.tasks);
                    }
                    _ => println!("Usage: add <name> <duration> [pred_id] [succ_id]"),
                }
            }
            "link" => {
                let pred = parts.next();
                let succ = parts.next();
                match (pred, succ) {
                    (Some(pred), Some(succ)) => {
                        let kind = match parts.next() {
                            Some(code) => match DependencyType::from_code(code) {
                                Some(kind) => kind,
                                None => {
                                    println!("Invalid type (FS|SS|FF|SF)");
                                    continue;
                                }
                            },
                            None => DependencyType::FinishToStart,
                        };
                        let lag: i64 = match parts.next().map(str::parse) {
                            Some(Ok(v)) => v,
                            Some(Err(_)) => {
                                println!("Invalid lag");
                                continue;
                            }
                            None => 0,
                        };
                        if !session.contains(pred) {
                            println!("Task {} not found.", pred);
                            continue;
                        }
                        let Some(task) = session.find_mut(succ) else {
                            println!("Task {} not found.", succ);
                            continue;
                        };
                        match task
                            .predecessors
                            .iter_mut()
                            .find(|d| d.task_id == pred && d.kind == kind)
                        {
                            Some(existing) => existing.lag = lag,
                            None => task.predecessors.push(Dependency::new(pred, kind, lag)),
                        }
                        session.tasks = build_task_dependencies(&session.tasks);
                        println!("Linked {} -> {} ({} lag {}).", pred, succ, kind, lag);
                    }
                    _ => println!("Usage: link <pred_id> <succ_id> [FS|SS|FF|SF] [lag]"),
                }
            }
            "unlink" => {
                let pred = parts.next();
                let succ = parts.next();
                match (pred, succ) {
                    (Some(pred), Some(succ)) => {
                        if let Some(missing) =
                            [pred, succ].into_iter().find(|id| !session.contains(id))
                        {
                            println!("Task {} not found.", missing);
                            continue;
                        }
                        for task in session.tasks.iter_mut() {
                            if task.id == succ {
                                task.predecessors.retain(|d| d.task_id != pred);
                            }
                            if task.id == pred {
                                task.successors.retain(|d| d.task_id != succ);
                            }
                        }
                        println!("Unlinked {} -> {}.", pred, succ);
                    }
                    _ => println!("Usage: unlink <pred_id> <succ_id>"),
                }
            }
            "delete" => match parts.next() {
                Some(id) => {
                    if !session.contains(id) {
                        println!("Task {} not found.", id);
                        continue;
                    }
                    session.tasks.retain(|t| t.id != id);
                    for task in session.tasks.iter_mut() {
                        task.predecessors.retain(|d| d.task_id != id);
                        task.successors.retain(|d| d.task_id != id);
                    }
                    println!("Deleted task {}.", id);
                }
                None => println!("Usage: delete <id>"),
            },
            "meta" => {
                let sub = parts.next();
                let rest = parts.collect::<Vec<_>>().join(" ");
                match sub {
                    Some("show") => {
                        println!("Project name       : {}", session.metadata.project_name);
                        println!(
                            "Project description: {}",
                            session.metadata.project_description
                        );
                    }
                    Some("name") if !rest.is_empty() => {
                        session.metadata.project_name = rest;
                        println!("Project name updated.");
                    }
                    Some("desc") if !rest.is_empty() => {
                        session.metadata.project_description = rest;
                        println!("Project description updated.");
                    }
                    _ => println!("Usage: meta <show|name <text...>|desc <text...>>"),
                }
            }
            "config" => match parts.next() {
                Some(path) => match EngineConfig::load(path) {
                    Ok(config) => {
                        session.config = config;
                        println!("Engine config loaded from {}.", path);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: config <json_path>"),
            },
            "compute" => print_result(&session.compute()),
            "report" => {
                let result = session.compute();
                println!("{}", critical_path_report(&result, &session.metadata));
            }
            "import" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("csv"), Some(path)) => {
                        let mut issuer = SequentialIdIssuer::new();
                        match load_tasks_from_csv(path, &mut issuer) {
                            Ok(tasks) => {
                                session.issuer = issuer;
                                session.tasks = tasks;
                                println!(
                                    "Imported {} tasks from {}.",
                                    session.tasks.len(),
                                    path
                                );
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    (Some("json"), Some(path)) => match load_project_from_json(path) {
                        Ok(document) => {
                            session.metadata = document.metadata;
                            session.tasks = build_task_dependencies(&document.tasks);
                            println!("Imported {} tasks from {}.", session.tasks.len(), path);
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: import <csv|json> <path>"),
                }
            }
            "export" => {
                let what = parts.next();
                let path = parts.next();
                let (what, path) = match (what, path) {
                    (Some(what), Some(path)) => (what, path),
                    _ => {
                        println!("Usage: export <tasks|template|result|result-json|json|report> <path>");
                        continue;
                    }
                };
                let outcome = match what {
                    "tasks" => save_tasks_csv(&session.tasks, path),
                    "template" => save_csv_template(path),
                    "result" => save_result_csv(&session.compute(), path),
                    "json" => {
                        let document =
                            ProjectDocument::new(session.metadata.clone(), session.tasks.clone());
                        save_project_json(&document, path)
                    }
                    "result-json" => save_result_json(&session.compute(), path),
                    "report" => {
                        save_critical_path_report(&session.compute(), &session.metadata, path)
                    }
                    _ => {
                        println!("Usage: export <tasks|template|result|result-json|json|report> <path>");
                        continue;
                    }
                };
                match outcome {
                    Ok(()) => println!("Exported {} to {}.", what, path),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
