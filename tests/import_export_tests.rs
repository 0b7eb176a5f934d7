use cpm_scheduler::interchange::{
    RESULT_CSV_HEADERS, critical_path_report, load_project_from_json, load_tasks_from_csv,
    parse_project_json, parse_task_reference, parse_tasks_csv, render_frame_as_text_table,
    result_frame, save_critical_path_report, save_project_json, save_result_csv,
    save_csv_template, save_tasks_csv, write_csv_template, write_project_json, write_result_csv,
    write_tasks_csv,
};
use cpm_scheduler::{
    Dependency, DependencyType, InterchangeError, ProjectDocument, ProjectMetadata, Resource,
    ResourceKind, SequentialIdIssuer, Task, calculate_cpm, validate_tasks,
};
use std::fs;
use tempfile::NamedTempFile;

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("task-1", "Design", 5.0).with_successor(Dependency::finish_to_start("task-2")),
        Task::new("task-2", "Build", 3.0)
            .with_predecessor(Dependency::finish_to_start("task-1"))
            .with_successor(Dependency::finish_to_start("task-3")),
        Task::new("task-3", "Test", 2.0).with_predecessor(Dependency::finish_to_start("task-2")),
    ]
}

fn sample_metadata() -> ProjectMetadata {
    ProjectMetadata {
        project_name: "Warehouse".into(),
        project_description: "Export helpers".into(),
    }
}

#[test]
fn parse_task_reference_reads_legacy_suffixes() {
    assert_eq!(
        parse_task_reference("Design(SS Lag3)"),
        ("Design".to_string(), DependencyType::StartToStart, 3)
    );
    assert_eq!(
        parse_task_reference(" Pour (F-F lag-2) "),
        ("Pour".to_string(), DependencyType::FinishToFinish, -2)
    );
    assert_eq!(
        parse_task_reference("Cure(SF)"),
        ("Cure".to_string(), DependencyType::StartToFinish, 0)
    );
    assert_eq!(
        parse_task_reference("Plain name"),
        ("Plain name".to_string(), DependencyType::FinishToStart, 0)
    );
}

#[test]
fn extended_csv_resolves_names_and_relations() {
    let csv = "\u{feff}Task Name,Duration (days),Predecessors,Relation,Lag (days)\n\
               Design,5,---,---,---\n\
               Build,3,Design,F-S,0\n\
               Test,2,\"Build, Design\",S-S,1\n";

    let tasks = parse_tasks_csv(csv, &mut SequentialIdIssuer::new()).expect("parse csv");

    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].id, "task-1");
    assert_eq!(tasks[2].name, "Test");
    assert_eq!(
        tasks[2].predecessors,
        vec![
            Dependency::new("task-2", DependencyType::StartToStart, 1),
            Dependency::new("task-1", DependencyType::StartToStart, 1),
        ]
    );
    // Mirrored successor links
    assert_eq!(
        tasks[0].successors,
        vec![
            Dependency::finish_to_start("task-2"),
            Dependency::new("task-3", DependencyType::StartToStart, 1),
        ]
    );
}

#[test]
fn legacy_csv_accepts_successor_column_and_suffixes() {
    let csv = "Name,Duration,Predecessors,Successors\n\
               A,4,,\n\
               B,2,A(SS Lag2),\n\
               C,1,,B\n";

    let tasks = parse_tasks_csv(csv, &mut SequentialIdIssuer::with_prefix("row"))
        .expect("parse csv");

    assert_eq!(
        tasks[1].predecessors,
        vec![
            Dependency::new("row-1", DependencyType::StartToStart, 2),
            Dependency::finish_to_start("row-3"),
        ]
    );
    assert_eq!(tasks[2].successors, vec![Dependency::finish_to_start("row-2")]);

    let result = calculate_cpm(&tasks);
    assert!(result.is_ok());
    assert_eq!(result.total_duration, 4.0);
}

#[test]
fn csv_rejects_bad_durations_and_empty_files() {
    let bad = "Task Name,Duration (days),Predecessors,Relation,Lag (days)\n\
               Design,abc,---,---,---\n";
    match parse_tasks_csv(bad, &mut SequentialIdIssuer::new()) {
        Err(InterchangeError::InvalidData(message)) => {
            assert!(message.contains("duration must be a positive number"), "{message}");
            assert!(message.contains("'abc'"), "{message}");
        }
        other => panic!("expected invalid data, got {:?}", other.map(|t| t.len())),
    }

    let header_only = "Task Name,Duration (days)\n";
    assert!(matches!(
        parse_tasks_csv(header_only, &mut SequentialIdIssuer::new()),
        Err(InterchangeError::InvalidData(_))
    ));
}

#[test]
fn csv_skips_rows_without_name_or_duration() {
    let csv = "Task Name,Duration (days),Predecessors,Relation,Lag (days)\n\
               Design,5,---,---,---\n\
               ,,,,\n\
               Build,3,Design,FS,2\n";

    let tasks = parse_tasks_csv(csv, &mut SequentialIdIssuer::new()).expect("parse csv");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].id, "task-2");
    assert_eq!(
        tasks[1].predecessors,
        vec![Dependency::new("task-1", DependencyType::FinishToStart, 2)]
    );
}

#[test]
fn tasks_csv_round_trips_through_file() {
    let tasks = sample_tasks();
    let tmp = NamedTempFile::new().expect("temp file");

    save_tasks_csv(&tasks, tmp.path()).expect("save csv");
    let raw = fs::read_to_string(tmp.path()).expect("read csv");
    assert!(raw.starts_with('\u{feff}'));
    assert!(raw.contains("\"Design\",\"5\",\"---\",\"---\",\"---\""));
    assert!(raw.contains("\"Build\",\"3\",\"Design\",\"FS\",\"0\""));

    let loaded = load_tasks_from_csv(tmp.path(), &mut SequentialIdIssuer::new()).expect("load");
    assert_eq!(loaded, tasks);
}

#[test]
fn tasks_csv_summarizes_mixed_predecessors() {
    let tasks = vec![
        Task::new("a", "Design", 1.0),
        Task::new("b", "Order", 1.0),
        Task::new("c", "Build", 1.0)
            .with_predecessor(Dependency::finish_to_start("a"))
            .with_predecessor(Dependency::new("b", DependencyType::StartToStart, 2)),
    ];
    let mut buffer = Vec::new();

    write_tasks_csv(&tasks, &mut buffer).expect("write csv");

    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.contains("\"Build\",\"1\",\"Design (and 2 total)\",\"FS\",\"0\""));
}

#[test]
fn result_csv_marks_critical_and_unscheduled_rows() {
    let result = calculate_cpm(&sample_tasks());
    let mut buffer = Vec::new();
    write_result_csv(&result, &mut buffer).expect("write csv");
    let text = String::from_utf8(buffer).expect("utf8");

    let header = RESULT_CSV_HEADERS.map(|h| format!("\"{h}\"")).join(",");
    assert!(text.starts_with(&header));
    assert!(text.contains("\"Build\",\"3\",\"5\",\"8\",\"5\",\"8\",\"0\",\"0\",\"yes\""));

    let failed = calculate_cpm(&[Task::new("x", "Loop", 1.0)
        .with_predecessor(Dependency::finish_to_start("x"))]);
    let tmp = NamedTempFile::new().expect("temp file");
    save_result_csv(&failed, tmp.path()).expect("save csv");
    let raw = fs::read_to_string(tmp.path()).expect("read csv");
    assert!(raw.contains("\"Loop\",\"1\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"no\""));
}

#[test]
fn project_json_round_trips_with_metadata() {
    let document = ProjectDocument::new(sample_metadata(), sample_tasks());
    let tmp = NamedTempFile::new().expect("temp file");

    save_project_json(&document, tmp.path()).expect("save json");
    let loaded = load_project_from_json(tmp.path()).expect("load json");

    assert_eq!(loaded, document);
}

#[test]
fn project_json_accepts_a_bare_task_array() {
    let json = r#"[{"id": "a", "name": "Solo", "duration": 2}]"#;

    let document = parse_project_json(json).expect("parse json");

    assert_eq!(document.metadata, ProjectMetadata::default());
    assert_eq!(document.metadata.project_name, "New Project");
    assert_eq!(document.tasks, vec![Task::new("a", "Solo", 2.0)]);

    assert!(matches!(
        parse_project_json("{\"tasks\": 3}"),
        Err(InterchangeError::Json(_))
    ));
}

#[test]
fn report_lists_critical_chain_and_floats() {
    let mut tasks = sample_tasks();
    tasks.push(Task::new("task-4", "Paperwork", 4.0));
    let result = calculate_cpm(&tasks);

    let report = critical_path_report(&result, &sample_metadata());

    assert!(report.starts_with("Critical Path Report: Warehouse"));
    assert!(report.contains("Total duration: 10 days"));
    assert!(report.contains("Critical tasks: 3"));
    assert!(report.contains("Design -> Build -> Test"));
    assert!(report.contains("Paperwork: total float 6 days, free float 6 days"));

    let tmp = NamedTempFile::new().expect("temp file");
    save_critical_path_report(&result, &sample_metadata(), tmp.path()).expect("save report");
    let saved = fs::read_to_string(tmp.path()).expect("read report");
    assert_eq!(saved.trim_start_matches('\u{feff}'), report);
}

#[test]
fn report_for_a_cycle_lists_the_loop() {
    let tasks = vec![
        Task::new("a", "One", 1.0).with_predecessor(Dependency::finish_to_start("b")),
        Task::new("b", "Two", 1.0).with_predecessor(Dependency::finish_to_start("a")),
    ];

    let report = critical_path_report(&calculate_cpm(&tasks), &ProjectMetadata::default());

    assert!(report.contains("Schedule could not be computed"));
    assert!(report.contains("cycle: a -> b -> a"));
}

#[test]
fn result_frame_exposes_timing_columns() {
    let result = calculate_cpm(&sample_tasks());

    let df = result_frame(&result).expect("frame");

    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_columns()
            .iter()
            .map(|column| column.name().as_str())
            .collect::<Vec<_>>(),
        vec!["id", "name", "duration", "es", "ef", "ls", "lf", "tf", "ff", "is_critical"]
    );
    let es = df.column("es").expect("es").f64().expect("f64");
    assert_eq!(es.get(1), Some(5.0));
    let critical = df.column("is_critical").expect("col").bool().expect("bool");
    assert_eq!(critical.get(2), Some(true));

    let table = render_frame_as_text_table(&df);
    assert!(table.lines().next().is_some_and(|line| line.starts_with("+----")));
    assert!(table.contains("| task-2 "));
}

#[test]
fn result_frame_leaves_timing_null_for_unscheduled_tasks() {
    let result = calculate_cpm(&[Task::new("a", "Zero", 0.0)]);

    let df = result_frame(&result).expect("frame");

    let lf = df.column("lf").expect("lf").f64().expect("f64");
    assert_eq!(lf.get(0), None);
    let critical = df.column("is_critical").expect("col").bool().expect("bool");
    assert_eq!(critical.get(0), None);
}

#[test]
fn project_json_keeps_resources_and_planned_dates() {
    let json = r#"[{
        "id": "a",
        "name": "Dig",
        "duration": 2,
        "resources": [
            {"id": "r1", "type": "resource", "name": "Crew", "quantity": 2, "unitPrice": 100},
            {"id": "r2", "type": "other", "name": "Permit", "totalCost": 50}
        ],
        "startDate": "2025-01-01",
        "endDate": "2025-01-03"
    }]"#;

    let document = parse_project_json(json).expect("parse json");

    let task = &document.tasks[0];
    assert_eq!(task.start_date.as_deref(), Some("2025-01-01"));
    assert_eq!(task.end_date.as_deref(), Some("2025-01-03"));
    assert_eq!(task.resources.len(), 2);
    assert_eq!(task.resources[0].kind, ResourceKind::Resource);
    assert_eq!(task.resources[0].total_cost, Some(200.0));
    assert_eq!(task.resources[1].kind, ResourceKind::Other);
    assert_eq!(task.resources[1].quantity, None);
    assert_eq!(task.resource_cost(), 250.0);

    let mut buffer = Vec::new();
    write_project_json(&document, &mut buffer).expect("write json");
    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
    let written = &value["tasks"][0];
    assert_eq!(written["startDate"], "2025-01-01");
    assert_eq!(written["resources"][0]["unitPrice"], 100.0);
    assert_eq!(written["resources"][0]["totalCost"], 200.0);
    assert_eq!(written["resources"][1]["type"], "other");
    assert!(written["resources"][1].get("unitPrice").is_none());

    let reloaded = parse_project_json(std::str::from_utf8(&buffer).expect("utf8"))
        .expect("parse written json");
    assert_eq!(reloaded, document);

    let report = critical_path_report(&calculate_cpm(&document.tasks), &document.metadata);
    assert!(report.contains("Resource cost: 250"));
}

#[test]
fn tasks_without_resources_serialize_without_extra_fields() {
    let task = Task::new("a", "Plain", 1.0)
        .with_resource(Resource::new("r", ResourceKind::Other, "Fee").with_pricing(3.0, 4.0));
    assert_eq!(task.resources[0].total_cost, Some(12.0));

    let value = serde_json::to_value(Task::new("b", "Bare", 1.0)).expect("serialize");
    assert!(value.get("resources").is_none());
    assert!(value.get("startDate").is_none());
}

#[test]
fn project_json_leaves_missing_fields_to_the_validator() {
    let json = r#"[{"id": "a", "name": "Dig", "predecessors": [], "successors": []}]"#;

    let document = parse_project_json(json).expect("parse json");

    assert!(document.tasks[0].duration.is_nan());
    assert_eq!(
        validate_tasks(&document.tasks),
        vec!["task \"Dig\": missing duration"]
    );
    let result = calculate_cpm(&document.tasks);
    assert!(!result.is_ok());
    assert!(result.errors.iter().any(|e| e == "task \"Dig\": missing duration"));

    let nameless = parse_project_json(r#"{"tasks": [{"name": "Fill", "duration": 1}]}"#)
        .expect("parse json");
    assert_eq!(validate_tasks(&nameless.tasks), vec!["task 1: missing id"]);
}

#[test]
fn project_json_reports_the_offending_field() {
    let json = r#"{"tasks": [{"id": "a", "name": "Dig", "duration": "long"}]}"#;

    match parse_project_json(json) {
        Err(InterchangeError::Json(err)) => {
            let message = err.to_string();
            assert!(message.contains("invalid type"), "{message}");
            assert!(!message.contains("untagged"), "{message}");
        }
        other => panic!("expected json error, got {:?}", other.map(|d| d.tasks.len())),
    }
}

#[test]
fn csv_template_imports_and_schedules() {
    let mut buffer = Vec::new();
    write_csv_template(&mut buffer).expect("write template");
    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.starts_with("\"Task Name\",\"Duration (days)\""));
    assert!(text.contains("\"S-S\""));

    let tasks = parse_tasks_csv(&text, &mut SequentialIdIssuer::new()).expect("parse template");

    assert_eq!(tasks.len(), 5);
    assert_eq!(
        tasks[3].predecessors,
        vec![Dependency::new("task-3", DependencyType::StartToStart, 2)]
    );
    let result = calculate_cpm(&tasks);
    assert!(result.is_ok());
    assert_eq!(result.total_duration, 30.0);
    assert_eq!(result.scheduled("task-4").map(|t| t.es), Some(17.0));

    let tmp = NamedTempFile::new().expect("temp file");
    save_csv_template(tmp.path()).expect("save template");
    let loaded = load_tasks_from_csv(tmp.path(), &mut SequentialIdIssuer::new()).expect("load");
    assert_eq!(loaded, tasks);
}

#[test]
fn csv_lag_reads_the_leading_integer() {
    let csv = "Task Name,Duration (days),Predecessors,Relation,Lag (days)\n\
               A,2,---,---,---\n\
               B,3,A,FS,1.5\n\
               C,1,B,SS,3 days\n\
               D,1,C,FS,\n";

    let tasks = parse_tasks_csv(csv, &mut SequentialIdIssuer::new()).expect("parse csv");

    assert_eq!(tasks[1].predecessors[0].lag, 1);
    assert_eq!(tasks[2].predecessors[0].lag, 3);
    assert_eq!(tasks[3].predecessors[0].lag, 0);

    let bad = "Task Name,Duration (days),Predecessors,Relation,Lag (days)\n\
               A,2,---,---,---\n\
               B,3,A,FS,soon\n";
    match parse_tasks_csv(bad, &mut SequentialIdIssuer::new()) {
        Err(InterchangeError::InvalidData(message)) => {
            assert!(message.contains("lag must be a whole number"), "{message}");
            assert!(message.contains("'soon'"), "{message}");
        }
        other => panic!("expected invalid data, got {:?}", other.map(|t| t.len())),
    }
}
