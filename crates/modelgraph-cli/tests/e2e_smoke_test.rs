use std::{fs, path::Path};

use tempfile::tempdir;

use modelgraph::{ModelGraphError, graph::GraphError};
use modelgraph_cli::{Args, run};

const BASE: &str = r#"{
    "namespace": "org.a@1.0.0",
    "declarations": [
        {"kind": "Class", "name": "Base",
         "properties": [{"kind": "Field", "name": "id", "type": "String"}]}
    ]
}"#;

const DERIVED: &str = r#"{
    "namespace": "org.b@1.0.0",
    "imports": ["org.a@1.0.0.Base"],
    "declarations": [
        {"kind": "Class", "name": "Derived", "superType": "org.a@1.0.0.Base"},
        {"kind": "Enum", "name": "Loner", "values": [{"name": "ONE"}]}
    ]
}"#;

fn write_model(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).expect("Failed to write model file");
    path.to_string_lossy().to_string()
}

fn args(inputs: Vec<String>, output: &Path) -> Args {
    Args {
        inputs,
        output: output.to_string_lossy().to_string(),
        start: None,
        subset: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_full_graph() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let derived = write_model(temp_dir.path(), "derived.json", DERIVED);
    let base = write_model(temp_dir.path(), "base.json", BASE);
    let output = temp_dir.path().join("graph.mmd");

    run(&args(vec![derived, base], &output)).expect("Run failed");

    let rendered = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        [
            "flowchart LR",
            "`org.b@1.0.0.Derived`",
            "`org.b@1.0.0.Derived` --> `org.a@1.0.0.Base`",
            "`org.b@1.0.0.Loner`",
            "`org.a@1.0.0.Base`",
        ]
    );
}

#[test]
fn e2e_smoke_test_start_and_subset() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let base = write_model(temp_dir.path(), "base.json", BASE);
    let derived = write_model(temp_dir.path(), "derived.json", DERIVED);
    let output = temp_dir.path().join("graph.mmd");
    let subset = temp_dir.path().join("subset.json");

    let mut args = args(vec![base, derived], &output);
    args.start = Some("org.a@1.0.0.Base".to_string());
    args.subset = Some(subset.to_string_lossy().to_string());
    run(&args).expect("Run failed");

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(!rendered.contains("Loner"));
    assert!(rendered.contains("`org.b@1.0.0.Derived` --> `org.a@1.0.0.Base`"));

    let subset_text = fs::read_to_string(&subset).unwrap();
    assert!(subset_text.contains("\"Derived\""));
    assert!(!subset_text.contains("\"Loner\""));

    // The subset is itself a loadable model
    let replay_output = temp_dir.path().join("replay.mmd");
    run(&Args {
        inputs: vec![subset.to_string_lossy().to_string()],
        output: replay_output.to_string_lossy().to_string(),
        subset: None,
        ..args
    })
    .expect("Subset failed to reload");
    assert_eq!(fs::read_to_string(&replay_output).unwrap(), rendered);
}

#[test]
fn e2e_smoke_test_subset_matches_flowchart() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let base = write_model(temp_dir.path(), "base.json", BASE);
    let derived = write_model(temp_dir.path(), "derived.json", DERIVED);
    let output = temp_dir.path().join("graph.mmd");
    let subset = temp_dir.path().join("subset.json");

    let mut args = args(vec![base, derived], &output);
    args.start = Some("org.b@1.0.0.Derived".to_string());
    args.subset = Some(subset.to_string_lossy().to_string());
    run(&args).expect("Run failed");

    let rendered = fs::read_to_string(&output).unwrap();
    let vertices: Vec<&str> = rendered
        .lines()
        .skip(1)
        .filter(|line| !line.contains("-->"))
        .collect();
    assert_eq!(vertices, ["`org.a@1.0.0.Base`", "`org.b@1.0.0.Derived`"]);

    let subset_text = fs::read_to_string(&subset).unwrap();
    let model: serde_json::Value = serde_json::from_str(&subset_text).unwrap();
    let mut declared: Vec<String> = model["files"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|file| {
            let namespace = file["namespace"].as_str().unwrap().to_string();
            file["declarations"]
                .as_array()
                .unwrap()
                .iter()
                .map(move |decl| {
                    let name = decl["name"].as_str().unwrap();
                    format!("`{namespace}.{name}`")
                })
        })
        .collect();
    declared.sort();
    assert_eq!(declared, vertices);
}

#[test]
fn e2e_smoke_test_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let base = write_model(temp_dir.path(), "base.json", BASE);
    let output = temp_dir.path().join("graph.mmd");
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[graph]\ninclude_primitives = true\n[render]\ndirection = \"BT\"\n",
    )
    .unwrap();

    let mut args = args(vec![base], &output);
    args.config = Some(config.to_string_lossy().to_string());
    run(&args).expect("Run failed");

    let rendered = fs::read_to_string(&output).unwrap();
    assert_eq!(
        rendered,
        "flowchart BT\n`org.a@1.0.0.Base`\n`org.a@1.0.0.Base` --> `String`\n`String`\n"
    );
}

#[test]
fn e2e_smoke_test_undeclared_reference() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let derived = write_model(temp_dir.path(), "derived.json", DERIVED);
    let output = temp_dir.path().join("graph.mmd");

    let err = run(&args(vec![derived], &output)).unwrap_err();

    assert!(matches!(
        err,
        ModelGraphError::Graph(GraphError::UnknownVertex(ref id)) if id == "org.a@1.0.0.Base"
    ));
}

#[test]
fn e2e_smoke_test_invalid_json() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let broken = write_model(temp_dir.path(), "broken.json", "{\"namespace\": [}");
    let output = temp_dir.path().join("graph.mmd");

    let err = run(&args(vec![broken.clone()], &output)).unwrap_err();

    match err {
        ModelGraphError::Load { path, .. } => assert_eq!(path, broken),
        other => panic!("Expected load error, got {other}"),
    }
}

#[test]
fn e2e_smoke_test_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("graph.mmd");
    let missing = temp_dir.path().join("absent.json");

    let missing = missing.to_string_lossy().to_string();
    let err = run(&args(vec![missing], &output)).unwrap_err();
    assert!(matches!(err, ModelGraphError::Io(_)));
}
