use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use astrolabe::{AstrolabeError, OutputFormat};
use astrolabe_cli::Args;

/// Collects all .toml files from a directory
fn collect_descriptions(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn diagrams_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("diagrams")
}

fn args(input: Option<&Path>, output: &Path) -> Args {
    Args {
        input: input.map(|path| path.to_string_lossy().to_string()),
        builtin: "editor-service".to_string(),
        output: output.to_string_lossy().to_string(),
        format: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_descriptions() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let descriptions = collect_descriptions(diagrams_dir());
    assert!(
        !descriptions.is_empty(),
        "No descriptions found in diagrams/"
    );

    let mut failed = Vec::new();

    for path in &descriptions {
        for format in [OutputFormat::Svg, OutputFormat::Png, OutputFormat::Dot] {
            let output_path = temp_dir.path().join(format!(
                "{}.{}",
                path.file_stem().unwrap().to_string_lossy(),
                format.extension()
            ));

            if let Err(e) = astrolabe_cli::run(&args(Some(path), &output_path)) {
                failed.push((path.clone(), format, e));
            } else if fs::metadata(&output_path).map_or(true, |m| m.len() == 0) {
                panic!("{} produced an empty {format} file", path.display());
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDescriptions that failed:");
        for (path, format, err) in &failed {
            eprintln!("  - {} ({format}): {err}", path.display());
        }
        panic!("{} render(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_descriptions() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let descriptions = collect_descriptions(diagrams_dir().join("errors"));
    assert!(
        !descriptions.is_empty(),
        "No error descriptions found in diagrams/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for path in &descriptions {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            path.file_stem().unwrap().to_string_lossy()
        ));

        if astrolabe_cli::run(&args(Some(path), &output_path)).is_ok() {
            unexpectedly_succeeded.push(path.clone());
        }
        assert!(!output_path.exists(), "{} wrote output", path.display());
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError descriptions that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error description(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_builtin_diagram_without_input() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("editor_service_class_diagram.png");

    astrolabe_cli::run(&args(None, &output_path)).expect("Failed to render built-in diagram");

    let bytes = fs::read(&output_path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn e2e_description_matches_builtin() {
    let temp_dir = tempdir().unwrap();
    let from_file = temp_dir.path().join("from_file.dot");
    let builtin = temp_dir.path().join("builtin.dot");

    astrolabe_cli::run(&args(Some(&diagrams_dir().join("editor_service.toml")), &from_file))
        .unwrap();
    astrolabe_cli::run(&args(None, &builtin)).unwrap();

    assert_eq!(
        fs::read_to_string(from_file).unwrap(),
        fs::read_to_string(builtin).unwrap()
    );
}

#[test]
fn e2e_format_flag_overrides_extension() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("diagram.txt");

    let mut cli_args = args(None, &output_path);
    assert!(matches!(
        astrolabe_cli::run(&cli_args),
        Err(AstrolabeError::Config(_))
    ));

    cli_args.format = Some(OutputFormat::Dot);
    astrolabe_cli::run(&cli_args).unwrap();
    assert!(fs::read_to_string(&output_path).unwrap().starts_with("digraph"));
}

#[test]
fn e2e_missing_output_directory() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("missing").join("out.png");

    let err = astrolabe_cli::run(&args(None, &output_path)).unwrap_err();
    assert!(matches!(err, AstrolabeError::Render(_)));
    assert!(!output_path.exists());
}

#[test]
fn e2e_explicit_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let output_path = temp_dir.path().join("out.svg");
    fs::write(
        &config_path,
        "[layout]\nengine = \"basic\"\n\n[style]\nbackground_color = \"black\"\n",
    )
    .unwrap();

    let mut cli_args = args(None, &output_path);
    cli_args.config = Some(config_path.to_string_lossy().to_string());
    astrolabe_cli::run(&cli_args).unwrap();
    assert!(fs::read_to_string(&output_path).unwrap().contains("#000000"));

    cli_args.config = Some(temp_dir.path().join("nope.toml").to_string_lossy().to_string());
    assert!(matches!(
        astrolabe_cli::run(&cli_args),
        Err(AstrolabeError::Config(_))
    ));
}

#[test]
fn e2e_missing_input_file() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("absent.toml");
    let output_path = temp_dir.path().join("out.svg");

    let err = astrolabe_cli::run(&args(Some(&input), &output_path)).unwrap_err();
    assert!(matches!(err, AstrolabeError::Io(_)));
}
