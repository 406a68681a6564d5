//! Integration tests for config module public API.

use seqrun::config::{load_config, parse_config, Config, ValueTable};
use seqrun::error::ValidationError;
use seqrun::fs::OsFileSystem;
use seqrun::steps::Step;
use seqrun::SeqrunError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn parse(yaml: &str, vals: &[(&str, &str)]) -> seqrun::Result<Config> {
    let mut table: ValueTable = vals.iter().copied().collect();
    parse_config(yaml, Path::new("seqrun.yml"), &mut table)
}

#[test]
fn load_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seqrun.yml");
    fs::write(
        &path,
        r#"
Required:
  - Name: Region
Seqs:
  - Kind: WriteFile
    Name: Save region
    Path: region.txt
    Value: "{{ .Region }}"
  - Name: Show
    Cmd: cat region.txt
    Sleep: 2s
    Retries: 3
    RetrySleep: 10s
"#,
    )
    .unwrap();

    let mut vals: ValueTable = [("Region", "westus2")].into_iter().collect();
    let config = load_config(&OsFileSystem, &path, &mut vals).unwrap();

    assert_eq!(config.steps().len(), 2);
    assert!(matches!(config.steps()[0], Step::WriteFile(_)));
    match &config.steps()[1] {
        Step::Runner(r) => {
            assert_eq!(r.sleep.as_secs(), 2);
            assert_eq!(r.retries, 3);
            assert_eq!(r.retry_sleep.as_secs(), 10);
        }
        other => panic!("expected runner, got {:?}", other),
    }
}

#[test]
fn missing_file_is_config_not_found() {
    let temp = TempDir::new().unwrap();
    let err = load_config(
        &OsFileSystem,
        &temp.path().join("nope.yml"),
        &mut ValueTable::new(),
    )
    .unwrap_err();
    assert!(matches!(err, SeqrunError::ConfigNotFound { .. }));
}

#[test]
fn value_count_must_match_required() {
    let yaml = "Required:\n  - Name: A\nSeqs:\n  - Name: R\n    Cmd: echo\n";
    let err = parse(yaml, &[("A", "1"), ("B", "2")]).unwrap_err();
    assert!(matches!(
        err,
        SeqrunError::Validation(ValidationError::ValueCountMismatch {
            required: 1,
            supplied: 2
        })
    ));
}

#[test]
fn sequence_needs_a_runner() {
    let yaml = "Seqs:\n  - Name: V\n    Key: K\n    Value: v\n";
    let err = parse(yaml, &[]).unwrap_err();
    assert!(matches!(
        err,
        SeqrunError::Validation(ValidationError::NoRunnerPresent)
    ));
}

#[test]
fn step_names_are_unique_across_blocks() {
    let yaml = r#"
CreateVars:
  - Name: Same
    Key: K
    Value: v
Seqs:
  - Name: Same
    Cmd: echo
"#;
    let err = parse(yaml, &[]).unwrap_err();
    assert!(matches!(
        err,
        SeqrunError::Validation(ValidationError::DuplicateStepName { .. })
    ));
}

#[test]
fn multi_line_command_is_normalized() {
    let yaml = "Seqs:\n  - Name: R\n    Cmd: |\n      echo a \\\n        b\n";
    let config = parse(yaml, &[]).unwrap();
    match &config.steps()[0] {
        Step::Runner(r) => {
            assert!(!r.cmd.contains('\n'));
            assert_eq!(r.cmd.split_whitespace().collect::<Vec<_>>(), ["echo", "a", "b"]);
        }
        other => panic!("expected runner, got {:?}", other),
    }
}
