//! Library integration tests.

use seqrun::SeqrunError;

#[test]
fn error_types_are_public() {
    let err = SeqrunError::ResumeTargetNotFound {
        name: "CreateGroup".into(),
    };
    assert!(err.to_string().contains("CreateGroup"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> seqrun::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use seqrun::cli::{Cli, Commands};

    let cli = Cli::parse_from(["seqrun", "run", "--resume", "r.json"]);
    if let Some(Commands::Run(args)) = cli.command {
        assert_eq!(args.resume.as_deref(), Some(std::path::Path::new("r.json")));
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn lint_api_is_public() {
    use seqrun::config::{parse_config, ValueTable};
    use seqrun::lint::RuleRegistry;

    let mut vals = ValueTable::new();
    let config = parse_config(
        "Seqs:\n  - Name: R\n    Cmd: echo {{.Unset}}\n",
        std::path::Path::new("seqrun.yml"),
        &mut vals,
    )
    .unwrap();
    let diagnostics = RuleRegistry::with_builtins().check(&config);
    assert!(diagnostics.iter().any(|d| d.message.contains("Unset")));
}
