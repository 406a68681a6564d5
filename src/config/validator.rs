//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Required names are unique and their patterns compile
//! - Supplied values match the Required declarations exactly
//! - Step names are non-empty and unique across every step kind
//! - Runner commands are normalized and their time budgets bounded
//! - At least one Runner exists

use crate::config::schema::{CreateVar, Required, Runner, WriteFile};
use crate::config::values::ValueTable;
use crate::error::ValidationError;
use crate::steps::Step;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Longest a Runner may sleep, or spend sleeping between retries.
pub const MAX_STEP_WAIT: Duration = Duration::from_secs(30 * 60);

/// Most retries a Runner may declare.
pub const MAX_RETRIES: i64 = 100;

/// Required value names mapped to their compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct RequiredIndex {
    patterns: HashMap<String, Option<Regex>>,
}

impl RequiredIndex {
    /// Compile the Required declarations.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRequiredName` or `InvalidPattern`.
    pub fn build(required: &[Required]) -> Result<Self, ValidationError> {
        let mut patterns = HashMap::with_capacity(required.len());

        for req in required {
            if patterns.contains_key(&req.name) {
                return Err(ValidationError::DuplicateRequiredName {
                    name: req.name.clone(),
                });
            }
            let pattern = match req.regex.as_deref().filter(|p| !p.is_empty()) {
                None => None,
                Some(p) => Some(Regex::new(p).map_err(|e| ValidationError::InvalidPattern {
                    name: req.name.clone(),
                    pattern: p.to_string(),
                    message: e.to_string(),
                })?),
            };
            patterns.insert(req.name.clone(), pattern);
        }

        Ok(Self { patterns })
    }

    /// Check supplied values against the declarations.
    ///
    /// Every declaration needs exactly one value and every value needs a
    /// declaration whose pattern, if any, it matches.
    pub fn check_values(&self, vals: &ValueTable) -> Result<(), ValidationError> {
        if self.patterns.len() != vals.len() {
            return Err(ValidationError::ValueCountMismatch {
                required: self.patterns.len(),
                supplied: vals.len(),
            });
        }

        for (key, value) in vals {
            let pattern = self
                .patterns
                .get(key)
                .ok_or_else(|| ValidationError::UnknownSuppliedKey { key: key.clone() })?;
            if let Some(re) = pattern {
                if !re.is_match(value) {
                    return Err(ValidationError::PatternMismatch {
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The compiled pattern for a Required name, if it declared one.
    pub fn pattern(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Step names claimed so far. All step kinds share one namespace.
#[derive(Debug, Default)]
pub struct StepNames {
    seen: HashSet<String>,
}

impl StepNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `name` in place and claim it.
    fn claim(&mut self, kind: &'static str, name: &mut String) -> Result<(), ValidationError> {
        let trimmed = name.trim();
        if trimmed.len() != name.len() {
            *name = trimmed.to_string();
        }
        if name.is_empty() {
            return Err(ValidationError::EmptyRequiredField {
                kind,
                name: String::new(),
                field: "name",
            });
        }
        if !self.seen.insert(name.clone()) {
            return Err(ValidationError::DuplicateStepName {
                kind,
                name: name.clone(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }
}

/// Validate a CreateVar, from either the CreateVars block or the sequence.
pub fn validate_create_var(
    var: &mut CreateVar,
    names: &mut StepNames,
) -> Result<(), ValidationError> {
    names.claim("CreateVar", &mut var.name)?;

    if var.key.is_empty() {
        return Err(ValidationError::EmptyRequiredField {
            kind: "CreateVar",
            name: var.name.clone(),
            field: "Key",
        });
    }
    if var.key.trim() != var.key {
        return Err(ValidationError::KeyHasWhitespace {
            name: var.name.clone(),
            key: var.key.clone(),
        });
    }
    Ok(())
}

/// Validate a WriteFile. The value is stored trimmed.
pub fn validate_write_file(
    file: &mut WriteFile,
    names: &mut StepNames,
) -> Result<(), ValidationError> {
    names.claim("WriteFile", &mut file.name)?;

    if file.path.trim().is_empty() {
        return Err(ValidationError::EmptyRequiredField {
            kind: "WriteFile",
            name: file.name.clone(),
            field: "Path",
        });
    }
    file.value = file.value.trim().to_string();
    if file.value.is_empty() {
        return Err(ValidationError::EmptyRequiredField {
            kind: "WriteFile",
            name: file.name.clone(),
            field: "Value",
        });
    }
    Ok(())
}

/// Validate a Runner, normalizing its command to a single line.
pub fn validate_runner(runner: &mut Runner, names: &mut StepNames) -> Result<(), ValidationError> {
    runner.name = runner.name.trim().to_string();
    if runner.name.is_empty() {
        return Err(ValidationError::EmptyRequiredField {
            kind: "Runner",
            name: String::new(),
            field: "name",
        });
    }

    let cmd = runner.cmd.trim();
    if cmd.is_empty() {
        return Err(ValidationError::EmptyRequiredField {
            kind: "Runner",
            name: runner.name.clone(),
            field: "Cmd",
        });
    }
    runner.cmd = normalize_command(cmd);

    names.claim("Runner", &mut runner.name)?;

    if runner.sleep > MAX_STEP_WAIT {
        return Err(ValidationError::TimeBudgetExceeded {
            name: runner.name.clone(),
            setting: "Sleep",
            duration: runner.sleep,
        });
    }
    if !(0..=MAX_RETRIES).contains(&runner.retries) {
        return Err(ValidationError::RetriesOutOfRange {
            name: runner.name.clone(),
            retries: runner.retries,
        });
    }
    // retries is at most MAX_RETRIES here, so the cast cannot truncate.
    let worst_case = runner
        .retry_sleep
        .checked_mul(runner.retries as u32)
        .unwrap_or(Duration::MAX);
    if worst_case > MAX_STEP_WAIT {
        return Err(ValidationError::TimeBudgetExceeded {
            name: runner.name.clone(),
            setting: "Retries x RetrySleep",
            duration: worst_case,
        });
    }
    Ok(())
}

/// Join a multi-line command into one line.
///
/// Each line is trimmed, loses a leading tab marker (literal or `\t`) and a
/// trailing `\` continuation, then lines are joined with single spaces.
pub fn normalize_command(cmd: &str) -> String {
    cmd.split('\n')
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('\t').unwrap_or(line);
            let line = line.strip_prefix("\\t").unwrap_or(line);
            line.strip_suffix('\\').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate every step of the sequence and require at least one Runner.
pub fn validate_sequence(steps: &mut [Step], names: &mut StepNames) -> Result<(), ValidationError> {
    let mut runners = 0;

    for step in steps.iter_mut() {
        if step.is_runner() {
            runners += 1;
        }
        step.validate(names)?;
    }

    if runners == 0 {
        return Err(ValidationError::NoRunnerPresent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(name: &str, cmd: &str) -> Runner {
        Runner {
            name: name.to_string(),
            cmd: cmd.to_string(),
            ..Default::default()
        }
    }

    fn required(name: &str, regex: Option<&str>) -> Required {
        Required {
            name: name.to_string(),
            regex: regex.map(str::to_string),
        }
    }

    #[test]
    fn required_index_rejects_duplicates() {
        let err = RequiredIndex::build(&[required("A", None), required("A", None)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateRequiredName {
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn required_index_rejects_bad_pattern() {
        let err = RequiredIndex::build(&[required("A", Some("(unclosed"))]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { .. }));
    }

    #[test]
    fn required_index_treats_missing_pattern_as_match_all() {
        let index = RequiredIndex::build(&[required("A", None), required("B", Some(""))]).unwrap();
        assert!(index.pattern("A").is_none());
        assert!(index.pattern("B").is_none());
        let vals: ValueTable = [("A", "anything"), ("B", "")].into_iter().collect();
        index.check_values(&vals).unwrap();
    }

    #[test]
    fn check_values_rejects_count_mismatch() {
        let index = RequiredIndex::build(&[required("A", None)]).unwrap();
        let vals: ValueTable = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(
            index.check_values(&vals).unwrap_err(),
            ValidationError::ValueCountMismatch {
                required: 1,
                supplied: 2
            }
        );
    }

    #[test]
    fn check_values_rejects_unknown_key() {
        let index = RequiredIndex::build(&[required("A", None)]).unwrap();
        let vals: ValueTable = [("B", "2")].into_iter().collect();
        assert!(matches!(
            index.check_values(&vals).unwrap_err(),
            ValidationError::UnknownSuppliedKey { key } if key == "B"
        ));
    }

    #[test]
    fn check_values_rejects_pattern_mismatch() {
        let index = RequiredIndex::build(&[required("Subscription", Some("^Subscription$"))]).unwrap();
        let vals: ValueTable = [("Subscription", "other")].into_iter().collect();
        assert!(matches!(
            index.check_values(&vals).unwrap_err(),
            ValidationError::PatternMismatch { .. }
        ));
    }

    #[test]
    fn normalize_joins_continued_lines() {
        let cmd = "az aks create \\\n\t--name kube \\\n    --node-count 3";
        assert_eq!(
            normalize_command(cmd),
            "az aks create  --name kube  --node-count 3"
        );
    }

    #[test]
    fn normalize_strips_escaped_tab_marker() {
        assert_eq!(normalize_command("echo a\n\\t--flag"), "echo a --flag");
    }

    #[test]
    fn runner_name_and_cmd_are_trimmed() {
        let mut names = StepNames::new();
        let mut r = runner("  Login ", "  az login  ");
        validate_runner(&mut r, &mut names).unwrap();
        assert_eq!(r.name, "Login");
        assert_eq!(r.cmd, "az login");
        assert!(names.contains("Login"));
    }

    #[test]
    fn runner_rejects_empty_cmd() {
        let mut names = StepNames::new();
        let err = validate_runner(&mut runner("A", "   "), &mut names).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::EmptyRequiredField { field: "Cmd", .. }
        ));
    }

    #[test]
    fn runner_sleep_limit() {
        let mut names = StepNames::new();
        let mut ok = runner("Ok", "true");
        ok.sleep = MAX_STEP_WAIT;
        validate_runner(&mut ok, &mut names).unwrap();

        let mut slow = runner("Slow", "true");
        slow.sleep = MAX_STEP_WAIT + Duration::from_secs(1);
        assert!(matches!(
            validate_runner(&mut slow, &mut names).unwrap_err(),
            ValidationError::TimeBudgetExceeded {
                setting: "Sleep",
                ..
            }
        ));
    }

    #[test]
    fn runner_retries_range() {
        let mut names = StepNames::new();
        for (i, retries) in [-1, 101].into_iter().enumerate() {
            let mut r = runner(&format!("R{}", i), "true");
            r.retries = retries;
            assert!(matches!(
                validate_runner(&mut r, &mut names).unwrap_err(),
                ValidationError::RetriesOutOfRange { .. }
            ));
        }
        let mut max = runner("Max", "true");
        max.retries = MAX_RETRIES;
        validate_runner(&mut max, &mut names).unwrap();
    }

    #[test]
    fn runner_retry_budget() {
        let mut names = StepNames::new();
        let mut r = runner("Budget", "true");
        r.retries = 31;
        r.retry_sleep = Duration::from_secs(60);
        assert!(matches!(
            validate_runner(&mut r, &mut names).unwrap_err(),
            ValidationError::TimeBudgetExceeded { .. }
        ));

        let mut fits = runner("Fits", "true");
        fits.retries = 30;
        fits.retry_sleep = Duration::from_secs(60);
        validate_runner(&mut fits, &mut names).unwrap();
    }

    #[test]
    fn create_var_rejects_padded_key() {
        let mut names = StepNames::new();
        let mut var = CreateVar {
            name: "Make".to_string(),
            key: " Key".to_string(),
            value: "v".to_string(),
        };
        assert!(matches!(
            validate_create_var(&mut var, &mut names).unwrap_err(),
            ValidationError::KeyHasWhitespace { .. }
        ));
    }

    #[test]
    fn write_file_trims_and_requires_value() {
        let mut names = StepNames::new();
        let mut file = WriteFile {
            name: "Out".to_string(),
            path: "./out.json".to_string(),
            value: "  {{ .Out }}\n".to_string(),
        };
        validate_write_file(&mut file, &mut names).unwrap();
        assert_eq!(file.value, "{{ .Out }}");

        let mut empty = WriteFile {
            name: "Empty".to_string(),
            path: "./x".to_string(),
            value: " \n ".to_string(),
        };
        assert!(matches!(
            validate_write_file(&mut empty, &mut names).unwrap_err(),
            ValidationError::EmptyRequiredField { field: "Value", .. }
        ));

        let mut no_path = WriteFile {
            name: "NoPath".to_string(),
            path: "  ".to_string(),
            value: "x".to_string(),
        };
        assert!(matches!(
            validate_write_file(&mut no_path, &mut names).unwrap_err(),
            ValidationError::EmptyRequiredField { field: "Path", .. }
        ));
    }

    #[test]
    fn names_are_shared_across_kinds() {
        let mut names = StepNames::new();
        let mut var = CreateVar {
            name: "Same".to_string(),
            key: "K".to_string(),
            value: "v".to_string(),
        };
        validate_create_var(&mut var, &mut names).unwrap();

        let err = validate_runner(&mut runner("Same", "true"), &mut names).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateStepName { .. }));
    }

    #[test]
    fn sequence_without_runner_is_rejected() {
        let mut names = StepNames::new();
        let mut steps = vec![Step::CreateVar(CreateVar {
            name: "Only".to_string(),
            key: "K".to_string(),
            value: "v".to_string(),
        })];
        assert_eq!(
            validate_sequence(&mut steps, &mut names).unwrap_err(),
            ValidationError::NoRunnerPresent
        );
    }
}
