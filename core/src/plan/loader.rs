//! Plan file loading
//!
//! Plans are TOML files with a plan header and one `[[exercise]]` table per exercise:
//!
//! ```toml
//! name = "Desk break"
//!
//! [[exercise]]
//! name = "Blink Often"
//! duration_secs = 20
//! repetitions = 2
//! rest_secs = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{Plan, PlanError};

/// Plan definition with the file it was loaded from
#[derive(Debug, Clone)]
pub struct PlanWithPath {
    pub plan: Plan,
    pub file_path: PathBuf,
}

/// Parse and validate a plan from TOML text
pub fn parse_plan(content: &str, path: &Path) -> Result<Plan, PlanError> {
    let plan: Plan = toml::from_str(content).map_err(|source| PlanError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    // Validate a copy so the caller gets the plain definition back
    plan.clone()
        .validate()
        .map_err(|source| PlanError::InvalidFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    Ok(plan)
}

/// Load a single plan file
pub fn load_plan_from_file(path: &Path) -> Result<Plan, PlanError> {
    let content = fs::read_to_string(path).map_err(|source| PlanError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_plan(&content, path)
}

/// Load all plans from a directory (recursive), sorted by plan name.
///
/// Files that fail to load are skipped with a warning so one broken plan
/// does not hide the rest of the library.
pub fn load_plans_from_dir(dir: &Path) -> Result<Vec<PlanWithPath>, PlanError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut plans = Vec::new();
    load_plans_recursive(dir, &mut plans)?;
    plans.sort_by(|a, b| a.plan.name.cmp(&b.plan.name));
    Ok(plans)
}

fn load_plans_recursive(dir: &Path, plans: &mut Vec<PlanWithPath>) -> Result<(), PlanError> {
    let entries = fs::read_dir(dir).map_err(|source| PlanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            load_plans_recursive(&path, plans)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match load_plan_from_file(&path) {
                Ok(plan) => plans.push(PlanWithPath {
                    plan,
                    file_path: path,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping plan file");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DESK_BREAK: &str = r#"
name = "Desk break"
description = "Two minutes away from the screen"

[[exercise]]
name = "Blink Often"
duration_secs = 20
repetitions = 2
rest_secs = 5
on_screen_text = "Blink quickly for the whole round"

[[exercise]]
name = "Eyes Palming"
duration_secs = 30
"#;

    #[test]
    fn parses_plan_file_format() {
        let plan = parse_plan(DESK_BREAK, Path::new("desk.toml")).unwrap();
        assert_eq!(plan.name, "Desk break");
        assert_eq!(plan.len(), 2);

        let blink = &plan.exercises[0];
        assert_eq!(blink.work_duration_secs, 20);
        assert_eq!(blink.repetitions, 2);
        assert_eq!(blink.rest_duration_secs, Some(5));

        let palming = &plan.exercises[1];
        assert_eq!(palming.repetitions, 1);
        assert_eq!(palming.rest_duration_secs, None);
        assert_eq!(plan.total_duration_secs(), 20 + 5 + 20 + 30);
    }

    #[test]
    fn rejects_invalid_exercise() {
        let content = r#"
name = "Bad"
[[exercise]]
name = "Zero"
duration_secs = 0
"#;
        let err = parse_plan(content, Path::new("bad.toml")).unwrap_err();
        match err {
            PlanError::InvalidFile { source, .. } => {
                assert!(matches!(*source, PlanError::NonPositiveDuration { .. }))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_plan_without_exercises() {
        let err = parse_plan("name = \"Empty\"", Path::new("empty.toml")).unwrap_err();
        assert!(matches!(err, PlanError::InvalidFile { .. }));
    }

    #[test]
    fn reports_toml_errors() {
        let err = parse_plan("name = ", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, PlanError::ParseToml { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_plan_from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, PlanError::ReadFile { .. }));
    }

    #[test]
    fn loads_directory_recursively_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("evening");
        fs::create_dir(&nested).unwrap();

        fs::write(dir.path().join("desk.toml"), DESK_BREAK).unwrap();
        fs::write(
            nested.join("stretch.toml"),
            "name = \"A stretch\"\n[[exercise]]\nname = \"Reach\"\nduration_secs = 10\n",
        )
        .unwrap();
        fs::write(dir.path().join("broken.toml"), "name = ").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a plan").unwrap();

        let plans = load_plans_from_dir(dir.path()).unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.plan.name.as_str()).collect();
        assert_eq!(names, vec!["A stretch", "Desk break"]);
        assert!(plans[0].file_path.ends_with("evening/stretch.toml"));
    }

    #[test]
    fn missing_directory_is_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let plans = load_plans_from_dir(&dir.path().join("missing")).unwrap();
        assert!(plans.is_empty());
    }
}
