//! Presence and extension checks run before any request is issued.
//!
//! Every check is a pure function over plain inputs, so it can be exercised
//! without a terminal or a network.

use crate::error::{ValidationError, ValidationIssue};
use std::path::Path;

/// Extensions accepted by the model upload.
pub const MODEL_EXTENSIONS: &[&str] = &[".joblib", ".pkl", ".pickle"];

/// Result of validating one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(Vec<ValidationIssue>),
}

impl ValidationOutcome {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        if issues.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(issues)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Valid => &[],
            Self::Invalid(issues) => issues,
        }
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(issues) => Err(ValidationError::new(issues)),
        }
    }
}

fn file_name_of(path: Option<&Path>) -> Option<String> {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

/// A dataset must be a file whose name ends with `.csv`.
pub fn validate_dataset_file(path: Option<&Path>) -> ValidationOutcome {
    let Some(name) = file_name_of(path) else {
        return ValidationOutcome::Invalid(vec![ValidationIssue::MissingFile]);
    };
    if name.ends_with(".csv") {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(vec![ValidationIssue::InvalidExtension {
            file: name,
            expected: vec![".csv".to_string()],
        }])
    }
}

/// Extension from the last `.`, lowercased. Names without a dot have none.
pub fn file_extension(name: &str) -> Option<String> {
    name.rfind('.').map(|i| name[i..].to_ascii_lowercase())
}

/// A model must be a `.joblib`, `.pkl`, or `.pickle` file (case-insensitive).
pub fn validate_model_file(path: Option<&Path>) -> ValidationOutcome {
    let Some(name) = file_name_of(path) else {
        return ValidationOutcome::Invalid(vec![ValidationIssue::MissingFile]);
    };
    match file_extension(&name) {
        Some(ext) if MODEL_EXTENSIONS.contains(&ext.as_str()) => ValidationOutcome::Valid,
        _ => ValidationOutcome::Invalid(vec![ValidationIssue::InvalidExtension {
            file: name,
            expected: MODEL_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }]),
    }
}

/// Target, at least one protected attribute, and at least one feature are required.
pub fn validate_metadata(
    target: &str,
    protected: &[String],
    features: &[String],
) -> ValidationOutcome {
    let mut issues = Vec::new();
    if target.trim().is_empty() {
        issues.push(ValidationIssue::MissingTarget);
    }
    if protected.is_empty() {
        issues.push(ValidationIssue::NoProtectedAttributes);
    }
    if features.is_empty() {
        issues.push(ValidationIssue::NoFeatures);
    }
    ValidationOutcome::from_issues(issues)
}

/// Both a technique and a protected attribute must be selected.
pub fn validate_mitigation(
    technique: Option<&str>,
    protected_attribute: Option<&str>,
) -> ValidationOutcome {
    let mut issues = Vec::new();
    if technique.is_none_or(|t| t.trim().is_empty()) {
        issues.push(ValidationIssue::MissingTechnique);
    }
    if protected_attribute.is_none_or(|a| a.trim().is_empty()) {
        issues.push(ValidationIssue::MissingProtectedAttribute);
    }
    ValidationOutcome::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_dataset_csv_accepted() {
        assert!(validate_dataset_file(Some(Path::new("/tmp/data.csv"))).is_valid());
    }

    #[test]
    fn test_dataset_other_extension_rejected() {
        let outcome = validate_dataset_file(Some(Path::new("data.xlsx")));
        assert_eq!(
            outcome.issues(),
            &[ValidationIssue::InvalidExtension {
                file: "data.xlsx".into(),
                expected: vec![".csv".into()],
            }]
        );
    }

    #[test]
    fn test_dataset_suffix_is_case_sensitive() {
        assert!(!validate_dataset_file(Some(Path::new("DATA.CSV"))).is_valid());
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(
            validate_dataset_file(None).issues(),
            &[ValidationIssue::MissingFile]
        );
        assert_eq!(
            validate_model_file(Some(Path::new(""))).issues(),
            &[ValidationIssue::MissingFile]
        );
    }

    #[test]
    fn test_model_extensions() {
        assert!(validate_model_file(Some(Path::new("m.joblib"))).is_valid());
        assert!(validate_model_file(Some(Path::new("m.PKL"))).is_valid());
        assert!(validate_model_file(Some(Path::new("dir/m.pickle"))).is_valid());
        assert!(!validate_model_file(Some(Path::new("m.onnx"))).is_valid());
        assert!(!validate_model_file(Some(Path::new("joblib"))).is_valid());
    }

    #[test]
    fn test_file_extension_uses_last_dot() {
        assert_eq!(file_extension("a.tar.PKL").as_deref(), Some(".pkl"));
        assert_eq!(file_extension("noext"), None);
    }

    #[test]
    fn test_metadata_all_missing() {
        let outcome = validate_metadata("", &[], &[]);
        assert_eq!(
            outcome.issues(),
            &[
                ValidationIssue::MissingTarget,
                ValidationIssue::NoProtectedAttributes,
                ValidationIssue::NoFeatures,
            ]
        );
    }

    #[test]
    fn test_metadata_valid() {
        assert!(validate_metadata("y", &s(&["gender"]), &s(&["age"])).is_valid());
    }

    #[test]
    fn test_metadata_requires_features() {
        let outcome = validate_metadata("y", &s(&["gender"]), &[]);
        assert_eq!(outcome.issues(), &[ValidationIssue::NoFeatures]);
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_mitigation_requires_both() {
        assert!(validate_mitigation(Some("reweighing"), Some("gender")).is_valid());
        assert_eq!(
            validate_mitigation(None, Some("gender")).issues(),
            &[ValidationIssue::MissingTechnique]
        );
        assert_eq!(
            validate_mitigation(Some("reweighing"), Some("")).issues(),
            &[ValidationIssue::MissingProtectedAttribute]
        );
    }
}
