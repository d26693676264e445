//! Input checks run before an edit-state is allowed near a descriptor.

use super::EditState;
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z\d_]*\.)+([A-Za-z][A-Za-z\d_]*)$")
        .expect("package id regex is valid")
});

/// Dotted identifier with at least two segments, each starting with a letter
pub fn is_valid_package_id(value: &str) -> bool {
    PACKAGE_ID_RE.is_match(value)
}

/// Parse a version code field.
///
/// Only ASCII digits are accepted, so `12a`, `-1` and `+3` are rejected
/// before any numeric conversion. The value must also fit a signed 32-bit
/// integer, which is what the packager stores it as.
pub fn parse_version_code(value: &str) -> Result<u32, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidVersionCode {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "version code",
        });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("only digits are allowed"));
    }

    match value.parse::<u32>() {
        Ok(code) if code <= i32::MAX as u32 => Ok(code),
        _ => Err(invalid("value does not fit in a 32-bit integer")),
    }
}

/// Every problem with `edit`, in field order
pub fn check_inputs(edit: &EditState) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let required = [
        ("source path", edit.source_path.as_str()),
        ("output path", edit.output_path.as_str()),
        ("app name", edit.app_name.as_str()),
        ("version name", edit.version_name.as_str()),
        ("main script", edit.main_script.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyField { field });
        }
    }

    if edit.package_id.is_empty() {
        errors.push(ValidationError::EmptyField {
            field: "package id",
        });
    } else if !is_valid_package_id(&edit.package_id) {
        errors.push(ValidationError::InvalidPackageId {
            value: edit.package_id.clone(),
        });
    }

    if let Err(e) = parse_version_code(&edit.version_code) {
        errors.push(e);
    }

    errors
}

/// First problem with `edit`, if any
pub fn validate(edit: &EditState) -> Result<(), ValidationError> {
    match check_inputs(edit).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_id_grammar() {
        assert!(is_valid_package_id("com.example"));
        assert!(is_valid_package_id("org.auto_js.App2"));
        assert!(!is_valid_package_id("com"));
        assert!(!is_valid_package_id("com."));
        assert!(!is_valid_package_id("1com.example"));
        assert!(!is_valid_package_id("com.example-app"));
        assert!(!is_valid_package_id("com..example"));
    }

    #[test]
    fn test_version_code_rejects_non_digits() {
        assert_eq!(parse_version_code("42"), Ok(42));
        assert!(matches!(
            parse_version_code("12a"),
            Err(ValidationError::InvalidVersionCode { .. })
        ));
        assert!(parse_version_code("-1").is_err());
        assert!(parse_version_code(" 1").is_err());
        assert!(matches!(
            parse_version_code(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn test_empty_main_script_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("foo.js");
        std::fs::write(&script, "").unwrap();
        let layout = crate::project::ProjectLayout::detect(&script).unwrap();
        let mut edit = EditState::fresh(&layout, &crate::settings::ToolSettings::default());
        edit.app_name = "Foo".into();
        edit.package_id = "com.example.foo".into();
        assert_eq!(validate(&edit), Ok(()));

        edit.main_script.clear();
        assert_eq!(
            validate(&edit),
            Err(ValidationError::EmptyField {
                field: "main script"
            })
        );
    }

    #[test]
    fn test_version_code_range() {
        assert_eq!(parse_version_code("2147483647"), Ok(i32::MAX as u32));
        assert!(parse_version_code("2147483648").is_err());
        assert!(parse_version_code("99999999999").is_err());
    }
}
