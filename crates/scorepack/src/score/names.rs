//! Variable name checks.

use super::ScoreError;

/// Returns true if `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Reject any invalid or repeated name, listing every offender.
pub fn check_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), ScoreError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut invalid = Vec::new();
    for name in names {
        if !is_valid_identifier(name) {
            invalid.push(name.to_string());
        } else if seen.contains(&name) {
            return Err(ScoreError::DuplicateName(name.to_string()));
        }
        seen.push(name);
    }
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ScoreError::InvalidVariableNames(invalid))
    }
}
