//! Validation helpers shared by every config section

pub use crate::error::ValidationError;

/// A named part of the config file that can check and merge itself
pub trait ConfigSection: Default {
    /// Returns every problem found; `Ok` means the section is usable
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another section into this one; values from `other` win
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a float is finite and strictly positive
    pub fn positive(value: f64, field: &str) -> Result<(), ValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                "must be a positive number",
                value,
            ))
        }
    }

    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a list has at least one entry
    pub fn not_empty_list<T>(values: &[T], field: &str) -> Result<(), ValidationError> {
        if values.is_empty() {
            Err(ValidationError::new(field, "must contain at least one entry"))
        } else {
            Ok(())
        }
    }

    /// Validates that a value is one of the allowed options
    pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        if !allowed.contains(value) {
            let allowed_str = allowed
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ValidationError::with_value(
                field,
                format!("must be one of: {}", allowed_str),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        assert!(Validator::in_range(16, 16, 1000, "tick").is_ok());
        assert!(Validator::in_range(1000, 16, 1000, "tick").is_ok());
        assert!(Validator::in_range(15, 16, 1000, "tick").is_err());
        assert!(Validator::in_range(1001, 16, 1000, "tick").is_err());
    }

    #[test]
    fn test_positive() {
        assert!(Validator::positive(0.75, "speed").is_ok());
        assert!(Validator::positive(0.0, "speed").is_err());
        assert!(Validator::positive(-1.0, "speed").is_err());
        assert!(Validator::positive(f64::NAN, "speed").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(Validator::not_empty("mp3", "ext").is_ok());
        assert!(Validator::not_empty("   ", "ext").is_err());
        assert!(Validator::not_empty_list::<f64>(&[], "presets").is_err());
        assert!(Validator::not_empty_list(&[1.0], "presets").is_ok());
    }

    #[test]
    fn test_one_of() {
        let presets = [0.5, 1.0, 2.0];
        assert!(Validator::one_of(&1.0, &presets, "speed").is_ok());

        let err = Validator::one_of(&1.1, &presets, "speed").unwrap_err();
        assert_eq!(err.message, "must be one of: 0.5, 1, 2");
        assert_eq!(err.value.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_collect_errors_some_err() {
        let results = vec![
            Ok(()),
            Err(ValidationError::new("field1", "error1")),
            Ok(()),
            Err(ValidationError::new("field2", "error2")),
        ];
        let result = Validator::collect_errors(results);
        assert_eq!(result.unwrap_err().len(), 2);
    }

    #[test]
    fn test_collect_errors_all_ok() {
        assert!(Validator::collect_errors(vec![Ok(()), Ok(())]).is_ok());
    }
}
