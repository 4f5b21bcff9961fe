use crate::server::response::ApiError;

pub fn validate_range(value: i64, min: i64, max: i64, field: &str) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::bad_request(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

pub fn validate_non_negative(value: f64, field: &str) -> Result<(), ApiError> {
    if value < 0.0 {
        return Err(ApiError::bad_request(format!("{field} cannot be negative")));
    }
    Ok(())
}

pub fn validate_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// An entry cannot be marked current and carry an end date at the same
/// time. Checked after patch merge so a patch cannot sneak the combination
/// in half at a time.
pub fn validate_current_end_date(
    is_current: bool,
    end_date: Option<&str>,
) -> Result<(), ApiError> {
    if is_current && end_date.is_some_and(|d| !d.is_empty()) {
        return Err(ApiError::bad_request(
            "an entry marked as current cannot have an end date",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(validate_range(1, 1, 5, "proficiency").is_ok());
        assert!(validate_range(5, 1, 5, "proficiency").is_ok());
        assert!(validate_range(0, 1, 5, "proficiency").is_err());
        assert!(validate_range(6, 1, 5, "proficiency").is_err());
    }

    #[test]
    fn current_with_end_date_rejected() {
        assert!(validate_current_end_date(true, Some("2024-01")).is_err());
        assert!(validate_current_end_date(true, None).is_ok());
        assert!(validate_current_end_date(true, Some("")).is_ok());
        assert!(validate_current_end_date(false, Some("2024-01")).is_ok());
    }
}
