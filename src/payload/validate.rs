//! Field constraint checks shared by the request shapes.

use crate::error::ApiError;
use regex::Regex;

pub(crate) const PHONE_PATTERN: &str = r"^\+?\d{7,15}$";

pub(crate) fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let count = value.chars().count();
    if count < min {
        return Err(ApiError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if count > max {
        return Err(ApiError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub(crate) fn check_email(field: &str, value: &str) -> Result<(), ApiError> {
    if !value.contains('@') || value.len() < 3 {
        return Err(ApiError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

pub(crate) fn check_pattern(field: &str, value: &str, pattern: &str) -> Result<(), ApiError> {
    let re = Regex::new(pattern)
        .map_err(|_| ApiError::Validation(format!("invalid pattern for {}", field)))?;
    if !re.is_match(value) {
        return Err(ApiError::Validation(format!(
            "{} does not match required pattern",
            field
        )));
    }
    Ok(())
}

pub(crate) fn check_min(field: &str, value: f64, min: f64) -> Result<(), ApiError> {
    if value < min {
        return Err(ApiError::Validation(format!("{} must be at least {}", field, min)));
    }
    Ok(())
}
