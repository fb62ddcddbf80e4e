//! Client-side checks run before any request leaves the process.

use crate::ports::{PortError, PortResult};

/// Implemented by every create and update payload.
pub trait Validate {
    fn validate(&self) -> PortResult<()>;
}

pub(crate) fn required(field: &str, value: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// A field a patch carries must not be blanked out.
pub(crate) fn not_blank(field: &str, value: Option<&String>) -> PortResult<()> {
    match value {
        Some(v) => required(field, v),
        None => Ok(()),
    }
}

pub(crate) fn email(field: &str, value: &str) -> PortResult<()> {
    required(field, value)?;
    let well_formed = value
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(PortError::Validation(format!(
            "{} is not a valid email address",
            field
        )));
    }
    Ok(())
}

pub(crate) fn non_empty_patch(kind: &str, has_changes: bool) -> PortResult<()> {
    if !has_changes {
        return Err(PortError::Validation(format!(
            "{} update carries no changes",
            kind
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(required("client", "SIB").is_ok());
        assert_eq!(
            required("client", "   "),
            Err(PortError::Validation("client is required".to_string()))
        );
    }

    #[test]
    fn email_shape() {
        assert!(email("email", "awa@example.com").is_ok());
        assert!(email("email", "awa@example").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "awa.example.com").is_err());
    }

    #[test]
    fn absent_patch_fields_pass() {
        assert!(not_blank("nom", None).is_ok());
        assert!(not_blank("nom", Some(&"".to_string())).is_err());
    }
}
