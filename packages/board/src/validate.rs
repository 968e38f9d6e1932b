//! Form validation for report creation.
//!
//! Mirrors the constraints the original add-report form enforced:
//! required name and type, a phone number in one of several accepted
//! formats, and a non-empty location field.

use regex::Regex;

use crate::BoardError;

/// Raw form input for a new report. All fields arrive as entered;
/// trimming and optional-field normalization happen at validation and
/// report construction.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    /// Name of the person filing the report. Required.
    pub reporter_name: String,
    /// Phone number of the person filing the report. Required.
    pub reporter_phone: String,
    /// Free-text incident type. Required.
    pub report_type: String,
    /// Location as either strict `"lat, lng"` or free text. Required.
    pub location: String,
    /// Optional comment; empty collapses to no comment.
    pub comment: String,
    /// Optional image URL; empty collapses to no image.
    pub image: String,
}

/// Accepted phone formats: hyphenated local with optional country code,
/// bare 10-13 digits, `+`-prefixed 11-13 digits, or a parenthesized
/// area code.
fn phone_pattern() -> Regex {
    Regex::new(
        r"^(((\+?\d{1,3}-)?\d{3}-\d{3}-\d{4})|(\d{10,13})|(\+\d{11,13})|((\+\d{1,3})?[ ]*\(\d{1,3}\)[ ]+\d{3}-\d{4}))$",
    )
    .unwrap_or_else(|_| unreachable!())
}

/// Checks all required fields.
///
/// # Errors
///
/// Returns [`BoardError::Validation`] naming the first offending field.
/// Nothing is mutated on failure.
pub fn validate(form: &ReportForm) -> Result<(), BoardError> {
    if form.reporter_name.trim().is_empty() {
        return Err(BoardError::Validation {
            field: "reporter_name",
            message: "a reporter name is required".to_string(),
        });
    }

    if !phone_pattern().is_match(form.reporter_phone.trim()) {
        return Err(BoardError::Validation {
            field: "reporter_phone",
            message: format!("'{}' is not a valid phone number", form.reporter_phone),
        });
    }

    if form.report_type.trim().is_empty() {
        return Err(BoardError::Validation {
            field: "report_type",
            message: "a report type is required".to_string(),
        });
    }

    if form.location.trim().is_empty() {
        return Err(BoardError::Validation {
            field: "location",
            message: "a location is required".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ReportForm {
        ReportForm {
            reporter_name: "Jane".to_string(),
            reporter_phone: "604-555-1234".to_string(),
            report_type: "Flood".to_string(),
            location: "49.28, -123.12".to_string(),
            comment: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        assert!(validate(&valid_form()).is_ok());
    }

    #[test]
    fn accepts_all_phone_formats() {
        for phone in [
            "604-555-1234",
            "1-604-555-1234",
            "+1-604-555-1234",
            "6045551234",
            "160455512345",
            "+16045551234",
            "(604) 555-1234",
            "+1 (604) 555-1234",
        ] {
            let mut form = valid_form();
            form.reporter_phone = phone.to_string();
            assert!(validate(&form).is_ok(), "rejected {phone}");
        }
    }

    #[test]
    fn rejects_malformed_phones() {
        for phone in ["", "555-1234", "604 555 1234", "phone", "123456789"] {
            let mut form = valid_form();
            form.reporter_phone = phone.to_string();
            assert!(
                matches!(
                    validate(&form),
                    Err(BoardError::Validation {
                        field: "reporter_phone",
                        ..
                    })
                ),
                "accepted {phone}"
            );
        }
    }

    #[test]
    fn rejects_blank_name() {
        let mut form = valid_form();
        form.reporter_name = "   ".to_string();
        assert!(matches!(
            validate(&form),
            Err(BoardError::Validation {
                field: "reporter_name",
                ..
            })
        ));
    }

    #[test]
    fn rejects_blank_type_and_location() {
        let mut form = valid_form();
        form.report_type = String::new();
        assert!(validate(&form).is_err());

        let mut form = valid_form();
        form.location = String::new();
        assert!(validate(&form).is_err());
    }
}
