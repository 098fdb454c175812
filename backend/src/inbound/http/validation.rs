//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field produces `invalid_request` with
//! `details: {"field": <wire name>, "code": <reason>}`.

use serde_json::json;

use crate::domain::{
    BookingValidationError, Error, LoginValidationError, RegistrationValidationError,
    TrainValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    Empty,
    TooShort,
    TooLong,
    NotPositive,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::NotPositive => "not_positive",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.0;
    field_error(
        name,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap an optional request field or report it missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn train_validation_error(err: &TrainValidationError) -> Error {
    let code = match err {
        TrainValidationError::EmptyTrainNumber | TrainValidationError::EmptyStation { .. } => {
            ValidationCode::Empty
        }
        TrainValidationError::TrainNumberTooLong { .. }
        | TrainValidationError::StationTooLong { .. } => ValidationCode::TooLong,
        TrainValidationError::NonPositiveId | TrainValidationError::NonPositiveCapacity => {
            ValidationCode::NotPositive
        }
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn booking_validation_error(err: &BookingValidationError, field: FieldName) -> Error {
    field_error(field.0, ValidationCode::NotPositive, err.to_string())
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, ValidationCode::Empty, err.to_string())
}

pub(crate) fn registration_validation_error(err: &RegistrationValidationError) -> Error {
    let (field, code) = match err {
        RegistrationValidationError::Username(UserValidationError::UsernameTooLong { .. }) => {
            ("username", ValidationCode::TooLong)
        }
        RegistrationValidationError::Username(_) => ("username", ValidationCode::Empty),
        RegistrationValidationError::PasswordTooShort { .. } => {
            ("password", ValidationCode::TooShort)
        }
        RegistrationValidationError::PasswordTooLong { .. } => {
            ("password", ValidationCode::TooLong)
        }
    };
    field_error(field, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, PASSWORD_MIN};
    use rstest::rstest;

    fn details(error: &Error) -> (String, String) {
        let details = error.details().expect("details present");
        (
            details["field"].as_str().expect("field").to_owned(),
            details["code"].as_str().expect("code").to_owned(),
        )
    }

    #[rstest]
    #[case(TrainValidationError::EmptyTrainNumber, "trainNumber", "empty")]
    #[case(TrainValidationError::StationTooLong { field: "destination", max: 100 }, "destination", "too_long")]
    #[case(TrainValidationError::NonPositiveCapacity, "totalSeats", "not_positive")]
    #[case(TrainValidationError::NonPositiveId, "trainId", "not_positive")]
    fn train_errors_name_the_wire_field(
        #[case] err: TrainValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = train_validation_error(&err);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(details(&error), (field.to_owned(), code.to_owned()));
    }

    #[rstest]
    #[case(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN }, "password", "too_short")]
    #[case(RegistrationValidationError::Username(UserValidationError::EmptyUsername), "username", "empty")]
    #[case(RegistrationValidationError::Username(UserValidationError::UsernameTooLong { max: 50 }), "username", "too_long")]
    fn registration_errors_name_the_wire_field(
        #[case] err: RegistrationValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(
            details(&registration_validation_error(&err)),
            (field.to_owned(), code.to_owned())
        );
    }

    #[rstest]
    fn missing_fields_are_reported_by_name() {
        let error = require::<i32>(None, FieldName::new("trainId")).expect_err("missing");
        assert_eq!(error.message(), "missing required field: trainId");
        assert_eq!(
            details(&error),
            ("trainId".to_owned(), "missing_field".to_owned())
        );
    }
}
