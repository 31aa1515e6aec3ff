use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};
use crate::error::AppError;

/// `Json<T>` whose rejections come back as 422 `{"error": ...}` bodies.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(describe_rejection(rejection)))?;
        Ok(JsonBody(value))
    }
}

fn describe_rejection(rejection: JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => describe_data_error(&err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON.".to_string(),
        JsonRejection::MissingJsonContentType(_) => "Request body must be sent as application/json.".to_string(),
        other => other.body_text(),
    }
}

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Turns `quantity: invalid type: string "two", expected i64 at line 1 column 9`
/// into `quantity must be a whole number.`.
fn describe_data_error(text: &str) -> String {
    let mut detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);
    if let Some(at) = detail.rfind(" at line ") {
        detail = &detail[..at];
    }

    // A leading token without spaces is the field path serde_path_to_error adds.
    let (path, message) = match detail.split_once(": ") {
        Some((head, rest)) if !head.contains(' ') && head != "." => (Some(head), rest),
        _ => (None, detail),
    };

    if let Some(missing) = message.strip_prefix("missing field `") {
        let field = missing.trim_end_matches('`');
        return match path {
            Some(parent) => format!("{}.{} is required.", parent, field),
            None => format!("{} is required.", field),
        };
    }

    let subject = path.unwrap_or("Request body");
    match message.rsplit_once(", expected ") {
        Some((_, expected)) => format!("{} must be {}.", subject, plain_type(expected)),
        None => format!("{} is invalid.", subject),
    }
}

fn plain_type(expected: &str) -> &str {
    match expected {
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "usize" => "a whole number",
        "f32" | "f64" => "a number",
        other if other.starts_with("struct ") => "a JSON object",
        other => other,
    }
}

/// A JSON body that also passed its `validator` rules.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

pub fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(|errors| AppError::Validation(first_violation(&errors)))
}

/// Message of the first failing field, fields taken in name order.
pub fn first_violation(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}
