use crate::domain::models::event::EventCategory;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

// Identity

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters long."))]
    pub username: String,
    #[validate(email(message = "Email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,
}

// Events

#[derive(Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters long."))]
    pub title: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters."))]
    pub description: String,
    #[validate(custom(function = "future_date"))]
    pub date: DateTime<Utc>,
    #[validate(length(min = 5, max = 255, message = "Location must be between 5 and 255 characters long."))]
    pub location: String,
    #[validate(custom(function = "known_category"))]
    pub category: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateEventRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters long."))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters."))]
    pub description: Option<String>,
    #[validate(custom(function = "future_date"))]
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 5, max = 255, message = "Location must be between 5 and 255 characters long."))]
    pub location: Option<String>,
    #[validate(custom(function = "known_category"))]
    pub category: Option<String>,
}

// Tickets

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, message = "Event ID is required."))]
    pub event_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 3, message = "Ticket type should be at least 3 characters long."))]
    pub ticket_type: String,
    #[validate(range(exclusive_min = 0.0, message = "Price should be a positive number."))]
    pub price: f64,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i64,
}

/// Present fields are applied even when zero; absent fields are left alone.
#[derive(Deserialize, Validate, Default)]
pub struct UpdateTicketRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 3, message = "Ticket type should be at least 3 characters long."))]
    pub ticket_type: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price should be a positive number."))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Quantity cannot be negative."))]
    pub quantity: Option<i64>,
}

// Purchases

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[validate(length(min = 1, message = "Ticket ID is required."))]
    pub ticket_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i64,
}

// Reviews

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Event ID is required."))]
    pub event_id: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i32,
    #[validate(length(max = 500, message = "Content must be at most 500 characters long."))]
    pub content: String,
}

/// Review body as it arrives. Field types are only enforced by
/// [`ReviewDraft::into_request`], after the caller may review the event at all.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub event_id: Option<String>,
    pub rating: Option<Value>,
    pub content: Option<Value>,
}

impl ReviewDraft {
    pub fn event_id(&self) -> Result<&str, AppError> {
        match self.event_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AppError::Validation("Event ID is required.".into())),
        }
    }

    pub fn into_request(self) -> Result<CreateReviewRequest, AppError> {
        let event_id = self.event_id()?.to_string();

        let rating = match self.rating {
            None => return Err(AppError::Validation("Rating is required.".into())),
            Some(value) => value.as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or(AppError::Validation("Rating must be a whole number.".into()))?,
        };

        let content = match self.content {
            None => return Err(AppError::Validation("Review content is required.".into())),
            Some(Value::String(text)) => text,
            Some(_) => return Err(AppError::Validation("Content must be a string.".into())),
        };

        Ok(CreateReviewRequest { event_id, rating, content })
    }
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: Option<i32>,
    #[validate(length(max = 500, message = "Content must be at most 500 characters long."))]
    pub content: Option<String>,
}

fn future_date(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date <= Utc::now() {
        return Err(ValidationError::new("future_date").with_message(Cow::Borrowed("Date must be in the future.")));
    }
    Ok(())
}

fn known_category(category: &str) -> Result<(), ValidationError> {
    category.parse::<EventCategory>().map(|_| ()).map_err(|_| {
        ValidationError::new("category").with_message(Cow::Borrowed(
            "Category must be one of Music, Sports, Education, Tech, Health, or Business.",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extractors::json::first_violation;
    use chrono::Duration;

    fn event_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Rust meetup".into(),
            description: "Monthly".into(),
            date: Utc::now() + Duration::days(10),
            location: "Town hall".into(),
            category: "Tech".into(),
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(event_request().validate().is_ok());
    }

    #[test]
    fn past_date_is_rejected() {
        let mut request = event_request();
        request.date = Utc::now() - Duration::days(1);
        let errors = request.validate().unwrap_err();
        assert_eq!(first_violation(&errors), "Date must be in the future.");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut request = event_request();
        request.category = "tech".into();
        let errors = request.validate().unwrap_err();
        assert!(first_violation(&errors).starts_with("Category must be one of"));
    }

    #[test]
    fn ticket_update_accepts_zero_quantity_but_not_zero_price() {
        let zero_quantity = UpdateTicketRequest { quantity: Some(0), ..Default::default() };
        assert!(zero_quantity.validate().is_ok());

        let zero_price = UpdateTicketRequest { price: Some(0.0), ..Default::default() };
        assert!(zero_price.validate().is_err());
    }

    #[test]
    fn absent_update_fields_are_not_validated() {
        assert!(UpdateEventRequest::default().validate().is_ok());
        assert!(UpdateReviewRequest::default().validate().is_ok());
    }

    fn draft(body: serde_json::Value) -> ReviewDraft {
        serde_json::from_value(body).unwrap()
    }

    fn rejection(result: Result<CreateReviewRequest, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("draft was accepted"),
        }
    }

    #[test]
    fn review_draft_accepts_any_field_types() {
        let loose = draft(serde_json::json!({ "eventId": "e1", "rating": 4.5, "content": 7 }));
        assert_eq!(loose.event_id().unwrap(), "e1");
    }

    #[test]
    fn review_draft_conversion_names_the_bad_field() {
        let missing = draft(serde_json::json!({ "eventId": "e1", "rating": 5 }));
        assert_eq!(rejection(missing.into_request()), "Review content is required.");

        let fractional = draft(serde_json::json!({ "eventId": "e1", "rating": 4.5, "content": "ok" }));
        assert_eq!(rejection(fractional.into_request()), "Rating must be a whole number.");

        let no_event = draft(serde_json::json!({ "rating": 5, "content": "ok" }));
        assert_eq!(rejection(no_event.into_request()), "Event ID is required.");

        let ok = draft(serde_json::json!({ "eventId": "e1", "rating": 5, "content": "Great" }))
            .into_request()
            .unwrap();
        assert_eq!((ok.rating, ok.content.as_str()), (5, "Great"));
    }
}
