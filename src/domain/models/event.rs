use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Music,
    Sports,
    Education,
    Tech,
    Health,
    Business,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Music,
        EventCategory::Sports,
        EventCategory::Education,
        EventCategory::Tech,
        EventCategory::Health,
        EventCategory::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::Sports => "Sports",
            EventCategory::Education => "Education",
            EventCategory::Tech => "Tech",
            EventCategory::Health => "Health",
            EventCategory::Business => "Business",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub organizer_id: String,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            date: params.date,
            location: params.location,
            category: params.category.as_str().to_string(),
            organizer_id: params.organizer_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An event joined with its organizer's username, as served by the read endpoints.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct EventDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub event: Event,
    pub organizer_username: String,
}
