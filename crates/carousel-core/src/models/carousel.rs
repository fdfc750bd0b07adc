use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Carousel visibility status, matching the backend dictionary values
/// ("0" active, "1" disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CarouselStatus {
    #[default]
    #[serde(rename = "0")]
    Active,
    #[serde(rename = "1")]
    Disabled,
}

/// The enclosing carousel record being edited.
///
/// Holds the scalar form state only; the ordered attachment sequence lives
/// in the media registry and becomes the record's media list at submit
/// time. Field names here are internal — the outbound snake_case shape is
/// produced by a single mapping at the submit boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CarouselForm {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "Title must be 1 to 50 characters"))]
    pub title: String,
    pub carousel_type: String,
    pub category: Option<String>,
    /// Placement: "1" home page, "0" other pages.
    pub placement: String,
    pub is_external_link: String,
    pub link_url: Option<String>,
    pub sort: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub remark: Option<String>,
    pub status: CarouselStatus,
}

impl Default for CarouselForm {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            carousel_type: String::new(),
            category: None,
            placement: "1".to_string(),
            is_external_link: "0".to_string(),
            link_url: None,
            sort: 0,
            start_time: None,
            end_time: None,
            remark: None,
            status: CarouselStatus::Active,
        }
    }
}

impl CarouselForm {
    /// Restore every field to its default (the form-reset action).
    /// Clearing the media registry is the caller's responsibility.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// End of the schedule window must come after its start when both are
    /// set.
    pub fn schedule_window_valid(&self) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end > start,
            _ => true,
        }
    }
}
