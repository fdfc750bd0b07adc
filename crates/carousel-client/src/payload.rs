//! Outbound payload mapping for the record endpoint.
//!
//! The registry's internal model never sees the backend's snake_case
//! field names; this module is the single boundary where they appear.
//! `sort` values are assigned from registry order, never completion
//! order.

use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;

use carousel_core::models::{CarouselForm, CarouselStatus, MediaSlot};

/// One attachment record as the record endpoint expects it (field names
/// are the backend schema contract).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselMediaPayload {
    pub id: Option<i64>,
    pub carousel_id: Option<i64>,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub external_link: Option<String>,
    pub sort: i32,
}

impl CarouselMediaPayload {
    /// Map one slot at its registry position. Name fallback chain: display
    /// name, then the URL's trailing path segment, then a generated
    /// placeholder. A missing URL maps to an empty string rather than
    /// failing the submit.
    fn from_slot(slot: &MediaSlot, carousel_id: Option<i64>, position: usize) -> Self {
        let url = slot.remote_url.clone().unwrap_or_default();
        let name = if slot.display_name.trim().is_empty() {
            name_from_url(&url).unwrap_or_else(|| format!("media-{}", position + 1))
        } else {
            slot.display_name.clone()
        };

        Self {
            id: None,
            carousel_id,
            name,
            url,
            media_type: slot.kind.as_str().to_string(),
            external_link: slot.external_link.clone(),
            sort: position as i32,
        }
    }
}

/// The full outbound carousel record.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselPayload {
    pub id: Option<i64>,
    pub title: String,
    #[serde(rename = "type")]
    pub carousel_type: String,
    pub category: Option<String>,
    pub position: String,
    pub is_external_link: String,
    pub url: Option<String>,
    pub sort: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub remark: Option<String>,
    pub status: CarouselStatus,
    pub media_list: Vec<CarouselMediaPayload>,
}

impl CarouselPayload {
    /// Reconcile the scalar form fields with the ordered slot sequence.
    /// `sort` values come out contiguous and 0-based in registry order.
    pub fn from_form(form: &CarouselForm, slots: &[MediaSlot]) -> Self {
        let media_list = slots
            .iter()
            .enumerate()
            .map(|(position, slot)| CarouselMediaPayload::from_slot(slot, form.id, position))
            .collect();

        Self {
            id: form.id,
            title: form.title.clone(),
            carousel_type: form.carousel_type.clone(),
            category: form.category.clone(),
            position: form.placement.clone(),
            is_external_link: form.is_external_link.clone(),
            url: form.link_url.clone(),
            sort: form.sort,
            start_time: form.start_time,
            end_time: form.end_time,
            remark: form.remark.clone(),
            status: form.status,
            media_list,
        }
    }
}

/// Trailing path segment of a URL, percent-decoded. None for an empty or
/// segment-less URL.
fn name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?;
    if segment.is_empty() || segment.contains(':') {
        return None;
    }
    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}
