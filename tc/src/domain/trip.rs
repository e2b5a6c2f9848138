//! The trip document
//!
//! A `Trip` is the root itinerary for one travel plan: destination, an
//! optional date range, and an ordered sequence of days. Day order and
//! item order are meaningful and preserved by every mutation except
//! explicit reorder/move.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::id::generate_trip_id;
use super::item::ItineraryItem;

/// Cover photo metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverPhoto {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

/// One calendar day's ordered slate of activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// Day-granularity date; tolerates datetime strings on the wire
    #[serde(with = "day_date")]
    pub date: NaiveDate,

    /// Free-text label, e.g. "Tokyo" or "JFK to LAX" for a travel day
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub items: Vec<ItineraryItem>,
}

impl Day {
    /// Create an empty day
    pub fn new(date: NaiveDate, location: impl Into<String>) -> Self {
        Self {
            date,
            location: location.into(),
            items: Vec::new(),
        }
    }
}

/// The root itinerary document for one travel plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub id: String,

    pub destination: String,

    /// Nullable: a draft trip may have no fixed dates yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub days: Vec<Day>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<CoverPhoto>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl Trip {
    /// Create an empty draft trip with a generated id
    pub fn new(destination: impl Into<String>) -> Self {
        let destination = destination.into();
        Self {
            id: generate_trip_id(&destination),
            destination,
            start_date: None,
            end_date: None,
            days: Vec::new(),
            pace: None,
            interests: Vec::new(),
            cover_photo: None,
            budget: None,
        }
    }

    /// Set the date range
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Append a day
    pub fn with_day(mut self, day: Day) -> Self {
        self.days.push(day);
        self
    }

    /// Index of the day sharing a calendar date, ignoring any time component
    pub fn day_index_for_date(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| d.date == date)
    }

    /// Flattened view over every item in day order
    pub fn items(&self) -> impl Iterator<Item = &ItineraryItem> {
        self.days.iter().flat_map(|d| d.items.iter())
    }

    /// All item ids in the trip
    pub fn item_ids(&self) -> HashSet<String> {
        self.items().map(|i| i.id.clone()).collect()
    }

    /// Whether any day contains the given item id
    pub fn contains_item_id(&self, id: &str) -> bool {
        self.items().any(|i| i.id == id)
    }

    /// Widen the trip's date range to cover `[start, end]`.
    ///
    /// Bounds only ever extend, never shrink. A trip with no bounds at all
    /// takes both from the arguments.
    pub fn extend_bounds(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = Some(match self.start_date {
            Some(existing) => existing.min(start),
            None => start,
        });
        self.end_date = Some(match self.end_date {
            Some(existing) => existing.max(end),
            None => end,
        });
    }
}

/// Partial top-level update for a trip, shallow-merged field by field.
///
/// The presence of `days` is the signal that item-level change detection
/// must run after the merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<Day>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<CoverPhoto>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl TripPatch {
    /// Whether the patch touches the day/item structure
    pub fn touches_days(&self) -> bool {
        self.days.is_some()
    }

    /// Shallow-merge this patch into a trip
    pub fn apply_to(self, trip: &mut Trip) {
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(start) = self.start_date {
            trip.start_date = Some(start);
        }
        if let Some(end) = self.end_date {
            trip.end_date = Some(end);
        }
        if let Some(days) = self.days {
            trip.days = days;
        }
        if let Some(pace) = self.pace {
            trip.pace = Some(pace);
        }
        if let Some(interests) = self.interests {
            trip.interests = interests;
        }
        if let Some(cover_photo) = self.cover_photo {
            trip.cover_photo = Some(cover_photo);
        }
        if let Some(budget) = self.budget {
            trip.budget = Some(budget);
        }
    }
}

/// Serde for day-granularity dates that tolerates datetime strings
pub(crate) mod day_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Parse a plain date or the date portion of an ISO datetime
    pub fn parse(s: &str) -> Result<NaiveDate, chrono::ParseError> {
        let date_part = s.split('T').next().unwrap_or(s);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trip_new_is_dateless_draft() {
        let trip = Trip::new("Lisbon");
        assert!(trip.id.contains("trip-lisbon"));
        assert!(trip.start_date.is_none());
        assert!(trip.end_date.is_none());
        assert!(trip.days.is_empty());
    }

    #[test]
    fn test_day_index_for_date() {
        let trip = Trip::new("Kyoto")
            .with_day(Day::new(date(2025, 6, 1), "Kyoto"))
            .with_day(Day::new(date(2025, 6, 2), "Kyoto"));

        assert_eq!(trip.day_index_for_date(date(2025, 6, 2)), Some(1));
        assert_eq!(trip.day_index_for_date(date(2025, 6, 3)), None);
    }

    #[test]
    fn test_extend_bounds_never_shrinks() {
        let mut trip = Trip::new("Rome").with_dates(date(2025, 6, 1), date(2025, 6, 10));

        trip.extend_bounds(date(2025, 6, 3), date(2025, 6, 5));
        assert_eq!(trip.start_date, Some(date(2025, 6, 1)));
        assert_eq!(trip.end_date, Some(date(2025, 6, 10)));

        trip.extend_bounds(date(2025, 5, 28), date(2025, 6, 12));
        assert_eq!(trip.start_date, Some(date(2025, 5, 28)));
        assert_eq!(trip.end_date, Some(date(2025, 6, 12)));
    }

    #[test]
    fn test_extend_bounds_sets_missing_bounds() {
        let mut trip = Trip::new("Oslo");
        trip.extend_bounds(date(2025, 7, 1), date(2025, 7, 4));
        assert_eq!(trip.start_date, Some(date(2025, 7, 1)));
        assert_eq!(trip.end_date, Some(date(2025, 7, 4)));
    }

    #[test]
    fn test_trip_patch_metadata_only() {
        let mut trip = Trip::new("Paris");
        let days_before = trip.days.clone();

        let patch = TripPatch {
            destination: Some("Paris & Versailles".to_string()),
            budget: Some(2000.0),
            ..Default::default()
        };
        assert!(!patch.touches_days());
        patch.apply_to(&mut trip);

        assert_eq!(trip.destination, "Paris & Versailles");
        assert_eq!(trip.budget, Some(2000.0));
        assert_eq!(trip.days, days_before);
    }

    #[test]
    fn test_day_date_accepts_datetime_strings() {
        let json = serde_json::json!({
            "date": "2025-06-01T00:00:00.000Z",
            "location": "Tokyo",
            "items": []
        });
        let day: Day = serde_json::from_value(json).unwrap();
        assert_eq!(day.date, date(2025, 6, 1));

        let out = serde_json::to_value(&day).unwrap();
        assert_eq!(out["date"], "2025-06-01");
    }

    #[test]
    fn test_trip_wire_shape_camel_case() {
        let trip = Trip::new("Hanoi").with_dates(date(2025, 9, 1), date(2025, 9, 5));
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["startDate"], "2025-09-01");
        assert_eq!(json["endDate"], "2025-09-05");
        assert!(json.get("coverPhoto").is_none());
    }

    #[test]
    fn test_item_ids_flatten_all_days() {
        let mut trip = Trip::new("Porto");
        let mut d1 = Day::new(date(2025, 6, 1), "Porto");
        d1.items.push(ItineraryItem::new("Livraria Lello", ItemKind::Sight));
        let mut d2 = Day::new(date(2025, 6, 2), "Porto");
        d2.items.push(ItineraryItem::new("Francesinha", ItemKind::Food));
        trip.days = vec![d1, d2];

        assert_eq!(trip.item_ids().len(), 2);
        let first_id = trip.days[0].items[0].id.clone();
        assert!(trip.contains_item_id(&first_id));
        assert!(!trip.contains_item_id("missing"));
    }
}
