//! Itinerary items
//!
//! An `ItineraryItem` is one scheduled activity, transport leg, or rest
//! period within a day. Wire field names are camelCase because the REST
//! backend and the conversation engine both speak the original JSON shape.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::id::generate_item_id;

/// Closed set of item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Sight,
    Food,
    Museum,
    Hike,
    Experience,
    Transport,
    Rest,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sight => write!(f, "sight"),
            Self::Food => write!(f, "food"),
            Self::Museum => write!(f, "museum"),
            Self::Hike => write!(f, "hike"),
            Self::Experience => write!(f, "experience"),
            Self::Transport => write!(f, "transport"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Spend category for per-item cost summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Food,
    Lodging,
    Transport,
    Activities,
    Shopping,
    Other,
}

/// Geocoded point attached to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One scheduled activity within a day
///
/// `id` is opaque, generated at creation, and immutable afterwards; every
/// other field is freely mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    /// Stable identity, minted by the core
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Local to the day, 24-hour, no timezone
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub start_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub end_time: Option<NaiveTime>,

    /// Free text, e.g. "2h"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_category: Option<CostCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ItemLocation>,
}

impl ItineraryItem {
    /// Create a new item with a generated id
    pub fn new(title: impl Into<String>, kind: ItemKind) -> Self {
        let title = title.into();
        Self {
            id: generate_item_id(&title),
            title,
            description: String::new(),
            kind,
            start_time: None,
            end_time: None,
            duration: None,
            notes: None,
            cost: None,
            cost_category: None,
            location: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set start/end times
    pub fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Set the cost and its category
    pub fn with_cost(mut self, cost: f64, category: CostCategory) -> Self {
        self.cost = Some(cost);
        self.cost_category = Some(category);
        self
    }

    /// Set the geocoded location
    pub fn with_location(mut self, location: ItemLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Field-level modification predicate used by change detection.
    ///
    /// Compares title, description, type, duration, times, and notes.
    /// Cost and location are excluded so background geocoding enrichment
    /// never flags an item as changed.
    pub fn content_differs(&self, other: &ItineraryItem) -> bool {
        self.title != other.title
            || self.description != other.description
            || self.kind != other.kind
            || self.duration != other.duration
            || self.start_time != other.start_time
            || self.end_time != other.end_time
            || self.notes != other.notes
    }
}

/// Partial update for an item, shallow-merged over the current fields.
///
/// `id` is deliberately absent: identity is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub start_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub end_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_category: Option<CostCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ItemLocation>,
}

impl ItemPatch {
    /// Shallow-merge this patch into an item
    pub fn apply_to(&self, item: &mut ItineraryItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(start) = self.start_time {
            item.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            item.end_time = Some(end);
        }
        if let Some(duration) = &self.duration {
            item.duration = Some(duration.clone());
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone());
        }
        if let Some(cost) = self.cost {
            item.cost = Some(cost);
        }
        if let Some(category) = self.cost_category {
            item.cost_category = Some(category);
        }
        if let Some(location) = &self.location {
            item.location = Some(location.clone());
        }
    }
}

/// Serde for `Option<NaiveTime>` as zero-padded 24-hour `"HH:MM"`
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                // Tolerate seconds, which some enrichment sources include
                NaiveTime::parse_from_str(s, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_item_new() {
        let item = ItineraryItem::new("Meiji Shrine", ItemKind::Sight);
        assert!(item.id.contains("meiji-shrine"));
        assert_eq!(item.kind, ItemKind::Sight);
        assert!(item.start_time.is_none());
        assert!(item.location.is_none());
    }

    #[test]
    fn test_content_differs_tracked_fields() {
        let item = ItineraryItem::new("Dinner", ItemKind::Food).with_description("Izakaya");
        let mut other = item.clone();
        assert!(!item.content_differs(&other));

        other.title = "Late dinner".to_string();
        assert!(item.content_differs(&other));

        other = item.clone();
        other.start_time = Some(time(19, 30));
        assert!(item.content_differs(&other));

        other = item.clone();
        other.notes = Some("book ahead".to_string());
        assert!(item.content_differs(&other));
    }

    #[test]
    fn test_content_differs_ignores_cost_and_location() {
        let item = ItineraryItem::new("Dinner", ItemKind::Food);
        let enriched = item.clone().with_cost(40.0, CostCategory::Food).with_location(ItemLocation {
            lat: 35.66,
            lng: 139.70,
            address: Some("Shibuya".to_string()),
        });
        assert!(!item.content_differs(&enriched));
    }

    #[test]
    fn test_item_patch_shallow_merge() {
        let mut item = ItineraryItem::new("Museum visit", ItemKind::Museum).with_description("Main hall");
        let id = item.id.clone();

        let patch = ItemPatch {
            title: Some("Museum visit (guided)".to_string()),
            notes: Some("meet at entrance B".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut item);

        assert_eq!(item.id, id);
        assert_eq!(item.title, "Museum visit (guided)");
        assert_eq!(item.description, "Main hall");
        assert_eq!(item.notes.as_deref(), Some("meet at entrance B"));
    }

    #[test]
    fn test_item_serde_wire_shape() {
        let item = ItineraryItem::new("Hike to the ridge", ItemKind::Hike).with_times(Some(time(8, 5)), None);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "hike");
        assert_eq!(json["startTime"], "08:05");
        assert!(json.get("endTime").is_none());

        let back: ItineraryItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_hhmm_accepts_seconds() {
        let json = serde_json::json!({
            "id": "x",
            "title": "Flight",
            "type": "transport",
            "startTime": "06:45:00"
        });
        let item: ItineraryItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.start_time, Some(time(6, 45)));
    }
}
