//! External booking records
//!
//! A `FlightBooking` is supplied by the booking collaborator (confirmation
//! import, inbox scan). The merge rules that fold one into a trip live in
//! [`crate::booking`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::item::hhmm;
use super::trip::day_date;

/// A flight booking: one-way or round-trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightBooking {
    /// Origin airport code or city label
    pub origin: String,

    /// Destination airport code or city label
    pub destination: String,

    #[serde(with = "day_date")]
    pub depart_date: NaiveDate,

    /// Present for round trips
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_day_date")]
    pub return_date: Option<NaiveDate>,

    /// Enriched timestamps, when the booking source knows them
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub departure_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub arrival_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub return_departure_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub return_arrival_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,

    /// Booking reference (PNR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default = "default_passengers")]
    pub passengers: u32,

    /// Total fare across all passengers and legs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

fn default_passengers() -> u32 {
    1
}

impl FlightBooking {
    /// Create a one-way booking
    pub fn one_way(origin: impl Into<String>, destination: impl Into<String>, depart_date: NaiveDate) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            depart_date,
            return_date: None,
            departure_time: None,
            arrival_time: None,
            return_departure_time: None,
            return_arrival_time: None,
            airline: None,
            flight_number: None,
            reference: None,
            passengers: 1,
            total_price: None,
        }
    }

    /// Create a round-trip booking
    pub fn round_trip(
        origin: impl Into<String>,
        destination: impl Into<String>,
        depart_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Self {
        let mut booking = Self::one_way(origin, destination, depart_date);
        booking.return_date = Some(return_date);
        booking
    }

    /// Set airline and flight number
    pub fn with_flight(mut self, airline: impl Into<String>, flight_number: impl Into<String>) -> Self {
        self.airline = Some(airline.into());
        self.flight_number = Some(flight_number.into());
        self
    }

    /// Set the booking reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set passenger count
    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    /// Set the total fare
    pub fn with_total_price(mut self, total_price: f64) -> Self {
        self.total_price = Some(total_price);
        self
    }

    /// Set outbound departure/arrival times
    pub fn with_outbound_times(mut self, departure: NaiveTime, arrival: Option<NaiveTime>) -> Self {
        self.departure_time = Some(departure);
        self.arrival_time = arrival;
        self
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Serde for `Option<NaiveDate>` reusing the day-granularity parser
pub(crate) mod opt_day_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::day_date;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(s) => day_date::parse(&s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_way_defaults() {
        let booking = FlightBooking::one_way("JFK", "LHR", date(2025, 6, 1));
        assert!(!booking.is_round_trip());
        assert_eq!(booking.passengers, 1);
        assert!(booking.total_price.is_none());
    }

    #[test]
    fn test_round_trip_builder() {
        let booking = FlightBooking::round_trip("SFO", "NRT", date(2025, 6, 1), date(2025, 6, 10))
            .with_flight("ANA", "NH107")
            .with_reference("X4J9KQ")
            .with_passengers(2)
            .with_total_price(2400.0);

        assert!(booking.is_round_trip());
        assert_eq!(booking.airline.as_deref(), Some("ANA"));
        assert_eq!(booking.reference.as_deref(), Some("X4J9KQ"));
    }

    #[test]
    fn test_booking_serde() {
        let json = serde_json::json!({
            "origin": "JFK",
            "destination": "CDG",
            "departDate": "2025-06-01",
            "returnDate": "2025-06-08T00:00:00Z",
            "departureTime": "18:30",
            "flightNumber": "AF007",
            "passengers": 2
        });
        let booking: FlightBooking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.depart_date, date(2025, 6, 1));
        assert_eq!(booking.return_date, Some(date(2025, 6, 8)));
        assert_eq!(booking.departure_time, Some(NaiveTime::from_hms_opt(18, 30, 0).unwrap()));
        assert_eq!(booking.passengers, 2);
    }
}
