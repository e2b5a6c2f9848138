//! Booking merge engine
//!
//! Deterministically folds an externally sourced flight booking into a
//! trip: one `ItineraryItem` per leg (outbound and, for round trips, the
//! return), placed into the day matching the leg's calendar date or into a
//! freshly inserted day that keeps the sequence chronological, with the
//! trip's date bounds extended but never shrunk.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{CostCategory, Day, FlightBooking, ItemKind, ItineraryItem, Trip};

/// One flight leg to be placed into the trip
struct Leg<'a> {
    origin: &'a str,
    destination: &'a str,
    date: NaiveDate,
    departure_time: Option<NaiveTime>,
    arrival_time: Option<NaiveTime>,
    cost: Option<f64>,
}

/// Merge a flight booking into the trip.
///
/// Pure: returns the merged copy plus the index of the day that received
/// the outbound leg (for scroll-to-result in the UI). The return leg, when
/// present, is merged after the outbound one, so its day placement sees
/// the post-outbound sequence.
pub fn merge_booking(trip: &Trip, booking: &FlightBooking) -> (Trip, usize) {
    let mut next = trip.clone();

    let (outbound_cost, return_cost) = split_fare(booking);
    let effective_end = booking.return_date.unwrap_or(booking.depart_date);

    let outbound = Leg {
        origin: &booking.origin,
        destination: &booking.destination,
        date: booking.depart_date,
        departure_time: booking.departure_time,
        arrival_time: booking.arrival_time,
        cost: outbound_cost,
    };
    let outbound_day = insert_leg(&mut next, &outbound, booking);
    next.extend_bounds(booking.depart_date, effective_end);

    if let Some(return_date) = booking.return_date {
        let inbound = Leg {
            origin: &booking.destination,
            destination: &booking.origin,
            date: return_date,
            departure_time: booking.return_departure_time,
            arrival_time: booking.return_arrival_time,
            cost: return_cost,
        };
        insert_leg(&mut next, &inbound, booking);
        next.extend_bounds(return_date, return_date);
    }

    debug!(
        outbound_day,
        days = next.days.len(),
        round_trip = booking.is_round_trip(),
        "booking merged"
    );
    (next, outbound_day)
}

/// Place one leg's item, returning the index of the receiving day.
///
/// An existing day with the same calendar date gets the item prepended
/// (flights are time-anchored and shown first). Otherwise a new travel day
/// is created: the only day for an empty trip, day 1 for a dateless draft,
/// or the position that keeps the day sequence in chronological order.
fn insert_leg(trip: &mut Trip, leg: &Leg<'_>, booking: &FlightBooking) -> usize {
    let item = leg_item(leg, booking);

    if let Some(index) = trip.day_index_for_date(leg.date) {
        trip.days[index].items.insert(0, item);
        return index;
    }

    let mut day = Day::new(leg.date, format!("{} to {}", leg.origin, leg.destination));
    day.items.push(item);

    if trip.days.is_empty() {
        trip.days.push(day);
        return 0;
    }

    if trip.start_date.is_none() && trip.end_date.is_none() {
        trip.days.insert(0, day);
        return 0;
    }

    match trip.days.iter().position(|d| d.date > leg.date) {
        Some(index) => {
            trip.days.insert(index, day);
            index
        }
        None => {
            trip.days.push(day);
            trip.days.len() - 1
        }
    }
}

/// Derive the itinerary item for one leg
fn leg_item(leg: &Leg<'_>, booking: &FlightBooking) -> ItineraryItem {
    let mut item = ItineraryItem::new(format!("Flight: {} → {}", leg.origin, leg.destination), ItemKind::Transport)
        .with_description(leg_description(booking));

    // Departure falls back to the date's midnight when no timestamp is
    // known; arrival is only set from a real timestamp.
    item.start_time = Some(leg.departure_time.unwrap_or(NaiveTime::MIN));
    item.end_time = leg.arrival_time;

    if let Some(cost) = leg.cost {
        item = item.with_cost(cost, CostCategory::Transport);
    }
    item
}

/// Compose airline, flight number, passenger count, and booking reference
fn leg_description(booking: &FlightBooking) -> String {
    let mut parts = Vec::new();

    match (&booking.airline, &booking.flight_number) {
        (Some(airline), Some(number)) => parts.push(format!("{} {}", airline, number)),
        (Some(airline), None) => parts.push(airline.clone()),
        (None, Some(number)) => parts.push(format!("Flight {}", number)),
        (None, None) => {}
    }

    let noun = if booking.passengers == 1 { "passenger" } else { "passengers" };
    parts.push(format!("{} {}", booking.passengers, noun));

    if let Some(reference) = &booking.reference {
        parts.push(format!("ref {}", reference));
    }

    parts.join(", ")
}

/// Round-trip fares split evenly (rounded) across the two legs; one-way
/// fares assign the full price to the single item.
fn split_fare(booking: &FlightBooking) -> (Option<f64>, Option<f64>) {
    match booking.total_price {
        None => (None, None),
        Some(total) if booking.is_round_trip() => {
            let half = (total / 2.0).round();
            (Some(half), Some(half))
        }
        Some(total) => (Some(total), None),
    }
}
