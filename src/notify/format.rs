//! Alert message formatting, kept free of any transport so content is
//! unit-testable without network access.

use crate::api::Listing;

const UNKNOWN: &str = "unknown";

pub fn alert_subject() -> String {
    "🔔 New apartment listed on Yad2".to_string()
}

pub fn alert_body(listing: &Listing) -> String {
    let street = listing.street.as_deref().unwrap_or(UNKNOWN);
    let rooms = listing
        .rooms
        .map(format_rooms)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let price = listing
        .price
        .map(|price| format!("{} ₪", price))
        .unwrap_or_else(|| UNKNOWN.to_string());

    format!(
        "🔔 New apartment listed on Yad2!\nStreet: {}\nRooms: {}\nPrice: {}\n{}",
        street,
        rooms,
        price,
        listing.url()
    )
}

// Room counts are commonly fractional (3.5); render whole counts without
// the trailing ".0".
fn format_rooms(rooms: f64) -> String {
    if rooms.fract() == 0.0 {
        format!("{}", rooms as i64)
    } else {
        format!("{}", rooms)
    }
}
