// SPDX-License-Identifier: AGPL-3.0
// GoMate CLI - Text rendering of items and users

use gomate_core::{TransportItem, User};

/// Greeting for the hour of day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}

pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("LKR {:.0}", p),
        _ => "Free".to_string(),
    }
}

/// One line per item, for lists
pub fn item_row(item: &TransportItem, is_favourite: bool) -> String {
    let star = if is_favourite { "*" } else { " " };
    let rating = item
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {:>4}  {:<11} {:<8} {:>3}  {:<10} {}",
        star,
        item.id,
        item.category.display_label(),
        item.status,
        rating,
        price_label(item.price),
        item.title
    )
}

/// Full description of a single item
pub fn item_details(item: &TransportItem, is_favourite: bool) -> String {
    let mut lines = vec![
        format!("{} (#{})", item.title, item.id),
        format!("{} | {}", item.category.display_label(), item.status),
        item.description.clone(),
    ];

    let optional = [
        ("Location", item.location.as_deref()),
        ("From", item.from.as_deref()),
        ("To", item.to.as_deref()),
        ("Route", item.route.as_deref()),
        ("Departs", item.departure_time.as_deref()),
        ("Arrives", item.arrival_time.as_deref()),
        ("Distance", item.distance.as_deref()),
        ("Duration", item.duration.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{:<9} {}", format!("{}:", label), value));
        }
    }

    lines.push(format!("{:<9} {}", "Price:", price_label(item.price)));
    if let Some(rating) = item.rating {
        lines.push(format!("{:<9} {:.1}/5", "Rating:", rating));
    }
    if is_favourite {
        lines.push("In your favourites".to_string());
    }

    lines.join("\n")
}

pub fn user_summary(user: &User) -> String {
    format!("{} <{}> @{}", user.full_name(), user.email, user.username)
}
