//! Classification and vehicle models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Classification {
    pub classification_id: i64,
    pub classification_name: String,
}

/// A vehicle joined with the name of its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub inv_id: i64,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: i64,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: f64,
    pub inv_miles: i64,
    pub inv_color: String,
    pub classification_id: i64,
    pub classification_name: String,
}

const NO_IMAGE: &str = "/images/vehicles/no-image.png";

impl InventoryItem {
    pub fn title(&self) -> String {
        format!("{} {}", self.inv_make, self.inv_model)
    }

    pub fn image_path(&self) -> &str {
        display_path(&self.inv_image)
    }

    pub fn thumbnail_path(&self) -> &str {
        display_path(&self.inv_thumbnail)
    }

    pub fn price_display(&self) -> String {
        format_price(self.inv_price)
    }

    pub fn miles_display(&self) -> String {
        group_thousands(&self.inv_miles.to_string())
    }
}

fn display_path(path: &str) -> &str {
    if path.trim().is_empty() {
        NO_IMAGE
    } else {
        path
    }
}

/// en-US price with grouped thousands; whole-dollar prices drop the cents.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let whole = group_thousands(&(cents / 100).to_string());
    match cents % 100 {
        0 => whole,
        rest => format!("{}.{:02}", whole, rest.abs()),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{}{}", sign, out)
}

/// Validated vehicle fields ready for insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleData {
    pub classification_id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub price: f64,
    pub miles: i64,
    pub color: String,
}
