//! Card records and the persisted column layout

/// Placeholder for any field the page did not render
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of price/volume tiers carried by every record
pub const TIER_COUNT: usize = 6;

/// Tier labels in page order: ungraded first, then ascending grades
pub const TIER_LABELS: [&str; TIER_COUNT] =
    ["Raw", "Grade 7", "Grade 8", "Grade 9", "Grade 9.5", "PSA 10"];

/// Name of the column holding the unique resume key
pub const KEY_COLUMN: &str = "Card URL";

/// Persisted column order
pub const COLUMNS: [&str; 17] = [
    "Name",
    "Raw Price",
    "Raw Volume",
    "Grade 7",
    "Grade 7 Volume",
    "Grade 8",
    "Grade 8 Volume",
    "Grade 9",
    "Grade 9 Volume",
    "Grade 9.5",
    "Grade 9.5 Volume",
    "PSA 10",
    "PSA 10 Volume",
    "Rarity",
    "Model Number",
    "Image URL",
    KEY_COLUMN,
];

/// One extracted card
///
/// Prices and volumes are kept exactly as the page renders them; they are
/// never parsed into numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub name: String,
    pub prices: [String; TIER_COUNT],
    pub volumes: [String; TIER_COUNT],
    pub rarity: String,
    pub model_number: String,
    pub image_url: String,
    pub card_url: String,
}

impl CardRecord {
    /// Builds a record, padding or truncating the tier lists to exactly six entries
    pub fn new(
        name: impl Into<String>,
        prices: Vec<String>,
        volumes: Vec<String>,
        card_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prices: pad_tiers(prices),
            volumes: pad_tiers(volumes),
            rarity: NOT_AVAILABLE.to_string(),
            model_number: NOT_AVAILABLE.to_string(),
            image_url: NOT_AVAILABLE.to_string(),
            card_url: card_url.into(),
        }
    }

    pub fn with_rarity(mut self, rarity: Option<String>) -> Self {
        self.rarity = or_not_available(rarity);
        self
    }

    pub fn with_model_number(mut self, model_number: Option<String>) -> Self {
        self.model_number = or_not_available(model_number);
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = or_not_available(image_url);
        self
    }

    /// Returns the record as a row in `COLUMNS` order
    pub fn to_row(&self) -> Vec<&str> {
        let mut row = Vec::with_capacity(COLUMNS.len());
        row.push(self.name.as_str());
        for (price, volume) in self.prices.iter().zip(self.volumes.iter()) {
            row.push(price.as_str());
            row.push(volume.as_str());
        }
        row.push(self.rarity.as_str());
        row.push(self.model_number.as_str());
        row.push(self.image_url.as_str());
        row.push(self.card_url.as_str());
        row
    }

    /// Rebuilds a record from a row in `COLUMNS` order
    ///
    /// Returns None if the row does not have exactly one value per column.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Option<Self> {
        if row.len() != COLUMNS.len() {
            return None;
        }

        let field = |i: usize| row[i].as_ref().to_string();
        let prices = std::array::from_fn(|tier| field(1 + tier * 2));
        let volumes = std::array::from_fn(|tier| field(2 + tier * 2));

        Some(Self {
            name: field(0),
            prices,
            volumes,
            rarity: field(13),
            model_number: field(14),
            image_url: field(15),
            card_url: field(16),
        })
    }
}

fn pad_tiers(mut values: Vec<String>) -> [String; TIER_COUNT] {
    values.truncate(TIER_COUNT);
    values.resize(TIER_COUNT, NOT_AVAILABLE.to_string());
    std::array::from_fn(|i| std::mem::take(&mut values[i]))
}

/// Missing elements become "N/A", and so do present elements with blank text.
/// A blank field is stored as "N/A" rather than as an empty string.
fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pads_missing_tiers() {
        let record = CardRecord::new(
            "Charizard #4",
            strings(&["$350.00", "$900.00"]),
            strings(&["12"]),
            "https://example.com/game/base-set/charizard-4",
        );

        assert_eq!(record.prices[0], "$350.00");
        assert_eq!(record.prices[1], "$900.00");
        assert!(record.prices[2..].iter().all(|p| p == NOT_AVAILABLE));
        assert_eq!(record.volumes[0], "12");
        assert!(record.volumes[1..].iter().all(|v| v == NOT_AVAILABLE));
    }

    #[test]
    fn test_extra_tiers_are_dropped() {
        let prices = strings(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        let record = CardRecord::new("x", prices, vec![], "u");
        assert_eq!(record.prices[5], "6");
        assert_eq!(record.prices.len(), TIER_COUNT);
    }

    #[test]
    fn test_optional_fields_default() {
        let record = CardRecord::new("x", vec![], vec![], "u")
            .with_rarity(None)
            .with_model_number(Some("  ".to_string()))
            .with_image_url(Some("https://img/1600.jpg".to_string()));

        assert_eq!(record.rarity, NOT_AVAILABLE);
        assert_eq!(record.model_number, NOT_AVAILABLE);
        assert_eq!(record.image_url, "https://img/1600.jpg");
    }

    #[test]
    fn test_row_layout_matches_columns() {
        let record = CardRecord::new(
            "Dark Magician",
            strings(&["$1", "$2", "$3", "$4", "$5", "$6"]),
            strings(&["a", "b", "c", "d", "e", "f"]),
            "https://example.com/dm",
        )
        .with_rarity(Some("Ultra Rare".to_string()));

        let row = record.to_row();
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row[0], "Dark Magician");
        assert_eq!(row[3], "$2"); // Grade 7
        assert_eq!(row[4], "b"); // Grade 7 Volume
        assert_eq!(row[11], "$6"); // PSA 10
        assert_eq!(row[13], "Ultra Rare");
        assert_eq!(row[16], "https://example.com/dm");
        assert_eq!(COLUMNS[16], KEY_COLUMN);

        assert_eq!(CardRecord::from_row(&row), Some(record));
    }

    #[test]
    fn test_from_row_rejects_wrong_width() {
        assert!(CardRecord::from_row(&["only", "three", "cells"]).is_none());
    }

    #[test]
    fn test_tier_labels_line_up_with_columns() {
        for (tier, label) in TIER_LABELS.iter().enumerate() {
            let price_column = COLUMNS[1 + tier * 2];
            assert!(price_column.starts_with(label), "{price_column} vs {label}");
        }
    }
}
