// Accommodation model
// Bookable units shown as grid rows

use serde::{Deserialize, Serialize};

/// A bookable unit whose prices and stay rules appear as one grid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationUnit {
    pub id: i64,
    #[serde(alias = "displayName", alias = "name")]
    pub display_name: String,
}

impl AccommodationUnit {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Label shown in the row header. Falls back to the id when the
    /// supplier sent an empty name.
    pub fn row_label(&self) -> String {
        let name = self.display_name.trim();
        if name.is_empty() {
            format!("Unit {}", self.id)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_label_falls_back_to_id() {
        assert_eq!(AccommodationUnit::new(7, "Sea View").row_label(), "Sea View");
        assert_eq!(AccommodationUnit::new(7, "  ").row_label(), "Unit 7");
    }

    #[test]
    fn test_deserializes_camel_case_name() {
        let unit: AccommodationUnit =
            serde_json::from_str(r#"{"id": 3, "displayName": "Loft"}"#).unwrap();
        assert_eq!(unit, AccommodationUnit::new(3, "Loft"));
    }
}
