// Settings module
// Grid behaviour and supplier endpoints, persisted as TOML

use serde::{Deserialize, Serialize};

/// A supplier whose accommodations and rate periods are loaded into the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub id: i64,
    pub name: String,
    /// HTTP(S) endpoint returning the supplier payload as JSON.
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Pointer displacement (in points) after which a press becomes a drag.
    pub drag_threshold: f32,
    /// How long a click following a drag release is ignored.
    pub click_suppression_ms: u64,
    pub max_labels_per_day: usize,
    /// Occupant count whose price is shown when a period lists several.
    pub preferred_occupancy: u32,
    /// Days shown when no explicit window is requested.
    pub default_window_days: u32,
    pub log_level: String,
    pub suppliers: Vec<SupplierConfig>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            click_suppression_ms: 100,
            max_labels_per_day: 2,
            preferred_occupancy: 2,
            default_window_days: 28,
            log_level: "info".to_string(),
            suppliers: Vec::new(),
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err("Drag threshold must be a non-negative number".to_string());
        }

        if self.click_suppression_ms > 1_000 {
            return Err("Click suppression must be at most 1000 ms".to_string());
        }

        if self.max_labels_per_day == 0 {
            return Err("At least one label per day must be kept".to_string());
        }

        if self.preferred_occupancy == 0 {
            return Err("Preferred occupancy must be at least 1".to_string());
        }

        if self.default_window_days == 0 || self.default_window_days > 366 {
            return Err("Default window must be between 1 and 366 days".to_string());
        }

        if self.log_level.trim().parse::<log::LevelFilter>().is_err() {
            return Err(format!("Unknown log level '{}'", self.log_level));
        }

        let mut seen = std::collections::HashSet::new();
        for supplier in &self.suppliers {
            if !seen.insert(supplier.id) {
                return Err(format!("Duplicate supplier id {}", supplier.id));
            }
            if supplier.name.trim().is_empty() {
                return Err(format!("Supplier {} has an empty name", supplier.id));
            }
            if !(supplier.endpoint.starts_with("https://") || supplier.endpoint.starts_with("http://")) {
                return Err(format!(
                    "Supplier {} endpoint must be an http(s) URL",
                    supplier.id
                ));
            }
        }

        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GridSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.drag_threshold, 5.0);
        assert_eq!(settings.click_suppression_ms, 100);
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_rejects_duplicate_suppliers() {
        let supplier = SupplierConfig {
            id: 1,
            name: "North".to_string(),
            endpoint: "https://example.test/rates".to_string(),
        };
        let settings = GridSettings {
            suppliers: vec![supplier.clone(), supplier],
            ..GridSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err(), "Duplicate supplier id 1");
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let settings = GridSettings {
            log_level: "chatty".to_string(),
            ..GridSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: GridSettings = toml::from_str("drag_threshold = 8.0").unwrap();
        assert_eq!(settings.drag_threshold, 8.0);
        assert_eq!(settings.max_labels_per_day, 2);
    }
}
