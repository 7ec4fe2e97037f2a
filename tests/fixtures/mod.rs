// Test fixtures - reusable test data
// Provides consistent rate data across all test files

use chrono::NaiveDate;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Returns a day in March 2025 (Mar 3 is a Monday)
    pub fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }
}

/// Sample supplier payloads
pub mod payloads {
    use serde_json::{json, Value};

    /// Two units, overlapping periods and one malformed record
    pub fn harbour_lofts() -> Value {
        json!({
            "units": [
                {"id": 101, "name": "Loft A"},
                {"id": 102, "displayName": "Loft B"}
            ],
            "periods": [
                {
                    "accommodationId": 101,
                    "rateTypeId": 1,
                    "startDate": "2025-03-01",
                    "endDate": "2025-03-10",
                    "occupancyPrices": [
                        {"occupantCount": 1, "price": 90},
                        {"occupantCount": 2, "price": "110,50"}
                    ],
                    "minimumStay": 2,
                    "rateTypeName": "Standard"
                },
                {
                    "accommodationId": "101",
                    "rateTypeId": 1,
                    "startDate": "2025-03-05",
                    "endDate": "2025-03-06",
                    "flatPrice": 150,
                    "minimumStay": "4",
                    "hasPromotion": true
                },
                {
                    "accommodationId": 102,
                    "rateTypeId": 3,
                    "startDate": "2025-03-04T00:00:00",
                    "endDate": "2025-03-08",
                    "price": 80,
                    "localizedLabel": "Non-refundable"
                },
                {
                    "accommodationId": 102,
                    "startDate": "not a date",
                    "endDate": "2025-03-08"
                }
            ],
            "linkedRateTypes": [
                {"id": 3, "order": 2},
                {"id": 1, "name": "Standard", "order": 1}
            ]
        })
    }
}
