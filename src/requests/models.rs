//! Tank request data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Intended use of the requested tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Purpose {
    /// Farm irrigation
    #[default]
    Irrigation,
    /// Household drinking water
    DrinkingWater,
    /// Industrial use
    IndustrialUse,
    /// Poultry farm supply
    PoultryFarm,
}

impl Purpose {
    const ALL: [Purpose; 4] = [
        Purpose::Irrigation,
        Purpose::DrinkingWater,
        Purpose::IndustrialUse,
        Purpose::PoultryFarm,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Irrigation => "Irrigation",
            Purpose::DrinkingWater => "Drinking Water",
            Purpose::IndustrialUse => "Industrial Use",
            Purpose::PoultryFarm => "Poultry Farm",
        }
    }

    /// Purpose whose label is `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Next purpose, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous purpose, wrapping around.
    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Editable fields of the request form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Location,
    Capacity,
    Purpose,
    Description,
}

impl FormField {
    /// Next field in tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            FormField::Location => FormField::Capacity,
            FormField::Capacity => FormField::Purpose,
            FormField::Purpose => FormField::Description,
            FormField::Description => FormField::Location,
        }
    }

    /// Previous field in tab order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            FormField::Location => FormField::Description,
            FormField::Capacity => FormField::Location,
            FormField::Purpose => FormField::Capacity,
            FormField::Description => FormField::Purpose,
        }
    }

    /// Field label shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Location => "Location",
            FormField::Capacity => "Capacity (Liters)",
            FormField::Purpose => "Purpose",
            FormField::Description => "Description",
        }
    }
}

/// A validated request for a new monitoring tank.
///
/// This is also the JSON body sent to a real request endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankRequest {
    /// Where the tank should be installed
    pub location: String,
    /// Requested capacity in liters
    pub capacity_liters: u64,
    /// Intended use
    pub purpose: Purpose,
    /// Free-form notes
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_cycles() {
        let mut purpose = Purpose::default();
        assert_eq!(purpose, Purpose::Irrigation);
        for _ in 0..4 {
            purpose = purpose.next();
        }
        assert_eq!(purpose, Purpose::Irrigation);
        assert_eq!(Purpose::Irrigation.prev(), Purpose::PoultryFarm);
        assert_eq!(Purpose::PoultryFarm.next(), Purpose::Irrigation);
    }

    #[test]
    fn test_field_tab_order_round_trip() {
        let field = FormField::Location;
        assert_eq!(field.next().next().next().next(), FormField::Location);
        assert_eq!(field.prev(), FormField::Description);
    }

    #[test]
    fn test_request_json_body() {
        let request = TankRequest {
            location: "Tiruppur Sector G".to_string(),
            capacity_liters: 5000,
            purpose: Purpose::PoultryFarm,
            description: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["location"], "Tiruppur Sector G");
        assert_eq!(value["capacity_liters"], 5000);
        assert_eq!(value["purpose"], "PoultryFarm");
    }
}
