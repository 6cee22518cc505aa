//! Food and feeding times

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RecordId, TimeOfDay};
use crate::error::ValidationError;

/// Unit a food portion is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodUnit {
    Gramms,
    Bags,
    Cans,
    Other,
}

impl fmt::Display for FoodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FoodUnit::Gramms => "Gramms",
            FoodUnit::Bags => "Bags",
            FoodUnit::Cans => "Cans",
            FoodUnit::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for FoodUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gramms" | "g" => Ok(FoodUnit::Gramms),
            "bags" => Ok(FoodUnit::Bags),
            "cans" => Ok(FoodUnit::Cans),
            "other" => Ok(FoodUnit::Other),
            _ => Err(ValidationError::InvalidChoice {
                field: "unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Daily feeding time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodFrequency {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    pub time: TimeOfDay,
}

impl FoodFrequency {
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            id: RecordId::new(),
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<FoodUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default)]
    pub frequencies: Vec<FoodFrequency>,
}

impl Food {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            dosage: dosage.into(),
            unit: None,
            stock: None,
            frequencies: Vec::new(),
        }
    }
}
