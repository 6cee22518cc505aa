//! Medicines and their dosing schedule

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RecordId, TimeOfDay};
use crate::error::ValidationError;

/// Unit a medicine dosage is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedicineUnit {
    Pills,
    Millilitres,
    Units,
    Gramms,
    Other,
}

impl fmt::Display for MedicineUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MedicineUnit::Pills => "Pills",
            MedicineUnit::Millilitres => "Millilitres",
            MedicineUnit::Units => "Units",
            MedicineUnit::Gramms => "Gramms",
            MedicineUnit::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for MedicineUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pills" => Ok(MedicineUnit::Pills),
            "millilitres" | "ml" => Ok(MedicineUnit::Millilitres),
            "units" => Ok(MedicineUnit::Units),
            "gramms" | "g" => Ok(MedicineUnit::Gramms),
            "other" => Ok(MedicineUnit::Other),
            _ => Err(ValidationError::InvalidChoice {
                field: "unit",
                value: s.to_string(),
            }),
        }
    }
}

/// When a medicine is given: a time of day, repeated every N days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineFrequency {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    pub time: TimeOfDay,
    pub every_days: u32,
}

impl MedicineFrequency {
    pub fn new(time: TimeOfDay, every_days: u32) -> Self {
        Self {
            id: RecordId::new(),
            time,
            every_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<MedicineUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default)]
    pub frequencies: Vec<MedicineFrequency>,
}

impl Medicine {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_json_shape() {
        let mut medicine = Medicine::new("Aspirin", "1/2 pill");
        medicine
            .frequencies
            .push(MedicineFrequency::new(TimeOfDay::new(8, 0).unwrap(), 2));

        let value = serde_json::to_value(&medicine).unwrap();
        assert_eq!(value["name"], "Aspirin");
        assert_eq!(value["frequencies"][0]["time"], "08:00");
        assert_eq!(value["frequencies"][0]["everyDays"], 2);
        assert!(value["uuid"].is_string());
        assert!(value.get("unit").is_none());
    }

    #[test]
    fn test_medicine_unit_parse() {
        assert_eq!("ml".parse::<MedicineUnit>(), Ok(MedicineUnit::Millilitres));
        assert_eq!("Pills".parse::<MedicineUnit>(), Ok(MedicineUnit::Pills));
        assert!("spoons".parse::<MedicineUnit>().is_err());
    }
}
