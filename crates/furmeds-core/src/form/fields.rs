//! Typed field edits for each form
//!
//! Raw user input is parsed into these commands at the boundary
//! (`parse_*` constructors), so a draft only ever receives valid values.

use super::Draft;
use crate::error::ValidationError;
use crate::types::{
    parse_count, Food, FoodFrequency, FoodUnit, Medicine, MedicineFrequency, MedicineUnit, Pet,
    RecordId, Species, TimeOfDay, VetAppointment,
};

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PetField {
    Name(String),
    Species(Species),
    Image(String),
}

impl PetField {
    pub fn parse_species(raw: &str) -> Result<Self, ValidationError> {
        raw.parse().map(PetField::Species)
    }

    pub(crate) fn apply_to(self, pet: &mut Pet) {
        match self {
            PetField::Name(name) => pet.name = name,
            PetField::Species(species) => pet.species = Some(species),
            PetField::Image(url) => pet.image = Some(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MedicineField {
    Name(String),
    Dosage(String),
    Unit(Option<MedicineUnit>),
    Stock(Option<u32>),
}

impl MedicineField {
    pub fn parse_unit(raw: &str) -> Result<Self, ValidationError> {
        raw.parse().map(|unit| MedicineField::Unit(Some(unit)))
    }

    pub fn parse_stock(raw: &str) -> Result<Self, ValidationError> {
        parse_count("stock", raw).map(|n| MedicineField::Stock(Some(n)))
    }
}

impl Draft for Medicine {
    type Field = MedicineField;

    fn blank() -> Self {
        Medicine::new("", "")
    }

    fn apply(&mut self, field: MedicineField) {
        match field {
            MedicineField::Name(name) => self.name = name,
            MedicineField::Dosage(dosage) => self.dosage = dosage,
            MedicineField::Unit(unit) => self.unit = unit,
            MedicineField::Stock(stock) => self.stock = stock,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MedicineFrequencyField {
    Time(TimeOfDay),
    EveryDays(u32),
}

impl MedicineFrequencyField {
    pub fn parse_time(raw: &str) -> Result<Self, ValidationError> {
        TimeOfDay::parse(raw).map(MedicineFrequencyField::Time)
    }

    pub fn parse_every_days(raw: &str) -> Result<Self, ValidationError> {
        parse_count("everyDays", raw).map(MedicineFrequencyField::EveryDays)
    }
}

impl Draft for MedicineFrequency {
    type Field = MedicineFrequencyField;

    fn blank() -> Self {
        MedicineFrequency {
            id: RecordId::new(),
            time: TimeOfDay::default(),
            every_days: 1,
        }
    }

    fn apply(&mut self, field: MedicineFrequencyField) {
        match field {
            MedicineFrequencyField::Time(time) => self.time = time,
            MedicineFrequencyField::EveryDays(days) => self.every_days = days,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.every_days == 0 {
            return Err(ValidationError::InvalidNumber {
                field: "everyDays",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoodField {
    Name(String),
    Dosage(String),
    Unit(Option<FoodUnit>),
    Stock(Option<u32>),
}

impl FoodField {
    pub fn parse_unit(raw: &str) -> Result<Self, ValidationError> {
        raw.parse().map(|unit| FoodField::Unit(Some(unit)))
    }

    pub fn parse_stock(raw: &str) -> Result<Self, ValidationError> {
        parse_count("stock", raw).map(|n| FoodField::Stock(Some(n)))
    }
}

impl Draft for Food {
    type Field = FoodField;

    fn blank() -> Self {
        Food::new("", "")
    }

    fn apply(&mut self, field: FoodField) {
        match field {
            FoodField::Name(name) => self.name = name,
            FoodField::Dosage(dosage) => self.dosage = dosage,
            FoodField::Unit(unit) => self.unit = unit,
            FoodField::Stock(stock) => self.stock = stock,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoodFrequencyField {
    Time(TimeOfDay),
}

impl FoodFrequencyField {
    pub fn parse_time(raw: &str) -> Result<Self, ValidationError> {
        TimeOfDay::parse(raw).map(FoodFrequencyField::Time)
    }
}

impl Draft for FoodFrequency {
    type Field = FoodFrequencyField;

    fn blank() -> Self {
        FoodFrequency::new(TimeOfDay::default())
    }

    fn apply(&mut self, field: FoodFrequencyField) {
        match field {
            FoodFrequencyField::Time(time) => self.time = time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VetAppointmentField {
    Name(String),
}

impl Draft for VetAppointment {
    type Field = VetAppointmentField;

    fn blank() -> Self {
        VetAppointment::new("")
    }

    fn apply(&mut self, field: VetAppointmentField) {
        match field {
            VetAppointmentField::Name(name) => self.name = name,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}
