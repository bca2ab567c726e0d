//! Rate types and the categories each one is published for

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sex used for improvement scales and 430 static rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Column header used in the source CSV files
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label.trim())
    }

    /// Employee category for this sex
    pub fn employee(self) -> Category430 {
        match self {
            Gender::Male => Category430::MaleEe,
            Gender::Female => Category430::FemaleEe,
        }
    }

    /// Healthy annuitant category for this sex
    pub fn annuitant(self) -> Category430 {
        match self {
            Gender::Male => Category430::MaleHa,
            Gender::Female => Category430::FemaleHa,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// IRS 430 rate category: sex crossed with employee / healthy annuitant status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category430 {
    #[serde(rename = "Male EE")]
    MaleEe,
    #[serde(rename = "Male HA")]
    MaleHa,
    #[serde(rename = "Female EE")]
    FemaleEe,
    #[serde(rename = "Female HA")]
    FemaleHa,
}

impl Category430 {
    pub const ALL: [Category430; 4] = [
        Category430::MaleEe,
        Category430::MaleHa,
        Category430::FemaleEe,
        Category430::FemaleHa,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category430::MaleEe => "Male EE",
            Category430::MaleHa => "Male HA",
            Category430::FemaleEe => "Female EE",
            Category430::FemaleHa => "Female HA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }

    pub fn gender(self) -> Gender {
        match self {
            Category430::MaleEe | Category430::MaleHa => Gender::Male,
            Category430::FemaleEe | Category430::FemaleHa => Gender::Female,
        }
    }
}

impl fmt::Display for Category430 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three IRS rate types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateType {
    Irs430,
    Irs430Static,
    Irs417e,
}

impl RateType {
    pub const ALL: [RateType; 3] = [RateType::Irs430, RateType::Irs430Static, RateType::Irs417e];

    pub fn label(self) -> &'static str {
        match self {
            RateType::Irs430 => "430 Table",
            RateType::Irs430Static => "430 Static Table",
            RateType::Irs417e => "417e Table",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any category across the three rate types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Irs430(Category430),
    Irs430Static(Gender),
    Irs417e,
}

impl Category {
    pub fn rate_type(self) -> RateType {
        match self {
            Category::Irs430(_) => RateType::Irs430,
            Category::Irs430Static(_) => RateType::Irs430Static,
            Category::Irs417e => RateType::Irs417e,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Irs430(c) => c.label(),
            Category::Irs430Static(g) => g.label(),
            Category::Irs417e => "Unisex",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.rate_type(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip_through_csv_headers() {
        for category in Category430::ALL {
            assert_eq!(Category430::from_label(category.label()), Some(category));
        }
        assert_eq!(Gender::from_label(" Female "), Some(Gender::Female));
        assert_eq!(Category430::from_label("Male"), None);
    }

    #[test]
    fn test_category_sex_and_status() {
        assert_eq!(Category430::FemaleHa.gender(), Gender::Female);
        assert_eq!(Gender::Male.employee(), Category430::MaleEe);
        assert_eq!(Gender::Male.annuitant(), Category430::MaleHa);
        assert_eq!(Category::Irs430Static(Gender::Male).rate_type(), RateType::Irs430Static);
    }
}
