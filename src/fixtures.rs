//! Synthetic Pri-2012 / MP-2021 style tables shared by the unit tests

use crate::projection::round_half_up;
use crate::tables::{
    ages, BaseTable, BlendingTable, Category430, Gender, ImprovementScale, ImprovementTable,
    MortalityTables, ProjectionYears, PublishedTables, RawRates,
};
use std::collections::BTreeMap;

pub const BASE_YEAR: u32 = 2012;
pub const LAST_PUBLISHED_YEAR: u32 = 2024;

fn status_factor(category: Category430) -> f64 {
    match category {
        Category430::MaleEe => 1.0,
        Category430::MaleHa => 1.3,
        Category430::FemaleEe => 0.8,
        Category430::FemaleHa => 1.1,
    }
}

/// Gompertz-shaped base rate, capped at 0.4 like the tail of the source tables
pub fn base_rate(category: Category430, age: u8) -> f64 {
    let raw = 0.0002 * (0.085 * (age as f64 - 15.0)).exp() * status_factor(category);
    round_half_up(raw.min(0.4), 6)
}

pub fn base_table() -> BaseTable {
    let raw: BTreeMap<Category430, RawRates> = Category430::ALL
        .into_iter()
        .map(|c| (c, (0..=120).map(|age| (age, base_rate(c, age.max(15)))).collect()))
        .collect();
    BaseTable::new("Pri-2012", BASE_YEAR, &raw).expect("fixture base table")
}

/// Stored grid is ages 20..=115 and years 2012..=2021, so both clamps get exercised
pub fn improvement_table(gender: Gender) -> ImprovementTable {
    let offset = match gender {
        Gender::Male => 0.001,
        Gender::Female => 0.0,
    };
    let raw: BTreeMap<u32, RawRates> = (BASE_YEAR..=2021)
        .map(|year| {
            let column = (20..=115u8)
                .map(|age| {
                    let rate = 0.015 - 0.0001 * (age - 20) as f64 + 0.0002 * (year - BASE_YEAR) as f64 + offset;
                    (age, rate)
                })
                .collect();
            (year, column)
        })
        .collect();
    ImprovementTable::new(format!("MP-2021 Adj {}", gender), raw).expect("fixture improvement table")
}

pub fn improvement_scale() -> ImprovementScale {
    ImprovementScale::new(improvement_table(Gender::Male), improvement_table(Gender::Female))
}

/// Employees project further than annuitants; some ages carry half years
pub fn projection_years() -> ProjectionYears {
    let raw: BTreeMap<Category430, RawRates> = Category430::ALL
        .into_iter()
        .map(|c| {
            let column = ages()
                .map(|age| {
                    let years = match c {
                        Category430::MaleEe | Category430::FemaleEe if age < 60 => 15.0,
                        Category430::MaleEe | Category430::FemaleEe => 7.5,
                        _ => 7.0,
                    };
                    (age, years)
                })
                .collect();
            (c, column)
        })
        .collect();
    ProjectionYears::new("Projection Years", &raw).expect("fixture projection years")
}

/// HA weight grades from 0 at 50 to 1 at 70 (male) or 75 (female)
pub fn blending_weight(gender: Gender, age: u8) -> f64 {
    let span = match gender {
        Gender::Male => 20.0,
        Gender::Female => 25.0,
    };
    ((age as f64 - 50.0) / span).clamp(0.0, 1.0)
}

pub fn blending_table() -> BlendingTable {
    let raw: BTreeMap<Gender, RawRates> = Gender::ALL
        .into_iter()
        .map(|g| (g, ages().map(|age| (age, blending_weight(g, age))).collect()))
        .collect();
    BlendingTable::new("Blending", &raw).expect("fixture blending table")
}

pub fn published_430_rate(category: Category430, year: u32, age: u8) -> f64 {
    round_half_up(base_rate(category, age) * 0.99f64.powi(year as i32 - BASE_YEAR as i32), 6)
}

pub fn published_static_rate(gender: Gender, year: u32, age: u8) -> f64 {
    let w = blending_weight(gender, age);
    let ha = published_430_rate(gender.annuitant(), year, age);
    let ee = published_430_rate(gender.employee(), year, age);
    round_half_up(w * ha + (1.0 - w) * ee, 5)
}

pub fn published_417e_rate(year: u32, age: u8) -> f64 {
    round_half_up(
        (published_static_rate(Gender::Male, year, age) + published_static_rate(Gender::Female, year, age)) / 2.0,
        5,
    )
}

pub fn published_tables() -> PublishedTables {
    let years = 2009..=LAST_PUBLISHED_YEAR;

    let irs_430: BTreeMap<u32, BTreeMap<Category430, RawRates>> = years
        .clone()
        .map(|y| {
            let columns = Category430::ALL
                .into_iter()
                .map(|c| (c, ages().map(|a| (a, published_430_rate(c, y, a))).collect()))
                .collect();
            (y, columns)
        })
        .collect();
    let irs_430_static: BTreeMap<u32, BTreeMap<Gender, RawRates>> = years
        .clone()
        .map(|y| {
            let columns = Gender::ALL
                .into_iter()
                .map(|g| (g, ages().map(|a| (a, published_static_rate(g, y, a))).collect()))
                .collect();
            (y, columns)
        })
        .collect();
    let irs_417e: BTreeMap<u32, RawRates> = years
        .map(|y| (y, ages().map(|a| (a, published_417e_rate(y, a))).collect()))
        .collect();

    PublishedTables::new(&irs_430, &irs_430_static, &irs_417e).expect("fixture published tables")
}

pub fn mortality_tables() -> MortalityTables {
    MortalityTables {
        base: base_table(),
        improvement: improvement_scale(),
        projection_years: projection_years(),
        blending: blending_table(),
        published: published_tables(),
    }
}
