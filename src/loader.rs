//! CSV loaders for the base, improvement, method and published tables
//!
//! Every table is laid out as an `Age` column followed by one column per
//! category (or per year). Each loader has a path variant and a reader variant
//! so tables can come from files, buffers or network streams.

use crate::error::{MortalityError, MortalityResult};
use crate::tables::{
    BaseTable, BlendingTable, Category430, Gender, ImprovementScale, ImprovementTable, MortalityTables,
    ProjectionYears, PublishedTables, RawRates,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Default data directory
pub const DEFAULT_DATA_PATH: &str = "data";

pub const BASE_TABLE_FILE: &str = "Base Tables/Pri-2012.csv";
pub const MALE_IMPROVEMENT_FILE: &str = "Improvement Tables/MP2021_Adj_Males.csv";
pub const FEMALE_IMPROVEMENT_FILE: &str = "Improvement Tables/MP2021_Adj_Females.csv";
pub const PROJECTION_YEARS_FILE: &str = "Projection Methods/Projection Years.csv";
pub const BLENDING_FILE: &str = "Projection Methods/Blending.csv";
pub const PUBLISHED_430_DIR: &str = "Published Tables/430_Published";
pub const PUBLISHED_417E_FILE: &str = "Published Tables/417e Published.csv";

/// Published 430 rates keyed by year, then category
pub type Published430 = BTreeMap<u32, BTreeMap<Category430, RawRates>>;

/// Published 430 static rates keyed by year, then sex
pub type PublishedStatic = BTreeMap<u32, BTreeMap<Gender, RawRates>>;

fn read_records<R: Read>(source: &str, reader: R) -> MortalityResult<Vec<StringRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(MortalityError::parse(source, "file is empty"));
    }
    Ok(records)
}

fn parse_field<T: std::str::FromStr>(source: &str, what: &str, field: &str) -> MortalityResult<T> {
    field
        .trim()
        .parse()
        .map_err(|_| MortalityError::parse(source, format!("invalid {} '{}'", what, field)))
}

/// Split `Age,<col>,<col>...` rows into one raw column per header name
///
/// Blank cells are left out of the column; coverage is checked when the
/// table is built.
fn age_columns(source: &str, header: &StringRecord, rows: &[StringRecord]) -> MortalityResult<Vec<(String, RawRates)>> {
    match header.get(0) {
        Some(first) if first.eq_ignore_ascii_case("age") => {}
        other => {
            return Err(MortalityError::parse(
                source,
                format!("expected 'Age' as first header, found {:?}", other.unwrap_or("")),
            ))
        }
    }

    let mut columns: Vec<(String, RawRates)> = header
        .iter()
        .skip(1)
        .map(|name| (name.to_string(), RawRates::new()))
        .collect();

    for row in rows {
        let age: u8 = parse_field(source, "age", row.get(0).unwrap_or(""))?;
        for (i, (name, column)) in columns.iter_mut().enumerate() {
            match row.get(i + 1) {
                Some(cell) if !cell.is_empty() => {
                    let rate = parse_field(source, &format!("{} rate at age {}", name, age), cell)?;
                    column.insert(age, rate);
                }
                _ => {}
            }
        }
    }

    Ok(columns.into_iter().filter(|(name, _)| !name.is_empty()).collect())
}

/// Columns whose header is a year
fn year_columns(source: &str, header: &StringRecord, rows: &[StringRecord]) -> MortalityResult<BTreeMap<u32, RawRates>> {
    age_columns(source, header, rows)?
        .into_iter()
        .map(|(name, column)| parse_field(source, "year header", &name).map(|year| (year, column)))
        .collect()
}

/// Keep the columns that name a category, ignoring any others
fn category_columns<K: Ord>(
    source: &str,
    columns: Vec<(String, RawRates)>,
    lookup: impl Fn(&str) -> Option<K>,
) -> BTreeMap<K, RawRates> {
    let mut by_category = BTreeMap::new();
    for (name, column) in columns {
        match lookup(&name) {
            Some(key) => {
                by_category.insert(key, column);
            }
            None => debug!("{}: ignoring column '{}'", source, name),
        }
    }
    by_category
}

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

/// Load a base table whose first row is a title ending in the base year (e.g. `Pri-2012`)
pub fn load_base_table_from_reader<R: Read>(source: &str, reader: R) -> MortalityResult<BaseTable> {
    let records = read_records(source, reader)?;
    let title = records[0].get(0).unwrap_or("").to_string();
    let year_text = title.rsplit('-').next().unwrap_or("");
    let base_year: u32 = parse_field(source, "base year in title", year_text)?;

    let header = records
        .get(1)
        .ok_or_else(|| MortalityError::parse(source, "missing header row"))?;
    let columns = age_columns(source, header, &records[2..])?;
    let raw = category_columns(source, columns, Category430::from_label);

    debug!("{}: base table '{}' anchored at {}", source, title, base_year);
    BaseTable::new(title, base_year, &raw)
}

pub fn load_base_table(path: &Path) -> MortalityResult<BaseTable> {
    load_base_table_from_reader(&source_name(path), File::open(path)?)
}

/// Load an improvement scale laid out as `Age,<year>,<year>...`
pub fn load_improvement_table_from_reader<R: Read>(source: &str, reader: R) -> MortalityResult<ImprovementTable> {
    let records = read_records(source, reader)?;
    let by_year = year_columns(source, &records[0], &records[1..])?;
    ImprovementTable::new(source, by_year)
}

pub fn load_improvement_table(path: &Path) -> MortalityResult<ImprovementTable> {
    load_improvement_table_from_reader(&source_name(path), File::open(path)?)
}

/// Load projection years laid out as `Age,Male EE,Male HA,Female EE,Female HA`
pub fn load_projection_years_from_reader<R: Read>(source: &str, reader: R) -> MortalityResult<ProjectionYears> {
    let records = read_records(source, reader)?;
    let columns = age_columns(source, &records[0], &records[1..])?;
    ProjectionYears::new(source, &category_columns(source, columns, Category430::from_label))
}

pub fn load_projection_years(path: &Path) -> MortalityResult<ProjectionYears> {
    load_projection_years_from_reader(&source_name(path), File::open(path)?)
}

/// Load HA blending weights laid out as `Age,Male,Female`
pub fn load_blending_table_from_reader<R: Read>(source: &str, reader: R) -> MortalityResult<BlendingTable> {
    let records = read_records(source, reader)?;
    let columns = age_columns(source, &records[0], &records[1..])?;
    BlendingTable::new(source, &category_columns(source, columns, Gender::from_label))
}

pub fn load_blending_table(path: &Path) -> MortalityResult<BlendingTable> {
    load_blending_table_from_reader(&source_name(path), File::open(path)?)
}

/// Load one published 430 file: first row starts with the year, then
/// `Age,Male EE,Male HA,Female EE,Female HA,Male,Female`
pub fn load_published_430_year_from_reader<R: Read>(
    source: &str,
    reader: R,
) -> MortalityResult<(u32, BTreeMap<Category430, RawRates>, BTreeMap<Gender, RawRates>)> {
    let records = read_records(source, reader)?;
    let year: u32 = parse_field(source, "year", records[0].get(0).unwrap_or(""))?;
    let header = records
        .get(1)
        .ok_or_else(|| MortalityError::parse(source, "missing header row"))?;
    let columns = age_columns(source, header, &records[2..])?;

    let irs_430 = category_columns(source, columns.clone(), Category430::from_label);
    let irs_static = category_columns(source, columns, Gender::from_label);
    Ok((year, irs_430, irs_static))
}

/// Load every published 430 file in a directory; only `.csv` files are allowed
pub fn load_published_430_dir(dir: &Path) -> MortalityResult<(Published430, PublishedStatic)> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(MortalityError::parse(
                source_name(&path),
                "invalid file type; only .csv files are supported",
            ));
        }
        paths.push(path);
    }
    paths.sort();

    let mut irs_430 = Published430::new();
    let mut irs_static = PublishedStatic::new();
    for path in &paths {
        let source = source_name(path);
        let (year, rates_430, rates_static) = load_published_430_year_from_reader(&source, File::open(path)?)?;
        if irs_430.insert(year, rates_430).is_some() {
            return Err(MortalityError::parse(source, format!("year {} published twice", year)));
        }
        irs_static.insert(year, rates_static);
    }

    info!("Loaded {} published 430 years from {}", irs_430.len(), dir.display());
    Ok((irs_430, irs_static))
}

/// Load published 417e rates laid out as `Age,<year>,<year>...`
pub fn load_published_417e_from_reader<R: Read>(source: &str, reader: R) -> MortalityResult<BTreeMap<u32, RawRates>> {
    let records = read_records(source, reader)?;
    year_columns(source, &records[0], &records[1..])
}

pub fn load_published_417e(path: &Path) -> MortalityResult<BTreeMap<u32, RawRates>> {
    load_published_417e_from_reader(&source_name(path), File::open(path)?)
}

impl MortalityTables {
    /// Load all tables from the default data directory
    pub fn load_default() -> MortalityResult<Self> {
        Self::load_from(Path::new(DEFAULT_DATA_PATH))
    }

    /// Load all tables from a data directory with the standard layout
    pub fn load_from(path: &Path) -> MortalityResult<Self> {
        let base = load_base_table(&path.join(BASE_TABLE_FILE))?;
        let improvement = ImprovementScale::new(
            load_improvement_table(&path.join(MALE_IMPROVEMENT_FILE))?,
            load_improvement_table(&path.join(FEMALE_IMPROVEMENT_FILE))?,
        );
        let projection_years = load_projection_years(&path.join(PROJECTION_YEARS_FILE))?;
        let blending = load_blending_table(&path.join(BLENDING_FILE))?;

        let (irs_430, irs_static) = load_published_430_dir(&path.join(PUBLISHED_430_DIR))?;
        let irs_417e = load_published_417e(&path.join(PUBLISHED_417E_FILE))?;
        let published = PublishedTables::new(&irs_430, &irs_static, &irs_417e)?;

        info!("Loaded mortality tables from {}", path.display());
        Ok(Self {
            base,
            improvement,
            projection_years,
            blending,
            published,
        })
    }
}
