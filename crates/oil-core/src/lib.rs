#![deny(warnings)]

//! Core domain models and invariants for the essential-oil pharmacopoeia.
//!
//! This crate defines the serializable types shared by the simulator, the
//! exporters and the reporting layer, with validation helpers that guard the
//! few structural invariants the pipeline relies on.

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

pub use catalog::{
    choose_from_menu, menu_entry, profile_for, resolve_profile, Oil, DEFAULT_OIL, MENU,
};

/// Static description of one essential oil.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OilProfile {
    /// World production baseline in tonnes per year.
    pub production_base: f64,
    /// Average price baseline in EUR per kg.
    pub price_base: f64,
    /// Category tag, e.g. "relaxante".
    pub category: String,
    /// Descriptive therapeutic properties, in presentation order.
    pub properties: Vec<String>,
    /// Main producing regions.
    pub regions: Vec<String>,
    /// Extraction yield as a fraction of plant mass, in (0, 1].
    pub extraction_yield: f64,
}

impl OilProfile {
    /// Whether `property` is listed among the descriptive properties.
    pub fn has_property(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }
}

/// One generated annual series.
///
/// Variants are listed in canonical column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    Production,
    Price,
    Demand,
    CultivatedArea,
    ActiveCompounds,
    Purity,
    OrganicShare,
    TherapeuticEfficacy,
    Studies,
    TherapeuticDemand,
    AromatherapyUse,
    CosmeticUse,
    PharmaceuticalUse,
    FoodUse,
    MarketValue,
    MarketGrowth,
    Exports,
    EnvironmentalImpact,
    Sustainability,
    ResourceScarcity,
}

/// Header of the year column in exported tables.
pub const YEAR_COLUMN: &str = "Annee";

impl Metric {
    /// All metrics in canonical column order.
    pub const ALL: [Metric; 20] = [
        Metric::Production,
        Metric::Price,
        Metric::Demand,
        Metric::CultivatedArea,
        Metric::ActiveCompounds,
        Metric::Purity,
        Metric::OrganicShare,
        Metric::TherapeuticEfficacy,
        Metric::Studies,
        Metric::TherapeuticDemand,
        Metric::AromatherapyUse,
        Metric::CosmeticUse,
        Metric::PharmaceuticalUse,
        Metric::FoodUse,
        Metric::MarketValue,
        Metric::MarketGrowth,
        Metric::Exports,
        Metric::EnvironmentalImpact,
        Metric::Sustainability,
        Metric::ResourceScarcity,
    ];

    /// Column header used in the flat export.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Production => "Production_Mondiale",
            Metric::Price => "Prix_Moyen",
            Metric::Demand => "Demande_Mondiale",
            Metric::CultivatedArea => "Surface_Cultivee",
            Metric::ActiveCompounds => "Teneur_Principes_Actifs",
            Metric::Purity => "Pureté_Chimique",
            Metric::OrganicShare => "Qualite_Bio",
            Metric::TherapeuticEfficacy => "Efficacite_Therapeutique",
            Metric::Studies => "Etudes_Scientifiques",
            Metric::TherapeuticDemand => "Demande_Therapeutique",
            Metric::AromatherapyUse => "Usage_Aromatherapie",
            Metric::CosmeticUse => "Usage_Cosmetique",
            Metric::PharmaceuticalUse => "Usage_Pharmaceutique",
            Metric::FoodUse => "Usage_Alimentaire",
            Metric::MarketValue => "Valeur_Marche",
            Metric::MarketGrowth => "Croissance_Marche",
            Metric::Exports => "Exportations",
            Metric::EnvironmentalImpact => "Impact_Environnemental",
            Metric::Sustainability => "Durabilite_Production",
            Metric::ResourceScarcity => "Rareté_Ressource",
        }
    }

    /// Looks a metric up by its column header.
    pub fn from_column_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.column_name() == name)
    }
}

/// Full header row of an exported table: year first, then every metric.
pub fn table_header() -> Vec<&'static str> {
    std::iter::once(YEAR_COLUMN)
        .chain(Metric::ALL.iter().map(|m| m.column_name()))
        .collect()
}

/// `name` made safe as a file name component: path separators and control
/// characters become `_`, so outputs always land in the chosen directory.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// All metric values for one calendar year.
///
/// Field order matches [`Metric::ALL`]; serde names match the export headers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    #[serde(rename = "Annee")]
    pub year: i32,
    /// Tonnes.
    #[serde(rename = "Production_Mondiale")]
    pub production: f64,
    /// EUR per kg.
    #[serde(rename = "Prix_Moyen")]
    pub price: f64,
    /// Tonnes.
    #[serde(rename = "Demande_Mondiale")]
    pub demand: f64,
    /// Hectares.
    #[serde(rename = "Surface_Cultivee")]
    pub cultivated_area: f64,
    /// Percent.
    #[serde(rename = "Teneur_Principes_Actifs")]
    pub active_compounds: f64,
    /// Percent.
    #[serde(rename = "Pureté_Chimique")]
    pub purity: f64,
    /// Percent.
    #[serde(rename = "Qualite_Bio")]
    pub organic_share: f64,
    /// Score on a 0-100 scale.
    #[serde(rename = "Efficacite_Therapeutique")]
    pub therapeutic_efficacy: f64,
    /// Published studies.
    #[serde(rename = "Etudes_Scientifiques")]
    pub studies: f64,
    #[serde(rename = "Demande_Therapeutique")]
    pub therapeutic_demand: f64,
    #[serde(rename = "Usage_Aromatherapie")]
    pub aromatherapy_use: f64,
    #[serde(rename = "Usage_Cosmetique")]
    pub cosmetic_use: f64,
    #[serde(rename = "Usage_Pharmaceutique")]
    pub pharmaceutical_use: f64,
    #[serde(rename = "Usage_Alimentaire")]
    pub food_use: f64,
    /// Millions of EUR.
    #[serde(rename = "Valeur_Marche")]
    pub market_value: f64,
    /// Percent per year.
    #[serde(rename = "Croissance_Marche")]
    pub market_growth: f64,
    /// Tonnes.
    #[serde(rename = "Exportations")]
    pub exports: f64,
    /// Score on a 0-100 scale, lower is better.
    #[serde(rename = "Impact_Environnemental")]
    pub environmental_impact: f64,
    #[serde(rename = "Durabilite_Production")]
    pub sustainability: f64,
    /// Score on a 0-100 scale, lower is better.
    #[serde(rename = "Rareté_Ressource")]
    pub resource_scarcity: f64,
}

impl YearRow {
    /// A row for `year` with every metric at zero.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Production => self.production,
            Metric::Price => self.price,
            Metric::Demand => self.demand,
            Metric::CultivatedArea => self.cultivated_area,
            Metric::ActiveCompounds => self.active_compounds,
            Metric::Purity => self.purity,
            Metric::OrganicShare => self.organic_share,
            Metric::TherapeuticEfficacy => self.therapeutic_efficacy,
            Metric::Studies => self.studies,
            Metric::TherapeuticDemand => self.therapeutic_demand,
            Metric::AromatherapyUse => self.aromatherapy_use,
            Metric::CosmeticUse => self.cosmetic_use,
            Metric::PharmaceuticalUse => self.pharmaceutical_use,
            Metric::FoodUse => self.food_use,
            Metric::MarketValue => self.market_value,
            Metric::MarketGrowth => self.market_growth,
            Metric::Exports => self.exports,
            Metric::EnvironmentalImpact => self.environmental_impact,
            Metric::Sustainability => self.sustainability,
            Metric::ResourceScarcity => self.resource_scarcity,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Production => &mut self.production,
            Metric::Price => &mut self.price,
            Metric::Demand => &mut self.demand,
            Metric::CultivatedArea => &mut self.cultivated_area,
            Metric::ActiveCompounds => &mut self.active_compounds,
            Metric::Purity => &mut self.purity,
            Metric::OrganicShare => &mut self.organic_share,
            Metric::TherapeuticEfficacy => &mut self.therapeutic_efficacy,
            Metric::Studies => &mut self.studies,
            Metric::TherapeuticDemand => &mut self.therapeutic_demand,
            Metric::AromatherapyUse => &mut self.aromatherapy_use,
            Metric::CosmeticUse => &mut self.cosmetic_use,
            Metric::PharmaceuticalUse => &mut self.pharmaceutical_use,
            Metric::FoodUse => &mut self.food_use,
            Metric::MarketValue => &mut self.market_value,
            Metric::MarketGrowth => &mut self.market_growth,
            Metric::Exports => &mut self.exports,
            Metric::EnvironmentalImpact => &mut self.environmental_impact,
            Metric::Sustainability => &mut self.sustainability,
            Metric::ResourceScarcity => &mut self.resource_scarcity,
        };
        *slot = value;
    }

    /// Returns a copy of the row with `metric` replaced by `value`.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }
}

/// Year-ordered table of generated metrics.
///
/// Rows are strictly ascending by one year with no gaps; every constructor
/// enforces this.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesTable {
    rows: Vec<YearRow>,
}

impl SeriesTable {
    /// Builds a table, checking that years are contiguous and ascending.
    pub fn new(rows: Vec<YearRow>) -> Result<Self, ValidationError> {
        validate_rows(&rows)?;
        Ok(Self { rows })
    }

    /// Re-checks the year ordering invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rows(&self.rows)
    }

    pub fn rows(&self) -> &[YearRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&YearRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&YearRow> {
        self.rows.last()
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    /// Values of one metric, in year order.
    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(metric)).collect()
    }

    /// `(year, value)` pairs of one metric, convenient for plotting.
    pub fn points(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|r| (f64::from(r.year), r.get(metric)))
            .collect()
    }

    /// Applies a per-row transformation; the year of each row is preserved.
    pub fn map_rows<F>(self, f: F) -> Self
    where
        F: Fn(&YearRow) -> YearRow,
    {
        let rows = self
            .rows
            .iter()
            .map(|r| YearRow { year: r.year, ..f(r) })
            .collect();
        Self { rows }
    }

    pub fn into_rows(self) -> Vec<YearRow> {
        self.rows
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// First simulated calendar year (inclusive).
    pub start_year: i32,
    /// Last simulated calendar year (inclusive).
    pub end_year: i32,
    /// Seed for reproducible noise; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_year: 2000,
            end_year: 2025,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Number of simulated years.
    pub fn year_count(&self) -> usize {
        if self.end_year < self.start_year {
            0
        } else {
            (self.end_year - self.start_year) as usize + 1
        }
    }
}

/// Supported calendar range for simulations.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1970..=2100;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Year outside supported range [1970, 2100].
    #[error("year {0} is out of supported range [1970, 2100]")]
    YearOutOfRange(i32),
    /// Start year after end year.
    #[error("start year {start} is after end year {end}")]
    ReversedRange { start: i32, end: i32 },
    /// Table rows are not one-year steps in ascending order.
    #[error("expected year {expected} but found {found}")]
    NonContiguousYears { expected: i32, found: i32 },
    /// Numeric field must be finite and strictly positive.
    #[error("{0} must be finite and > 0")]
    NonPositive(&'static str),
    /// Yield must be within (0, 1].
    #[error("extraction yield must be within (0,1]")]
    InvalidYield,
    /// Descriptive list must not be empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Validate a simulation configuration.
pub fn validate_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    for year in [cfg.start_year, cfg.end_year] {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(ValidationError::YearOutOfRange(year));
        }
    }
    if cfg.start_year > cfg.end_year {
        return Err(ValidationError::ReversedRange {
            start: cfg.start_year,
            end: cfg.end_year,
        });
    }
    Ok(())
}

/// Validate an oil profile.
pub fn validate_profile(p: &OilProfile) -> Result<(), ValidationError> {
    if !(p.production_base.is_finite() && p.production_base > 0.0) {
        return Err(ValidationError::NonPositive("production baseline"));
    }
    if !(p.price_base.is_finite() && p.price_base > 0.0) {
        return Err(ValidationError::NonPositive("price baseline"));
    }
    if !(p.extraction_yield > 0.0 && p.extraction_yield <= 1.0) {
        return Err(ValidationError::InvalidYield);
    }
    if p.properties.is_empty() {
        return Err(ValidationError::Empty("properties"));
    }
    if p.regions.is_empty() {
        return Err(ValidationError::Empty("regions"));
    }
    Ok(())
}

fn validate_rows(rows: &[YearRow]) -> Result<(), ValidationError> {
    for pair in rows.windows(2) {
        let expected = pair[0].year + 1;
        if pair[1].year != expected {
            return Err(ValidationError::NonContiguousYears {
                expected,
                found: pair[1].year,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rows(years: &[i32]) -> Vec<YearRow> {
        years.iter().map(|&y| YearRow::empty(y)).collect()
    }

    #[test]
    fn metric_columns_are_unique_and_resolvable() {
        let header = table_header();
        assert_eq!(header.len(), 21);
        assert_eq!(header[0], "Annee");
        for m in Metric::ALL {
            assert_eq!(Metric::from_column_name(m.column_name()), Some(m));
        }
        let mut names: Vec<_> = header.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), header.len());
    }

    #[test]
    fn file_stem_strips_separators() {
        assert_eq!(file_stem("Arbre à Thé"), "Arbre à Thé");
        assert_eq!(file_stem("../../etc/x"), ".._.._etc_x");
        assert_eq!(file_stem("a\\b\nc"), "a_b_c");
        assert!(!file_stem("..").contains('/'));
    }

    #[test]
    fn get_and_set_address_the_same_field() {
        let mut row = YearRow::empty(2000);
        for (i, m) in Metric::ALL.into_iter().enumerate() {
            row.set(m, i as f64 + 0.5);
        }
        for (i, m) in Metric::ALL.into_iter().enumerate() {
            assert_eq!(row.get(m), i as f64 + 0.5);
        }
        let updated = row.clone().with(Metric::Purity, 99.0);
        assert_eq!(updated.purity, 99.0);
        assert_eq!(row.purity, 5.5);
    }

    #[test]
    fn table_rejects_gaps_and_duplicates() {
        assert!(SeriesTable::new(rows(&[2000, 2001, 2002])).is_ok());
        assert_eq!(
            SeriesTable::new(rows(&[2000, 2002])),
            Err(ValidationError::NonContiguousYears {
                expected: 2001,
                found: 2002
            })
        );
        assert!(SeriesTable::new(rows(&[2000, 2000])).is_err());
        assert!(SeriesTable::new(rows(&[2001, 2000])).is_err());
        assert!(SeriesTable::new(vec![]).unwrap().is_empty());
    }

    #[test]
    fn map_rows_keeps_years() {
        let table = SeriesTable::new(rows(&[2000, 2001])).unwrap();
        let mapped = table.map_rows(|r| YearRow::empty(1900).with(Metric::Price, f64::from(r.year)));
        assert_eq!(mapped.years(), vec![2000, 2001]);
        assert_eq!(mapped.column(Metric::Price), vec![2000.0, 2001.0]);
    }

    #[test]
    fn default_config_covers_26_years() {
        let cfg = SimConfig::default();
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.year_count(), 26);
        assert_eq!(cfg.years().count(), 26);
    }

    #[test]
    fn config_rejects_bad_ranges() {
        let cfg = SimConfig {
            start_year: 2010,
            end_year: 2005,
            seed: None,
        };
        assert_eq!(
            validate_config(&cfg),
            Err(ValidationError::ReversedRange {
                start: 2010,
                end: 2005
            })
        );
        let cfg = SimConfig {
            start_year: 1900,
            ..SimConfig::default()
        };
        assert_eq!(
            validate_config(&cfg),
            Err(ValidationError::YearOutOfRange(1900))
        );
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: SimConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(cfg.start_year, 2000);
        assert_eq!(cfg.end_year, 2025);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn row_serde_uses_export_headers() {
        let row = YearRow::empty(2003).with(Metric::Purity, 91.5);
        let s = serde_json::to_string(&row).unwrap();
        assert!(s.contains("\"Annee\":2003"));
        assert!(s.contains("\"Pureté_Chimique\":91.5"));
        let back: YearRow = serde_json::from_str(&s).unwrap();
        assert_eq!(back, row);
    }

    proptest! {
        #[test]
        fn contiguous_ranges_always_validate(start in 1970i32..2050, len in 0usize..60) {
            let years: Vec<i32> = (0..len as i32).map(|i| start + i).collect();
            let table = SeriesTable::new(rows(&years)).unwrap();
            prop_assert_eq!(table.len(), len);
            prop_assert!(table.validate().is_ok());
            prop_assert_eq!(table.years(), years);
        }

        #[test]
        fn positive_profiles_validate(prod in 0.1f64..10_000.0,
                                      price in 0.1f64..1_000.0,
                                      yld in 0.0001f64..1.0) {
            let p = OilProfile {
                production_base: prod,
                price_base: price,
                category: "test".into(),
                properties: vec!["calmante".into()],
                regions: vec!["France".into()],
                extraction_yield: yld,
            };
            prop_assert!(validate_profile(&p).is_ok());
        }
    }
}
