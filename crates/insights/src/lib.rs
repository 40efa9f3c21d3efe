#![deny(warnings)]

//! Insight summary: aggregate statistics and recommendations for a finished
//! table.

use oil_core::{Metric, Oil, OilProfile, SeriesTable};
use oil_sim::TrendBand;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum InsightError {
    #[error("cannot summarise an empty table")]
    EmptyTable,
}

/// Averages over the whole period.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneralStats {
    pub mean_production: f64,
    pub mean_price: f64,
    pub mean_market_value: f64,
    pub mean_studies: f64,
}

/// First-to-last year growth, in percent. `None` when the first value is 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GrowthStats {
    pub production_pct: Option<f64>,
    pub market_value_pct: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityStats {
    pub mean_active_compounds: f64,
    pub mean_purity: f64,
    pub mean_organic_share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TherapeuticStats {
    pub mean_efficacy: f64,
    pub total_studies: f64,
    pub last_efficacy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OilSpecifics {
    pub category: String,
    pub properties: Vec<String>,
    pub regions: Vec<String>,
    /// Extraction yield in percent.
    pub yield_pct: f64,
}

/// Structured insight report for one oil and one generated table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsightReport {
    pub oil: String,
    pub start_year: i32,
    pub end_year: i32,
    pub general: GeneralStats,
    pub growth: GrowthStats,
    pub quality: QualityStats,
    pub therapeutics: TherapeuticStats,
    pub specifics: OilSpecifics,
    pub milestones: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `(last / first - 1) * 100`, undefined when `first` is zero.
pub fn growth_pct(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    let pct = (last / first - 1.0) * 100.0;
    pct.is_finite().then_some(pct)
}

/// Advice bullets: property-specific ones first, then the general ones.
pub fn recommendations(profile: &OilProfile) -> Vec<String> {
    const BY_PROPERTY: [(&str, [&str; 2]); 3] = [
        (
            "relaxante",
            [
                "Développer les applications bien-être et relaxation",
                "Collaborer avec les centres de spa et thalassothérapie",
            ],
        ),
        (
            "antiseptique",
            [
                "Promouvoir les usages en désinfection naturelle",
                "Développer les formulations pour soins cutanés",
            ],
        ),
        (
            "digestive",
            [
                "Explorer les applications en gastro-entérologie",
                "Développer les compléments alimentaires naturels",
            ],
        ),
    ];
    const GENERAL: [&str; 5] = [
        "Investir dans la recherche clinique et scientifique",
        "Développer l'agriculture biologique et durable",
        "Renforcer la traçabilité et la qualité des produits",
        "Explorer les synergies avec d'autres huiles essentielles",
        "Développer les applications en médecine intégrative",
    ];

    BY_PROPERTY
        .iter()
        .filter(|(property, _)| profile.has_property(property))
        .flat_map(|(_, bullets)| bullets.iter())
        .chain(GENERAL.iter())
        .map(|s| s.to_string())
        .collect()
}

/// One line per trend band overlapping `[start_year, end_year]`.
pub fn milestones(start_year: i32, end_year: i32) -> Vec<String> {
    TrendBand::ALL
        .into_iter()
        .filter(|band| {
            band.first_year() <= end_year && band.last_year().map_or(true, |l| l >= start_year)
        })
        .map(|band| {
            let last = band.last_year().unwrap_or(end_year);
            format!("{}-{}: {}", band.first_year(), last, band.label())
        })
        .collect()
}

fn column_mean(table: &SeriesTable, metric: Metric) -> f64 {
    mean(&table.column(metric)).unwrap_or(0.0)
}

/// Builds the report. Read-only with respect to `table`.
pub fn summarize(oil: &Oil, table: &SeriesTable) -> Result<InsightReport, InsightError> {
    let (first, last) = match (table.first(), table.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(InsightError::EmptyTable),
    };
    debug!(oil = %oil.name, rows = table.len(), "summarising table");
    let profile = &oil.profile;

    Ok(InsightReport {
        oil: oil.name.clone(),
        start_year: first.year,
        end_year: last.year,
        general: GeneralStats {
            mean_production: column_mean(table, Metric::Production),
            mean_price: column_mean(table, Metric::Price),
            mean_market_value: column_mean(table, Metric::MarketValue),
            mean_studies: column_mean(table, Metric::Studies),
        },
        growth: GrowthStats {
            production_pct: growth_pct(first.production, last.production),
            market_value_pct: growth_pct(first.market_value, last.market_value),
        },
        quality: QualityStats {
            mean_active_compounds: column_mean(table, Metric::ActiveCompounds),
            mean_purity: column_mean(table, Metric::Purity),
            mean_organic_share: column_mean(table, Metric::OrganicShare),
        },
        therapeutics: TherapeuticStats {
            mean_efficacy: column_mean(table, Metric::TherapeuticEfficacy),
            total_studies: table.column(Metric::Studies).iter().sum(),
            last_efficacy: last.therapeutic_efficacy,
        },
        specifics: OilSpecifics {
            category: profile.category.clone(),
            properties: profile.properties.clone(),
            regions: profile.regions.clone(),
            yield_pct: profile.extraction_yield * 100.0,
        },
        milestones: milestones(first.year, last.year),
        recommendations: recommendations(profile),
    })
}

fn pct_or_na(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |p| format!("{p:.1}%"))
}

impl fmt::Display for InsightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INSIGHTS PHARMACOPÉE - Huile Essentielle de {}", self.oil)?;
        writeln!(f, "{}", "=".repeat(60))?;

        writeln!(f, "\n1. STATISTIQUES GÉNÉRALES:")?;
        let g = &self.general;
        writeln!(f, "Production moyenne annuelle: {:.0} tonnes", g.mean_production)?;
        writeln!(f, "Prix moyen: {:.1} €/kg", g.mean_price)?;
        writeln!(f, "Valeur moyenne du marché: {:.1} M€", g.mean_market_value)?;
        writeln!(f, "Études scientifiques moyennes: {:.0}", g.mean_studies)?;

        writeln!(f, "\n2. TAUX DE CROISSANCE:")?;
        writeln!(
            f,
            "Croissance de la production ({}-{}): {}",
            self.start_year,
            self.end_year,
            pct_or_na(self.growth.production_pct)
        )?;
        writeln!(
            f,
            "Croissance de la valeur du marché: {}",
            pct_or_na(self.growth.market_value_pct)
        )?;

        writeln!(f, "\n3. QUALITÉ ET COMPOSITION:")?;
        let q = &self.quality;
        writeln!(f, "Teneur moyenne en principes actifs: {:.1}%", q.mean_active_compounds)?;
        writeln!(f, "Pureté chimique moyenne: {:.1}%", q.mean_purity)?;
        writeln!(f, "Part moyenne de qualité bio: {:.1}%", q.mean_organic_share)?;

        writeln!(f, "\n4. APPLICATIONS THÉRAPEUTIQUES:")?;
        let t = &self.therapeutics;
        writeln!(f, "Efficacité thérapeutique moyenne: {:.1}/100", t.mean_efficacy)?;
        writeln!(f, "Total d'études scientifiques: {:.0}", t.total_studies)?;
        writeln!(f, "Dernière efficacité mesurée: {:.1}/100", t.last_efficacy)?;

        writeln!(f, "\n5. SPÉCIFICITÉS DE L'HUILE DE {}:", self.oil.to_uppercase())?;
        let s = &self.specifics;
        writeln!(f, "Type: {}", s.category)?;
        writeln!(f, "Propriétés: {}", s.properties.join(", "))?;
        writeln!(f, "Régions de production: {}", s.regions.join(", "))?;
        writeln!(f, "Rendement: {:.1}%", s.yield_pct)?;

        writeln!(f, "\n6. ÉVOLUTIONS MARQUANTES:")?;
        for m in &self.milestones {
            writeln!(f, "• {m}")?;
        }

        writeln!(f, "\n7. RECOMMANDATIONS STRATÉGIQUES:")?;
        for r in &self.recommendations {
            writeln!(f, "• {r}")?;
        }
        Ok(())
    }
}
