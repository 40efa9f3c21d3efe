//! Narrative trend bands layered on top of the raw generated values.

use oil_core::{Metric, YearRow};

/// Fixed historical period with its own adjustments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendBand {
    /// 2000-2005.
    EarlyPopularity,
    /// 2006-2010.
    ScientificRecognition,
    /// 2011-2015.
    NaturalBoom,
    /// 2016-2020.
    PharmaIntegration,
    /// 2021 onwards.
    SustainabilityFocus,
}

impl TrendBand {
    pub const ALL: [TrendBand; 5] = [
        TrendBand::EarlyPopularity,
        TrendBand::ScientificRecognition,
        TrendBand::NaturalBoom,
        TrendBand::PharmaIntegration,
        TrendBand::SustainabilityFocus,
    ];

    /// Band containing `year`; years before 2000 have none.
    pub fn for_year(year: i32) -> Option<TrendBand> {
        match year {
            2000..=2005 => Some(TrendBand::EarlyPopularity),
            2006..=2010 => Some(TrendBand::ScientificRecognition),
            2011..=2015 => Some(TrendBand::NaturalBoom),
            2016..=2020 => Some(TrendBand::PharmaIntegration),
            y if y >= 2021 => Some(TrendBand::SustainabilityFocus),
            _ => None,
        }
    }

    pub fn first_year(self) -> i32 {
        match self {
            TrendBand::EarlyPopularity => 2000,
            TrendBand::ScientificRecognition => 2006,
            TrendBand::NaturalBoom => 2011,
            TrendBand::PharmaIntegration => 2016,
            TrendBand::SustainabilityFocus => 2021,
        }
    }

    /// Last year of the band; `None` for the open-ended last band.
    pub fn last_year(self) -> Option<i32> {
        match self {
            TrendBand::EarlyPopularity => Some(2005),
            TrendBand::ScientificRecognition => Some(2010),
            TrendBand::NaturalBoom => Some(2015),
            TrendBand::PharmaIntegration => Some(2020),
            TrendBand::SustainabilityFocus => None,
        }
    }

    /// Multipliers applied to rows falling in the band.
    pub fn adjustments(self) -> &'static [(Metric, f64)] {
        match self {
            TrendBand::EarlyPopularity => &[(Metric::AromatherapyUse, 1.2), (Metric::Studies, 1.3)],
            TrendBand::ScientificRecognition => &[
                (Metric::Studies, 1.5),
                (Metric::TherapeuticEfficacy, 1.1),
            ],
            TrendBand::NaturalBoom => &[(Metric::OrganicShare, 1.4), (Metric::Demand, 1.3)],
            TrendBand::PharmaIntegration => {
                &[(Metric::PharmaceuticalUse, 1.6), (Metric::Price, 1.2)]
            }
            TrendBand::SustainabilityFocus => &[
                (Metric::Sustainability, 1.2),
                (Metric::EnvironmentalImpact, 0.9),
                (Metric::OrganicShare, 1.15),
            ],
        }
    }

    /// Short description printed in the milestones section of the report.
    pub fn label(self) -> &'static str {
        match self {
            TrendBand::EarlyPopularity => "Début de popularité et reconnaissance",
            TrendBand::ScientificRecognition => "Reconnaissance scientifique croissante",
            TrendBand::NaturalBoom => "Boom des produits naturels et bio",
            TrendBand::PharmaIntegration => "Intégration dans l'industrie pharmaceutique",
            TrendBand::SustainabilityFocus => "Focus sur la durabilité et l'éthique",
        }
    }
}

/// Returns `row` with the adjustments of its year's band applied.
pub fn overlay(row: &YearRow) -> YearRow {
    let Some(band) = TrendBand::for_year(row.year) else {
        return row.clone();
    };
    band.adjustments()
        .iter()
        .fold(row.clone(), |acc, &(metric, factor)| {
            let v = acc.get(metric) * factor;
            acc.with(metric, v)
        })
}
