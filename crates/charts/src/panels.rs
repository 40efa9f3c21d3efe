//! Panel contents of the dashboard, independent of the drawing backend.

use oil_core::{Metric, SeriesTable};
use plotters::style::RGBColor;
use std::ops::Range;

pub const BROWN: RGBColor = RGBColor(0x8B, 0x45, 0x13);
pub const FOREST: RGBColor = RGBColor(0x22, 0x8B, 0x22);
pub const GOLD: RGBColor = RGBColor(0xFF, 0xD7, 0x00);
pub const VIOLET: RGBColor = RGBColor(0x8A, 0x2B, 0xE2);
pub const CORAL: RGBColor = RGBColor(0xFF, 0x6B, 0x6B);
pub const TEAL: RGBColor = RGBColor(0x4E, 0xCD, 0xC4);
pub const SKY: RGBColor = RGBColor(0x45, 0xB7, 0xD1);
pub const SAGE: RGBColor = RGBColor(0x96, 0xCE, 0xB4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Line,
    Bars,
}

/// One plotted series.
#[derive(Clone)]
pub struct Series {
    pub label: &'static str,
    pub color: RGBColor,
    pub mark: Mark,
    /// `(year, value)`; for bars the value is the top of the bar.
    pub points: Vec<(f64, f64)>,
    /// Bar bottoms, one per point. Empty means bars start at zero.
    pub floor: Vec<f64>,
}

impl Series {
    fn line(label: &'static str, color: RGBColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            label,
            color,
            mark: Mark::Line,
            points,
            floor: Vec::new(),
        }
    }

    fn bars(label: &'static str, color: RGBColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            mark: Mark::Bars,
            ..Self::line(label, color, points)
        }
    }

    pub fn base(&self, index: usize) -> f64 {
        self.floor.get(index).copied().unwrap_or(0.0)
    }
}

/// A y axis with the series plotted against it.
#[derive(Clone)]
pub struct Axis {
    pub desc: &'static str,
    pub series: Vec<Series>,
}

impl Axis {
    /// Value range covering every series; anchored at zero when bars are drawn.
    pub fn range(&self) -> Range<f64> {
        let has_bars = self.series.iter().any(|s| s.mark == Mark::Bars);
        let values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y));
        padded_range(values, has_bars)
    }
}

#[derive(Clone)]
pub struct Panel {
    pub caption: &'static str,
    pub primary: Axis,
    pub secondary: Option<Axis>,
}

/// `[min, max]` of the finite values, padded by 5% of the span.
///
/// With `include_zero` the range always contains 0 and is not padded below it
/// when every value is non-negative.
pub fn padded_range<I>(values: I, include_zero: bool) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo < 1e-9 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    let bottom = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    bottom..(hi + pad)
}

/// Year axis with half a year of slack on both ends, so bars fit.
pub fn year_span(table: &SeriesTable) -> Range<f64> {
    match (table.first(), table.last()) {
        (Some(first), Some(last)) => (f64::from(first.year) - 0.5)..(f64::from(last.year) + 0.5),
        _ => 0.0..1.0,
    }
}

/// Divides by the largest finite value; all zeros when that is not positive.
pub fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        values.iter().map(|v| v / max).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// Bottom of each layer when `layers` are stacked in order.
pub fn stack_floors(layers: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut floor = vec![0.0; layers.first().map_or(0, Vec::len)];
    layers
        .iter()
        .map(|layer| {
            let current = floor.clone();
            for (f, v) in floor.iter_mut().zip(layer) {
                *f += v;
            }
            current
        })
        .collect()
}

fn with_years(years: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    years.iter().copied().zip(values.iter().copied()).collect()
}

fn stacked_usage(table: &SeriesTable, years: &[f64]) -> Vec<Series> {
    let layers = [
        (Metric::AromatherapyUse, "Aromathérapie", CORAL),
        (Metric::CosmeticUse, "Cosmétique", TEAL),
        (Metric::PharmaceuticalUse, "Pharmaceutique", SKY),
        (Metric::FoodUse, "Alimentaire", SAGE),
    ];
    let columns: Vec<Vec<f64>> = layers.iter().map(|&(m, _, _)| table.column(m)).collect();
    let floors = stack_floors(&columns);
    layers
        .iter()
        .zip(columns.iter().zip(floors))
        .map(|(&(_, label, color), (column, floor))| {
            let tops: Vec<f64> = column.iter().zip(&floor).map(|(v, f)| v + f).collect();
            Series {
                floor,
                ..Series::bars(label, color, with_years(years, &tops))
            }
        })
        .collect()
}

/// The eight dashboard panels, in grid order (row by row, two per row).
pub fn dashboard_panels(table: &SeriesTable) -> Vec<Panel> {
    let years: Vec<f64> = table.years().into_iter().map(f64::from).collect();
    let line = |label: &'static str, color: RGBColor, metric: Metric| {
        Series::line(label, color, table.points(metric))
    };
    let bars = |label: &'static str, color: RGBColor, metric: Metric| {
        Series::bars(label, color, table.points(metric))
    };
    let efficacy_pct: Vec<f64> = table
        .column(Metric::TherapeuticEfficacy)
        .iter()
        .map(|v| v / 100.0)
        .collect();

    vec![
        Panel {
            caption: "Production et Demande Mondiale",
            primary: Axis {
                desc: "Tonnes",
                series: vec![
                    line("Production", BROWN, Metric::Production),
                    line("Demande", FOREST, Metric::Demand),
                ],
            },
            secondary: Some(Axis {
                desc: "Prix (€/kg)",
                series: vec![line("Prix", GOLD, Metric::Price)],
            }),
        },
        Panel {
            caption: "Qualité et Composition",
            primary: Axis {
                desc: "Pourcentage (%)",
                series: vec![
                    line("Principes actifs", VIOLET, Metric::ActiveCompounds),
                    line("Pureté chimique", CORAL, Metric::Purity),
                    line("Qualité bio", FOREST, Metric::OrganicShare),
                ],
            },
            secondary: None,
        },
        Panel {
            caption: "Applications Thérapeutiques",
            primary: Axis {
                desc: "Score",
                series: vec![
                    line("Efficacité", CORAL, Metric::TherapeuticEfficacy),
                    line("Demande thérapeutique", TEAL, Metric::TherapeuticDemand),
                ],
            },
            secondary: Some(Axis {
                desc: "Nombre d'études",
                series: vec![bars("Études", SKY, Metric::Studies)],
            }),
        },
        Panel {
            caption: "Usage par Secteur",
            primary: Axis {
                desc: "Score d'usage cumulé",
                series: stacked_usage(table, &years),
            },
            secondary: None,
        },
        Panel {
            caption: "Économie du Marché",
            primary: Axis {
                desc: "Valeur (M€)",
                series: vec![line("Valeur du marché", FOREST, Metric::MarketValue)],
            },
            secondary: Some(Axis {
                desc: "Croissance (%)",
                series: vec![line("Croissance", CORAL, Metric::MarketGrowth)],
            }),
        },
        Panel {
            caption: "Recherche Scientifique",
            primary: Axis {
                desc: "Nombre d'études",
                series: vec![bars("Études", VIOLET, Metric::Studies)],
            },
            secondary: Some(Axis {
                desc: "Efficacité (/100)",
                series: vec![line("Efficacité", CORAL, Metric::TherapeuticEfficacy)],
            }),
        },
        Panel {
            caption: "Durabilité Environnementale",
            primary: Axis {
                desc: "Score",
                series: vec![
                    line("Durabilité", FOREST, Metric::Sustainability),
                    line("Impact environnemental", CORAL, Metric::EnvironmentalImpact),
                ],
            },
            secondary: None,
        },
        Panel {
            caption: "Comparaison Normalisée",
            primary: Axis {
                desc: "Valeur normalisée",
                series: vec![
                    Series::line(
                        "Production",
                        BROWN,
                        with_years(&years, &normalize_by_max(&table.column(Metric::Production))),
                    ),
                    Series::line(
                        "Prix",
                        GOLD,
                        with_years(&years, &normalize_by_max(&table.column(Metric::Price))),
                    ),
                    Series::line("Efficacité", CORAL, with_years(&years, &efficacy_pct)),
                    Series::line(
                        "Études",
                        VIOLET,
                        with_years(&years, &normalize_by_max(&table.column(Metric::Studies))),
                    ),
                ],
            },
            secondary: None,
        },
    ]
}
