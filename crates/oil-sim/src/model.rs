//! Per-metric generation models.
//!
//! Each metric is `baseline(profile) * regime(index, year) * noise`. The
//! constants below are the whole model; nothing is fitted from data.

use crate::noise::NoiseSource;
use crate::regime::{Phase, Pivot, RegimeCurve};
use oil_core::{Metric, OilProfile};

/// Starting magnitude of a metric, possibly derived from the oil profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Baseline {
    /// Independent of the oil.
    Fixed(f64),
    /// `production_base * factor`.
    Production(f64),
    /// `production_base / extraction_yield * factor`.
    AreaPerYield(f64),
    /// `production_base * price_base / divisor`.
    Turnover(f64),
    /// `price_base * factor`.
    Price(f64),
}

impl Baseline {
    pub fn value(&self, profile: &OilProfile) -> f64 {
        match *self {
            Baseline::Fixed(v) => v,
            Baseline::Production(f) => profile.production_base * f,
            Baseline::AreaPerYield(f) => profile.production_base / profile.extraction_yield * f,
            Baseline::Turnover(div) => profile.production_base * profile.price_base / div,
            Baseline::Price(f) => profile.price_base * f,
        }
    }
}

/// Generation model for one metric.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricModel {
    pub metric: Metric,
    pub baseline: Baseline,
    pub curve: RegimeCurve,
    /// Standard deviation of the multiplicative noise.
    pub noise_sd: f64,
}

impl MetricModel {
    /// Noise-free value.
    pub fn expected(&self, profile: &OilProfile, index: usize, year: i32) -> f64 {
        self.baseline.value(profile) * self.curve.multiplier(index, year)
    }

    pub fn sample(
        &self,
        profile: &OilProfile,
        index: usize,
        year: i32,
        noise: &mut dyn NoiseSource,
    ) -> f64 {
        self.expected(profile, index, year) * noise.factor(self.noise_sd)
    }
}

fn index_growth(slope: f64) -> Phase {
    Phase::linear(1.0, slope, Pivot::Index(0))
}

/// Flat at 1.0 until `from_year`, then `1 + slope * (year - from_year)`.
fn improves_from(from_year: i32, slope: f64) -> RegimeCurve {
    RegimeCurve::new(Phase::flat(1.0))
        .then(from_year, Phase::linear(1.0, slope, Pivot::Year(from_year)))
}

fn model(metric: Metric, baseline: Baseline, curve: RegimeCurve, noise_sd: f64) -> MetricModel {
    MetricModel {
        metric,
        baseline,
        curve,
        noise_sd,
    }
}

/// The generation model of `metric`.
pub fn model_for(metric: Metric) -> MetricModel {
    use Baseline as B;
    use Metric::*;
    match metric {
        Production => model(
            metric,
            B::Production(1.0),
            RegimeCurve::new(index_growth(0.08))
                .then(2006, Phase::linear(1.0, 0.12, Pivot::Index(5)))
                .then(2016, Phase::linear(1.0, 0.15, Pivot::Index(15)))
                .then(2021, Phase::linear(1.0, 0.10, Pivot::Index(20))),
            0.10,
        ),
        Price => model(
            metric,
            B::Price(1.0),
            RegimeCurve::new(index_growth(0.03))
                .then(2006, Phase::linear(1.0, 0.05, Pivot::Index(5)))
                .then(2013, Phase::linear(1.0, 0.08, Pivot::Index(12)))
                .then(2019, Phase::linear(1.0, 0.06, Pivot::Index(18))),
            0.08,
        ),
        Demand => model(
            metric,
            B::Production(0.9),
            RegimeCurve::new(index_growth(0.10))
                .then(2011, Phase::linear(1.0, 0.14, Pivot::Index(10)))
                .then(2021, Phase::linear(1.0, 0.12, Pivot::Index(20))),
            0.12,
        ),
        CultivatedArea => model(
            metric,
            B::AreaPerYield(10.0),
            RegimeCurve::new(index_growth(0.09)),
            0.15,
        ),
        ActiveCompounds => model(metric, B::Fixed(85.0), improves_from(2010, 0.005), 0.04),
        Purity => model(metric, B::Fixed(92.0), improves_from(2008, 0.008), 0.03),
        OrganicShare => model(metric, B::Fixed(60.0), improves_from(2015, 0.025), 0.06),
        TherapeuticEfficacy => model(metric, B::Fixed(75.0), improves_from(2010, 0.012), 0.05),
        Studies => model(
            metric,
            B::Fixed(1.0),
            RegimeCurve::new(Phase::linear(5.0, 2.0, Pivot::Index(0)))
                .then(2006, Phase::linear(15.0, 5.0, Pivot::Index(5)))
                .then(2016, Phase::linear(65.0, 8.0, Pivot::Index(15))),
            0.20,
        ),
        TherapeuticDemand => model(metric, B::Fixed(60.0), improves_from(2012, 0.018), 0.07),
        AromatherapyUse => model(metric, B::Fixed(70.0), improves_from(2008, 0.015), 0.06),
        CosmeticUse => model(metric, B::Fixed(65.0), improves_from(2010, 0.020), 0.08),
        PharmaceuticalUse => model(metric, B::Fixed(40.0), improves_from(2015, 0.025), 0.10),
        FoodUse => model(metric, B::Fixed(30.0), improves_from(2018, 0.030), 0.12),
        MarketValue => model(
            metric,
            B::Turnover(1000.0),
            RegimeCurve::new(index_growth(0.11)),
            0.13,
        ),
        MarketGrowth => model(
            metric,
            B::Fixed(1.0),
            RegimeCurve::new(Phase::flat(8.0))
                .then(2006, Phase::flat(12.0))
                .then(2016, Phase::flat(15.0))
                .then(2021, Phase::flat(11.0)),
            0.15,
        ),
        Exports => model(
            metric,
            B::Production(0.7),
            RegimeCurve::new(index_growth(0.10)),
            0.14,
        ),
        EnvironmentalImpact => model(metric, B::Fixed(45.0), improves_from(2010, -0.010), 0.08),
        Sustainability => model(metric, B::Fixed(65.0), improves_from(2012, 0.015), 0.07),
        ResourceScarcity => model(metric, B::Fixed(30.0), improves_from(2015, 0.008), 0.10),
    }
}

/// Models for every metric, in canonical column order.
pub fn all_models() -> Vec<MetricModel> {
    Metric::ALL.into_iter().map(model_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oil_core::resolve_profile;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn one_model_per_metric_in_order() {
        let models = all_models();
        assert_eq!(models.len(), 20);
        for (m, metric) in models.iter().zip(Metric::ALL) {
            assert_eq!(m.metric, metric);
            assert!((0.03..=0.20).contains(&m.noise_sd), "{metric:?}");
        }
    }

    #[test]
    fn baselines_derive_from_profile() {
        let p = resolve_profile("Lavande");
        assert!(close(Baseline::Production(0.9).value(&p), 135.0));
        assert!(close(Baseline::AreaPerYield(10.0).value(&p), 100_000.0));
        assert!(close(Baseline::Turnover(1000.0).value(&p), 6.75));
        assert!(close(Baseline::Price(1.0).value(&p), 45.0));
        assert!(close(Baseline::Fixed(85.0).value(&p), 85.0));
    }

    #[test]
    fn expected_values_follow_regimes() {
        let p = resolve_profile("Lavande");
        let prod = model_for(Metric::Production);
        assert!(close(prod.expected(&p, 0, 2000), 150.0));
        assert!(close(prod.expected(&p, 5, 2005), 210.0));
        assert!(close(prod.expected(&p, 6, 2006), 168.0));

        let studies = model_for(Metric::Studies);
        assert!(close(studies.expected(&p, 0, 2000), 5.0));
        assert!(close(studies.expected(&p, 10, 2010), 40.0));
        assert!(close(studies.expected(&p, 25, 2025), 145.0));

        let growth = model_for(Metric::MarketGrowth);
        assert!(close(growth.expected(&p, 0, 2000), 8.0));
        assert!(close(growth.expected(&p, 10, 2010), 12.0));
        assert!(close(growth.expected(&p, 18, 2018), 15.0));
        assert!(close(growth.expected(&p, 24, 2024), 11.0));

        let impact = model_for(Metric::EnvironmentalImpact);
        assert!(close(impact.expected(&p, 5, 2005), 45.0));
        assert!(close(impact.expected(&p, 20, 2020), 40.5));

        let price = model_for(Metric::Price);
        assert!(close(price.expected(&p, 12, 2012), 45.0 * 1.35));
        assert!(close(price.expected(&p, 13, 2013), 45.0 * 1.08));
        assert!(close(price.expected(&p, 19, 2019), 45.0 * 1.06));
    }

    #[test]
    fn sample_scales_by_noise_factor() {
        let p = resolve_profile("Citron");
        let m = model_for(Metric::Exports);
        let mut noise = crate::noise::SequenceNoise::new(vec![1.5]);
        let v = m.sample(&p, 0, 2000, &mut noise);
        assert!(close(v, 180.0 * 0.7 * 1.5));
    }
}
