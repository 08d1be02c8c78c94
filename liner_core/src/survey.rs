//! # Directional Survey
//!
//! Maps measured depth (MD) to true vertical depth (TVD) and inclination.
//!
//! ## Interpolation Rules
//!
//! - Stations are sorted by MD on construction.
//! - **Flat-well fallback**: with fewer than two stations, or for a query
//!   MD ≤ 0, the query MD is returned unchanged as TVD. This treats the well
//!   as vertical; it is a stand-in for a missing survey, not a survey result.
//! - Between two stations TVD is linearly interpolated.
//! - Outside the surveyed range TVD is linearly extrapolated from the two
//!   boundary stations on that side.
//! - Stations sharing an MD resolve to that station's TVD.
//!
//! Stations recorded without a TVD get one from the average-angle method,
//! starting from a vertical surface at MD 0.
//!
//! ## Example
//!
//! ```rust
//! use liner_core::survey::{Survey, SurveyStation};
//!
//! let survey = Survey::new(vec![
//!     SurveyStation::with_tvd(0.0, 0.0, 0.0),
//!     SurveyStation::with_tvd(1000.0, 30.0, 950.0),
//! ]);
//! assert!((survey.tvd_at(500.0) - 475.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// One row of a directional survey
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth (ft)
    pub md_ft: f64,

    /// Inclination from vertical (degrees)
    #[serde(default)]
    pub inclination_deg: f64,

    /// True vertical depth (ft); derived from inclination when absent
    #[serde(default)]
    pub tvd_ft: Option<f64>,
}

impl SurveyStation {
    /// Station with a recorded TVD
    pub fn with_tvd(md_ft: f64, inclination_deg: f64, tvd_ft: f64) -> Self {
        SurveyStation {
            md_ft,
            inclination_deg,
            tvd_ft: Some(tvd_ft),
        }
    }

    /// Station with MD and inclination only
    pub fn without_tvd(md_ft: f64, inclination_deg: f64) -> Self {
        SurveyStation {
            md_ft,
            inclination_deg,
            tvd_ft: None,
        }
    }
}

/// A station after sorting and TVD resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStation {
    pub md_ft: f64,
    pub inclination_deg: f64,
    pub tvd_ft: f64,
}

/// Sorted survey with every station carrying a TVD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    stations: Vec<ResolvedStation>,
}

impl Survey {
    /// Build a survey from raw rows.
    ///
    /// Rows with a non-finite MD are dropped.
    pub fn new(mut rows: Vec<SurveyStation>) -> Self {
        rows.retain(|r| r.md_ft.is_finite());
        rows.sort_by(|a, b| a.md_ft.total_cmp(&b.md_ft));

        let mut stations: Vec<ResolvedStation> = Vec::with_capacity(rows.len());
        let mut prev_md = 0.0;
        let mut prev_inc = 0.0;
        let mut prev_tvd = 0.0;

        for row in rows {
            let inc = if row.inclination_deg.is_finite() {
                row.inclination_deg
            } else {
                0.0
            };
            let tvd = match row.tvd_ft {
                Some(t) if t.is_finite() => t,
                _ => {
                    let avg = ((prev_inc + inc) / 2.0).to_radians();
                    prev_tvd + (row.md_ft - prev_md) * avg.cos()
                }
            };
            stations.push(ResolvedStation {
                md_ft: row.md_ft,
                inclination_deg: inc,
                tvd_ft: tvd,
            });
            prev_md = row.md_ft;
            prev_inc = inc;
            prev_tvd = tvd;
        }

        Survey { stations }
    }

    /// Survey with no stations (every query falls back to TVD = MD)
    pub fn vertical() -> Self {
        Survey::default()
    }

    /// Sorted, resolved stations
    pub fn stations(&self) -> &[ResolvedStation] {
        &self.stations
    }

    /// Whether the flat-well fallback applies to every query
    pub fn is_fallback(&self) -> bool {
        self.stations.len() < 2
    }

    /// True vertical depth at a measured depth (ft).
    pub fn tvd_at(&self, md: f64) -> f64 {
        if self.is_fallback() || md <= 0.0 {
            return md;
        }

        let (a, b) = self.bracket(md);
        let dmd = b.md_ft - a.md_ft;
        if dmd == 0.0 {
            return a.tvd_ft;
        }
        a.tvd_ft + (md - a.md_ft) * (b.tvd_ft - a.tvd_ft) / dmd
    }

    /// Inclination at a measured depth (degrees).
    ///
    /// Linearly interpolated between stations and held constant beyond the
    /// surveyed range. Returns 0 (vertical) without a survey.
    pub fn inclination_at(&self, md: f64) -> f64 {
        let (first, last) = match (self.stations.first(), self.stations.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if md <= first.md_ft {
            return first.inclination_deg;
        }
        if md >= last.md_ft {
            return last.inclination_deg;
        }

        let (a, b) = self.bracket(md);
        let dmd = b.md_ft - a.md_ft;
        if dmd == 0.0 {
            return a.inclination_deg;
        }
        a.inclination_deg + (md - a.md_ft) * (b.inclination_deg - a.inclination_deg) / dmd
    }

    /// Pick the two stations used for a query: the bracketing pair inside the
    /// range, the boundary pair outside it. Requires at least two stations.
    fn bracket(&self, md: f64) -> (&ResolvedStation, &ResolvedStation) {
        let n = self.stations.len();
        // First index whose MD is >= the query
        let upper = self.stations.partition_point(|s| s.md_ft < md);

        let (i, j) = if upper == 0 {
            (0, 1)
        } else if upper >= n {
            (n - 2, n - 1)
        } else if self.stations[upper].md_ft == md {
            (upper, upper)
        } else {
            (upper - 1, upper)
        };
        (&self.stations[i], &self.stations[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_survey() -> Survey {
        Survey::new(vec![
            SurveyStation::with_tvd(3000.0, 20.0, 2950.0),
            SurveyStation::with_tvd(0.0, 0.0, 0.0),
            SurveyStation::with_tvd(1000.0, 0.0, 1000.0),
            SurveyStation::with_tvd(2000.0, 10.0, 1990.0),
        ])
    }

    #[test]
    fn test_sorted_on_construction() {
        let survey = build_survey();
        let mds: Vec<f64> = survey.stations().iter().map(|s| s.md_ft).collect();
        assert_eq!(mds, vec![0.0, 1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_exact_station_match() {
        let survey = build_survey();
        assert_eq!(survey.tvd_at(2000.0), 1990.0);
        assert_eq!(survey.tvd_at(3000.0), 2950.0);
        assert_eq!(survey.tvd_at(1000.0), 1000.0);
    }

    #[test]
    fn test_interpolation() {
        let survey = build_survey();
        // Halfway between 2000 (1990) and 3000 (2950)
        assert!((survey.tvd_at(2500.0) - 2470.0).abs() < 1e-9);
    }

    #[test]
    fn test_extrapolation_uses_boundary_slope() {
        let survey = build_survey();
        // Slope of last pair is 0.96 ft/ft
        assert!((survey.tvd_at(3500.0) - (2950.0 + 500.0 * 0.96)).abs() < 1e-9);
    }

    #[test]
    fn test_flat_fallback() {
        let empty = Survey::vertical();
        assert_eq!(empty.tvd_at(5000.0), 5000.0);

        let single = Survey::new(vec![SurveyStation::with_tvd(1000.0, 45.0, 800.0)]);
        assert_eq!(single.tvd_at(4321.0), 4321.0);

        let survey = build_survey();
        assert_eq!(survey.tvd_at(0.0), 0.0);
        assert_eq!(survey.tvd_at(-10.0), -10.0);
    }

    #[test]
    fn test_duplicate_md() {
        let survey = Survey::new(vec![
            SurveyStation::with_tvd(0.0, 0.0, 0.0),
            SurveyStation::with_tvd(1500.0, 5.0, 1498.0),
            SurveyStation::with_tvd(1500.0, 5.0, 1498.0),
        ]);
        assert_eq!(survey.tvd_at(1500.0), 1498.0);
        let beyond = survey.tvd_at(1600.0);
        assert!(beyond.is_finite());
    }

    #[test]
    fn test_monotonic_for_low_inclination() {
        let survey = Survey::new(vec![
            SurveyStation::without_tvd(0.0, 0.0),
            SurveyStation::without_tvd(1500.0, 0.0),
            SurveyStation::without_tvd(3000.0, 35.0),
            SurveyStation::without_tvd(6000.0, 60.0),
            SurveyStation::without_tvd(9000.0, 88.0),
        ]);
        let mut prev = survey.tvd_at(1.0);
        let mut md = 1.0;
        while md < 10_000.0 {
            md += 37.0;
            let tvd = survey.tvd_at(md);
            assert!(tvd >= prev, "TVD decreased at {} ft", md);
            prev = tvd;
        }
    }

    #[test]
    fn test_average_angle_tvd() {
        let survey = Survey::new(vec![
            SurveyStation::without_tvd(1000.0, 0.0),
            SurveyStation::without_tvd(2000.0, 60.0),
        ]);
        let st = survey.stations();
        assert!((st[0].tvd_ft - 1000.0).abs() < 1e-9);
        // 1000 ft at an average 30 deg
        assert!((st[1].tvd_ft - (1000.0 + 1000.0 * 30f64.to_radians().cos())).abs() < 1e-9);
    }

    #[test]
    fn test_inclination_interpolation() {
        let survey = build_survey();
        assert!((survey.inclination_at(2500.0) - 15.0).abs() < 1e-9);
        assert_eq!(survey.inclination_at(5000.0), 20.0);
        assert_eq!(Survey::vertical().inclination_at(100.0), 0.0);
    }
}
