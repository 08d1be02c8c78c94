//! # Torque and Drag
//!
//! Soft-string model of the running string while slacking off to set the
//! liner.
//!
//! ## Model
//!
//! The path from surface to the target MD is split into nodes `step_ft`
//! apart (the last step ends exactly on the target). Over each step:
//!
//! ```text
//! w_b      = ppf × BF
//! along    = w_b × cos(inc)
//! normal   = w_b × |sin(inc)|
//! friction = μ × normal        μ = cased above the casing shoe, open below
//!
//! T[i+1] = T[i] − (along + friction) × ds
//! ```
//!
//! Friction opposes downward motion, so it reduces the load delivered
//! downhole. With rotation, friction also produces torque
//! `friction × r × ds`, summed from the bottom up.
//!
//! ## Solver
//!
//! The surface force `F₀ = T[0]` is found by bisection so that the
//! downhole load equals the requested set-down (`T[n] = −C`). The residual
//! is monotone in `F₀`; when the target is unreachable inside the bounds
//! the nearer bound is returned with `converged = false`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::geometry::WellGeometry;
use crate::config::TorqueDragSettings;
use crate::equations::buoyancy_factor;
use crate::job::JobInput;
use crate::survey::Survey;
use crate::units::inches_to_feet;

/// Pipe body over an MD interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringInterval {
    pub top_md_ft: f64,
    pub bottom_md_ft: f64,
    pub weight_ppf: f64,
    pub od_in: f64,
}

/// Running string as seen by the model, shallowest interval first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringProfile {
    pub intervals: Vec<StringInterval>,
}

impl StringProfile {
    /// Work string followed by the liner
    pub fn from_job(input: &JobInput, geometry: &WellGeometry) -> Self {
        let mut intervals: Vec<StringInterval> = input
            .work_string
            .iter()
            .map(|s| StringInterval {
                top_md_ft: s.top_md_ft,
                bottom_md_ft: s.bottom_md_ft,
                weight_ppf: s.weight_ppf,
                od_in: s.od_in,
            })
            .collect();
        intervals.push(StringInterval {
            top_md_ft: geometry.top_of_liner_md_ft,
            bottom_md_ft: geometry.liner_shoe_md_ft,
            weight_ppf: input.liner.weight_ppf,
            od_in: input.liner.od_in,
        });
        StringProfile { intervals }
    }

    /// Interval covering an MD. Gaps carry no pipe.
    pub fn at(&self, md: f64) -> Option<&StringInterval> {
        self.intervals
            .iter()
            .find(|i| md >= i.top_md_ft && md < i.bottom_md_ft)
            .or_else(|| self.intervals.iter().rev().find(|i| md == i.bottom_md_ft))
    }
}

/// Friction and buoyancy for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConditions {
    pub buoyancy_factor: f64,
    pub friction_cased: f64,
    pub friction_open_hole: f64,
    pub casing_shoe_md_ft: f64,
    pub rotating: bool,
}

impl RunConditions {
    fn friction_at(&self, md: f64) -> f64 {
        if md < self.casing_shoe_md_ft {
            self.friction_cased
        } else {
            self.friction_open_hole
        }
    }
}

/// State at one node of the discretized path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueDragPoint {
    pub md_ft: f64,
    pub inclination_deg: f64,
    /// Axial load, positive in tension (lbf)
    pub tension_lbf: f64,
    /// Torque carried at this depth while rotating (ft·lbf)
    pub torque_ftlbf: f64,
    /// Friction drag over the step ending at this node (lbf)
    pub drag_lbf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueDragResult {
    pub target_md_ft: f64,
    /// Requested downhole set-down (lbf, compression positive)
    pub set_down_force_lbf: f64,

    /// Surface hook force that delivers the set-down (lbf)
    pub surface_force_lbf: f64,
    /// Axial load reached at the target (lbf)
    pub target_load_lbf: f64,
    pub residual_lbf: f64,
    pub iterations: u32,
    pub converged: bool,

    /// Frictionless hanging weight along the path (lbf)
    pub free_weight_lbf: f64,
    /// Weight the hook gives up relative to free hanging (lbf)
    pub slack_off_lbf: f64,
    pub total_drag_lbf: f64,
    pub peak_drag_lbf: f64,
    pub peak_torque_ftlbf: f64,
    pub rotating: bool,

    pub points: Vec<TorqueDragPoint>,
}

/// Per-step loads, independent of the surface force
#[derive(Debug, Clone, Copy)]
struct Step {
    /// Axial weight plus friction drag over the step (lbf)
    axial_lbf: f64,
    drag_lbf: f64,
    torque_ftlbf: f64,
    along_lbf: f64,
}

/// Node MDs from surface to `target`, ending exactly on it.
///
/// A non-positive or non-finite step yields the two end nodes only.
fn nodes(target: f64, step: f64) -> Vec<f64> {
    if !(target > 0.0 && target.is_finite()) {
        return vec![0.0];
    }
    if !(step > 0.0 && step.is_finite()) {
        return vec![0.0, target];
    }
    let count = (target / step).ceil() as usize;
    let mut mds = Vec::with_capacity(count + 1);
    mds.push(0.0);
    mds.extend((1..count).map(|i| i as f64 * step).take_while(|md| *md < target));
    mds.push(target);
    mds
}

/// Integrate the string and bisect for the surface force.
pub fn solve_profile(
    profile: &StringProfile,
    survey: &Survey,
    conditions: &RunConditions,
    target_md_ft: f64,
    set_down_force_lbf: f64,
    settings: &TorqueDragSettings,
) -> TorqueDragResult {
    let mds = nodes(target_md_ft.max(0.0), settings.step_ft);
    let incs: Vec<f64> = mds.iter().map(|md| survey.inclination_at(*md)).collect();

    let steps: Vec<Step> = mds
        .windows(2)
        .zip(incs.windows(2))
        .map(|(md, inc)| {
            let ds = md[1] - md[0];
            let mid = (md[0] + md[1]) / 2.0;
            let inc_rad = ((inc[0] + inc[1]) / 2.0).to_radians();
            match profile.at(mid) {
                Some(pipe) => {
                    let w_b = pipe.weight_ppf * conditions.buoyancy_factor;
                    let along = w_b * inc_rad.cos() * ds;
                    let friction = conditions.friction_at(mid) * w_b * inc_rad.sin().abs() * ds;
                    let torque = if conditions.rotating {
                        friction * inches_to_feet(pipe.od_in / 2.0)
                    } else {
                        0.0
                    };
                    Step {
                        axial_lbf: along + friction,
                        drag_lbf: friction,
                        torque_ftlbf: torque,
                        along_lbf: along,
                    }
                }
                None => Step {
                    axial_lbf: 0.0,
                    drag_lbf: 0.0,
                    torque_ftlbf: 0.0,
                    along_lbf: 0.0,
                },
            }
        })
        .collect();

    let integrate = |f0: f64| -> f64 { steps.iter().fold(f0, |t, s| t - s.axial_lbf) };
    let target_load = -set_down_force_lbf;
    let residual = |f0: f64| integrate(f0) - target_load;

    let tol = settings.tolerance_lbf;
    let (mut lo, mut hi) = (settings.lower_bound_lbf, settings.upper_bound_lbf);
    let mut iterations = 0;

    let r_lo = residual(lo);
    let r_hi = residual(hi);
    let surface_force = if r_lo.abs() <= tol {
        lo
    } else if r_hi.abs() <= tol {
        hi
    } else if r_lo > 0.0 {
        warn!(residual_lbf = r_lo, "Set-down unreachable: string too light at the lower bound");
        lo
    } else if r_hi < 0.0 {
        warn!(residual_lbf = r_hi, "Set-down unreachable: string too heavy for the upper bound");
        hi
    } else {
        let mut mid = (lo + hi) / 2.0;
        while iterations < settings.max_iterations {
            iterations += 1;
            mid = (lo + hi) / 2.0;
            let r = residual(mid);
            if r.abs() <= tol {
                break;
            }
            if r > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        mid
    };

    let final_residual = residual(surface_force);
    let converged = final_residual.abs() <= tol;
    if !converged {
        warn!(residual_lbf = final_residual, iterations, "Torque-drag solver did not converge");
    }

    // Tension walking down, torque summed up from the bottom
    let mut points = Vec::with_capacity(mds.len());
    let mut tension = surface_force;
    points.push(TorqueDragPoint {
        md_ft: mds[0],
        inclination_deg: incs[0],
        tension_lbf: tension,
        torque_ftlbf: 0.0,
        drag_lbf: 0.0,
    });
    for (i, s) in steps.iter().enumerate() {
        tension -= s.axial_lbf;
        points.push(TorqueDragPoint {
            md_ft: mds[i + 1],
            inclination_deg: incs[i + 1],
            tension_lbf: tension,
            torque_ftlbf: 0.0,
            drag_lbf: s.drag_lbf,
        });
    }
    let mut torque_below = 0.0;
    for (i, point) in points.iter_mut().enumerate().rev() {
        point.torque_ftlbf = torque_below;
        if i > 0 {
            torque_below += steps[i - 1].torque_ftlbf;
        }
    }

    let free_weight: f64 = steps.iter().map(|s| s.along_lbf).sum();
    let total_drag: f64 = steps.iter().map(|s| s.drag_lbf).sum();
    debug!(
        surface_force_lbf = surface_force,
        free_weight_lbf = free_weight,
        total_drag_lbf = total_drag,
        iterations,
        "Torque-drag solved"
    );

    TorqueDragResult {
        target_md_ft,
        set_down_force_lbf,
        surface_force_lbf: surface_force,
        target_load_lbf: integrate(surface_force),
        residual_lbf: final_residual,
        iterations,
        converged,
        free_weight_lbf: free_weight,
        slack_off_lbf: free_weight - surface_force,
        total_drag_lbf: total_drag,
        peak_drag_lbf: points.iter().map(|p| p.drag_lbf).fold(0.0, f64::max),
        peak_torque_ftlbf: points.iter().map(|p| p.torque_ftlbf).fold(0.0, f64::max),
        rotating: conditions.rotating,
        points,
    }
}

/// Solve torque and drag for a job.
pub fn solve(
    input: &JobInput,
    geometry: &WellGeometry,
    survey: &Survey,
    settings: &TorqueDragSettings,
) -> TorqueDragResult {
    let ops = &input.operations;
    let conditions = RunConditions {
        buoyancy_factor: buoyancy_factor(input.mud_density_ppg),
        friction_cased: ops.friction_cased,
        friction_open_hole: ops.friction_open_hole,
        casing_shoe_md_ft: geometry.casing_shoe_md_ft,
        rotating: ops.rotate,
    };
    let target = ops
        .torque_drag_target_md_ft
        .filter(|md| md.is_finite() && *md > 0.0)
        .unwrap_or(geometry.liner_shoe_md_ft);

    solve_profile(
        &StringProfile::from_job(input, geometry),
        survey,
        &conditions,
        target,
        ops.set_down_force_lbf,
        settings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::SurveyStation;

    fn single_pipe(bottom: f64, ppf: f64) -> StringProfile {
        StringProfile {
            intervals: vec![StringInterval {
                top_md_ft: 0.0,
                bottom_md_ft: bottom,
                weight_ppf: ppf,
                od_in: 5.0,
            }],
        }
    }

    fn conditions(rotating: bool) -> RunConditions {
        RunConditions {
            buoyancy_factor: 0.8,
            friction_cased: 0.25,
            friction_open_hole: 0.35,
            casing_shoe_md_ft: 5000.0,
            rotating,
        }
    }

    #[test]
    fn test_node_spacing_hits_target() {
        let mds = nodes(100.0, 30.0);
        assert_eq!(mds, vec![0.0, 30.0, 60.0, 90.0, 100.0]);
        assert_eq!(nodes(100.0, 25.0).len(), 5);
    }

    #[test]
    fn test_degenerate_step_gives_end_nodes() {
        assert_eq!(nodes(100.0, 0.0), vec![0.0, 100.0]);
        assert_eq!(nodes(100.0, -5.0), vec![0.0, 100.0]);
        assert_eq!(nodes(100.0, f64::NAN), vec![0.0, 100.0]);
        assert_eq!(nodes(0.0, 25.0), vec![0.0]);
    }

    #[test]
    fn test_vertical_well_no_set_down() {
        let profile = single_pipe(10_000.0, 20.0);
        let r = solve_profile(
            &profile,
            &Survey::vertical(),
            &conditions(true),
            10_000.0,
            0.0,
            &TorqueDragSettings::default(),
        );
        let weight = 10_000.0 * 20.0 * 0.8;
        assert!(r.converged);
        assert!((r.surface_force_lbf - weight).abs() < 0.01);
        assert_eq!(r.total_drag_lbf, 0.0);
        assert_eq!(r.peak_torque_ftlbf, 0.0);

        // Each node carries the buoyed weight below it
        for p in &r.points {
            let below = (10_000.0 - p.md_ft) * 20.0 * 0.8;
            assert!((p.tension_lbf - below).abs() < 0.01, "at {} ft", p.md_ft);
        }
    }

    #[test]
    fn test_set_down_reduces_surface_force() {
        let profile = single_pipe(10_000.0, 20.0);
        let r = solve_profile(
            &profile,
            &Survey::vertical(),
            &conditions(false),
            10_000.0,
            40_000.0,
            &TorqueDragSettings::default(),
        );
        assert!(r.converged);
        assert!((r.surface_force_lbf - (160_000.0 - 40_000.0)).abs() < 0.01);
        assert!((r.target_load_lbf + 40_000.0).abs() < 0.01);
        assert!((r.slack_off_lbf - 40_000.0).abs() < 0.01);
    }

    #[test]
    fn test_unreachable_set_down_flags_non_convergence() {
        let profile = single_pipe(1000.0, 20.0);
        let r = solve_profile(
            &profile,
            &Survey::vertical(),
            &conditions(false),
            1000.0,
            50_000.0,
            &TorqueDragSettings::default(),
        );
        assert!(!r.converged);
        assert_eq!(r.surface_force_lbf, 0.0);
    }

    #[test]
    fn test_inclined_well_has_drag_and_torque() {
        let survey = Survey::new(vec![
            SurveyStation::without_tvd(0.0, 0.0),
            SurveyStation::without_tvd(2000.0, 0.0),
            SurveyStation::without_tvd(4000.0, 45.0),
            SurveyStation::without_tvd(8000.0, 45.0),
        ]);
        let profile = single_pipe(8000.0, 20.0);
        let r = solve_profile(&profile, &survey, &conditions(true), 8000.0, 0.0, &TorqueDragSettings::default());

        assert!(r.converged);
        assert!(r.total_drag_lbf > 0.0);
        assert!(r.peak_torque_ftlbf > 0.0);
        // Drag takes load off the hook
        assert!((r.surface_force_lbf - (r.free_weight_lbf + r.total_drag_lbf)).abs() < 0.01);
        // Torque is largest at surface and zero at the bit
        assert_eq!(r.points.last().unwrap().torque_ftlbf, 0.0);
        assert_eq!(r.points[0].torque_ftlbf, r.peak_torque_ftlbf);
        // Open-hole friction is larger than cased per unit normal force
        assert!(r.peak_drag_lbf > 0.0);
    }

    #[test]
    fn test_gap_in_string_carries_no_weight() {
        let profile = StringProfile {
            intervals: vec![
                StringInterval {
                    top_md_ft: 0.0,
                    bottom_md_ft: 1000.0,
                    weight_ppf: 20.0,
                    od_in: 5.0,
                },
                StringInterval {
                    top_md_ft: 2000.0,
                    bottom_md_ft: 3000.0,
                    weight_ppf: 20.0,
                    od_in: 5.0,
                },
            ],
        };
        let r = solve_profile(
            &profile,
            &Survey::vertical(),
            &conditions(false),
            3000.0,
            0.0,
            &TorqueDragSettings::default(),
        );
        assert!((r.free_weight_lbf - 2000.0 * 20.0 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_job_targets_liner_shoe() {
        let job = JobInput::example();
        let g = crate::calculations::geometry::resolve(&job).unwrap();
        let r = solve(&job, &g, &Survey::new(job.survey.clone()), &TorqueDragSettings::default());
        assert_eq!(r.target_md_ft, g.liner_shoe_md_ft);
        assert_eq!(r.points.last().unwrap().md_ft, g.liner_shoe_md_ft);
        assert!(r.converged);
        assert!(!r.rotating);
        assert_eq!(r.peak_torque_ftlbf, 0.0);
    }
}
