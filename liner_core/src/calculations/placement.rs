//! # Fluid Placement
//!
//! Converts pumped volumes into depth intervals on both sides of the liner.
//!
//! ## Annulus (bottom-up)
//!
//! Segments are filled from the bottom: rat hole, open-hole annulus, then
//! the overlap inside the previous casing. Cements go first in pumped order,
//! then spacers. Nothing is placed above the top of the liner; whatever does
//! not fit is reported as excess for its batch. Mud occupies everything
//! above the last placed fluid.
//!
//! ## Inside (top-down)
//!
//! The path runs through the work string, the liner down to the landing
//! collar, then the shoe track. Spacers, cements and displacement fill it in
//! that order. Volume that overruns the shoe is reported as overflow. The
//! remainder of the path holds mud.
//!
//! Placement never fails: zero-volume batches and zero-capacity segments
//! are skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::geometry::WellGeometry;
use crate::calculations::status::JobWarning;
use crate::equations::capacity_annular;
use crate::job::{FluidBatch, JobInput};
use crate::survey::Survey;

/// Volumes below this are treated as fully placed (bbl)
const VOLUME_EPS_BBL: f64 = 1e-9;

/// What a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidKind {
    Spacer,
    Cement,
    Displacement,
    Mud,
}

/// Which side of the string a column sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLocation {
    Annulus,
    Inside,
}

/// A fluid occupying a contiguous MD interval of one path segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedColumn {
    pub label: String,
    pub kind: FluidKind,
    pub location: ColumnLocation,
    /// Path segment the column sits in (e.g., "Open hole", "DP1")
    pub segment: String,
    pub density_ppg: f64,
    pub top_md_ft: f64,
    pub bottom_md_ft: f64,
    pub top_tvd_ft: f64,
    pub bottom_tvd_ft: f64,
    pub volume_bbl: f64,
}

impl PlacedColumn {
    pub fn length_ft(&self) -> f64 {
        self.bottom_md_ft - self.top_md_ft
    }

    pub fn vertical_height_ft(&self) -> f64 {
        self.bottom_tvd_ft - self.top_tvd_ft
    }
}

/// Where one pumped batch ended up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlacement {
    pub label: String,
    pub kind: FluidKind,
    pub pumped_bbl: f64,
    pub placed_bbl: f64,
    /// Volume that did not fit (bbl)
    pub excess_bbl: f64,
}

/// Result of both placement passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// Annular columns from TD to surface, mud included
    pub annulus: Vec<PlacedColumn>,

    /// Inside columns from surface to the shoe, mud included
    pub inside: Vec<PlacedColumn>,

    pub annulus_batches: Vec<BatchPlacement>,
    pub inside_batches: Vec<BatchPlacement>,

    /// Top of the shallowest cement placed in the annulus
    pub top_of_cement_md_ft: Option<f64>,
    pub top_of_cement_tvd_ft: Option<f64>,

    pub cement_pumped_bbl: f64,
    pub cement_placed_bbl: f64,
    pub cement_excess_bbl: f64,
    pub spacer_excess_bbl: f64,

    /// Inside volume that overran the shoe (bbl)
    pub inside_overflow_bbl: f64,

    /// Annular cement covers the landing-collar depth
    pub reached_landing_collar: bool,

    pub warnings: Vec<JobWarning>,
}

impl PlacementResult {
    /// Cement columns on both sides of the string
    pub fn cement_segments(&self) -> impl Iterator<Item = &PlacedColumn> {
        self.annulus
            .iter()
            .chain(self.inside.iter())
            .filter(|c| c.kind == FluidKind::Cement)
    }
}

/// A stretch of flow path with constant capacity
#[derive(Debug, Clone)]
struct PathSegment {
    name: String,
    top_md: f64,
    bottom_md: f64,
    capacity: f64,
}

impl PathSegment {
    fn new(name: impl Into<String>, top_md: f64, bottom_md: f64, capacity: f64) -> Self {
        PathSegment {
            name: name.into(),
            top_md,
            bottom_md,
            capacity,
        }
    }

    fn length(&self) -> f64 {
        (self.bottom_md - self.top_md).max(0.0)
    }

    fn volume(&self) -> f64 {
        self.length() * self.capacity
    }

    fn usable(&self) -> bool {
        self.length() > 0.0 && self.capacity > 0.0
    }
}

/// Shared builder so every column gets its TVDs the same way
struct ColumnBuilder<'a> {
    survey: &'a Survey,
    location: ColumnLocation,
}

impl ColumnBuilder<'_> {
    #[allow(clippy::too_many_arguments)]
    fn column(
        &self,
        label: &str,
        kind: FluidKind,
        segment: &str,
        density_ppg: f64,
        top_md: f64,
        bottom_md: f64,
        volume_bbl: f64,
    ) -> PlacedColumn {
        PlacedColumn {
            label: label.to_string(),
            kind,
            location: self.location,
            segment: segment.to_string(),
            density_ppg,
            top_md_ft: top_md,
            bottom_md_ft: bottom_md,
            top_tvd_ft: self.survey.tvd_at(top_md),
            bottom_tvd_ft: self.survey.tvd_at(bottom_md),
            volume_bbl,
        }
    }
}

/// Place every pumped batch in the annulus and inside the string.
pub fn place(input: &JobInput, geometry: &WellGeometry, survey: &Survey) -> PlacementResult {
    let mud = input.mud_density_ppg;
    let mut warnings = Vec::new();

    // ---- Annulus ----
    let annulus_segments = annulus_path(geometry);
    let annulus_order = input
        .fluids
        .cements
        .iter()
        .map(|b| (b, FluidKind::Cement))
        .chain(input.fluids.spacers.iter().map(|b| (b, FluidKind::Spacer)));
    let (mut annulus, annulus_batches) = fill_bottom_up(
        &annulus_segments,
        annulus_order,
        &ColumnBuilder {
            survey,
            location: ColumnLocation::Annulus,
        },
        mud,
    );
    annulus.extend(mud_above_liner_top(input, geometry, survey));

    for batch in annulus_batches.iter().filter(|b| b.excess_bbl > VOLUME_EPS_BBL) {
        warn!(batch = %batch.label, excess_bbl = batch.excess_bbl, "Batch does not fit below the liner top");
        warnings.push(JobWarning::AnnulusOverflow {
            label: batch.label.clone(),
            excess_bbl: batch.excess_bbl,
        });
    }

    let top_of_cement = annulus
        .iter()
        .filter(|c| c.kind == FluidKind::Cement)
        .map(|c| c.top_md_ft)
        .reduce(f64::min);
    let reached_landing_collar = top_of_cement.is_some_and(|toc| toc <= geometry.landing_collar_md_ft);

    let sum_by = |batches: &[BatchPlacement], kind: FluidKind, f: fn(&BatchPlacement) -> f64| -> f64 {
        batches.iter().filter(|b| b.kind == kind).map(f).sum()
    };
    let cement_pumped = sum_by(&annulus_batches, FluidKind::Cement, |b| b.pumped_bbl);
    let cement_placed = sum_by(&annulus_batches, FluidKind::Cement, |b| b.placed_bbl);
    let cement_excess = sum_by(&annulus_batches, FluidKind::Cement, |b| b.excess_bbl);
    let spacer_excess = sum_by(&annulus_batches, FluidKind::Spacer, |b| b.excess_bbl);

    // ---- Inside ----
    let inside_segments = inside_path(input, geometry);
    let inside_order = input
        .fluids
        .spacers
        .iter()
        .map(|b| (b, FluidKind::Spacer))
        .chain(input.fluids.cements.iter().map(|b| (b, FluidKind::Cement)))
        .chain(input.fluids.displacement.iter().map(|b| (b, FluidKind::Displacement)));
    let (inside, inside_batches) = fill_top_down(
        &inside_segments,
        inside_order,
        &ColumnBuilder {
            survey,
            location: ColumnLocation::Inside,
        },
        mud,
    );

    let mut inside_overflow = 0.0;
    for batch in inside_batches.iter().filter(|b| b.excess_bbl > VOLUME_EPS_BBL) {
        warn!(batch = %batch.label, overflow_bbl = batch.excess_bbl, "Batch overruns the liner shoe");
        inside_overflow += batch.excess_bbl;
        warnings.push(JobWarning::InsideOverflow {
            label: batch.label.clone(),
            overflow_bbl: batch.excess_bbl,
        });
    }

    debug!(
        toc_md = ?top_of_cement,
        cement_placed_bbl = cement_placed,
        cement_excess_bbl = cement_excess,
        inside_overflow_bbl = inside_overflow,
        "Placement complete"
    );

    PlacementResult {
        annulus,
        inside,
        annulus_batches,
        inside_batches,
        top_of_cement_md_ft: top_of_cement,
        top_of_cement_tvd_ft: top_of_cement.map(|md| survey.tvd_at(md)),
        cement_pumped_bbl: cement_pumped,
        cement_placed_bbl: cement_placed,
        cement_excess_bbl: cement_excess,
        spacer_excess_bbl: spacer_excess,
        inside_overflow_bbl: inside_overflow,
        reached_landing_collar,
        warnings,
    }
}

/// Annular segments, deepest first
fn annulus_path(g: &WellGeometry) -> Vec<PathSegment> {
    vec![
        PathSegment::new("Rat hole", g.liner_shoe_md_ft, g.total_depth_md_ft, g.rat_hole_capacity),
        PathSegment::new("Open hole", g.casing_shoe_md_ft, g.liner_shoe_md_ft, g.open_hole_annular_capacity),
        PathSegment::new("Casing overlap", g.top_of_liner_md_ft, g.casing_shoe_md_ft, g.overlap_annular_capacity),
    ]
}

/// Inside segments, shallowest first
fn inside_path(input: &JobInput, g: &WellGeometry) -> Vec<PathSegment> {
    let mut path: Vec<PathSegment> = input
        .work_string
        .iter()
        .map(|s| PathSegment::new(s.label.clone(), s.top_md_ft, s.bottom_md_ft, s.internal_capacity()))
        .collect();
    path.push(PathSegment::new(
        "Liner",
        g.top_of_liner_md_ft,
        g.landing_collar_md_ft,
        g.liner_internal_capacity,
    ));
    path.push(PathSegment::new(
        "Shoe track",
        g.landing_collar_md_ft,
        g.liner_shoe_md_ft,
        g.liner_internal_capacity,
    ));
    path
}

/// Pack batches upward from the bottom of `segments[0]`.
fn fill_bottom_up<'b>(
    segments: &[PathSegment],
    batches: impl Iterator<Item = (&'b FluidBatch, FluidKind)>,
    builder: &ColumnBuilder<'_>,
    mud_ppg: f64,
) -> (Vec<PlacedColumn>, Vec<BatchPlacement>) {
    let mut columns = Vec::new();
    let mut records = Vec::new();

    let mut idx = 0;
    let mut cursor = segments.first().map(|s| s.bottom_md).unwrap_or(0.0);

    for (batch, kind) in batches.filter(|(b, _)| b.is_pumped()) {
        let mut remaining = batch.volume_bbl;

        while remaining > VOLUME_EPS_BBL && idx < segments.len() {
            let seg = &segments[idx];
            if !seg.usable() || cursor <= seg.top_md {
                idx += 1;
                if let Some(next) = segments.get(idx) {
                    cursor = next.bottom_md;
                }
                continue;
            }

            let room_ft = cursor - seg.top_md;
            let need_ft = remaining / seg.capacity;
            let (height, volume) = if need_ft < room_ft {
                (need_ft, remaining)
            } else {
                (room_ft, room_ft * seg.capacity)
            };

            let top = cursor - height;
            columns.push(builder.column(&batch.label, kind, &seg.name, batch.density_ppg, top, cursor, volume));
            remaining -= volume;
            cursor = top;
        }

        let excess = remaining.max(0.0);
        records.push(BatchPlacement {
            label: batch.label.clone(),
            kind,
            pumped_bbl: batch.volume_bbl,
            placed_bbl: batch.volume_bbl - excess,
            excess_bbl: excess,
        });
    }

    // Mud above the last placed fluid, segment by segment
    while idx < segments.len() {
        let seg = &segments[idx];
        if seg.usable() && cursor > seg.top_md {
            let bottom = cursor.min(seg.bottom_md);
            columns.push(builder.column(
                "Mud",
                FluidKind::Mud,
                &seg.name,
                mud_ppg,
                seg.top_md,
                bottom,
                (bottom - seg.top_md) * seg.capacity,
            ));
        }
        idx += 1;
        if let Some(next) = segments.get(idx) {
            cursor = next.bottom_md;
        }
    }

    (columns, records)
}

/// Pack batches downward from the top of `segments[0]`.
fn fill_top_down<'b>(
    segments: &[PathSegment],
    batches: impl Iterator<Item = (&'b FluidBatch, FluidKind)>,
    builder: &ColumnBuilder<'_>,
    mud_ppg: f64,
) -> (Vec<PlacedColumn>, Vec<BatchPlacement>) {
    let mut columns = Vec::new();
    let mut records = Vec::new();

    let mut idx = 0;
    // Volume already used in segments[idx]
    let mut used = 0.0;

    for (batch, kind) in batches.filter(|(b, _)| b.is_pumped()) {
        let mut remaining = batch.volume_bbl;

        while remaining > VOLUME_EPS_BBL && idx < segments.len() {
            let seg = &segments[idx];
            let free = seg.volume() - used;
            if !seg.usable() || free <= VOLUME_EPS_BBL {
                idx += 1;
                used = 0.0;
                continue;
            }

            let take = remaining.min(free);
            let top = seg.top_md + used / seg.capacity;
            let bottom = if take < free {
                seg.top_md + (used + take) / seg.capacity
            } else {
                seg.bottom_md
            };
            columns.push(builder.column(&batch.label, kind, &seg.name, batch.density_ppg, top, bottom, take));
            used += take;
            remaining -= take;
        }

        let excess = remaining.max(0.0);
        records.push(BatchPlacement {
            label: batch.label.clone(),
            kind,
            pumped_bbl: batch.volume_bbl,
            placed_bbl: batch.volume_bbl - excess,
            excess_bbl: excess,
        });
    }

    // Base mud below the last pumped fluid
    while idx < segments.len() {
        let seg = &segments[idx];
        let free = seg.volume() - used;
        if seg.usable() && free > VOLUME_EPS_BBL {
            let top = seg.top_md + used / seg.capacity;
            columns.push(builder.column("Mud", FluidKind::Mud, &seg.name, mud_ppg, top, seg.bottom_md, free));
        }
        idx += 1;
        used = 0.0;
    }

    (columns, records)
}

/// Mud between the casing and the work string, surface to the liner top.
fn mud_above_liner_top(input: &JobInput, g: &WellGeometry, survey: &Survey) -> Option<PlacedColumn> {
    if g.top_of_liner_md_ft <= 0.0 {
        return None;
    }
    let volume: f64 = input
        .work_string
        .iter()
        .map(|s| {
            let top = s.top_md_ft.max(0.0);
            let bottom = s.bottom_md_ft.min(g.top_of_liner_md_ft);
            (bottom - top).max(0.0) * capacity_annular(input.casing.id_in, s.od_in).max(0.0)
        })
        .sum();
    let builder = ColumnBuilder {
        survey,
        location: ColumnLocation::Annulus,
    };
    Some(builder.column(
        "Mud",
        FluidKind::Mud,
        "Above liner top",
        input.mud_density_ppg,
        0.0,
        g.top_of_liner_md_ft,
        volume,
    ))
}
