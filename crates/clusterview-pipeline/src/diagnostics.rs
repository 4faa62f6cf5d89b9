//! Run diagnostics: timing and counts for each pipeline stage.
//!
//! [`process_with_diagnostics`] drives the staged [`Pipeline`] and
//! records, per stage, the wall-clock duration and a few counts useful
//! when inspecting noisy input files (how many lines were malformed,
//! how many centroids ended up empty, how many hulls degenerated).
//!
//! Time is read through the [`Clock`] trait so this crate stays free of
//! platform time sources; the CLI supplies a `std::time::Instant` clock.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hull::Boundary;
use crate::parse::ParsedCoordinates;
use crate::pipeline::Pipeline;
use crate::scene::Scene;
use crate::types::{PipelineError, RenderConfig};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Stage 1: parsing both input texts.
    pub parse: StageDiagnostics,
    /// Stage 2: nearest-centroid assignment.
    pub assign: StageDiagnostics,
    /// Stage 3: boundary computation and styling.
    pub outline: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts.
    pub summary: RunSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Parsing metrics for both files.
    Parse {
        /// Lines in the centroid text.
        centroid_lines: usize,
        /// Valid centroids.
        centroid_count: usize,
        /// Malformed centroid lines (skipped).
        centroid_malformed: usize,
        /// Lines in the point text.
        point_lines: usize,
        /// Valid points.
        point_count: usize,
        /// Malformed point lines (skipped).
        point_malformed: usize,
    },
    /// Assignment metrics.
    Assign {
        /// Points assigned.
        point_count: usize,
        /// Centroids available.
        centroid_count: usize,
        /// Centroids that received at least one point.
        cluster_count: usize,
        /// Centroids that received no point.
        empty_centroids: usize,
        /// Point-to-centroid distance evaluations.
        distance_evaluations: usize,
        /// Smallest non-empty cluster.
        min_cluster_size: usize,
        /// Largest cluster.
        max_cluster_size: usize,
    },
    /// Outline metrics.
    Outline {
        /// Clusters drawn as a convex polygon.
        polygon_count: usize,
        /// Clusters drawn as a segment (including degenerate fallbacks).
        segment_count: usize,
        /// Clusters drawn without a boundary.
        point_only_count: usize,
        /// Clusters whose 3+ points were collinear.
        degenerate_count: usize,
    },
}

/// High-level summary for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Valid centroids read.
    pub centroid_count: usize,
    /// Valid points read.
    pub point_count: usize,
    /// Malformed lines skipped across both files.
    pub skipped_lines: usize,
    /// Non-empty clusters drawn.
    pub cluster_count: usize,
    /// Clusters drawn with a fallback boundary.
    pub degenerate_count: usize,
}

/// Run the full pipeline, timing each stage with `clock`.
///
/// # Errors
///
/// Same as [`crate::process`].
pub fn process_with_diagnostics<C: Clock>(
    centroid_text: &str,
    point_text: &str,
    config: &RenderConfig,
    clock: &C,
) -> Result<(Scene, RunDiagnostics), PipelineError> {
    let run_start = clock.now();

    let start = clock.now();
    let parsed = Pipeline::new(centroid_text, point_text, config.clone()).parse()?;
    let parse = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: parse_metrics(parsed.centroids(), parsed.points()),
    };

    let start = clock.now();
    let assigned = parsed.assign()?;
    let assign = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: assign_metrics(assigned.centroids().len(), assigned.partition()),
    };
    let skipped_lines = assigned.skipped_lines();

    let start = clock.now();
    let scene = assigned.outline()?.into_scene();
    let outline = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: outline_metrics(&scene),
    };

    let summary = RunSummary {
        centroid_count: scene.centroids.len(),
        point_count: scene.clusters.iter().map(|c| c.points.len()).sum(),
        skipped_lines,
        cluster_count: scene.clusters.len(),
        degenerate_count: scene.degenerate_count(),
    };

    let diagnostics = RunDiagnostics {
        parse,
        assign,
        outline,
        total_duration: clock.elapsed(&run_start),
        summary,
    };
    Ok((scene, diagnostics))
}

fn parse_metrics(centroids: &ParsedCoordinates, points: &ParsedCoordinates) -> StageMetrics {
    StageMetrics::Parse {
        centroid_lines: centroids.line_count,
        centroid_count: centroids.points.len(),
        centroid_malformed: centroids.malformed_count,
        point_lines: points.line_count,
        point_count: points.points.len(),
        point_malformed: points.malformed_count,
    }
}

fn assign_metrics(centroid_count: usize, partition: &crate::Partition) -> StageMetrics {
    let sizes: Vec<usize> = partition.sizes().into_iter().map(|(_, n)| n).collect();
    let point_count = partition.total_points();
    StageMetrics::Assign {
        point_count,
        centroid_count,
        cluster_count: partition.len(),
        empty_centroids: centroid_count.saturating_sub(partition.len()),
        distance_evaluations: point_count * centroid_count,
        min_cluster_size: sizes.iter().copied().min().unwrap_or(0),
        max_cluster_size: sizes.iter().copied().max().unwrap_or(0),
    }
}

fn outline_metrics(scene: &Scene) -> StageMetrics {
    let mut polygon_count = 0;
    let mut segment_count = 0;
    let mut point_only_count = 0;
    for cluster in &scene.clusters {
        match cluster.boundary {
            Boundary::Polygon(_) => polygon_count += 1,
            Boundary::Segment(..) => segment_count += 1,
            Boundary::None => point_only_count += 1,
        }
    }
    StageMetrics::Outline {
        polygon_count,
        segment_count,
        point_only_count,
        degenerate_count: scene.degenerate_count(),
    }
}

impl RunDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Run Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Centroids: {}  |  Points: {}  |  Skipped lines: {}",
            self.summary.centroid_count, self.summary.point_count, self.summary.skipped_lines,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in [
            ("Parse", &self.parse),
            ("Assign", &self.assign),
            ("Outline", &self.outline),
        ] {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Clusters: {}  |  Degenerate hulls: {}",
            self.summary.cluster_count, self.summary.degenerate_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Parse {
            centroid_count,
            centroid_malformed,
            point_count,
            point_malformed,
            ..
        } => format!(
            "{centroid_count} centroids ({centroid_malformed} skipped), {point_count} points ({point_malformed} skipped)",
        ),
        StageMetrics::Assign {
            cluster_count,
            empty_centroids,
            distance_evaluations,
            min_cluster_size,
            max_cluster_size,
            ..
        } => format!(
            "{cluster_count} clusters, {empty_centroids} empty, {distance_evaluations} distances (size min={min_cluster_size} max={max_cluster_size})",
        ),
        StageMetrics::Outline {
            polygon_count,
            segment_count,
            point_only_count,
            degenerate_count,
        } => format!(
            "{polygon_count} hulls, {segment_count} segments, {point_only_count} bare, {degenerate_count} degenerate",
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::types::InputKind;

    /// Clock that advances one millisecond per reading.
    struct TickClock(Cell<u64>);

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.0.get() - since)
        }
    }

    fn run(centroids: &str, points: &str) -> Result<(Scene, RunDiagnostics), PipelineError> {
        process_with_diagnostics(
            centroids,
            points,
            &RenderConfig::default(),
            &TickClock(Cell::new(0)),
        )
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        assert!((duration_ms(d) - 1234.0).abs() < 0.01);
    }

    #[test]
    fn counts_are_collected() {
        let (scene, diag) = run(
            "Centroids:\n0 0\n10 10\n50 50\n",
            "Dataset:\n1 1\n2 2\n9 9\n11 11\n5 5\noops\n",
        )
        .unwrap();

        assert_eq!(scene.clusters.len(), 2);
        assert_eq!(
            diag.parse.metrics,
            StageMetrics::Parse {
                centroid_lines: 4,
                centroid_count: 3,
                centroid_malformed: 0,
                point_lines: 7,
                point_count: 5,
                point_malformed: 1,
            }
        );
        assert_eq!(
            diag.assign.metrics,
            StageMetrics::Assign {
                point_count: 5,
                centroid_count: 3,
                cluster_count: 2,
                empty_centroids: 1,
                distance_evaluations: 15,
                min_cluster_size: 2,
                max_cluster_size: 3,
            }
        );
        assert_eq!(
            diag.outline.metrics,
            StageMetrics::Outline {
                polygon_count: 0,
                segment_count: 2,
                point_only_count: 0,
                degenerate_count: 1,
            }
        );
        assert_eq!(diag.summary.skipped_lines, 1);
        assert_eq!(diag.summary.degenerate_count, 1);
    }

    #[test]
    fn durations_come_from_the_clock() {
        let (_, diag) = run("0 0\n", "1 1\n").unwrap();
        assert!(diag.parse.duration > Duration::ZERO);
        assert!(diag.total_duration >= diag.parse.duration + diag.assign.duration);
    }

    #[test]
    fn empty_input_propagates() {
        let err = run("Centroids:\n\n", "1 1\n").unwrap_err();
        assert_eq!(err, PipelineError::EmptyInput(InputKind::Centroids));
    }

    #[test]
    fn report_mentions_every_stage() {
        let (_, diag) = run("0 0\n10 0\n", "1 1\n2 5\n3 0\n9 9\n").unwrap();
        let report = diag.report();
        assert!(report.contains("Run Diagnostics Report"));
        for stage in ["Parse", "Assign", "Outline"] {
            assert!(report.contains(stage), "missing {stage} in:\n{report}");
        }
    }

    #[test]
    fn json_round_trip_keeps_durations() {
        let (_, diag) = run("0 0\n", "1 1\n").unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        let back: RunDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.parse.metrics, diag.parse.metrics);
        assert_eq!(back.summary, diag.summary);
        assert!((back.total_duration.as_secs_f64() - diag.total_duration.as_secs_f64()).abs() < 1e-9);
    }
}
