//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! ```rust
//! # use clusterview_pipeline::{Pipeline, PipelineError, RenderConfig};
//! # fn run() -> Result<(), PipelineError> {
//! let scene = Pipeline::new("Centroids:\n0 0\n", "Dataset:\n1 1\n", RenderConfig::default())
//!     .parse()?
//!     .assign()?
//!     .outline()?
//!     .into_scene();
//! assert_eq!(scene.clusters.len(), 1);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state
//! (or `Result` for fallible stages), carrying what later stages need.

use crate::parse::{ParsedCoordinates, parse_coordinates};
use crate::scene::{Scene, build_scene};
use crate::types::{InputKind, Partition, PipelineError, Point, RenderConfig};

/// Entry point for the staged pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Start a run over the raw centroid and point file contents.
    pub fn new(
        centroid_text: impl Into<String>,
        point_text: impl Into<String>,
        config: RenderConfig,
    ) -> Pending {
        Pending {
            config,
            centroid_text: centroid_text.into(),
            point_text: point_text.into(),
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing; call .parse() to continue"]
pub struct Pending {
    config: RenderConfig,
    centroid_text: String,
    point_text: String,
}

impl Pending {
    /// The configuration this run uses.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Parse both texts and advance to the [`Parsed`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the configuration is
    /// invalid, and [`PipelineError::EmptyInput`] if either text holds
    /// no valid coordinate line (centroids are checked first).
    pub fn parse(self) -> Result<Parsed, PipelineError> {
        self.config.validate()?;

        let centroids = parse_coordinates(&self.centroid_text, &self.config.centroid_header);
        if centroids.points.is_empty() {
            return Err(PipelineError::EmptyInput(InputKind::Centroids));
        }
        let points = parse_coordinates(&self.point_text, &self.config.point_header);
        if points.points.is_empty() {
            return Err(PipelineError::EmptyInput(InputKind::Points));
        }

        Ok(Parsed {
            config: self.config,
            centroids,
            points,
        })
    }
}

// ───────────────────────── Stage 1: Parsed ───────────────────────────

/// Pipeline state after parsing. Both coordinate lists are non-empty.
#[must_use = "pipeline stages are consumed by advancing; call .assign() to continue"]
pub struct Parsed {
    config: RenderConfig,
    centroids: ParsedCoordinates,
    points: ParsedCoordinates,
}

impl Parsed {
    /// Parsed centroid file.
    #[must_use]
    pub const fn centroids(&self) -> &ParsedCoordinates {
        &self.centroids
    }

    /// Parsed point file.
    #[must_use]
    pub const fn points(&self) -> &ParsedCoordinates {
        &self.points
    }

    /// Assign every point to its nearest centroid.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] if there are no centroids,
    /// which parsing already rules out.
    pub fn assign(self) -> Result<Assigned, PipelineError> {
        let partition = crate::assign::assign(&self.centroids.points, &self.points.points)?;
        Ok(Assigned {
            config: self.config,
            skipped_lines: self.centroids.malformed_count + self.points.malformed_count,
            centroids: self.centroids.points,
            partition,
        })
    }
}

// ───────────────────────── Stage 2: Assigned ─────────────────────────

/// Pipeline state after nearest-centroid assignment.
#[must_use = "pipeline stages are consumed by advancing; call .outline() to continue"]
pub struct Assigned {
    config: RenderConfig,
    centroids: Vec<Point>,
    partition: Partition,
    skipped_lines: usize,
}

impl Assigned {
    /// Centroids in input order.
    #[must_use]
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// The assignment result.
    #[must_use]
    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Malformed lines skipped while parsing both files.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Compute boundaries and styling for every cluster.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] if there are no centroids.
    pub fn outline(self) -> Result<Outlined, PipelineError> {
        let scene = build_scene(&self.partition, &self.centroids)?;
        Ok(Outlined {
            config: self.config,
            partition: self.partition,
            scene,
        })
    }
}

// ───────────────────────── Stage 3: Outlined ─────────────────────────

/// Final pipeline state: the renderable scene.
pub struct Outlined {
    config: RenderConfig,
    partition: Partition,
    scene: Scene,
}

impl Outlined {
    /// The configuration this run used.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The assignment the scene was built from.
    #[must_use]
    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The renderable scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Consume the pipeline and return the scene.
    #[must_use]
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}
