//! # Engine Constants
//!
//! Timing, canvas and naming constants shared by every crate.
//!
//! **NOTE:** The canvas is a fixed reference frame. Hosts with a different
//! output resolution still receive coordinates in this space.

// =============================================================================
// TIMING
// =============================================================================

/// Tick rate of the effect scheduler (updates per second).
pub const TICK_RATE: u32 = 60;

/// Fixed simulation step advanced per scheduler tick, in seconds.
pub const TICK_STEP_SECS: f64 = 0.016;

/// Interval of the sweep that drops completed effect instances, in seconds.
pub const REAP_INTERVAL_SECS: f64 = 0.1;

// =============================================================================
// CANVAS
// =============================================================================

/// Reference canvas width in pixels.
pub const CANVAS_WIDTH: f32 = 1920.0;

/// Reference canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 1080.0;

/// Edge length of an obstruction overlay's placement footprint.
pub const OVERLAY_FOOTPRINT: f32 = 200.0;

// =============================================================================
// DONATION SCALING
// =============================================================================

/// Donation amount (reference currency) that maps to intensity 1.0.
pub const INTENSITY_REFERENCE_AMOUNT: f64 = 10_000.0;

/// Upper bound on the accumulated shrink of the main source, in percent.
pub const MAX_SHRINK_PERCENT: f64 = 80.0;

/// Reference-currency value assigned to a regular chat comment.
pub const REGULAR_COMMENT_AMOUNT: f64 = 100.0;

// =============================================================================
// RESERVED NAMES
// =============================================================================

/// Name of a solid-colour obstruction overlay.
pub const OBSTRUCTION_NAME: &str = "Obstruction";

/// Name of an image obstruction overlay.
pub const OBSTRUCTION_IMAGE_NAME: &str = "Obstruction Image";

/// Name of a video obstruction overlay.
pub const OBSTRUCTION_VIDEO_NAME: &str = "Obstruction Video";

/// Substrings that mark a scene object as an obstruction during the orphan sweep.
pub const OBSTRUCTION_MARKERS: [&str; 2] = ["Obstruction", "obstruction"];

/// Prefix of every object or filter created by a running effect.
pub const TEMP_PREFIX: &str = "temp_";
