//! Procedural race track generation
//!
//! Builds a track from a random program of straights, curves and grades,
//! turns it into banked reference frames, lays road, barriers, pads, tunnel,
//! buildings, obstacles and plazas along them, and splits the merged mesh
//! into pieces bounded by a vertex budget and an LOD radius.
//!
//! # Example
//! ```no_run
//! use trackgen_core::{TrackConfig, generate, emit};
//! use trackgen_core::sink::MemorySink;
//!
//! let mut config = TrackConfig::default();
//! config.track.seed = 7;
//!
//! let track = generate(&config)?;
//! let mut sink = MemorySink::default();
//! let report = emit(&track, &mut sink);
//! println!("{} pieces", report.exported.len());
//! # Ok::<(), trackgen_core::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod frames;
pub mod markers;
pub mod materials;
pub mod mesh;
pub mod partition;
pub mod pipeline;
pub mod program;
pub mod recenter;
pub mod sink;

pub use config::TrackConfig;
pub use error::{ConfigError, GeometryError};
pub use frames::{Frame, FrameParams, integrate_frames};
pub use markers::{Checkpoint, Marker, MarkerKind};
pub use materials::{Material, MaterialTable};
pub use pipeline::{EmitReport, Track, TrackStats, emit, generate};
pub use program::{PathCommand, generate_program};
pub use recenter::{AnchorMode, Piece};
pub use sink::MeshSink;
