//! orchart: a declarative, option-driven charting engine.
//!
//! Callers submit partial configuration (grids, axes, visual-map legends,
//! series); the engine merges it into a normalized option, computes the
//! minimal change-set, propagates dirty state along the unit dependency
//! graph and re-renders only the affected units through a pluggable draw
//! surface.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, UnitKind};
pub use core::{ChartOption, Finder, InputOption};
pub use error::{ChartError, ChartResult};
pub use render::NullSurface;
