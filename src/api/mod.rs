mod engine;
mod scheduler;
pub mod units;

pub use engine::ChartEngine;
pub use scheduler::{
    ComponentScheduler, RenderUnit, SceneServices, UnitKind, affected_units,
};
