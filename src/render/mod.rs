mod primitives;
mod surface;

pub use primitives::{
    Color, ImagePrimitive, LinePrimitive, Placement, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use surface::{DrawSurface, GroupId, GroupStats, NullSurface};
