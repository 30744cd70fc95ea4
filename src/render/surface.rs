use indexmap::IndexMap;

use crate::core::Rect;
use crate::error::ChartResult;
use crate::render::{ImagePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Retained-surface group handle.
///
/// Each rendering unit draws into its own group; units managing several
/// independent clip regions (one per series) use the index discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId {
    name: &'static str,
    index: u32,
}

impl GroupId {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, index: 0 }
    }

    #[must_use]
    pub const fn indexed(name: &'static str, index: u32) -> Self {
        Self { name, index }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Contract implemented by any drawing backend.
///
/// The engine emits validated pixel-space primitives grouped per rendering
/// unit; compositing, rasterization and color-ramp work happen behind this
/// trait so chart logic stays independent of the output technology.
pub trait DrawSurface {
    fn draw_line(&mut self, group: GroupId, line: LinePrimitive) -> ChartResult<()>;
    fn draw_rect(&mut self, group: GroupId, rect: RectPrimitive) -> ChartResult<()>;
    fn draw_image(&mut self, group: GroupId, image: ImagePrimitive) -> ChartResult<()>;
    fn draw_text(&mut self, group: GroupId, text: TextPrimitive) -> ChartResult<()>;

    /// Assigns or removes the clip region applied to a whole group.
    fn set_clip(&mut self, group: GroupId, clip: Option<Rect>) -> ChartResult<()>;

    /// Removes every primitive previously drawn into `group`.
    fn clear_group(&mut self, group: GroupId) -> ChartResult<()>;

    /// Removes every primitive on the surface.
    fn clear_all(&mut self) -> ChartResult<()>;
}

/// Per-group bookkeeping recorded by [`NullSurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
    pub lines: usize,
    pub rects: usize,
    pub images: usize,
    pub texts: usize,
    pub clip: Option<Rect>,
    pub clear_calls: usize,
}

impl GroupStats {
    #[must_use]
    pub fn primitives(&self) -> usize {
        self.lines + self.rects + self.images + self.texts
    }
}

/// No-op surface used by tests and headless engine usage.
///
/// It still validates every primitive so tests catch invalid geometry before
/// a real backend is introduced, and it records per-group counters so
/// minimal-re-render behavior is observable.
#[derive(Debug, Default)]
pub struct NullSurface {
    groups: IndexMap<GroupId, GroupStats>,
    pub clear_all_calls: usize,
}

impl NullSurface {
    #[must_use]
    pub fn group(&self, group: GroupId) -> Option<&GroupStats> {
        self.groups.get(&group)
    }

    #[must_use]
    pub fn primitives_in(&self, group: GroupId) -> usize {
        self.groups
            .get(&group)
            .map(GroupStats::primitives)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn total_primitives(&self) -> usize {
        self.groups.values().map(GroupStats::primitives).sum()
    }

    fn stats_mut(&mut self, group: GroupId) -> &mut GroupStats {
        self.groups.entry(group).or_default()
    }
}

impl DrawSurface for NullSurface {
    fn draw_line(&mut self, group: GroupId, line: LinePrimitive) -> ChartResult<()> {
        line.validate()?;
        self.stats_mut(group).lines += 1;
        Ok(())
    }

    fn draw_rect(&mut self, group: GroupId, rect: RectPrimitive) -> ChartResult<()> {
        rect.validate()?;
        self.stats_mut(group).rects += 1;
        Ok(())
    }

    fn draw_image(&mut self, group: GroupId, image: ImagePrimitive) -> ChartResult<()> {
        image.validate()?;
        self.stats_mut(group).images += 1;
        Ok(())
    }

    fn draw_text(&mut self, group: GroupId, text: TextPrimitive) -> ChartResult<()> {
        text.validate()?;
        self.stats_mut(group).texts += 1;
        Ok(())
    }

    fn set_clip(&mut self, group: GroupId, clip: Option<Rect>) -> ChartResult<()> {
        self.stats_mut(group).clip = clip;
        Ok(())
    }

    fn clear_group(&mut self, group: GroupId) -> ChartResult<()> {
        let stats = self.stats_mut(group);
        stats.lines = 0;
        stats.rects = 0;
        stats.images = 0;
        stats.texts = 0;
        stats.clear_calls += 1;
        Ok(())
    }

    fn clear_all(&mut self) -> ChartResult<()> {
        for stats in self.groups.values_mut() {
            stats.lines = 0;
            stats.rects = 0;
            stats.images = 0;
            stats.texts = 0;
        }
        self.clear_all_calls += 1;
        Ok(())
    }
}
