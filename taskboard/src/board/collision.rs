//! Collision detection: which droppable is the dragged card over?
//!
//! Hosts register a rectangle per droppable (columns, cards, trash) and
//! feed the pointer position and the dragged card's rectangle each frame.
//! The resolver picks one [`DropTarget`] per frame; the previous frame's
//! target is only a fallback when nothing is hit, or a tie-breaker.

use super::drag::DropTarget;

/// A point in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width; non-positive widths make an empty rectangle.
    pub width: f64,
    /// Height; non-positive heights make an empty rectangle.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area, zero for degenerate rectangles.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Returns `true` if `point` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Area shared with `other`.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        w.max(0.0) * h.max(0.0)
    }

    /// Intersection over union, in `0.0..=1.0`.
    #[must_use]
    pub fn overlap_ratio(&self, other: &Self) -> f64 {
        let shared = self.intersection_area(other);
        let union = self.area() + other.area() - shared;
        if union > 0.0 { shared / union } else { 0.0 }
    }
}

/// A registered drop target and where it is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    /// What dropping here means.
    pub target: DropTarget,
    /// Its on-screen bounds.
    pub rect: Rect,
}

impl Droppable {
    /// Creates a droppable.
    #[must_use]
    pub const fn new(target: DropTarget, rect: Rect) -> Self {
        Self { target, rect }
    }
}

/// Picks the hovered target frame by frame.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    last: Option<DropTarget>,
}

impl CollisionResolver {
    /// Creates a resolver with no remembered target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The target chosen on the previous frame.
    #[must_use]
    pub const fn last(&self) -> Option<&DropTarget> {
        self.last.as_ref()
    }

    /// Forgets the remembered target. Called when a drag ends.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Resolves the hovered target for one frame.
    ///
    /// Pointer containment is tried first and the smallest containing
    /// rectangle wins, so a card beats the column around it. Without a
    /// pointer hit the dragged rectangle's best overlap wins. The previous
    /// target only breaks ties between equally good candidates. With no
    /// candidates the previous target is returned while it is still
    /// registered.
    pub fn resolve(
        &mut self,
        pointer: Option<Point>,
        dragged: Rect,
        droppables: &[Droppable],
    ) -> Option<DropTarget> {
        // Lower score is better.
        let under_pointer: Vec<(&Droppable, f64)> = pointer
            .map(|p| {
                droppables
                    .iter()
                    .filter(|d| d.rect.contains(p))
                    .map(|d| (d, d.rect.area()))
                    .collect()
            })
            .unwrap_or_default();

        let chosen = if under_pointer.is_empty() {
            let overlapping: Vec<(&Droppable, f64)> = droppables
                .iter()
                .map(|d| (d, -d.rect.overlap_ratio(&dragged)))
                .filter(|(_, score)| *score < 0.0)
                .collect();
            self.best(&overlapping)
        } else {
            self.best(&under_pointer)
        };

        let resolved = chosen.or_else(|| {
            self.last
                .as_ref()
                .filter(|last| droppables.iter().any(|d| &d.target == *last))
                .cloned()
        });
        if resolved != self.last {
            tracing::trace!(drop_target = ?resolved, "collision target changed");
        }
        self.last.clone_from(&resolved);
        resolved
    }

    /// The lowest-scoring candidate, preferring the previous target on a tie.
    fn best(&self, scored: &[(&Droppable, f64)]) -> Option<DropTarget> {
        let top = scored.iter().map(|(_, score)| *score).min_by(f64::total_cmp)?;
        let tied = || scored.iter().filter(move |(_, score)| score.total_cmp(&top).is_eq());
        self.last
            .as_ref()
            .filter(|last| tied().any(|(d, _)| &d.target == *last))
            .cloned()
            .or_else(|| tied().next().map(|(d, _)| d.target.clone()))
    }
}
