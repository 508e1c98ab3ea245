use crate::page::Rect;

/// A point on an element or on the viewport, measured from its top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Fraction of the height, `0.0` = top.
    Fraction(f32),
}

impl Edge {
    fn offset(self, height: f32) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => height * 0.5,
            Edge::Bottom => height,
            Edge::Fraction(fraction) => height * fraction,
        }
    }
}

/// "When `element` edge of the trigger meets `viewport` edge of the screen".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    fn scroll_offset(&self, trigger: &Rect, viewport_height: f32) -> f32 {
        trigger.min.y + self.element.offset(trigger.size.y) - self.viewport.offset(viewport_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEnd {
    Anchor(Anchor),
    /// Fixed scroll distance after the start, in logical pixels.
    Distance(f32),
}

/// How playback follows the scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scrub {
    Immediate,
    /// The playhead trails the scroll position, catching up over roughly
    /// `lag_secs`.
    Smooth { lag_secs: f32 },
}

impl Scrub {
    pub fn from_lag(lag_secs: f32) -> Self {
        if lag_secs > 0.0 {
            Scrub::Smooth { lag_secs }
        } else {
            Scrub::Immediate
        }
    }

    pub fn step(self, current: f32, target: f32, dt: f32) -> f32 {
        match self {
            Scrub::Immediate => target,
            Scrub::Smooth { lag_secs } => {
                // ~95% of the gap is closed after lag_secs
                let remaining = (-3.0 * dt.max(0.0) / lag_secs).exp();
                let next = target + (current - target) * remaining;
                if (next - target).abs() < 1e-4 {
                    target
                } else {
                    next
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTriggerSpec {
    pub trigger: String,
    pub start: Anchor,
    pub end: TriggerEnd,
    pub pin: bool,
}

/// Scroll offsets between which a trigger is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub start: f32,
    pub end: f32,
}

impl ScrollRange {
    pub fn resolve(spec: &ScrollTriggerSpec, trigger: &Rect, viewport_height: f32) -> Self {
        let start = spec.start.scroll_offset(trigger, viewport_height);
        let end = match spec.end {
            TriggerEnd::Anchor(anchor) => anchor.scroll_offset(trigger, viewport_height),
            TriggerEnd::Distance(distance) => start + distance,
        };

        Self {
            start,
            end: end.max(start),
        }
    }

    /// A range that never starts, for triggers whose element is missing.
    pub const fn inert() -> Self {
        Self {
            start: f32::MAX,
            end: f32::MAX,
        }
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    pub fn progress(&self, scroll: f32) -> f32 {
        if self.length() <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }

        ((scroll - self.start) / self.length()).clamp(0.0, 1.0)
    }

    /// Downward shift that keeps a pinned element fixed on screen while
    /// the range plays, then carries it up with the page afterwards.
    pub fn pin_offset(&self, scroll: f32) -> f32 {
        (scroll - self.start).clamp(0.0, self.length())
    }
}
