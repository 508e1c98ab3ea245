pub mod ease;
pub mod playhead;
pub mod scroll_trigger;
pub mod timeline;
pub mod tween;

pub use ease::Ease;
pub use playhead::Playhead;
pub use scroll_trigger::{Anchor, Edge, Scrub, ScrollRange, ScrollTriggerSpec, TriggerEnd};
pub use timeline::{Position, Timeline, TimelineValue};
pub use tween::{Property, Target, Tween};
