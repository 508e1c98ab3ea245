use std::collections::HashMap;

use crate::animation::tween::{Property, Target, Tween};

/// Where a tween is inserted in a timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// At the end of everything added so far.
    End,
    At(f32),
    /// At a named label. A missing label is created at the current end.
    Label(String),
}

impl Position {
    pub fn label(name: impl Into<String>) -> Self {
        Position::Label(name.into())
    }
}

#[derive(Debug, Clone)]
struct PlacedTween {
    start: f32,
    tween: Tween,
}

impl PlacedTween {
    fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// A set of tweens laid out on a shared time axis. Playback is not tied to
/// wall-clock time: callers seek to a progress value.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    labels: HashMap<String, f32>,
    tweens: Vec<PlacedTween>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineValue {
    pub target: Target,
    pub property: Property,
    pub value: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(&self) -> f32 {
        self.tweens
            .iter()
            .map(PlacedTween::end)
            .fold(0.0, f32::max)
    }

    pub fn add_label(&mut self, name: impl Into<String>) -> &mut Self {
        let end = self.duration();
        self.labels.insert(name.into(), end);
        self
    }

    pub fn add(&mut self, tween: Tween, position: Position) -> &mut Self {
        let start = match position {
            Position::End => self.duration(),
            Position::At(time) => time.max(0.0),
            Position::Label(name) => match self.labels.get(&name) {
                Some(&time) => time,
                None => {
                    let end = self.duration();
                    self.labels.insert(name, end);
                    end
                }
            },
        };

        self.tweens.push(PlacedTween { start, tween });
        self
    }

    /// Values of every animated property with the playhead at `progress`
    /// (`0.0..=1.0` of the timeline duration). Later tweens win when they
    /// animate the same property of the same target.
    pub fn seek(&self, progress: f32) -> Vec<TimelineValue> {
        let duration = self.duration();
        let time = progress.clamp(0.0, 1.0) * duration;

        let mut values: Vec<TimelineValue> = Vec::new();

        for placed in &self.tweens {
            let local = if placed.tween.duration > 0.0 {
                (time - placed.start) / placed.tween.duration
            } else if time >= placed.start {
                1.0
            } else {
                0.0
            };

            for (property, value) in placed.tween.sample(local) {
                match values
                    .iter_mut()
                    .find(|existing| existing.target == placed.tween.target && existing.property == property)
                {
                    // A later tween only overrides once it has started
                    Some(existing) if time >= placed.start => existing.value = value,
                    Some(_) => {}
                    None => values.push(TimelineValue {
                        target: placed.tween.target.clone(),
                        property,
                        value,
                    }),
                }
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease::Ease;

    fn fade(selector: &str) -> Tween {
        Tween::new(Target::element(selector))
            .to(Property::Opacity, 0.0)
            .ease(Ease::Linear)
    }

    #[test]
    fn label_shared_tweens_run_in_parallel() {
        let mut timeline = Timeline::new();
        timeline
            .add_label("start")
            .add(fade(".a"), Position::label("start"))
            .add(fade(".b"), Position::label("start"))
            .add(fade(".c"), Position::label("start"));

        assert_eq!(timeline.duration(), 1.0);

        let values = timeline.seek(0.25);
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|value| (value.value - 0.75).abs() < 1e-6));
    }

    #[test]
    fn end_position_sequences_tweens() {
        let mut timeline = Timeline::new();
        timeline
            .add(fade(".a"), Position::End)
            .add(fade(".b"), Position::End);

        assert_eq!(timeline.duration(), 2.0);

        let values = timeline.seek(0.25);
        let a = values.iter().find(|v| v.target == Target::element(".a")).unwrap();
        let b = values.iter().find(|v| v.target == Target::element(".b")).unwrap();
        assert!((a.value - 0.5).abs() < 1e-6);
        assert_eq!(b.value, 1.0);
    }

    #[test]
    fn missing_label_is_created_at_end() {
        let mut timeline = Timeline::new();
        timeline.add(fade(".a"), Position::End);
        timeline.add(fade(".b"), Position::label("later"));

        assert_eq!(timeline.duration(), 2.0);

        let values = timeline.seek(0.5);
        let b = values.iter().find(|v| v.target == Target::element(".b")).unwrap();
        assert_eq!(b.value, 1.0);
    }

    #[test]
    fn later_tween_overrides_same_property_once_started() {
        let mut timeline = Timeline::new();
        timeline.add(fade(".a"), Position::End).add(
            Tween::new(Target::element(".a"))
                .from_to(Property::Opacity, 0.0, 1.0)
                .ease(Ease::Linear),
            Position::End,
        );

        let early = timeline.seek(0.25);
        assert!((early[0].value - 0.5).abs() < 1e-6);

        let late = timeline.seek(0.75);
        assert_eq!(late.len(), 1);
        assert!((late[0].value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn seek_is_clamped() {
        let mut timeline = Timeline::new();
        timeline.add(fade(".a"), Position::End);

        assert_eq!(timeline.seek(-1.0)[0].value, 1.0);
        assert_eq!(timeline.seek(5.0)[0].value, 0.0);
    }
}
