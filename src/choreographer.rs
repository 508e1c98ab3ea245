use std::collections::HashMap;

use glam::Vec2;

use crate::animation::{
    Anchor, Ease, Edge, Playhead, Position, Property, Scrub, ScrollRange, ScrollTriggerSpec,
    Target, Timeline, TriggerEnd, Tween,
};
use crate::config::ChoreographyConfig;
use crate::page::{self, PageLayout, StyleSheet};
use crate::scene_graph::ObjectId;
use crate::viewport::{Breakpoint, Viewport};
use crate::visual_slot::{VisualReady, VisualSlot};

pub const MOUSE_X_VAR: &str = "--mouse-x";
pub const MOUSE_Y_VAR: &str = "--mouse-y";

const HERO_LABEL: &str = "start";

fn hero_trigger() -> ScrollTriggerSpec {
    ScrollTriggerSpec {
        trigger: page::HERO.to_string(),
        start: Anchor::new(Edge::Top, Edge::Top),
        end: TriggerEnd::Anchor(Anchor::new(Edge::Bottom, Edge::Top)),
        pin: true,
    }
}

fn resolve_range(layout: &PageLayout, spec: &ScrollTriggerSpec) -> ScrollRange {
    match layout.element(&spec.trigger) {
        Some(element) => ScrollRange::resolve(spec, &element.rect, layout.viewport.y),
        None => {
            log::warn!("Trigger element {} missing from page", spec.trigger);
            ScrollRange::inert()
        }
    }
}

/// A timeline whose playhead follows the scroll position through a trigger.
struct ScrubbedTimeline {
    timeline: Timeline,
    spec: ScrollTriggerSpec,
    range: ScrollRange,
    scrub: Scrub,
    progress: f32,
}

impl ScrubbedTimeline {
    fn new(timeline: Timeline, spec: ScrollTriggerSpec, scrub: Scrub, layout: &PageLayout) -> Self {
        let range = resolve_range(layout, &spec);

        Self {
            timeline,
            spec,
            range,
            scrub,
            progress: 0.0,
        }
    }

    fn refresh(&mut self, layout: &PageLayout) {
        self.range = resolve_range(layout, &self.spec);
    }

    fn update(&mut self, scroll: f32, dt: f32) {
        let target = self.range.progress(scroll);
        self.progress = self.scrub.step(self.progress, target, dt);
    }

    fn write(&self, styles: &mut StyleSheet, scroll: f32) {
        if self.spec.pin {
            styles.set_pin_offset(&self.spec.trigger, self.range.pin_offset(scroll));
        }

        for value in self.timeline.seek(self.progress) {
            if let Target::Element(selector) = &value.target {
                styles.apply(selector, value.property, value.value);
            }
        }
    }

    fn visual_value(&self, property: Property) -> Option<f32> {
        self.timeline
            .seek(self.progress)
            .into_iter()
            .find(|value| value.target == Target::Visual && value.property == property)
            .map(|value| value.value)
    }
}

/// Waits for the visual object and then ties its depth-axis rotation to
/// the hero scroll. Moves from `Waiting` to `Attached` at most once.
enum RotationTieIn {
    Waiting(VisualReady),
    Attached {
        object: ObjectId,
        scrubbed: ScrubbedTimeline,
    },
}

impl RotationTieIn {
    fn update(&mut self, config: &ChoreographyConfig, layout: &PageLayout, scroll: f32, dt: f32) {
        match self {
            RotationTieIn::Waiting(ready) => {
                if let Some(object) = ready.try_take() {
                    log::info!("Attaching scroll rotation to visual object");

                    let mut timeline = Timeline::new();
                    timeline.add(
                        Tween::new(Target::Visual).to(Property::RotationZ, config.scroll_tilt),
                        Position::End,
                    );

                    let mut scrubbed = ScrubbedTimeline::new(
                        timeline,
                        ScrollTriggerSpec {
                            pin: false,
                            ..hero_trigger()
                        },
                        Scrub::from_lag(config.scrub_lag_secs),
                        layout,
                    );
                    scrubbed.update(scroll, dt);

                    *self = RotationTieIn::Attached { object, scrubbed };
                }
            }
            RotationTieIn::Attached { scrubbed, .. } => scrubbed.update(scroll, dt),
        }
    }

    fn refresh(&mut self, layout: &PageLayout) {
        if let RotationTieIn::Attached { scrubbed, .. } = self {
            scrubbed.refresh(layout);
        }
    }
}

struct CardReveal {
    selector: String,
    range: ScrollRange,
    playhead: Playhead,
    tween: Tween,
}

impl CardReveal {
    fn update(&mut self, scroll: f32, dt: f32) {
        // Play on enter, reverse when scrolled back above the threshold
        if scroll >= self.range.start {
            self.playhead.play();
        } else {
            self.playhead.reverse();
        }
        self.playhead.advance(dt);
    }

    fn write(&self, styles: &mut StyleSheet) {
        for (property, value) in self.tween.sample(self.playhead.progress()) {
            styles.apply(&self.selector, property, value);
        }
    }
}

/// Section behaviour for the current breakpoint.
enum SectionStrategy {
    Horizontal(ScrubbedTimeline),
    Reveals(Vec<CardReveal>),
}

impl SectionStrategy {
    fn build(config: &ChoreographyConfig, layout: &PageLayout) -> Self {
        match layout.breakpoint {
            Breakpoint::Wide => {
                let strip_width = layout
                    .element(page::HORIZONTAL_SECTION)
                    .map(|element| element.rect.size.x)
                    .unwrap_or(layout.viewport.x);
                let travel = (strip_width - layout.viewport.x).max(0.0);

                let mut timeline = Timeline::new();
                timeline.add(
                    Tween::new(Target::element(page::HORIZONTAL_SECTION))
                        .to(Property::X, -travel)
                        .ease(Ease::Linear),
                    Position::End,
                );

                SectionStrategy::Horizontal(ScrubbedTimeline::new(
                    timeline,
                    ScrollTriggerSpec {
                        trigger: page::HORIZONTAL_WRAPPER.to_string(),
                        start: Anchor::new(Edge::Top, Edge::Top),
                        end: TriggerEnd::Distance(config.horizontal_scroll_length),
                        pin: true,
                    },
                    Scrub::from_lag(config.scrub_lag_secs),
                    layout,
                ))
            }
            Breakpoint::Compact => {
                let spec = |selector: &str| ScrollTriggerSpec {
                    trigger: selector.to_string(),
                    start: Anchor::new(Edge::Top, Edge::Fraction(config.reveal_threshold)),
                    end: TriggerEnd::Distance(0.0),
                    pin: false,
                };

                let reveals = layout
                    .cards()
                    .map(|card| CardReveal {
                        selector: card.selector.clone(),
                        range: resolve_range(layout, &spec(&card.selector)),
                        playhead: Playhead::new(config.reveal_duration_secs),
                        tween: Tween::new(Target::element(card.selector.clone()))
                            .from_to(Property::Y, config.reveal_offset, 0.0)
                            .from_to(Property::Opacity, 0.0, 1.0)
                            .duration(config.reveal_duration_secs)
                            .ease(Ease::PowerOut2),
                    })
                    .collect();

                SectionStrategy::Reveals(reveals)
            }
        }
    }

    /// Keeps playback state across a rebuild for the same breakpoint.
    fn carry_over(&mut self, previous: SectionStrategy) {
        match (self, previous) {
            (SectionStrategy::Horizontal(next), SectionStrategy::Horizontal(old)) => {
                next.progress = old.progress;
            }
            (SectionStrategy::Reveals(next), SectionStrategy::Reveals(old)) => {
                for (next, old) in next.iter_mut().zip(old) {
                    next.playhead = old.playhead;
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, scroll: f32, dt: f32) {
        match self {
            SectionStrategy::Horizontal(scrubbed) => scrubbed.update(scroll, dt),
            SectionStrategy::Reveals(reveals) => {
                for reveal in reveals {
                    reveal.update(scroll, dt);
                }
            }
        }
    }

    fn write(&self, styles: &mut StyleSheet, scroll: f32) {
        match self {
            SectionStrategy::Horizontal(scrubbed) => scrubbed.write(styles, scroll),
            SectionStrategy::Reveals(reveals) => {
                for reveal in reveals {
                    reveal.write(styles);
                }
            }
        }
    }
}

fn px(value: f32) -> String {
    format!("{}px", (value * 100.0).round() / 100.0)
}

/// Drives every scroll-linked animation of the page and publishes the
/// resulting styles once per frame.
pub struct ScrollChoreographer {
    config: ChoreographyConfig,
    layout: PageLayout,
    hero: ScrubbedTimeline,
    rotation: RotationTieIn,
    section: SectionStrategy,
    pointer: HashMap<String, Vec2>,
    styles: StyleSheet,
    scroll: f32,
}

impl ScrollChoreographer {
    pub fn new(config: ChoreographyConfig, viewport: &Viewport, visual: &VisualSlot) -> Self {
        let breakpoint = Breakpoint::for_width(viewport.width, config.breakpoint_width);
        let layout = PageLayout::build(viewport, breakpoint, &config);

        let mut timeline = Timeline::new();
        timeline
            .add_label(HERO_LABEL)
            .add(
                Tween::new(Target::element(page::HERO_LINES[0]))
                    .to(Property::X, -config.hero_lateral_offset)
                    .to(Property::Opacity, 0.0),
                Position::label(HERO_LABEL),
            )
            .add(
                Tween::new(Target::element(page::HERO_LINES[1]))
                    .to(Property::X, config.hero_lateral_offset)
                    .to(Property::Opacity, 0.0),
                Position::label(HERO_LABEL),
            )
            .add(
                Tween::new(Target::element(page::HERO_LINES[2]))
                    .to(Property::Scale, config.hero_scale)
                    .to(Property::Opacity, 0.0),
                Position::label(HERO_LABEL),
            )
            .add(
                Tween::new(Target::element(page::HERO_INFO))
                    .to(Property::Y, -config.hero_rise_offset)
                    .to(Property::Opacity, 0.0),
                Position::label(HERO_LABEL),
            );

        let hero = ScrubbedTimeline::new(
            timeline,
            hero_trigger(),
            Scrub::from_lag(config.scrub_lag_secs),
            &layout,
        );
        let section = SectionStrategy::build(&config, &layout);

        log::info!("Page layout {:?} at {}px", breakpoint, viewport.width);

        let mut choreographer = Self {
            config,
            layout,
            hero,
            rotation: RotationTieIn::Waiting(visual.subscribe()),
            section,
            pointer: HashMap::new(),
            styles: StyleSheet::default(),
            scroll: 0.0,
        };
        choreographer.write_styles();
        choreographer
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.layout.breakpoint
    }

    pub fn max_scroll(&self) -> f32 {
        self.layout.max_scroll()
    }

    /// Re-lays the page for a new viewport. Crossing the breakpoint swaps
    /// the section strategy; otherwise trigger ranges are recomputed.
    pub fn resize(&mut self, viewport: &Viewport) {
        let breakpoint = Breakpoint::for_width(viewport.width, self.config.breakpoint_width);
        let previous = self.layout.breakpoint;
        self.layout = PageLayout::build(viewport, breakpoint, &self.config);

        self.hero.refresh(&self.layout);
        self.rotation.refresh(&self.layout);

        let section = SectionStrategy::build(&self.config, &self.layout);
        let previous_section = std::mem::replace(&mut self.section, section);

        if breakpoint != previous {
            log::info!("Switching page layout {:?} -> {:?}", previous, breakpoint);
            self.pointer.clear();
        } else {
            self.section.carry_over(previous_section);
        }

        self.write_styles();
    }

    pub fn update(&mut self, scroll: f32, dt: f32) {
        self.scroll = scroll;

        self.hero.update(scroll, dt);
        self.rotation.update(&self.config, &self.layout, scroll, dt);
        self.section.update(scroll, dt);

        self.write_styles();
    }

    /// Publishes the pointer position relative to the hovered card.
    pub fn pointer_moved(&mut self, position: Vec2) {
        let hovered = self.layout.cards().find_map(|card| {
            let rect = self
                .layout
                .screen_rect(&card.selector, self.scroll, &self.styles)?;
            rect.contains(position)
                .then(|| (card.selector.clone(), position - rect.min))
        });

        if let Some((selector, local)) = hovered {
            self.styles.set_var(&selector, MOUSE_X_VAR, px(local.x));
            self.styles.set_var(&selector, MOUSE_Y_VAR, px(local.y));
            self.pointer.insert(selector, local);
        }
    }

    /// The object the scroll rotation is attached to, once it is.
    pub fn rotation_target(&self) -> Option<ObjectId> {
        match &self.rotation {
            RotationTieIn::Waiting(_) => None,
            RotationTieIn::Attached { object, .. } => Some(*object),
        }
    }

    /// Current depth-axis rotation for the visual object, once attached.
    pub fn visual_rotation_z(&self) -> Option<f32> {
        match &self.rotation {
            RotationTieIn::Waiting(_) => None,
            RotationTieIn::Attached { scrubbed, .. } => scrubbed.visual_value(Property::RotationZ),
        }
    }

    pub fn horizontal_range(&self) -> Option<ScrollRange> {
        match &self.section {
            SectionStrategy::Horizontal(scrubbed) => Some(scrubbed.range),
            SectionStrategy::Reveals(_) => None,
        }
    }

    pub fn reveal_count(&self) -> usize {
        match &self.section {
            SectionStrategy::Horizontal(_) => 0,
            SectionStrategy::Reveals(reveals) => reveals.len(),
        }
    }

    fn write_styles(&mut self) {
        let mut styles = StyleSheet::default();

        self.hero.write(&mut styles, self.scroll);
        self.section.write(&mut styles, self.scroll);

        for (selector, local) in &self.pointer {
            styles.set_var(selector, MOUSE_X_VAR, px(local.x));
            styles.set_var(selector, MOUSE_Y_VAR, px(local.y));
        }

        self.styles = styles;
    }
}

#[cfg(test)]
mod tests {
    use id_arena::Arena;

    use super::*;
    use crate::scene_graph::Object3D;

    const FRAME: f32 = 1.0 / 60.0;

    fn choreographer(width: f32, height: f32) -> (ScrollChoreographer, VisualSlot) {
        let slot = VisualSlot::new();
        let viewport = Viewport::new(width, height, 1.0, 2.0);
        let choreographer =
            ScrollChoreographer::new(ChoreographyConfig::default(), &viewport, &slot);
        (choreographer, slot)
    }

    fn settle(choreographer: &mut ScrollChoreographer, scroll: f32) {
        for _ in 0..600 {
            choreographer.update(scroll, FRAME);
        }
    }

    #[test]
    fn hero_segments_fade_together() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        settle(&mut choreographer, 400.0);

        let styles = choreographer.styles();
        let opacities: Vec<f32> = page::HERO_LINES
            .iter()
            .chain([&page::HERO_INFO])
            .map(|selector| styles.style(selector).opacity)
            .collect();

        assert!(opacities.iter().all(|&opacity| opacity > 0.0 && opacity < 1.0));
        assert!(opacities.windows(2).all(|pair| (pair[0] - pair[1]).abs() < 1e-6));

        assert!(styles.style(page::HERO_LINES[0]).translate.x < 0.0);
        assert!(styles.style(page::HERO_LINES[1]).translate.x > 0.0);
        assert!(styles.style(page::HERO_LINES[2]).scale > 1.0);
        assert!(styles.style(page::HERO_INFO).translate.y < 0.0);
    }

    #[test]
    fn missing_trigger_element_never_plays() {
        let (choreographer, _slot) = choreographer(1200.0, 800.0);
        let spec = ScrollTriggerSpec {
            trigger: ".not-on-page".to_string(),
            ..hero_trigger()
        };

        let range = resolve_range(choreographer.layout(), &spec);

        for scroll in [0.0, 800.0, choreographer.max_scroll()] {
            assert_eq!(range.progress(scroll), 0.0);
            assert_eq!(range.pin_offset(scroll), 0.0);
        }
    }

    #[test]
    fn hero_is_pinned_while_scrolling_through_it() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        choreographer.update(300.0, FRAME);

        let hero = choreographer
            .layout()
            .screen_rect(page::HERO, 300.0, choreographer.styles())
            .unwrap();
        assert_eq!(hero.min.y, 0.0);
    }

    #[test]
    fn scrub_lags_behind_scroll() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        choreographer.update(800.0, FRAME);

        let opacity = choreographer.styles().style(page::HERO_INFO).opacity;
        assert!(opacity > 0.5, "playhead jumped to {opacity}");

        settle(&mut choreographer, 800.0);
        assert_eq!(choreographer.styles().style(page::HERO_INFO).opacity, 0.0);
    }

    #[test]
    fn rotation_waits_for_visual_then_attaches_once() {
        let (mut choreographer, slot) = choreographer(1200.0, 800.0);
        for _ in 0..10 {
            choreographer.update(0.0, FRAME);
        }
        assert_eq!(choreographer.rotation_target(), None);
        assert_eq!(choreographer.visual_rotation_z(), None);

        let mut arena: Arena<Object3D> = Arena::new();
        let object = arena.alloc(Object3D::named("visual"));
        slot.resolve(object).unwrap();

        choreographer.update(0.0, FRAME);
        assert_eq!(choreographer.rotation_target(), Some(object));

        settle(&mut choreographer, 800.0);
        assert_eq!(choreographer.rotation_target(), Some(object));
        let tilt = choreographer.visual_rotation_z().unwrap();
        assert!((tilt - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn wide_viewport_pins_horizontal_section() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        assert_eq!(choreographer.breakpoint(), Breakpoint::Wide);
        assert_eq!(choreographer.reveal_count(), 0);

        let range = choreographer.horizontal_range().unwrap();
        let middle = (range.start + range.end) * 0.5;
        settle(&mut choreographer, middle);

        let styles = choreographer.styles();
        assert!(styles.is_pinned(page::HORIZONTAL_WRAPPER));
        assert_eq!(styles.pin_offset(page::HORIZONTAL_WRAPPER), middle - range.start);
        assert!(styles.style(page::HORIZONTAL_SECTION).translate.x < 0.0);
    }

    #[test]
    fn compact_viewport_registers_card_reveals() {
        let (mut choreographer, _slot) = choreographer(800.0, 800.0);
        assert_eq!(choreographer.breakpoint(), Breakpoint::Compact);
        assert!(choreographer.horizontal_range().is_none());
        assert_eq!(choreographer.reveal_count(), 5);
        assert!(!choreographer.styles().is_pinned(page::HORIZONTAL_WRAPPER));

        let first = page::card(0);
        assert_eq!(choreographer.styles().style(&first).opacity, 0.0);

        let card_top = choreographer.layout().element(&first).unwrap().rect.min.y;
        settle(&mut choreographer, card_top);

        let style = choreographer.styles().style(&first);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.translate.y, 0.0);
    }

    #[test]
    fn crossing_breakpoint_swaps_section_strategy() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        assert!(choreographer.horizontal_range().is_some());

        choreographer.resize(&Viewport::new(800.0, 800.0, 1.0, 2.0));
        assert!(choreographer.horizontal_range().is_none());
        assert_eq!(choreographer.reveal_count(), 5);

        choreographer.resize(&Viewport::new(1200.0, 800.0, 1.0, 2.0));
        assert!(choreographer.horizontal_range().is_some());
        assert_eq!(choreographer.reveal_count(), 0);
    }

    #[test]
    fn resize_within_breakpoint_keeps_revealed_cards() {
        let (mut choreographer, _slot) = choreographer(800.0, 800.0);
        let first = page::card(0);
        let card_top = choreographer.layout().element(&first).unwrap().rect.min.y;
        settle(&mut choreographer, card_top);

        choreographer.resize(&Viewport::new(700.0, 800.0, 1.0, 2.0));

        assert_eq!(choreographer.breakpoint(), Breakpoint::Compact);
        assert_eq!(choreographer.styles().style(&first).opacity, 1.0);
    }

    #[test]
    fn pointer_position_is_published_relative_to_card() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        let range = choreographer.horizontal_range().unwrap();
        settle(&mut choreographer, range.start);

        let card = page::card(0);
        let rect = choreographer
            .layout()
            .screen_rect(&card, range.start, choreographer.styles())
            .unwrap();

        choreographer.pointer_moved(rect.min + Vec2::new(50.0, 30.0));

        assert_eq!(choreographer.styles().var(&card, MOUSE_X_VAR), Some("50px"));
        assert_eq!(choreographer.styles().var(&card, MOUSE_Y_VAR), Some("30px"));

        // Survives the next frame
        choreographer.update(range.start, FRAME);
        assert_eq!(choreographer.styles().var(&card, MOUSE_X_VAR), Some("50px"));
    }

    #[test]
    fn pointer_outside_cards_publishes_nothing() {
        let (mut choreographer, _slot) = choreographer(1200.0, 800.0);
        choreographer.pointer_moved(Vec2::new(5.0, 5.0));

        for index in 0..5 {
            assert_eq!(choreographer.styles().var(&page::card(index), MOUSE_X_VAR), None);
        }
    }
}
