//! The page structure the choreography animates: named elements with
//! document-space rectangles, and the per-frame styles applied to them.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use crate::animation::Property;
use crate::config::ChoreographyConfig;
use crate::viewport::{Breakpoint, Viewport};

pub const HERO: &str = ".hero";
pub const HERO_LINES: [&str; 3] = [".hero-line-1", ".hero-line-2", ".hero-line-3"];
pub const HERO_INFO: &str = ".hero-info";
pub const HORIZONTAL_WRAPPER: &str = ".horizontal-wrapper";
pub const HORIZONTAL_SECTION: &str = ".horizontal-section";
pub const FOOTER: &str = ".footer";

const HERO_COPY: [&str; 3] = ["SHAPE", "THE NEXT", "DIMENSION"];
const INFO_COPY: &str = "Scroll to explore";
const CARD_COPY: [&str; 5] = ["Realtime", "Procedural", "Responsive", "Tactile", "Luminous"];

const CARD_GAP: f32 = 40.0;
const COMPACT_MARGIN: f32 = 24.0;
const COMPACT_CARD_HEIGHT: f32 = 320.0;

pub fn card(index: usize) -> String {
    format!(".card:nth-child({})", index + 1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max()).all()
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.min + offset, self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub selector: String,
    /// Untransformed rectangle in document coordinates.
    pub rect: Rect,
    /// Ancestor whose translation also moves this element.
    pub container: Option<String>,
    /// Pinned section this element rides along with.
    pub pin_group: Option<String>,
    pub text: Option<String>,
}

impl Element {
    fn new(selector: impl Into<String>, rect: Rect) -> Self {
        Self {
            selector: selector.into(),
            rect,
            container: None,
            pin_group: None,
            text: None,
        }
    }

    fn in_container(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self
    }

    fn pinned_with(mut self, section: &str) -> Self {
        self.pin_group = Some(section.to_string());
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub breakpoint: Breakpoint,
    pub viewport: Vec2,
    pub document_height: f32,
    elements: Vec<Element>,
    card_count: usize,
}

impl PageLayout {
    /// Lays the page out top to bottom. Pinned sections are followed by a
    /// spacer as long as their pin, so content below arrives after the pin.
    pub fn build(viewport: &Viewport, breakpoint: Breakpoint, config: &ChoreographyConfig) -> Self {
        let (width, height) = (viewport.width, viewport.height);
        let mut elements = Vec::new();

        // Hero: pinned for its own height
        let hero = Rect::new(Vec2::ZERO, Vec2::new(width, height));
        elements.push(Element::new(HERO, hero).pinned_with(HERO));

        for (index, (selector, copy)) in HERO_LINES.iter().zip(HERO_COPY).enumerate() {
            let rect = Rect::new(
                Vec2::new(width * 0.1, height * (0.22 + 0.13 * index as f32)),
                Vec2::new(width * 0.8, height * 0.12),
            );
            elements.push(Element::new(*selector, rect).pinned_with(HERO).with_text(copy));
        }

        let info = Rect::new(
            Vec2::new(width * 0.2, height * 0.72),
            Vec2::new(width * 0.6, height * 0.12),
        );
        elements.push(Element::new(HERO_INFO, info).pinned_with(HERO).with_text(INFO_COPY));

        let mut cursor = hero.max().y + hero.size.y;

        let card_count = config.card_count;
        let section_top = cursor;

        match breakpoint {
            Breakpoint::Wide => {
                let card_size = Vec2::new((width * 0.35).min(480.0), height * 0.6);
                let strip_width =
                    card_count as f32 * (card_size.x + CARD_GAP) + CARD_GAP;
                let wrapper = Rect::new(Vec2::new(0.0, section_top), Vec2::new(width, height));
                let strip = Rect::new(
                    Vec2::new(0.0, section_top),
                    Vec2::new(strip_width.max(width), height),
                );

                elements.push(Element::new(HORIZONTAL_WRAPPER, wrapper).pinned_with(HORIZONTAL_WRAPPER));
                elements.push(Element::new(HORIZONTAL_SECTION, strip).pinned_with(HORIZONTAL_WRAPPER));

                for index in 0..card_count {
                    let min = Vec2::new(
                        CARD_GAP + index as f32 * (card_size.x + CARD_GAP),
                        section_top + (height - card_size.y) * 0.5,
                    );
                    elements.push(
                        Element::new(card(index), Rect::new(min, card_size))
                            .in_container(HORIZONTAL_SECTION)
                            .pinned_with(HORIZONTAL_WRAPPER)
                            .with_text(CARD_COPY[index % CARD_COPY.len()]),
                    );
                }

                cursor = wrapper.max().y + config.horizontal_scroll_length;
            }
            Breakpoint::Compact => {
                let card_size = Vec2::new(width - 2.0 * COMPACT_MARGIN, COMPACT_CARD_HEIGHT);
                let section_height =
                    card_count as f32 * (card_size.y + COMPACT_MARGIN) + COMPACT_MARGIN;
                let wrapper = Rect::new(
                    Vec2::new(0.0, section_top),
                    Vec2::new(width, section_height),
                );

                elements.push(Element::new(HORIZONTAL_WRAPPER, wrapper));
                elements.push(Element::new(HORIZONTAL_SECTION, wrapper));

                for index in 0..card_count {
                    let min = Vec2::new(
                        COMPACT_MARGIN,
                        section_top + COMPACT_MARGIN + index as f32 * (card_size.y + COMPACT_MARGIN),
                    );
                    elements.push(
                        Element::new(card(index), Rect::new(min, card_size))
                            .in_container(HORIZONTAL_SECTION)
                            .with_text(CARD_COPY[index % CARD_COPY.len()]),
                    );
                }

                cursor = wrapper.max().y;
            }
        }

        let footer = Rect::new(Vec2::new(0.0, cursor), Vec2::new(width, height * 0.5));
        elements.push(Element::new(FOOTER, footer));

        Self {
            breakpoint,
            viewport: viewport.size(),
            document_height: footer.max().y,
            elements,
            card_count,
        }
    }

    pub fn element(&self, selector: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| element.selector == selector)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn cards(&self) -> impl Iterator<Item = &Element> + '_ {
        (0..self.card_count).filter_map(|index| self.element(&card(index)))
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.y).max(0.0)
    }

    /// Where an element currently sits on screen, including pins and the
    /// translations of itself and its container.
    pub fn screen_rect(&self, selector: &str, scroll: f32, styles: &StyleSheet) -> Option<Rect> {
        let element = self.element(selector)?;
        let mut offset = Vec2::new(0.0, -scroll);

        if let Some(section) = &element.pin_group {
            offset.y += styles.pin_offset(section);
        }
        if let Some(container) = &element.container {
            offset += styles.style(container).translate;
        }
        offset += styles.style(selector).translate;

        Some(element.rect.translated(offset))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    pub translate: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub vars: BTreeMap<String, String>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            opacity: 1.0,
            vars: BTreeMap::new(),
        }
    }
}

/// Computed styles for one frame. Elements without an entry are at rest.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, ElementStyle>,
    pins: HashMap<String, f32>,
}

impl StyleSheet {
    pub fn style(&self, selector: &str) -> ElementStyle {
        self.styles.get(selector).cloned().unwrap_or_default()
    }

    pub fn var(&self, selector: &str, name: &str) -> Option<&str> {
        self.styles
            .get(selector)
            .and_then(|style| style.vars.get(name))
            .map(String::as_str)
    }

    pub fn apply(&mut self, selector: &str, property: Property, value: f32) {
        let style = self.styles.entry(selector.to_string()).or_default();

        match property {
            Property::X => style.translate.x = value,
            Property::Y => style.translate.y = value,
            Property::Scale => style.scale = value,
            Property::Opacity => style.opacity = value,
            Property::RotationZ => log::trace!("{selector} has no rotation, ignored"),
        }
    }

    pub fn set_var(&mut self, selector: &str, name: impl Into<String>, value: impl Into<String>) {
        self.styles
            .entry(selector.to_string())
            .or_default()
            .vars
            .insert(name.into(), value.into());
    }

    pub fn set_pin_offset(&mut self, section: &str, offset: f32) {
        self.pins.insert(section.to_string(), offset);
    }

    pub fn pin_offset(&self, section: &str) -> f32 {
        self.pins.get(section).copied().unwrap_or(0.0)
    }

    pub fn is_pinned(&self, section: &str) -> bool {
        self.pins.contains_key(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: f32, height: f32) -> PageLayout {
        let config = ChoreographyConfig::default();
        let viewport = Viewport::new(width, height, 1.0, 2.0);
        let breakpoint = Breakpoint::for_width(width, config.breakpoint_width);
        PageLayout::build(&viewport, breakpoint, &config)
    }

    #[test]
    fn wide_layout_reserves_pin_spacing() {
        let page = layout(1200.0, 800.0);
        let wrapper = page.element(HORIZONTAL_WRAPPER).unwrap();

        // Hero height plus hero pin spacing
        assert_eq!(wrapper.rect.min.y, 1600.0);
        let footer = page.element(FOOTER).unwrap();
        assert_eq!(footer.rect.min.y, 1600.0 + 800.0 + 3000.0);
        assert_eq!(page.max_scroll(), page.document_height - 800.0);
    }

    #[test]
    fn wide_cards_sit_side_by_side() {
        let page = layout(1200.0, 800.0);
        let cards: Vec<_> = page.cards().collect();

        assert_eq!(cards.len(), 5);
        assert!(cards
            .windows(2)
            .all(|pair| pair[0].rect.min.y == pair[1].rect.min.y
                && pair[0].rect.max().x < pair[1].rect.min.x));
    }

    #[test]
    fn compact_cards_stack_vertically() {
        let page = layout(800.0, 800.0);
        let cards: Vec<_> = page.cards().collect();

        assert_eq!(page.breakpoint, Breakpoint::Compact);
        assert!(cards
            .windows(2)
            .all(|pair| pair[0].rect.max().y < pair[1].rect.min.y));
        assert!(cards.iter().all(|card| card.pin_group.is_none()));
    }

    #[test]
    fn screen_rect_combines_scroll_pin_and_translations() {
        let page = layout(1200.0, 800.0);
        let mut styles = StyleSheet::default();
        styles.set_pin_offset(HORIZONTAL_WRAPPER, 500.0);
        styles.apply(HORIZONTAL_SECTION, Property::X, -100.0);
        styles.apply(&card(0), Property::Y, 10.0);

        let doc = page.element(&card(0)).unwrap().rect;
        let screen = page.screen_rect(&card(0), 2100.0, &styles).unwrap();

        assert_eq!(screen.min, doc.min + Vec2::new(-100.0, -2100.0 + 500.0 + 10.0));
        assert_eq!(screen.size, doc.size);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0));
        assert!(rect.contains(Vec2::new(10.0, 14.9)));
        assert!(!rect.contains(Vec2::new(15.0, 12.0)));
    }
}
