//! Draws the page elements with their current styles on top of the 3D scene.

use glam::Vec2;
use imgui::{Condition, DrawListMut, StyleVar, Ui, WindowFlags};

use crate::{
    choreographer::{MOUSE_X_VAR, MOUSE_Y_VAR},
    page::{Element, ElementStyle, PageLayout, Rect, StyleSheet},
};

const TEXT_COLOR: [f32; 3] = [0.92, 0.95, 1.0];
const CARD_FILL: [f32; 3] = [0.04, 0.07, 0.16];
const CARD_BORDER: [f32; 3] = [0.2, 0.45, 1.0];
const HIGHLIGHT: [f32; 3] = [0.3, 0.6, 1.0];
const HIGHLIGHT_RADIUS: f32 = 160.0;
const HIGHLIGHT_RINGS: usize = 8;
const CARD_ROUNDING: f32 = 12.0;
const CARD_PADDING: f32 = 24.0;

fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha.clamp(0.0, 1.0)]
}

/// Parses a `"12.5px"` style value.
pub fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// `rect` scaled by `scale` around its centre.
pub fn scaled_about_center(rect: Rect, scale: f32) -> Rect {
    let center = rect.min + rect.size * 0.5;
    let size = rect.size * scale;
    Rect::new(center - size * 0.5, size)
}

fn is_card(element: &Element) -> bool {
    element.selector.starts_with(".card")
}

pub fn draw_page(ui: &Ui, layout: &PageLayout, styles: &StyleSheet, scroll: f32) {
    let draw_list = ui.get_background_draw_list();
    let viewport = Rect::new(Vec2::ZERO, layout.viewport);

    for element in drawn_elements(layout) {
        let Some(rect) = layout.screen_rect(&element.selector, scroll, styles) else {
            continue;
        };

        let style = styles.style(&element.selector);
        if style.opacity <= 0.0 || !overlaps(&rect, &viewport) {
            continue;
        }

        let rect = scaled_about_center(rect, style.scale);

        if is_card(element) {
            draw_card(&draw_list, element, rect, &style);
        } else if let Some(text) = &element.text {
            draw_scaled_text(ui, &element.selector, rect, text, &style);
        }
    }

    if layout.max_scroll() > 0.0 {
        draw_scroll_indicator(&draw_list, layout, scroll);
    }
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.cmplt(b.max()).all() && b.min.cmplt(a.max()).all()
}

/// Where text of `text_size` at font scale 1 lands when drawn at `scale`,
/// centred on `rect`.
pub fn scaled_text_rect(rect: Rect, text_size: Vec2, scale: f32) -> Rect {
    let center = rect.min + rect.size * 0.5;
    let size = text_size * scale;
    Rect::new(center - size * 0.5, size)
}

fn text_window_flags() -> WindowFlags {
    WindowFlags::NO_DECORATION
        | WindowFlags::NO_BACKGROUND
        | WindowFlags::NO_INPUTS
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_SAVED_SETTINGS
        | WindowFlags::NO_FOCUS_ON_APPEARING
        | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS
        | WindowFlags::NO_NAV
}

/// Draw lists have no per-call font size, so scaled copy gets its own
/// invisible window with a window font scale.
fn draw_scaled_text(ui: &Ui, selector: &str, rect: Rect, text: &str, style: &ElementStyle) {
    let text_size = Vec2::from(ui.calc_text_size(text));
    let placement = scaled_text_rect(rect, text_size, style.scale);

    let _padding = ui.push_style_var(StyleVar::WindowPadding([0.0, 0.0]));
    let _border = ui.push_style_var(StyleVar::WindowBorderSize(0.0));
    let _min_size = ui.push_style_var(StyleVar::WindowMinSize([0.0, 0.0]));

    ui.window(format!("##{selector}"))
        .position(placement.min.to_array(), Condition::Always)
        .size(placement.size.to_array(), Condition::Always)
        .flags(text_window_flags())
        .build(|| {
            ui.set_window_font_scale(style.scale);
            ui.text_colored(rgba(TEXT_COLOR, style.opacity), text);
        });
}

fn draw_card(draw_list: &DrawListMut, element: &Element, rect: Rect, style: &ElementStyle) {
    let (min, max) = (rect.min.to_array(), rect.max().to_array());

    draw_list
        .add_rect(min, max, rgba(CARD_FILL, 0.85 * style.opacity))
        .filled(true)
        .rounding(CARD_ROUNDING)
        .build();

    let pointer = style
        .vars
        .get(MOUSE_X_VAR)
        .and_then(|x| parse_px(x))
        .zip(style.vars.get(MOUSE_Y_VAR).and_then(|y| parse_px(y)));

    if let Some((x, y)) = pointer {
        let center = (rect.min + Vec2::new(x, y) * style.scale).to_array();

        draw_list.with_clip_rect_intersect(min, max, || {
            for ring in (1..=HIGHLIGHT_RINGS).rev() {
                let t = ring as f32 / HIGHLIGHT_RINGS as f32;
                draw_list
                    .add_circle(center, HIGHLIGHT_RADIUS * t, rgba(HIGHLIGHT, 0.06 * style.opacity))
                    .filled(true)
                    .build();
            }
        });
    }

    draw_list
        .add_rect(min, max, rgba(CARD_BORDER, 0.6 * style.opacity))
        .rounding(CARD_ROUNDING)
        .thickness(1.5)
        .build();

    if let Some(text) = &element.text {
        let position = rect.min + Vec2::splat(CARD_PADDING);
        draw_list.add_text(position.to_array(), rgba(TEXT_COLOR, style.opacity), text);

        let subtitle = format!("#{}", card_number(&element.selector));
        let position = Vec2::new(rect.min.x + CARD_PADDING, rect.max().y - CARD_PADDING - 16.0);
        draw_list.add_text(position.to_array(), rgba(TEXT_COLOR, 0.5 * style.opacity), subtitle);
    }
}

fn card_number(selector: &str) -> &str {
    selector
        .strip_prefix(".card:nth-child(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(selector)
}

fn draw_scroll_indicator(draw_list: &DrawListMut, layout: &PageLayout, scroll: f32) {
    let progress = (scroll / layout.max_scroll()).clamp(0.0, 1.0);
    let track_height = layout.viewport.y * 0.3;
    let x = layout.viewport.x - 12.0;
    let top = (layout.viewport.y - track_height) * 0.5;

    draw_list
        .add_line([x, top], [x, top + track_height], rgba(CARD_BORDER, 0.25))
        .thickness(2.0)
        .build();
    draw_list
        .add_circle([x, top + track_height * progress], 4.0, rgba(HIGHLIGHT, 0.9))
        .filled(true)
        .build();
}

/// Elements the overlay draws text or panels for.
fn drawn_elements(layout: &PageLayout) -> impl Iterator<Item = &Element> + '_ {
    layout
        .elements()
        .iter()
        .filter(|element| is_card(element) || element.text.is_some())
}
