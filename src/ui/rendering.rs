//! Painter adapter: draws render plans with egui.
//!
//! The container is a square of side `side` centered on the target rect,
//! scaled and rotated as a whole. Inert plans become one wrapped galley;
//! decorated plans are flowed glyph by glyph so each cell can carry its own
//! transform, color and opacity.

use crate::color::parse_hex;
use crate::constants::SATISFY_SPIN_PERIOD;
use crate::layout::{GlyphCell, InertText, RenderBody, RenderPlan, Segment, SurfaceMetrics};
use crate::surface::Surface;
use crate::types::FontFamily;
use eframe::egui;
use eframe::epaint::TextShape;
use std::collections::HashMap;

/// Maps a pattern typeface onto one of egui's font families.
pub fn egui_family(family: FontFamily) -> egui::FontFamily {
    if family.is_monospace() {
        egui::FontFamily::Monospace
    } else {
        egui::FontFamily::Proportional
    }
}

/// Converts a `#rrggbb` string, falling back to `fallback` when malformed.
pub fn hex_color(hex: &str, fallback: egui::Color32) -> egui::Color32 {
    parse_hex(hex)
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(fallback)
}

/// Surface metrics backed by egui text layout.
pub struct EguiMetrics<'a> {
    painter: &'a egui::Painter,
    side: f32,
}

impl<'a> EguiMetrics<'a> {
    /// Metrics for a square surface of `side` logical pixels.
    pub fn new(painter: &'a egui::Painter, side: f32) -> Self {
        Self { painter, side }
    }
}

impl SurfaceMetrics for EguiMetrics<'_> {
    fn pixel_width(&self) -> f32 {
        self.side
    }

    fn pixel_height(&self) -> f32 {
        self.side
    }

    fn measure_glyph_width(&self, glyph: char, font_size: u32, font_family: FontFamily) -> f32 {
        let font_id = egui::FontId::new(font_size as f32, egui_family(font_family));
        self.painter
            .layout_no_wrap(glyph.to_string(), font_id, egui::Color32::WHITE)
            .size()
            .x
    }
}

/// Container transform: local square coordinates to screen coordinates.
struct Container {
    center: egui::Pos2,
    side: f32,
    scale: f32,
    rotation: egui::emath::Rot2,
    angle: f32,
}

impl Container {
    fn new(rect: egui::Rect, side: f32, plan: &RenderPlan) -> Self {
        let angle = (plan.container.rotation_deg as f32).to_radians();
        Self {
            center: rect.center(),
            side,
            scale: plan.container.scale as f32,
            rotation: egui::emath::Rot2::from_angle(angle),
            angle,
        }
    }

    fn to_screen(&self, local: egui::Vec2) -> egui::Pos2 {
        let from_center = (local - egui::vec2(self.side, self.side) / 2.0) * self.scale;
        self.center + self.rotation * from_center
    }
}

/// Paints `surface`'s current plan into `rect`.
///
/// `side` is the logical side of the square container the plan was laid out
/// for; `now` drives spin and color transitions.
pub fn paint_surface(
    painter: &egui::Painter,
    rect: egui::Rect,
    side: f32,
    surface: &Surface,
    now: f64,
) {
    let Some(plan) = surface.plan() else {
        return;
    };
    let background = hex_color(&plan.container.background_color, egui::Color32::BLACK);
    painter.rect_filled(rect, 0.0, background);

    let container = Container::new(rect, side, plan);
    match &plan.body {
        RenderBody::Empty => {}
        RenderBody::Inert(inert) => paint_inert(painter, &container, plan, inert),
        RenderBody::Decorated(cells) => {
            paint_decorated(painter, &container, plan, cells, surface, now)
        }
    }
}

fn paint_inert(painter: &egui::Painter, container: &Container, plan: &RenderPlan, inert: &InertText) {
    let style = &plan.container;
    let scale = container.scale;
    let font_id = egui::FontId::new(
        style.font_size as f32 * scale,
        egui_family(style.font_family),
    );
    let color = hex_color(&style.color, egui::Color32::WHITE);
    let line_height = style.line_height_factor * style.font_size as f32 * scale;
    let spacing = style.letter_spacing_px * scale;
    let space_width = painter
        .layout_no_wrap(" ".to_string(), font_id.clone(), color)
        .size()
        .x;

    let text_format = |extra_letter_spacing: f32| egui::TextFormat {
        font_id: font_id.clone(),
        color,
        extra_letter_spacing,
        line_height: Some(line_height.max(1.0)),
        ..Default::default()
    };

    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = container.side * scale;
    job.wrap.break_anywhere = true;
    for segment in inert.segments() {
        match segment {
            Segment::Text(run) => job.append(run, 0.0, text_format(spacing)),
            Segment::Blank(width) => {
                job.append(" ", 0.0, text_format((width * scale - space_width).max(0.0)))
            }
        }
    }

    let galley = painter.layout_job(job);
    let origin = container.to_screen(egui::Vec2::ZERO);
    painter.add(TextShape::new(origin, galley, color).with_angle(container.angle));
}

fn paint_decorated(
    painter: &egui::Painter,
    container: &Container,
    plan: &RenderPlan,
    cells: &[GlyphCell],
    surface: &Surface,
    now: f64,
) {
    let style = &plan.container;
    let font_id = egui::FontId::new(
        style.font_size as f32 * container.scale,
        egui_family(style.font_family),
    );
    let base_color = hex_color(&style.color, egui::Color32::WHITE);
    let line_height = (style.line_height_factor * style.font_size as f32).max(1.0);
    let mut widths: HashMap<char, f32> = HashMap::new();

    let mut x = 0.0_f32;
    let mut y = 0.0_f32;
    for (index, cell) in cells.iter().enumerate() {
        if y > container.side {
            break;
        }
        let glyph_width = *widths.entry(cell.glyph).or_insert_with(|| {
            painter
                .layout_no_wrap(cell.glyph.to_string(), font_id.clone(), base_color)
                .size()
                .x
                / container.scale
        });
        let advance = cell.width.unwrap_or(glyph_width) + style.letter_spacing_px;
        if x > 0.0 && x + advance > container.side {
            x = 0.0;
            y += line_height;
        }
        let cell_center = egui::vec2(x + advance / 2.0, y + line_height / 2.0);
        x += advance;

        if cell.glyph == ' ' {
            continue;
        }

        let color = surface
            .cell_color(index)
            .map(|color| {
                let [r, g, b] = color.at(now);
                egui::Color32::from_rgb(r, g, b)
            })
            .unwrap_or(base_color);

        let mut angle = container.angle;
        if let Some(spice) = cell.spice {
            // No 3D turn in a 2D painter; the skew becomes extra tilt.
            angle += ((spice.rotation_deg + spice.skew_deg) as f32).to_radians();
        }
        if let Some(direction) = cell.spin {
            let turns = (now / SATISFY_SPIN_PERIOD).fract() * direction.sign();
            angle += (turns * std::f64::consts::TAU) as f32;
        }

        let galley = painter.layout_no_wrap(cell.glyph.to_string(), font_id.clone(), color);
        let half = galley.size() / 2.0;
        let center = container.to_screen(cell_center);
        let pos = center - egui::emath::Rot2::from_angle(angle) * half;
        let mut shape = TextShape::new(pos, galley, color).with_angle(angle);
        if let Some(opacity) = cell.opacity {
            shape = shape.with_opacity_factor(opacity);
        }
        painter.add(shape);
    }
}
