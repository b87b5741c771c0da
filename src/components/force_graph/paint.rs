//! Canvas painting for the graph scene.
//!
//! Painting is immediate mode over the retained [`Scene`]: every frame clears
//! the canvas and draws, in z-order,
//! 1. links
//! 2. labels
//! 3. nodes (circle fill, then outline)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{LABEL_FONT_FAMILY, Scene};

/// Paints `scene` onto `ctx`. `pixel_ratio` maps CSS pixels to backing-store
/// pixels.
pub fn paint(scene: &Scene, ctx: &CanvasRenderingContext2d, width: f64, height: f64, pixel_ratio: f64) {
	let _ = ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
	ctx.clear_rect(0.0, 0.0, width, height);

	draw_links(scene, ctx);
	draw_labels(scene, ctx);
	draw_nodes(scene, ctx);

	ctx.set_global_alpha(1.0);
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for line in &scene.lines {
		ctx.set_global_alpha(line.stroke_opacity);
		ctx.set_stroke_style_str(&line.stroke);
		ctx.set_line_width(line.stroke_width);
		ctx.begin_path();
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(line.x2, line.y2);
		ctx.stroke();
	}
}

fn draw_labels(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	for label in &scene.labels {
		ctx.set_global_alpha(label.opacity);
		ctx.set_fill_style_str(&label.fill);
		ctx.set_font(&format!("{}px {}", label.font_px, LABEL_FONT_FAMILY));
		let _ = ctx.fill_text(&label.text, label.x, label.y + label.dy);
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for circle in &scene.circles {
		ctx.set_global_alpha(circle.opacity);
		ctx.begin_path();
		let _ = ctx.arc(circle.cx, circle.cy, circle.r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&circle.fill);
		ctx.fill();
		ctx.set_stroke_style_str(&circle.stroke);
		ctx.set_line_width(circle.stroke_width);
		ctx.stroke();
	}
}
