//! Responsive render parameters derived from the container width.
//!
//! Parameters are fixed for the lifetime of a view. A different container
//! size needs a fresh view.

/// Widths below this use the compact profile.
pub const MOBILE_BREAKPOINT: f64 = 500.0;
/// Height never exceeds this, whatever the width.
pub const MAX_HEIGHT: f64 = 220.0;
/// Height as a fraction of width before capping.
pub const ASPECT: f64 = 0.6;
/// Space kept between a node's edge and the viewport border.
pub const PADDING_MARGIN: f64 = 20.0;
/// Extra spacing around each node for collision.
pub const COLLISION_MARGIN: f64 = 4.0;

/// Axis-aligned box nodes are clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Clamps a point into the box. A degenerate box (padding larger than half
	/// the dimension) collapses to its midpoint on that axis.
	pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		(
			clamp_axis(x, self.min_x, self.max_x),
			clamp_axis(y, self.min_y, self.max_y),
		)
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		let (cx, cy) = self.clamp(x, y);
		cx == x && cy == y
	}
}

fn clamp_axis(v: f64, min: f64, max: f64) -> f64 {
	if min > max {
		return (min + max) / 2.0;
	}
	v.max(min).min(max)
}

/// Sizing and force parameters for one view.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
	pub width: f64,
	pub height: f64,
	pub mobile: bool,
	pub node_radius: f64,
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub padding: f64,
	pub collision_radius: f64,
	pub label_font_px: f64,
}

impl RenderParams {
	/// Derives parameters for a container `width` pixels wide.
	///
	/// Returns `None` for widths that cannot host a drawing.
	pub fn derive(width: f64) -> Option<Self> {
		if !width.is_finite() || width <= 0.0 {
			return None;
		}

		let height = (width * ASPECT).min(MAX_HEIGHT);
		let mobile = width < MOBILE_BREAKPOINT;
		let (node_radius, link_distance, charge_strength, label_font_px) = if mobile {
			(6.0, 60.0, -150.0, 8.0)
		} else {
			(8.0, 100.0, -250.0, 10.0)
		};

		Some(Self {
			width,
			height,
			mobile,
			node_radius,
			link_distance,
			charge_strength,
			padding: node_radius + PADDING_MARGIN,
			collision_radius: node_radius + COLLISION_MARGIN,
			label_font_px,
		})
	}

	pub fn bounds(&self) -> Bounds {
		Bounds {
			min_x: self.padding,
			min_y: self.padding,
			max_x: self.width - self.padding,
			max_y: self.height - self.padding,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mobile_and_desktop_profiles() {
		let mobile = RenderParams::derive(400.0).unwrap();
		let desktop = RenderParams::derive(1000.0).unwrap();

		assert!(mobile.mobile);
		assert_eq!(mobile.node_radius, 6.0);
		assert_eq!(mobile.link_distance, 60.0);
		assert_eq!(mobile.charge_strength, -150.0);
		assert_eq!(mobile.padding, 26.0);

		assert!(!desktop.mobile);
		assert_eq!(desktop.node_radius, 8.0);
		assert_eq!(desktop.link_distance, 100.0);
		assert_eq!(desktop.charge_strength, -250.0);
		assert_eq!(desktop.padding, 28.0);
	}

	#[test]
	fn breakpoint_is_exclusive() {
		assert!(RenderParams::derive(499.0).unwrap().mobile);
		assert!(!RenderParams::derive(500.0).unwrap().mobile);
	}

	#[test]
	fn height_is_capped() {
		assert_eq!(RenderParams::derive(300.0).unwrap().height, 180.0);
		assert_eq!(RenderParams::derive(1000.0).unwrap().height, MAX_HEIGHT);
	}

	#[test]
	fn unusable_widths_abstain() {
		assert!(RenderParams::derive(0.0).is_none());
		assert!(RenderParams::derive(-5.0).is_none());
		assert!(RenderParams::derive(f64::NAN).is_none());
	}

	#[test]
	fn bounds_clamp_into_padded_box() {
		let params = RenderParams::derive(1000.0).unwrap();
		let bounds = params.bounds();
		assert_eq!(bounds.clamp(-50.0, 500.0), (28.0, 192.0));
		assert_eq!(bounds.clamp(500.0, 100.0), (500.0, 100.0));
		assert!(bounds.contains(28.0, 192.0));
	}

	#[test]
	fn degenerate_bounds_collapse_to_midpoint() {
		let params = RenderParams::derive(40.0).unwrap();
		let (x, y) = params.bounds().clamp(0.0, 0.0);
		assert_eq!(x, 20.0);
		assert_eq!(y, 12.0);
	}
}
