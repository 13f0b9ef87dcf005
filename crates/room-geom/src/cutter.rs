//! Cuts window openings into a wall segment.
//!
//! Each wall is treated as a 1-D interval `[0, L]`; windows subtract
//! sub-intervals from it and whatever remains is emitted as solid wall.
//! Everything vertical (sills, lintels, frames) is described in wall-local
//! coordinates: `along` meters from the wall start and `height` above the
//! floor.

use crate::shape::WallSegment;
use glam::{Vec2, Vec3};
use room_core::{Window, WindowId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSettings {
    pub height: f32,
    pub thickness: f32,
    /// Largest opening width as a fraction of the wall length.
    pub max_opening_fraction: f32,
    /// Solid pieces shorter than this are not emitted.
    pub epsilon: f32,
    /// Minimum height of the fill below a sill or above a window.
    pub fill_threshold: f32,
    /// Gap kept between a window top and the wall top.
    pub top_margin: f32,
    pub frame_thickness: f32,
    pub glass_thickness: f32,
    /// Light shaft length per meter of opening height.
    pub light_shaft_factor: f32,
    /// Far-end widening of the light shaft.
    pub light_shaft_spread: f32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            height: 5.0,
            thickness: 0.2,
            max_opening_fraction: 0.8,
            epsilon: 0.01,
            fill_threshold: 0.05,
            top_margin: 0.1,
            frame_thickness: 0.06,
            glass_thickness: 0.02,
            light_shaft_factor: 1.5,
            light_shaft_spread: 1.3,
        }
    }
}

/// Rectangle on the wall plane, extruded `depth` meters across the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallBox {
    pub along: [f32; 2],
    pub vertical: [f32; 2],
    pub depth: f32,
}

impl WallBox {
    pub fn width(&self) -> f32 {
        self.along[1] - self.along[0]
    }

    pub fn height(&self) -> f32 {
        self.vertical[1] - self.vertical[0]
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.along[0] + self.along[1]) / 2.0,
            (self.vertical[0] + self.vertical[1]) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameBarKind {
    Top,
    Bottom,
    Left,
    Right,
    Mullion,
    Transom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameBar {
    pub kind: FrameBarKind,
    pub bounds: WallBox,
}

/// Sunlight falling through an opening, projected onto the floor as a
/// wedge that starts at the wall and widens into the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightShaft {
    /// Center of the opening on the wall plane.
    pub origin: Vec3,
    /// Inward horizontal unit direction.
    pub direction: Vec3,
    pub length: f32,
    pub near_half_width: f32,
    pub far_half_width: f32,
    /// Ground quad: near-left, near-right, far-right, far-left.
    pub footprint: [Vec2; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opening {
    pub window: WindowId,
    pub center_frac: f32,
    /// Opening center in meters along the wall.
    pub center: f32,
    pub half_width: f32,
    pub sill_height: f32,
    pub top_height: f32,
    pub below_sill: Option<WallBox>,
    pub above: Option<WallBox>,
    pub glass_bounds: WallBox,
    pub frame_bounds: WallBox,
    pub frame_bars: Vec<FrameBar>,
    pub light: LightShaft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallCut {
    pub wall: &'static str,
    pub length: f32,
    /// Solid runs as `[start, end]` fractions of the wall length, ascending.
    pub solid_segments: Vec<[f32; 2]>,
    pub openings: Vec<Opening>,
}

impl WallCut {
    /// Solid runs in meters.
    pub fn solid_spans(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.solid_segments
            .iter()
            .map(move |[a, b]| [a * self.length, b * self.length])
    }

    pub fn solid_length(&self) -> f32 {
        self.solid_spans().map(|[a, b]| b - a).sum()
    }
}

/// Cuts `windows` (all hosted on `wall`) out of the wall.
///
/// Windows are processed in ascending `position`, ties in input order.
/// Overlapping windows are allowed: their openings overlap and the cursor
/// simply stays at the furthest window end seen so far.
pub fn cut_wall(wall: &WallSegment, windows: &[&Window], settings: &WallSettings) -> WallCut {
    let length = wall.length();
    let mut cut = WallCut {
        wall: wall.id,
        length,
        solid_segments: Vec::new(),
        openings: Vec::new(),
    };
    if length <= f32::EPSILON {
        return cut;
    }

    let mut ordered = windows.to_vec();
    ordered.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut cursor = 0.0f32;
    for window in ordered {
        let opening = build_opening(wall, length, window, settings);
        let start = (opening.center - opening.half_width).max(0.0);
        let end = (opening.center + opening.half_width).min(length);
        if start - cursor > settings.epsilon {
            cut.solid_segments.push([cursor / length, start / length]);
        }
        cursor = cursor.max(end);
        cut.openings.push(opening);
    }
    if length - cursor > settings.epsilon {
        cut.solid_segments.push([cursor / length, 1.0]);
    }
    cut
}

/// Realised half-width of a window on a wall of `length` meters.
pub fn opening_half_width(window_width: f32, length: f32, settings: &WallSettings) -> f32 {
    window_width.max(0.0).min(length * settings.max_opening_fraction) / 2.0
}

fn build_opening(wall: &WallSegment, length: f32, window: &Window, settings: &WallSettings) -> Opening {
    let center_frac = window.position.clamp(0.0, 1.0);
    let center = center_frac * length;
    let half_width = opening_half_width(window.width, length, settings);
    let ceiling = settings.height - settings.top_margin;
    let top_height = (window.sill_height.max(0.0) + window.height.max(0.0)).min(ceiling);
    let sill_height = window.sill_height.max(0.0).min(top_height);

    let start = (center - half_width).max(0.0);
    let end = (center + half_width).min(length);
    let along = [start, end];

    let below_sill = (sill_height > settings.fill_threshold).then_some(WallBox {
        along,
        vertical: [0.0, sill_height],
        depth: settings.thickness,
    });
    let above = (settings.height - top_height > settings.fill_threshold).then_some(WallBox {
        along,
        vertical: [top_height, settings.height],
        depth: settings.thickness,
    });

    let glass_bounds = WallBox {
        along,
        vertical: [sill_height, top_height],
        depth: settings.glass_thickness,
    };
    let frame_depth = settings.thickness * 1.1;
    let frame_bounds = WallBox {
        depth: frame_depth,
        ..glass_bounds
    };

    Opening {
        window: window.id,
        center_frac,
        center,
        half_width,
        sill_height,
        top_height,
        below_sill,
        above,
        glass_bounds,
        frame_bounds,
        frame_bars: frame_bars(frame_bounds, center, settings.frame_thickness),
        light: light_shaft(wall, center, half_width, sill_height, top_height, settings),
    }
}

fn frame_bars(bounds: WallBox, center: f32, t: f32) -> Vec<FrameBar> {
    let [start, end] = bounds.along;
    let [bottom, top] = bounds.vertical;
    let mid = (bottom + top) / 2.0;
    let bar = |kind, along: [f32; 2], vertical: [f32; 2]| FrameBar {
        kind,
        bounds: WallBox {
            along,
            vertical,
            depth: bounds.depth,
        },
    };
    vec![
        bar(FrameBarKind::Top, [start, end], [top - t, top]),
        bar(FrameBarKind::Bottom, [start, end], [bottom, bottom + t]),
        bar(FrameBarKind::Left, [start, start + t], [bottom, top]),
        bar(FrameBarKind::Right, [end - t, end], [bottom, top]),
        bar(FrameBarKind::Mullion, [center - t / 2.0, center + t / 2.0], [bottom, top]),
        bar(FrameBarKind::Transom, [start, end], [mid - t / 2.0, mid + t / 2.0]),
    ]
}

fn light_shaft(
    wall: &WallSegment,
    center: f32,
    half_width: f32,
    sill: f32,
    top: f32,
    settings: &WallSettings,
) -> LightShaft {
    let dir = wall.direction();
    let normal = wall.inward_normal();
    let length = (top - sill) * settings.light_shaft_factor;
    let far_half_width = half_width * settings.light_shaft_spread;
    let base = wall.point_along(center);
    let far = base + normal * length;
    LightShaft {
        origin: wall.to_world(center, (sill + top) / 2.0),
        direction: Vec3::new(normal.x, 0.0, normal.y),
        length,
        near_half_width: half_width,
        far_half_width,
        footprint: [
            base - dir * half_width,
            base + dir * half_width,
            far + dir * far_half_width,
            far - dir * far_half_width,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::wall;

    fn back_wall(length: f32) -> WallSegment {
        WallSegment::new(wall::BACK, [-length / 2.0, -4.0], [length / 2.0, -4.0])
    }

    fn window(id: WindowId, position: f32, width: f32) -> Window {
        Window {
            position,
            width,
            ..Window::new(id, wall::BACK)
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1.0e-5
    }

    #[test]
    fn centered_window_splits_wall_in_two() {
        let w = window(1, 0.5, 2.0);
        let cut = cut_wall(&back_wall(10.0), &[&w], &WallSettings::default());
        let spans: Vec<_> = cut.solid_spans().collect();
        assert_eq!(spans.len(), 2);
        assert!(close(spans[0][0], 0.0) && close(spans[0][1], 4.0));
        assert!(close(spans[1][0], 6.0) && close(spans[1][1], 10.0));
        assert_eq!(cut.openings.len(), 1);
        assert!(close(cut.openings[0].center, 5.0));
        assert!(close(cut.openings[0].half_width, 1.0));
    }

    #[test]
    fn half_width_clamps_to_wall_fraction() {
        let settings = WallSettings::default();
        for (requested, expected) in [(10.0, 4.0), (100.0, 4.0), (2.0, 1.0)] {
            let w = window(1, 0.5, requested);
            let cut = cut_wall(&back_wall(10.0), &[&w], &settings);
            assert!(close(cut.openings[0].half_width, expected), "{requested}");
        }
    }

    #[test]
    fn window_without_wall_leaves_full_wall() {
        let cut = cut_wall(&back_wall(6.0), &[], &WallSettings::default());
        assert_eq!(cut.solid_segments, vec![[0.0, 1.0]]);
    }

    #[test]
    fn overlapping_windows_do_not_regress_cursor() {
        let a = window(1, 0.4, 3.0);
        let b = window(2, 0.45, 3.0);
        let settings = WallSettings::default();
        let cut = cut_wall(&back_wall(10.0), &[&b, &a], &settings);
        let spans: Vec<_> = cut.solid_spans().collect();
        assert_eq!(spans.len(), 2);
        assert!(close(spans[0][1], 2.5));
        assert!(close(spans[1][0], 6.0));
        assert_eq!(cut.openings.iter().map(|o| o.window).collect::<Vec<_>>(), [1, 2]);

        let again = cut_wall(&back_wall(10.0), &[&b, &a], &settings);
        assert_eq!(cut, again);
    }

    #[test]
    fn equal_positions_keep_input_order() {
        let a = window(5, 0.3, 1.0);
        let b = window(3, 0.3, 1.0);
        let cut = cut_wall(&back_wall(10.0), &[&a, &b], &WallSettings::default());
        assert_eq!(cut.openings.iter().map(|o| o.window).collect::<Vec<_>>(), [5, 3]);
    }

    #[test]
    fn window_top_is_clamped_below_wall_top() {
        let w = Window {
            sill_height: 3.0,
            height: 4.0,
            ..window(1, 0.5, 1.0)
        };
        let settings = WallSettings::default();
        let cut = cut_wall(&back_wall(10.0), &[&w], &settings);
        let opening = &cut.openings[0];
        assert!(close(opening.top_height, 4.9));
        assert!(opening.below_sill.is_some());
        // 0.1 m left above the window is above the fill threshold.
        assert!(opening.above.is_some());
    }

    #[test]
    fn floor_level_window_has_no_sill_fill() {
        let w = Window {
            sill_height: 0.0,
            height: 2.1,
            ..window(1, 0.5, 1.0)
        };
        let cut = cut_wall(&back_wall(10.0), &[&w], &WallSettings::default());
        assert!(cut.openings[0].below_sill.is_none());
        assert_eq!(cut.openings[0].frame_bars.len(), 6);
    }

    #[test]
    fn light_shaft_points_into_room() {
        let w = window(1, 0.5, 2.0);
        let cut = cut_wall(&back_wall(10.0), &[&w], &WallSettings::default());
        let light = cut.openings[0].light;
        assert_eq!(light.direction, Vec3::new(0.0, 0.0, 1.0));
        assert!(close(light.length, Window::DEFAULT_HEIGHT * 1.5));
        assert!(light.footprint[2].y > light.footprint[1].y);
    }

    #[test]
    fn window_at_wall_end_is_clipped() {
        let w = window(1, 0.0, 2.0);
        let cut = cut_wall(&back_wall(10.0), &[&w], &WallSettings::default());
        let spans: Vec<_> = cut.solid_spans().collect();
        assert_eq!(spans.len(), 1);
        assert!(close(spans[0][0], 1.0));
        assert!(close(cut.openings[0].glass_bounds.along[0], 0.0));
    }
}
