//! Room outline, floor tiles and wall segments from a parametric shape.
//!
//! Coordinates are world meters on the ground plane: `x` to the right and
//! `y` holding world Z (negative towards the back wall). The front side of
//! enclosed shapes is left open so the camera can look in.

use glam::Vec2;
use room_core::{wall, RoomShape};
use serde::{Deserialize, Serialize};

/// Smallest extent the geometry accepts; anything below is clamped.
pub const MIN_EXTENT: f32 = 0.1;

/// Fractions that size the T and U variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeProportions {
    /// Depth of the T's top bar, as a fraction of room depth.
    pub t_bar_depth: f32,
    /// Half-width of the T's stem, as a fraction of room width.
    pub t_stem_half_width: f32,
    /// Depth of the U's front bar, as a fraction of room depth.
    pub u_bar_depth: f32,
    /// Width of each U arm, as a fraction of room width.
    pub u_arm_width: f32,
}

impl Default for ShapeProportions {
    fn default() -> Self {
        Self {
            t_bar_depth: 0.35,
            t_stem_half_width: 0.25,
            u_bar_depth: 0.3,
            u_arm_width: 0.25,
        }
    }
}

impl ShapeProportions {
    /// Keeps every arm, bar and stem strictly positive so outlines stay simple.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let fix = |value: f32, fallback: f32, max: f32| {
            if value.is_finite() {
                value.clamp(0.05, max)
            } else {
                fallback
            }
        };
        Self {
            t_bar_depth: fix(self.t_bar_depth, defaults.t_bar_depth, 0.95),
            t_stem_half_width: fix(self.t_stem_half_width, defaults.t_stem_half_width, 0.45),
            u_bar_depth: fix(self.u_bar_depth, defaults.u_bar_depth, 0.95),
            u_arm_width: fix(self.u_arm_width, defaults.u_arm_width, 0.45),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorTile {
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
}

impl FloorTile {
    pub fn area(&self) -> f32 {
        self.width * self.depth
    }
}

/// A straight wall run from `from` to `to`. The room interior lies on the
/// left of the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallSegment {
    pub id: &'static str,
    pub from: Vec2,
    pub to: Vec2,
}

impl WallSegment {
    pub fn new(id: &'static str, from: [f32; 2], to: [f32; 2]) -> Self {
        Self {
            id,
            from: Vec2::from_array(from),
            to: Vec2::from_array(to),
        }
    }

    pub fn length(&self) -> f32 {
        (self.to - self.from).length()
    }

    pub fn direction(&self) -> Vec2 {
        (self.to - self.from).normalize_or_zero()
    }

    /// Unit normal pointing into the room.
    pub fn inward_normal(&self) -> Vec2 {
        self.direction().perp()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.from + self.to) * 0.5
    }

    pub fn point_at(&self, fraction: f32) -> Vec2 {
        self.from.lerp(self.to, fraction)
    }

    /// Ground-plane point `along` meters from `from`.
    pub fn point_along(&self, along: f32) -> Vec2 {
        self.from + self.direction() * along
    }

    /// World-space point on the wall's center plane.
    pub fn to_world(&self, along: f32, height: f32) -> glam::Vec3 {
        let p = self.point_along(along);
        glam::Vec3::new(p.x, height, p.y)
    }

    /// Rotation about world Y that turns local +Z onto the wall direction.
    pub fn yaw(&self) -> f32 {
        let d = self.to - self.from;
        d.x.atan2(d.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomGeometry {
    pub shape: RoomShape,
    /// Closed outline, first point not repeated.
    pub outline: Vec<Vec2>,
    pub floor_tiles: Vec<FloorTile>,
    pub walls: Vec<WallSegment>,
}

impl RoomGeometry {
    pub fn wall(&self, id: &str) -> Option<&WallSegment> {
        self.walls.iter().find(|wall| wall.id == id)
    }

    pub fn floor_area(&self) -> f32 {
        self.floor_tiles.iter().map(FloorTile::area).sum()
    }

    pub fn outline_area(&self) -> f32 {
        polygon_area(&self.outline)
    }

    /// Axis-aligned extent of the outline as `(min, max)`.
    pub fn extent(&self) -> (Vec2, Vec2) {
        self.outline.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }
}

/// Builds the room for `shape` at the given size. Never fails: bad
/// dimensions are clamped to [`MIN_EXTENT`].
pub fn compute_geometry(
    shape: RoomShape,
    width: f32,
    depth: f32,
    proportions: &ShapeProportions,
) -> RoomGeometry {
    let w = sanitize_extent(width);
    let d = sanitize_extent(depth);
    let hw = w / 2.0;
    let hd = d / 2.0;
    let props = proportions.sanitized();

    let (outline, floor_tiles, walls) = match shape {
        RoomShape::Rectangle => (
            rect_outline(hw, hd),
            vec![tile(0.0, 0.0, w, d)],
            three_walls(hw, hd),
        ),
        RoomShape::Square => {
            let hs = w.min(d) / 2.0;
            (
                rect_outline(hs, hs),
                vec![tile(0.0, 0.0, hs * 2.0, hs * 2.0)],
                three_walls(hs, hs),
            )
        }
        RoomShape::LShape => {
            // Split at both midlines; the front-right quarter is cut away.
            let split_x = 0.0;
            let split_z = 0.0;
            (
                points(&[
                    [-hw, -hd],
                    [hw, -hd],
                    [hw, split_z],
                    [split_x, split_z],
                    [split_x, hd],
                    [-hw, hd],
                ]),
                vec![
                    tile(0.0, (-hd + split_z) / 2.0, w, split_z + hd),
                    tile((-hw + split_x) / 2.0, (split_z + hd) / 2.0, split_x + hw, hd - split_z),
                ],
                vec![
                    WallSegment::new(wall::BACK, [-hw, -hd], [hw, -hd]),
                    WallSegment::new(wall::RIGHT, [hw, -hd], [hw, split_z]),
                    WallSegment::new(wall::L_INNER_H, [hw, split_z], [split_x, split_z]),
                    WallSegment::new(wall::L_INNER_V, [split_x, split_z], [split_x, hd]),
                    WallSegment::new(wall::LEFT, [-hw, hd], [-hw, -hd]),
                ],
            )
        }
        RoomShape::TShape => {
            let bar_d = d * props.t_bar_depth;
            let stem_hw = w * props.t_stem_half_width;
            let bar_z = -hd + bar_d;
            (
                points(&[
                    [-hw, -hd],
                    [hw, -hd],
                    [hw, bar_z],
                    [stem_hw, bar_z],
                    [stem_hw, hd],
                    [-stem_hw, hd],
                    [-stem_hw, bar_z],
                    [-hw, bar_z],
                ]),
                vec![
                    tile(0.0, (-hd + bar_z) / 2.0, w, bar_d),
                    tile(0.0, (bar_z + hd) / 2.0, stem_hw * 2.0, hd - bar_z),
                ],
                vec![
                    WallSegment::new(wall::BACK, [-hw, -hd], [hw, -hd]),
                    WallSegment::new(wall::RIGHT, [hw, -hd], [hw, bar_z]),
                    WallSegment::new(wall::T_STEP_R, [hw, bar_z], [stem_hw, bar_z]),
                    WallSegment::new(wall::T_STEM_R, [stem_hw, bar_z], [stem_hw, hd]),
                    WallSegment::new(wall::T_STEM_L, [-stem_hw, hd], [-stem_hw, bar_z]),
                    WallSegment::new(wall::T_STEP_L, [-stem_hw, bar_z], [-hw, bar_z]),
                    WallSegment::new(wall::LEFT, [-hw, bar_z], [-hw, -hd]),
                ],
            )
        }
        RoomShape::UShape => {
            let arm_w = w * props.u_arm_width;
            let bar_d = d * props.u_bar_depth;
            let inner_z = hd - bar_d;
            let arm_d = inner_z + hd;
            (
                points(&[
                    [-hw, -hd],
                    [-hw + arm_w, -hd],
                    [-hw + arm_w, inner_z],
                    [hw - arm_w, inner_z],
                    [hw - arm_w, -hd],
                    [hw, -hd],
                    [hw, hd],
                    [-hw, hd],
                ]),
                vec![
                    tile(0.0, (inner_z + hd) / 2.0, w, bar_d),
                    tile(-hw + arm_w / 2.0, (-hd + inner_z) / 2.0, arm_w, arm_d),
                    tile(hw - arm_w / 2.0, (-hd + inner_z) / 2.0, arm_w, arm_d),
                ],
                vec![
                    WallSegment::new(wall::U_ARM_L_BACK, [-hw, -hd], [-hw + arm_w, -hd]),
                    WallSegment::new(wall::U_INNER_L, [-hw + arm_w, -hd], [-hw + arm_w, inner_z]),
                    WallSegment::new(wall::U_INNER_B, [-hw + arm_w, inner_z], [hw - arm_w, inner_z]),
                    WallSegment::new(wall::U_INNER_R, [hw - arm_w, inner_z], [hw - arm_w, -hd]),
                    WallSegment::new(wall::U_ARM_R_BACK, [hw - arm_w, -hd], [hw, -hd]),
                    WallSegment::new(wall::RIGHT, [hw, -hd], [hw, hd]),
                    WallSegment::new(wall::LEFT, [-hw, hd], [-hw, -hd]),
                ],
            )
        }
        RoomShape::Open => (rect_outline(hw, hd), vec![tile(0.0, 0.0, w, d)], Vec::new()),
    };

    RoomGeometry {
        shape,
        outline,
        floor_tiles,
        walls,
    }
}

/// Shoelace area of a closed polygon (absolute value).
pub fn polygon_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f32 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    twice.abs() / 2.0
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value > MIN_EXTENT {
        value
    } else {
        MIN_EXTENT
    }
}

fn tile(cx: f32, cz: f32, width: f32, depth: f32) -> FloorTile {
    FloorTile {
        center: Vec2::new(cx, cz),
        width,
        depth,
    }
}

fn points(raw: &[[f32; 2]]) -> Vec<Vec2> {
    raw.iter().copied().map(Vec2::from_array).collect()
}

fn rect_outline(hw: f32, hd: f32) -> Vec<Vec2> {
    points(&[[-hw, -hd], [hw, -hd], [hw, hd], [-hw, hd]])
}

fn three_walls(hw: f32, hd: f32) -> Vec<WallSegment> {
    vec![
        WallSegment::new(wall::BACK, [-hw, -hd], [hw, -hd]),
        WallSegment::new(wall::LEFT, [-hw, hd], [-hw, -hd]),
        WallSegment::new(wall::RIGHT, [hw, -hd], [hw, hd]),
    ]
}
