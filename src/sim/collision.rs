//! Collision detection and response
//!
//! Narrow-phase shape tests, impulse resolution, segment/ray queries and
//! the two playfield edge policies. Everything here is a free function:
//! only `resolve_collision`, `separate_objects`, `wrap_around` and
//! `bounce_off_bounds` mutate, and only the bodies passed in. Degenerate
//! input (coincident centers, zero inverse-mass sums, zero-length rays) is
//! a no-op or a miss, never a panic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;

/// Axis-aligned playfield rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Playfield from the origin to (width, height)
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    /// Vertical strip between two x coordinates, unbounded in y
    pub fn columns(left: f32, right: f32) -> Self {
        Self {
            min: Vec2::new(left, f32::NEG_INFINITY),
            max: Vec2::new(right, f32::INFINITY),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Axis-aligned box as center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Box that tightly bounds a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center, Vec2::splat(radius))
    }
}

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit normal pointing from the first circle toward the second
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

/// True iff the circles overlap (touching does not count)
#[inline]
pub fn circle_collision(a: Vec2, b: Vec2, r1: f32, r2: f32) -> bool {
    let r = r1 + r2;
    a.distance_squared(b) < r * r
}

/// True iff both axis separations are under the half-extent sums
#[inline]
pub fn aabb_collision(a: &Aabb, b: &Aabb) -> bool {
    let d = (a.center - b.center).abs();
    let limit = a.half_extents + b.half_extents;
    d.x < limit.x && d.y < limit.y
}

#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) < radius * radius
}

#[inline]
pub fn point_in_aabb(p: Vec2, b: &Aabb) -> bool {
    let d = (p - b.center).abs();
    d.x <= b.half_extents.x && d.y <= b.half_extents.y
}

/// Even-odd test against a closed polygon (vertices in order)
pub fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vi.x + (p.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Overlap details for two circles, or `None` if apart or coincident
pub fn circle_contact(a: Vec2, b: Vec2, r1: f32, r2: f32) -> Option<Contact> {
    let delta = b - a;
    let dist_sq = delta.length_squared();
    let r = r1 + r2;
    if dist_sq >= r * r || dist_sq == 0.0 {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: delta / dist,
        penetration: r - dist,
    })
}

#[inline]
fn effective_inverse_mass(body: &PhysicsBody) -> f32 {
    if body.is_static { 0.0 } else { body.inverse_mass }
}

/// Impulse-based collision response
///
/// Restitution is `min(a, b) * restitution_override`. Bodies already moving
/// apart are left alone; static bodies never change velocity.
pub fn resolve_collision(a: &mut PhysicsBody, b: &mut PhysicsBody, restitution_override: f32) {
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    if dist_sq == 0.0 {
        return;
    }
    let normal = delta / dist_sq.sqrt();

    let relative = b.velocity - a.velocity;
    let along_normal = relative.dot(normal);
    if along_normal > 0.0 {
        return;
    }

    let inv_a = effective_inverse_mass(a);
    let inv_b = effective_inverse_mass(b);
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return;
    }

    let e = a.restitution.min(b.restitution) * restitution_override;
    let j = -(1.0 + e) * along_normal / inv_sum;
    let impulse = normal * j;

    a.velocity -= impulse * inv_a;
    b.velocity += impulse * inv_b;
}

/// Push overlapping circles apart, half the penetration each
pub fn separate_objects(a: &mut PhysicsBody, b: &mut PhysicsBody, ra: f32, rb: f32) {
    let Some(contact) = circle_contact(a.position, b.position, ra, rb) else {
        return;
    };
    let correction = contact.normal * (contact.penetration * 0.5);
    if !a.is_static {
        a.position -= correction;
    }
    if !b.is_static {
        b.position += correction;
    }
}

/// Where a segment first meets a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parameter along the segment in [0, 1]
    pub t: f32,
    pub point: Vec2,
}

/// Segment-vs-circle intersection via the quadratic formula
///
/// Returns the first root inside the segment. A segment starting inside the
/// circle reports its exit point.
pub fn line_circle_intersection(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<SegmentHit> {
    let d = end - start;
    let f = start - center;
    let a = d.dot(d);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    let t = if (0.0..=1.0).contains(&t1) {
        t1
    } else if (0.0..=1.0).contains(&t2) {
        t2
    } else {
        return None;
    };
    Some(SegmentHit {
        t,
        point: start + d * t,
    })
}

/// Closest raycast hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<K> {
    pub key: K,
    pub distance: f32,
    pub point: Vec2,
}

/// Closest circle hit by a ray of bounded length
///
/// Candidates are `(key, center, radius)`; ties keep the earlier candidate.
pub fn raycast<K: Copy>(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    candidates: impl IntoIterator<Item = (K, Vec2, f32)>,
) -> Option<RayHit<K>> {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO || max_distance <= 0.0 {
        return None;
    }
    let end = origin + dir * max_distance;

    let mut best: Option<RayHit<K>> = None;
    for (key, center, radius) in candidates {
        if let Some(hit) = line_circle_intersection(origin, end, center, radius) {
            let distance = hit.t * max_distance;
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(RayHit {
                    key,
                    distance,
                    point: hit.point,
                });
            }
        }
    }
    best
}

/// Teleport a body that fully left one edge to the opposite edge
///
/// Returns true if the body wrapped.
pub fn wrap_around(body: &mut PhysicsBody, radius: f32, bounds: &Bounds) -> bool {
    let mut wrapped = false;
    let p = &mut body.position;
    if p.x < bounds.min.x - radius {
        p.x = bounds.max.x + radius;
        wrapped = true;
    } else if p.x > bounds.max.x + radius {
        p.x = bounds.min.x - radius;
        wrapped = true;
    }
    if p.y < bounds.min.y - radius {
        p.y = bounds.max.y + radius;
        wrapped = true;
    } else if p.y > bounds.max.y + radius {
        p.y = bounds.min.y - radius;
        wrapped = true;
    }
    wrapped
}

/// Clamp a body inside the bounds and reflect the offending velocity axis
///
/// Returns true if any edge was hit.
pub fn bounce_off_bounds(body: &mut PhysicsBody, radius: f32, bounds: &Bounds, restitution: f32) -> bool {
    let mut bounced = false;
    if body.position.x - radius < bounds.min.x {
        body.position.x = bounds.min.x + radius;
        body.velocity.x = body.velocity.x.abs() * restitution;
        bounced = true;
    } else if body.position.x + radius > bounds.max.x {
        body.position.x = bounds.max.x - radius;
        body.velocity.x = -body.velocity.x.abs() * restitution;
        bounced = true;
    }
    if body.position.y - radius < bounds.min.y {
        body.position.y = bounds.min.y + radius;
        body.velocity.y = body.velocity.y.abs() * restitution;
        bounced = true;
    } else if body.position.y + radius > bounds.max.y {
        body.position.y = bounds.max.y - radius;
        body.velocity.y = -body.velocity.y.abs() * restitution;
        bounced = true;
    }
    bounced
}
