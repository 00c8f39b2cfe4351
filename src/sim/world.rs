//! Minimal circle-only rigid-body world
//!
//! Enough physics to drive the board headless: gravity, circle-circle
//! contacts, a floor and two side walls. Bodies are kept sorted by handle
//! so iteration order is stable.

use glam::Vec2;

use super::physics::{BodyDesc, BodyHandle, BodyState, PhysicsService};
use crate::Bounds;
use crate::tuning::Tuning;

/// Contact solver passes per step
const SOLVER_ITERATIONS: usize = 4;

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    pos: Vec2,
    vel: Vec2,
    angle: f32,
    angular_vel: f32,
    radius: f32,
    mass: f32,
    is_static: bool,
    friction: f32,
    restitution: f32,
}

impl Body {
    #[inline]
    fn inv_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

/// Reference [`PhysicsService`] used by the demo binary and tests
#[derive(Debug, Clone)]
pub struct CircleWorld {
    bodies: Vec<Body>,
    next_handle: u32,
    gravity: Vec2,
    /// Inner edges of the walls: (left x, right x, floor y)
    walls: (f32, f32, f32),
}

impl CircleWorld {
    pub fn new(bounds: Bounds, tuning: &Tuning) -> Self {
        let half = tuning.wall_thickness / 2.0;
        Self {
            bodies: Vec::new(),
            next_handle: 1,
            gravity: Vec2::new(0.0, tuning.gravity),
            walls: (half, bounds.width - half, bounds.height - half),
        }
    }

    /// World with no gravity and no walls (for isolated placement tests)
    pub fn without_gravity() -> Self {
        Self {
            bodies: Vec::new(),
            next_handle: 1,
            gravity: Vec2::ZERO,
            walls: (f32::NEG_INFINITY, f32::INFINITY, f32::INFINITY),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_static(&self, body: BodyHandle) -> Option<bool> {
        self.get(body).map(|b| b.is_static)
    }

    fn index_of(&self, body: BodyHandle) -> Option<usize> {
        self.bodies.binary_search_by_key(&body, |b| b.handle).ok()
    }

    fn get(&self, body: BodyHandle) -> Option<&Body> {
        self.index_of(body).map(|i| &self.bodies[i])
    }

    fn get_mut(&mut self, body: BodyHandle) -> Option<&mut Body> {
        self.index_of(body).map(move |i| &mut self.bodies[i])
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.vel += self.gravity * dt;
            body.pos += body.vel * dt;
            body.angle += body.angular_vel * dt;
        }
    }

    fn resolve_pairs(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                resolve_circle_contact(&mut head[i], &mut tail[0]);
            }
        }
    }

    fn resolve_walls(&mut self, dt: f32) {
        let (left, right, floor) = self.walls;
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            let r = body.radius;
            if body.pos.y + r > floor {
                body.pos.y = floor - r;
                if body.vel.y > 0.0 {
                    body.vel.y = -body.vel.y * body.restitution;
                }
                // Rolling friction along the floor
                body.vel.x *= (1.0 - body.friction).max(0.0).powf(dt);
                body.angular_vel = body.vel.x / r;
            }
            if body.pos.x - r < left {
                body.pos.x = left + r;
                if body.vel.x < 0.0 {
                    body.vel.x = -body.vel.x * body.restitution;
                }
            }
            if body.pos.x + r > right {
                body.pos.x = right - r;
                if body.vel.x > 0.0 {
                    body.vel.x = -body.vel.x * body.restitution;
                }
            }
        }
    }
}

/// Push two overlapping circles apart and exchange a normal impulse.
/// Static bodies take no correction.
fn resolve_circle_contact(a: &mut Body, b: &mut Body) {
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return;
    }

    let delta = b.pos - a.pos;
    let dist = delta.length();
    let penetration = a.radius + b.radius - dist;
    if penetration <= 0.0 {
        return;
    }

    // Coincident centers: separate vertically
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::NEG_Y };

    a.pos -= normal * penetration * (inv_a / inv_sum);
    b.pos += normal * penetration * (inv_b / inv_sum);

    let rel = b.vel - a.vel;
    let vn = rel.dot(normal);
    if vn >= 0.0 {
        return;
    }

    let restitution = a.restitution.min(b.restitution);
    let j = -(1.0 + restitution) * vn / inv_sum;
    a.vel -= normal * j * inv_a;
    b.vel += normal * j * inv_b;

    // Coulomb-style friction on the tangential component
    let tangent = Vec2::new(-normal.y, normal.x);
    let vt = rel.dot(tangent);
    let friction = (a.friction * b.friction).sqrt();
    let jt = (-vt / inv_sum).clamp(-friction * j, friction * j);
    a.vel -= tangent * jt * inv_a;
    b.vel += tangent * jt * inv_b;

    // Spin from the tangential slip
    if inv_a > 0.0 {
        a.angular_vel = -vt / a.radius;
    }
    if inv_b > 0.0 {
        b.angular_vel = vt / b.radius;
    }
}

impl PhysicsService for CircleWorld {
    fn create_circle(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let area = std::f32::consts::PI * desc.radius * desc.radius;
        self.bodies.push(Body {
            handle,
            pos: desc.position,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            radius: desc.radius,
            mass: desc.density * area,
            is_static: desc.is_static,
            friction: desc.friction,
            restitution: desc.restitution,
        });
        handle
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.get_mut(body) {
            b.pos = position;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.get_mut(body) {
            b.vel = velocity;
        }
    }

    fn set_static(&mut self, body: BodyHandle, is_static: bool) {
        if let Some(b) = self.get_mut(body) {
            b.is_static = is_static;
            if is_static {
                b.vel = Vec2::ZERO;
                b.angular_vel = 0.0;
            }
        }
    }

    fn remove_body(&mut self, body: BodyHandle) {
        if let Some(i) = self.index_of(body) {
            self.bodies.remove(i);
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.get(body).map(|b| BodyState {
            position: b.pos,
            angle: b.angle,
            velocity: b.vel,
        })
    }

    fn step(&mut self, dt: f32) {
        self.integrate(dt);
        for _ in 0..SOLVER_ITERATIONS {
            self.resolve_pairs();
        }
        self.resolve_walls(dt);
    }
}
