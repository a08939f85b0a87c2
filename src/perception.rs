//! Vision cone queries with single-ray occlusion.
//!
//! A subject is visible when it is within range, inside the forward cone on
//! the ground plane, and is the first body hit by a ray cast from the
//! observer towards its centre. Bodies are spheres. The query is `O(N^2)`
//! per tick over the whole population, which the fixed crowd size keeps
//! cheap.

use glam::Vec3;
use log::trace;

use crate::config::PerceptionConfig;
use crate::entity::{EntityId, Human, Player, Subject};
use crate::vector_math::{flatten, planar_direction, safe_normalize};

/// A sphere that can be seen and can block sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// What the body belongs to.
    pub subject: Subject,
    /// Sphere centre.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

/// Shape of a vision cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCone {
    /// Eye position.
    pub origin: Vec3,
    /// Forward direction; only its planar part is used.
    pub forward: Vec3,
    /// Half-angle of the cone in radians.
    pub half_angle: f32,
    /// Maximum sight distance.
    pub range: f32,
}

/// One visible subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// What was seen.
    pub subject: Subject,
    /// Where it is.
    pub position: Vec3,
    /// Straight-line distance from the observer.
    pub distance: f32,
}

/// Everything an observer noticed this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perception {
    /// Visible subjects, nearest first.
    pub sightings: Vec<Sighting>,
    /// Whether the world's edge lies within sight straight ahead.
    pub sees_edge: bool,
}

impl Perception {
    /// The player sighting, if the player is visible.
    #[must_use]
    pub fn player(&self) -> Option<&Sighting> {
        self.sightings.iter().find(|s| s.subject.is_player())
    }

    /// Whether the player is visible.
    #[must_use]
    pub fn sees_player(&self) -> bool {
        self.player().is_some()
    }

    /// Ids of visible humans, nearest first.
    pub fn humans(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.sightings.iter().filter_map(|s| s.subject.human())
    }

    /// Whether nothing at all was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }
}

/// Distance along a unit ray to the first point of a sphere.
///
/// Returns `None` when the ray misses or the sphere lies behind the origin.
#[must_use]
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - miss_sq).max(0.0).sqrt();
    if along + half_chord < 0.0 {
        return None;
    }
    Some((along - half_chord).max(0.0))
}

fn within_cone(cone: &ViewCone, offset: Vec3) -> bool {
    let (Some(forward), Some(towards)) = (planar_direction(cone.forward), planar_direction(offset))
    else {
        return false;
    };
    forward.dot(towards) >= cone.half_angle.cos()
}

fn occluded(cone: &ViewCone, candidate: &Body, direction: Vec3, bodies: &[Body]) -> bool {
    let Some(candidate_hit) = ray_sphere_hit(cone.origin, direction, candidate.center, candidate.radius)
    else {
        return true;
    };
    bodies
        .iter()
        .filter(|body| body.subject != candidate.subject)
        // A body the eye already sits inside is a neighbour pressed up
        // against the observer, not something in the line of sight.
        .filter(|body| body.center.distance_squared(cone.origin) > body.radius * body.radius)
        .filter_map(|body| ray_sphere_hit(cone.origin, direction, body.center, body.radius))
        .any(|hit| hit < candidate_hit)
}

/// Returns every body visible from `cone`, nearest first.
///
/// `bodies` must not contain the observer itself.
#[must_use]
pub fn visible_subjects(cone: &ViewCone, bodies: &[Body]) -> Vec<Sighting> {
    let mut seen: Vec<Sighting> = bodies
        .iter()
        .filter_map(|body| {
            let offset = body.center - cone.origin;
            let distance = offset.length();
            if distance > cone.range || !within_cone(cone, offset) {
                return None;
            }
            let direction = safe_normalize(offset)?;
            if occluded(cone, body, direction, bodies) {
                return None;
            }
            Some(Sighting {
                subject: body.subject,
                position: body.center,
                distance,
            })
        })
        .collect();
    seen.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    seen
}

/// Whether a point `range` ahead of `origin` lies outside the world.
#[must_use]
pub fn edge_in_sight(origin: Vec3, forward: Vec3, range: f32, world_radius: f32) -> bool {
    planar_direction(forward)
        .is_some_and(|dir| flatten(origin + dir * range).length() > world_radius)
}

/// Runs the full spatial query for `observer` against the crowd and player.
#[must_use]
pub fn perceive(
    observer: &Human,
    humans: &[Human],
    player: &Player,
    config: &PerceptionConfig,
    world_radius: f32,
) -> Perception {
    let bodies: Vec<Body> = humans
        .iter()
        .filter(|other| other.id != observer.id)
        .map(|other| Body {
            subject: Subject::Human(other.id),
            center: other.position,
            radius: config.body_radius,
        })
        .chain(std::iter::once(Body {
            subject: Subject::Player,
            center: player.position,
            radius: config.player_radius,
        }))
        .collect();

    let cone = ViewCone {
        origin: observer.position,
        forward: observer.heading,
        half_angle: config.fov_half_angle,
        range: config.view_range,
    };
    let sightings = visible_subjects(&cone, &bodies);
    trace!("{} sees {} subject(s)", observer.id, sightings.len());

    Perception {
        sightings,
        sees_edge: edge_in_sight(observer.position, observer.heading, config.view_range, world_radius),
    }
}
