//! Sticky nearest-flower targeting.
//!
//! The target is only replaced when a strictly closer flower is found or the
//! current one runs dry, so an agent does not oscillate between two flowers
//! at similar distances.  Distance is measured from a reference point (the
//! beak tip) to each flower's root position.

use hb_core::{FlowerId, Vec3};
use tracing::trace;

use crate::Flower;

/// One selection pass over `flowers`.
///
/// Walks flowers in order, skipping empty ones:
///
/// - with no current target, the first flower with nectar is taken,
/// - otherwise a candidate replaces the current target if it is strictly
///   closer to `reference`, or if the current target has run dry.
///
/// Ties keep the earlier choice.  Returns `None` only if `current` is `None`
/// and no flower has nectar; an empty `current` is returned unchanged if
/// nothing can replace it.
pub fn update_nearest(
    reference: Vec3,
    current:   Option<FlowerId>,
    flowers:   &[Flower],
) -> Option<FlowerId> {
    let mut nearest = current;
    for flower in flowers.iter().filter(|f| f.has_nectar()) {
        let Some(id) = nearest else {
            nearest = Some(flower.id());
            continue;
        };
        // A stale id from another area never matches; treat it as dry.
        let Some(current) = flowers.get(id.index()) else {
            nearest = Some(flower.id());
            continue;
        };
        let current_dist = current.position().distance(reference);
        let candidate_dist = flower.position().distance(reference);
        if !current.has_nectar() || candidate_dist < current_dist {
            nearest = Some(flower.id());
        }
    }
    nearest
}

/// The flower an agent is currently heading for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NearestFlower(Option<FlowerId>);

impl NearestFlower {
    #[inline]
    pub fn get(&self) -> Option<FlowerId> {
        self.0
    }

    /// Run a selection pass and return the (possibly unchanged) target.
    pub fn update(&mut self, reference: Vec3, flowers: &[Flower]) -> Option<FlowerId> {
        let next = update_nearest(reference, self.0, flowers);
        if next != self.0 {
            trace!(from = ?self.0, to = ?next, "nearest flower changed");
        }
        self.0 = next;
        next
    }

    /// Re-select only if the held target has run dry (e.g. another agent
    /// drained it).  An absent target is left alone.  Returns `true` if a
    /// selection pass ran.
    pub fn refresh_if_depleted(&mut self, reference: Vec3, flowers: &[Flower]) -> bool {
        let depleted = self
            .0
            .is_some_and(|id| flowers.get(id.index()).is_none_or(|f| !f.has_nectar()));
        if depleted {
            self.update(reference, flowers);
        }
        depleted
    }
}
