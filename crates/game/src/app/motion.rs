//! Scripted motion for the animated scene entities.
//!
//! Every threshold and per-frame delta here is authored at the base resolution and
//! scaled through [`DisplayScale`] when applied, so motion looks the same on any display.

use engine::{DisplayScale, Rect, Vector};

use super::entity::{EntityId, FrameSnapshot, PuzzleView};
use super::puzzle::LAST_FRAGMENT;

pub(crate) const PATROL_SPEED: i32 = 3;
pub(crate) const FALL_STEP: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MotionEvent {
    /// The script left its idle state. Entities swap to their alternate image.
    Activated,
    /// The script reached the end of its path.
    PathEnded,
}

/// `num * (c + offset) / den + base`, with Rust's truncating division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Affine {
    pub(crate) num: i32,
    pub(crate) offset: i32,
    pub(crate) den: i32,
    pub(crate) base: i32,
}

impl Affine {
    pub(crate) const fn new(num: i32, offset: i32, den: i32, base: i32) -> Self {
        Self {
            num,
            offset,
            den,
            base,
        }
    }

    pub(crate) fn apply(&self, coordinate: i32) -> i32 {
        if self.den == 0 {
            return self.base;
        }
        self.num * (coordinate + self.offset) / self.den + self.base
    }
}

/// Position that is a fixed affine function of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Follower {
    pub(crate) x: Affine,
    pub(crate) y: Affine,
}

impl Follower {
    /// Parallax layer at `depth`. Deeper layers move less.
    pub(crate) fn parallax(x: (i32, i32, i32), y: (i32, i32, i32), depth: i32) -> Self {
        let depth = depth.max(1);
        Self {
            x: Affine::new(x.0, x.1, x.2 * depth, 0),
            y: Affine::new(y.0, y.1, y.2 * depth, 0),
        }
    }

    pub(crate) fn position(&self, cursor: Vector) -> Vector {
        Vector::new(self.x.apply(cursor.x), self.y.apply(cursor.y))
    }

    /// Places `rect` for a cursor given in display coordinates.
    pub(crate) fn follow(&self, rect: &mut Rect, cursor: Vector, scale: &DisplayScale) {
        let base = self.position(scale.unscale_point(cursor));
        rect.pos = scale.point(base);
    }
}

/// Horizontal offset from a partner entity, re-applied every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tether {
    pub(crate) partner: EntityId,
    pub(crate) offset: Vector,
}

impl Tether {
    pub(crate) fn follow(&self, rect: &mut Rect, frame: &FrameSnapshot, scale: &DisplayScale) {
        if let Some(partner) = frame.rect(self.partner) {
            rect.pos = partner.pos + scale.point(self.offset);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Immediately,
    Never,
    /// Partner's top edge is at or below `y`.
    PartnerReachesY { partner: EntityId, y: i32 },
    PartnerFinished(EntityId),
}

impl Trigger {
    pub(crate) fn holds(&self, frame: &FrameSnapshot, scale: &DisplayScale) -> bool {
        match *self {
            Trigger::Immediately => true,
            Trigger::Never => false,
            Trigger::PartnerReachesY { partner, y } => frame
                .rect(partner)
                .is_some_and(|rect| rect.pos.y >= scale.y(y)),
            Trigger::PartnerFinished(partner) => frame.is_finished(partner),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Until {
    /// Top edge passed below `y`.
    YAbove(i32),
    /// Left edge passed right of `x`.
    XAbove(i32),
    XAtLeast(i32),
    OffScreenBottom,
    /// Left edge at least `margin` past the right screen edge.
    OffScreenRight(i32),
}

impl Until {
    pub(crate) fn reached(&self, rect: &Rect, scale: &DisplayScale) -> bool {
        let screen = scale.target();
        match *self {
            Until::YAbove(y) => rect.pos.y > scale.y(y),
            Until::XAbove(x) => rect.pos.x > scale.x(x),
            Until::XAtLeast(x) => rect.pos.x >= scale.x(x),
            Until::OffScreenBottom => rect.pos.y > screen.height as i32,
            Until::OffScreenRight(margin) => rect.pos.x >= screen.width as i32 + scale.x(margin),
        }
    }
}

/// Constant per-frame move that runs until its stop condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Leg {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
    pub(crate) until: Until,
}

impl Leg {
    pub(crate) const fn new(dx: i32, dy: i32, until: Until) -> Self {
        Self { dx, dy, until }
    }

    /// Moves one step. Returns `true` once the leg is over, without moving.
    fn step(&self, rect: &mut Rect, scale: &DisplayScale) -> bool {
        if self.until.reached(rect, scale) {
            return true;
        }
        let dx = if self.dx == 0 { 0 } else { scale.x(self.dx) };
        let dy = if self.dy == 0 { 0 } else { scale.y(self.dy) };
        *rect = rect.translated(dx, dy);
        false
    }
}

/// Snaps onto a partner once the partner crosses `threshold_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RideAlong {
    pub(crate) partner: EntityId,
    pub(crate) threshold_x: i32,
    pub(crate) offset: Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathPhase {
    Waiting,
    Moving { leg: usize },
    Ended,
}

/// Trigger-chained path: stays put until `trigger` holds, then runs `legs` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathScript {
    trigger: Trigger,
    legs: Vec<Leg>,
    ride: Option<RideAlong>,
    phase: PathPhase,
}

impl PathScript {
    pub(crate) fn new(trigger: Trigger, legs: Vec<Leg>) -> Self {
        Self {
            trigger,
            legs,
            ride: None,
            phase: PathPhase::Waiting,
        }
    }

    pub(crate) fn with_ride(mut self, ride: RideAlong) -> Self {
        self.ride = Some(ride);
        self
    }

    pub(crate) fn has_started(&self) -> bool {
        self.phase != PathPhase::Waiting
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.phase == PathPhase::Ended
    }

    pub(crate) fn step(
        &mut self,
        rect: &mut Rect,
        frame: &FrameSnapshot,
        scale: &DisplayScale,
    ) -> Option<MotionEvent> {
        if self.phase == PathPhase::Waiting {
            if !self.trigger.holds(frame, scale) {
                return None;
            }
            self.phase = PathPhase::Moving { leg: 0 };
            return Some(MotionEvent::Activated);
        }

        if let Some(ride) = self.ride {
            if let Some(partner) = frame.rect(ride.partner) {
                if partner.pos.x >= scale.x(ride.threshold_x) {
                    rect.pos = partner.pos + scale.point(ride.offset);
                    return None;
                }
            }
        }

        let PathPhase::Moving { mut leg } = self.phase else {
            return None;
        };
        while let Some(current) = self.legs.get(leg) {
            if !current.step(rect, scale) {
                self.phase = PathPhase::Moving { leg };
                return None;
            }
            leg += 1;
        }
        self.phase = PathPhase::Ended;
        Some(MotionEvent::PathEnded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatrolPhase {
    Dormant,
    Entering,
    Patrolling,
    Docking,
    Docked,
}

/// Kinase on a rail: enters, bounces between the screen edges, and docks when
/// clicked while overlapping its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatrolScript {
    trigger: Trigger,
    rail_y: i32,
    dock_y: i32,
    partner: EntityId,
    delta: i32,
    phase: PatrolPhase,
}

impl PatrolScript {
    pub(crate) fn new(trigger: Trigger, rail_y: i32, dock_y: i32, partner: EntityId) -> Self {
        Self {
            trigger,
            rail_y,
            dock_y,
            partner,
            delta: PATROL_SPEED,
            phase: PatrolPhase::Dormant,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> PatrolPhase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn delta(&self) -> i32 {
        self.delta
    }

    pub(crate) fn is_engaged(&self) -> bool {
        self.phase != PatrolPhase::Dormant
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.phase == PatrolPhase::Docked
    }

    pub(crate) fn step(
        &mut self,
        rect: &mut Rect,
        clicked: bool,
        frame: &FrameSnapshot,
        scale: &DisplayScale,
    ) -> Option<MotionEvent> {
        match self.phase {
            PatrolPhase::Dormant => {
                if self.trigger.holds(frame, scale) {
                    self.phase = PatrolPhase::Entering;
                }
                None
            }
            PatrolPhase::Entering => {
                if rect.pos.y <= scale.y(self.rail_y) {
                    *rect = rect.translated(0, scale.y(FALL_STEP));
                } else {
                    self.phase = PatrolPhase::Patrolling;
                }
                None
            }
            PatrolPhase::Patrolling => {
                let touching_partner = frame
                    .rect(self.partner)
                    .is_some_and(|partner| rect.overlaps(&partner));
                if clicked && touching_partner {
                    self.phase = PatrolPhase::Docking;
                    return Some(MotionEvent::Activated);
                }
                *rect = rect.translated(scale.x(self.delta), 0);
                let screen_width = scale.target().width as i32;
                if rect.right() >= screen_width {
                    self.delta = -PATROL_SPEED;
                } else if rect.pos.x <= 0 {
                    self.delta = PATROL_SPEED;
                }
                None
            }
            PatrolPhase::Docking => {
                if rect.pos.y <= scale.y(self.dock_y) {
                    *rect = rect.translated(0, scale.y(FALL_STEP));
                    None
                } else {
                    self.phase = PatrolPhase::Docked;
                    Some(MotionEvent::PathEnded)
                }
            }
            PatrolPhase::Docked => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkerPhase {
    Waiting,
    Entering,
    Ready,
    Advancing { target_x: i32 },
    Exiting,
    Done,
}

/// Enzyme that walks along a strand one fragment per completed match.
///
/// After the active fragment completes it steps right to `stride * (index + stride_offset)`,
/// or takes the exit leg when the fragment is the last one. Either way it reports
/// [`MotionEvent::PathEnded`] on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkerScript {
    gate: Trigger,
    entry: Leg,
    stride: i32,
    stride_offset: i32,
    step: i32,
    exit: Leg,
    phase: WalkerPhase,
}

impl WalkerScript {
    pub(crate) fn new(gate: Trigger, entry: Leg, stride_offset: i32, exit: Leg) -> Self {
        Self {
            gate,
            entry,
            stride: 160,
            stride_offset,
            step: 5,
            exit,
            phase: WalkerPhase::Waiting,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> WalkerPhase {
        self.phase
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.phase == WalkerPhase::Done
    }

    pub(crate) fn step(
        &mut self,
        rect: &mut Rect,
        puzzle: Option<PuzzleView>,
        frame: &FrameSnapshot,
        scale: &DisplayScale,
    ) -> Option<MotionEvent> {
        match self.phase {
            WalkerPhase::Waiting => {
                if self.gate.holds(frame, scale) {
                    self.phase = WalkerPhase::Entering;
                }
                None
            }
            WalkerPhase::Entering => {
                if self.entry.step(rect, scale) {
                    self.phase = WalkerPhase::Ready;
                }
                None
            }
            WalkerPhase::Ready => {
                let view = puzzle?;
                if !view.active_completed {
                    return None;
                }
                self.phase = if view.active_index >= LAST_FRAGMENT {
                    WalkerPhase::Exiting
                } else {
                    let slot = view.active_index as i32 + self.stride_offset;
                    WalkerPhase::Advancing {
                        target_x: self.stride * slot,
                    }
                };
                None
            }
            WalkerPhase::Advancing { target_x } => {
                if rect.pos.x >= scale.x(target_x) {
                    self.phase = WalkerPhase::Ready;
                    return Some(MotionEvent::PathEnded);
                }
                *rect = rect.translated(scale.x(self.step), 0);
                None
            }
            WalkerPhase::Exiting => {
                if self.exit.step(rect, scale) {
                    self.phase = WalkerPhase::Done;
                    return Some(MotionEvent::PathEnded);
                }
                None
            }
            WalkerPhase::Done => None,
        }
    }
}
