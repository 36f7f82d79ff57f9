//! A single action and its lifecycle.

use std::fmt;

use sq_core::{ActionId, Angle, PedId, TilePoint, VehicleId, WeaponId, WorldPoint};

use crate::ChainKind;

// ── Status ────────────────────────────────────────────────────────────────────

/// Lifecycle state of an action.
///
/// ```text
/// NotStarted ─▶ Running ─▶ (WaitForAnim | WaitForTime)* ─▶ Succeeded | Failed
/// ```
///
/// `Suspended` is entered only through [`Action::suspend`] and left only
/// through [`Action::resume`], which restores the saved status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ActionStatus {
    #[default]
    NotStarted,
    Running,
    WaitForAnim,
    WaitForTime,
    Suspended,
    Succeeded,
    Failed,
}

impl ActionStatus {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Started and not finished.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::WaitForAnim | Self::WaitForTime)
    }

    /// Transitions allowed through [`Action::set_status`].
    pub fn can_become(self, next: ActionStatus) -> bool {
        use ActionStatus::*;
        match (self, next) {
            (NotStarted, Running | Failed) => true,
            (Running | WaitForAnim | WaitForTime, Running | WaitForAnim | WaitForTime) => true,
            (Running | WaitForAnim | WaitForTime, Succeeded | Failed) => true,
            _ => false,
        }
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// What hit a ped; selects the reaction played by a `Hit` action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    Bullet,
    Laser,
    Burn,
    Explosion,
}

impl HitKind {
    /// How long the reaction holds the ped.
    pub fn duration_ms(self) -> u32 {
        match self {
            HitKind::Bullet => 200,
            HitKind::Laser => 300,
            HitKind::Burn => 1000,
            HitKind::Explosion => 600,
        }
    }
}

/// What a weapon is aimed at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FireTarget {
    Ped(PedId),
    Point(WorldPoint),
}

/// The closed set of actions, each with its own typed state.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    /// Walk a routed path to a tile.
    Walk { dest: TilePoint, run: bool },
    /// Walk freely along a heading, optionally for a limited distance or
    /// toward a point.
    WalkToDirection {
        heading:      Angle,
        max_distance: Option<f64>,
        target:       Option<WorldPoint>,
        bounce:       bool,
        safe_walk:    bool,
        run:          bool,
    },
    /// Stay within `distance_tiles` of another ped.
    Follow { target: PedId, distance_tiles: i32 },
    /// Close in on a ped until it is within weapon range, then succeed.
    FollowToShoot { target: PedId },
    /// Do nothing for a while.
    Wait { duration_ms: u32, elapsed_ms: u32 },
    /// Aim at a ped for a while before opening fire.
    WaitBeforeShooting { target: PedId, duration_ms: u32, elapsed_ms: u32 },
    /// Weapon-slot action: one volley from the selected weapon.
    Fire { target: FireTarget, elapsed_ms: u32 },
    /// Chain action: keep installing `Fire` in the weapon slot until the
    /// target dies or leaves range.
    Shoot { target: FireTarget },
    PickUp { weapon: WeaponId },
    Drop { weapon: WeaponId },
    EnterVehicle { vehicle: VehicleId },
    Drive { vehicle: VehicleId, dest: TilePoint },
    /// Reaction to damage; cannot be suspended.
    Hit { kind: HitKind, elapsed_ms: u32 },
    /// Restart `chain` from its head.
    Reset { chain: ChainKind },
    /// Drop the rest of the running chain and continue with `target`.
    ReplaceCurrent { target: ActionId },
}

impl ActionKind {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Walk { .. } => "walk",
            ActionKind::WalkToDirection { .. } => "walk-to-direction",
            ActionKind::Follow { .. } => "follow",
            ActionKind::FollowToShoot { .. } => "follow-to-shoot",
            ActionKind::Wait { .. } => "wait",
            ActionKind::WaitBeforeShooting { .. } => "wait-before-shooting",
            ActionKind::Fire { .. } => "fire",
            ActionKind::Shoot { .. } => "shoot",
            ActionKind::PickUp { .. } => "pick-up",
            ActionKind::Drop { .. } => "drop",
            ActionKind::EnterVehicle { .. } => "enter-vehicle",
            ActionKind::Drive { .. } => "drive",
            ActionKind::Hit { .. } => "hit",
            ActionKind::Reset { .. } => "reset",
            ActionKind::ReplaceCurrent { .. } => "replace-current",
        }
    }

    /// Atomic reactions refuse to be suspended.
    #[inline]
    pub fn is_atomic(&self) -> bool {
        matches!(self, ActionKind::Hit { .. } | ActionKind::Fire { .. })
    }

    /// Chain-control markers, handled by the engine itself.
    #[inline]
    pub fn is_control(&self) -> bool {
        matches!(self, ActionKind::Reset { .. } | ActionKind::ReplaceCurrent { .. })
    }

    /// The ped this action is aimed at, if any.
    pub fn target_ped(&self) -> Option<PedId> {
        match *self {
            ActionKind::Follow { target, .. }
            | ActionKind::FollowToShoot { target }
            | ActionKind::WaitBeforeShooting { target, .. } => Some(target),
            ActionKind::Fire { target: FireTarget::Ped(p), .. }
            | ActionKind::Shoot { target: FireTarget::Ped(p) } => Some(p),
            _ => None,
        }
    }

    /// Point every ped-targeted kind at `ped`.  Returns `true` when the kind
    /// carries a ped target.
    pub fn retarget(&mut self, ped: PedId) -> bool {
        match self {
            ActionKind::Follow { target, .. }
            | ActionKind::FollowToShoot { target }
            | ActionKind::WaitBeforeShooting { target, .. } => {
                *target = ped;
                true
            }
            ActionKind::Fire { target, .. } | ActionKind::Shoot { target } => {
                *target = FireTarget::Ped(ped);
                true
            }
            _ => false,
        }
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// One action, owned by a ped's [`ActionChains`](crate::ActionChains) arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub kind:             ActionKind,
    status:               ActionStatus,
    saved_status:         Option<ActionStatus>,
    /// While this action runs, no weapon may be used.
    pub exclusive:        bool,
    /// May run while the ped sits in a vehicle.
    pub vehicle_ok:       bool,
    /// Survives completion so a `Reset` can replay it.
    pub scripted:         bool,
    /// Report completion to the behaviour layer.
    pub notify_behaviour: bool,
    pub(crate) chain:     Option<ChainKind>,
    pub(crate) next:      Option<ActionId>,
    pub(crate) prev:      Option<ActionId>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        let exclusive = matches!(kind, ActionKind::PickUp { .. } | ActionKind::Drop { .. });
        let vehicle_ok = matches!(
            kind,
            ActionKind::Drive { .. }
                | ActionKind::Wait { .. }
                | ActionKind::Reset { .. }
                | ActionKind::ReplaceCurrent { .. }
        );
        Self {
            kind,
            status: ActionStatus::NotStarted,
            saved_status: None,
            exclusive,
            vehicle_ok,
            scripted: false,
            notify_behaviour: false,
            chain: None,
            next: None,
            prev: None,
        }
    }

    pub fn scripted(mut self) -> Self {
        self.scripted = true;
        self
    }

    pub fn notify(mut self) -> Self {
        self.notify_behaviour = true;
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    #[inline]
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    #[inline]
    pub fn chain(&self) -> Option<ChainKind> {
        self.chain
    }

    #[inline]
    pub fn next(&self) -> Option<ActionId> {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> Option<ActionId> {
        self.prev
    }

    /// Move along the lifecycle.  Illegal transitions are programming errors.
    pub fn set_status(&mut self, next: ActionStatus) {
        debug_assert!(
            self.status == next || self.status.can_become(next),
            "illegal {} transition {:?} -> {:?}",
            self.kind.name(),
            self.status,
            next
        );
        self.status = next;
    }

    pub fn succeed(&mut self) {
        self.set_status(ActionStatus::Succeeded);
    }

    pub fn fail(&mut self) {
        self.set_status(ActionStatus::Failed);
    }

    /// Freeze a started action.  A not-yet-started or finished action is left
    /// alone.  Atomic reactions refuse and return `false`.
    pub fn suspend(&mut self) -> bool {
        if self.kind.is_atomic() && self.status.is_active() {
            return false;
        }
        if self.status.is_active() {
            self.saved_status = Some(self.status);
            self.status = ActionStatus::Suspended;
        }
        true
    }

    /// Undo [`suspend`](Self::suspend), restoring the exact prior status.
    pub fn resume(&mut self) {
        if self.status == ActionStatus::Suspended {
            self.status = self.saved_status.take().unwrap_or(ActionStatus::Running);
        }
    }

    /// Back to `NotStarted` with per-kind progress cleared, for replays.
    pub fn reset(&mut self) {
        self.status = ActionStatus::NotStarted;
        self.saved_status = None;
        match &mut self.kind {
            ActionKind::Wait { elapsed_ms, .. }
            | ActionKind::WaitBeforeShooting { elapsed_ms, .. }
            | ActionKind::Fire { elapsed_ms, .. }
            | ActionKind::Hit { elapsed_ms, .. } => *elapsed_ms = 0,
            _ => {}
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}]", self.kind.name(), self.status)
    }
}
