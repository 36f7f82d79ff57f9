//! Per-frame action driver.
//!
//! The engine owns the lifecycle bookkeeping; what an action actually does
//! is delegated to an [`ActionHost`] supplied by the caller (the mission,
//! acting for one ped).

use log::{debug, error};
use sq_core::ActionId;

use crate::{Action, ActionChains, ActionKind, ActionStatus};

/// Chain-control actions (`Reset`, `ReplaceCurrent`) resolved per frame
/// before giving up.  A chain made only of control actions would otherwise
/// spin forever.
const MAX_CONTROL_STEPS: usize = 4;

/// The world side of action execution.
pub trait ActionHost {
    /// Actions without `vehicle_ok` fail immediately while this is `true`.
    fn in_vehicle(&self) -> bool;

    /// Per-kind start.  Returning `false` fails the action.
    fn do_start(&mut self, action: &mut Action) -> bool;

    /// Per-kind frame.  Moves the status between `Running`, the waiting
    /// states, and `Succeeded`/`Failed`.
    fn do_execute(&mut self, action: &mut Action, elapsed_ms: u32);

    /// The ped adopts the display state of a freshly started action.
    fn enter_state(&mut self, _action: &Action) {}

    /// The ped leaves the display state of a finished action.
    fn leave_state(&mut self, _action: &Action) {}
}

/// Completion report for actions flagged `notify_behaviour`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEnded {
    pub id:        ActionId,
    pub kind:      ActionKind,
    pub succeeded: bool,
}

/// Run one frame of the active chain action.
///
/// Resolves chain fallbacks and control actions first, then drives the
/// action through its lifecycle.  Returns a report when a notifying action
/// finished this frame.
pub fn execute<H: ActionHost + ?Sized>(
    chains:     &mut ActionChains,
    host:       &mut H,
    elapsed_ms: u32,
) -> Option<ActionEnded> {
    for _ in 0..MAX_CONTROL_STEPS {
        let id = chains.runnable()?;
        let Some(action) = chains.get(id) else {
            error!("cursor points at destroyed action {id}");
            return None;
        };
        match action.kind {
            ActionKind::Reset { chain } => {
                debug!("reset of {chain:?} chain");
                chains.restart(chain);
            }
            ActionKind::ReplaceCurrent { target } => {
                chains.apply_replace(id, target);
            }
            _ => return run(chains, host, id, elapsed_ms),
        }
    }
    None
}

/// Run one frame of the weapon-slot action, if any.
pub fn execute_weapon<H: ActionHost + ?Sized>(
    chains:     &mut ActionChains,
    host:       &mut H,
    elapsed_ms: u32,
) -> Option<ActionEnded> {
    let id = chains.use_weapon()?;
    run(chains, host, id, elapsed_ms)
}

fn run<H: ActionHost + ?Sized>(
    chains:     &mut ActionChains,
    host:       &mut H,
    id:         ActionId,
    elapsed_ms: u32,
) -> Option<ActionEnded> {
    let in_vehicle = host.in_vehicle();
    let action = chains.get_mut(id)?;

    action.resume();
    let mut started = action.status() != ActionStatus::NotStarted;
    if !started {
        if in_vehicle && !action.vehicle_ok {
            action.fail();
        } else if host.do_start(action) {
            action.set_status(ActionStatus::Running);
            host.enter_state(action);
            started = true;
        } else {
            action.fail();
        }
    }
    if action.status().is_active() {
        host.do_execute(action, elapsed_ms);
    }
    if !action.status().is_finished() {
        return None;
    }

    if started {
        host.leave_state(action);
    }
    let ended = action.notify_behaviour.then(|| ActionEnded {
        id,
        kind: action.kind.clone(),
        succeeded: action.status() == ActionStatus::Succeeded,
    });
    chains.finish(id);
    ended
}
