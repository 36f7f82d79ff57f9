//! The `BehaviourComponent` trait.

use sq_agent::Ped;

use crate::{BehaviourContext, BehaviourEvent};

/// One independent strategy of a ped's AI.
///
/// A [`Behaviour`][crate::Behaviour] calls `execute` on every *enabled*
/// component once per tick, in list order.  Events reach every component,
/// enabled or not, so a dormant component can wake itself up.
///
/// Components steer their ped by editing its action chains
/// (`add_to_default`, `add_to_alt`, `change_source_of_actions`); they never
/// move it directly.
pub trait BehaviourComponent: Send {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool;

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>);

    fn handle_event(&mut self, ped: &mut Ped, event: &BehaviourEvent, ctx: &mut BehaviourContext<'_>);
}
