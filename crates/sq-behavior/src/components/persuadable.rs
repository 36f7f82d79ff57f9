use log::info;

use sq_agent::{Ped, WeaponClass};
use sq_core::PedId;

use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent, ComponentSet};

/// Listens for persuadotrons.  While at least one is out it checks every
/// tick whether a persuader on another side has come within range; if so
/// the ped changes sides and its component list is swapped for the
/// persuaded set.
#[derive(Clone, Debug, Default)]
pub struct PersuadableComponent {
    persuaders: Vec<PedId>,
}

impl PersuadableComponent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BehaviourComponent for PersuadableComponent {
    fn name(&self) -> &'static str {
        "persuadable"
    }

    fn is_enabled(&self) -> bool {
        !self.persuaders.is_empty()
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        let range = WeaponClass::Persuadotron.stats().range_tiles;
        let persuader = self.persuaders.iter().filter_map(|&id| ctx.world.ped(id)).find(|p| {
            p.alive
                && p.persuadotron
                && p.side != ped.side
                && p.position.tz == ped.position.tz
                && p.position.tile_distance(&ped.position) <= range
        });
        let Some(persuader) = persuader else {
            return;
        };

        info!("{} persuaded by {}", ped.id, persuader.id);
        ped.side = persuader.side;
        ped.persuaded_by = Some(persuader.id);
        ped.actions.destroy_all();
        ped.movement.clear_destination();
        ped.selected = None;
        self.persuaders.clear();
        ctx.request_swap(ComponentSet::Persuaded);
    }

    fn handle_event(&mut self, _ped: &mut Ped, event: &BehaviourEvent, _ctx: &mut BehaviourContext<'_>) {
        match *event {
            BehaviourEvent::PersuadotronActivated { by } if !self.persuaders.contains(&by) => {
                self.persuaders.push(by);
            }
            BehaviourEvent::PersuadotronDeactivated { by } => {
                self.persuaders.retain(|&p| p != by);
            }
            _ => {}
        }
    }
}
