use sq_agent::Ped;

use crate::{BehaviourComponent, BehaviourContext, BehaviourEvent};

/// Heals `heart_level` points every `regen_interval_ms` while hurt.  Turns
/// itself off for peds without a heart implant.
#[derive(Clone, Debug)]
pub struct RegenerationComponent {
    enabled:    bool,
    elapsed_ms: u32,
}

impl RegenerationComponent {
    pub fn new() -> Self {
        Self { enabled: true, elapsed_ms: 0 }
    }
}

impl Default for RegenerationComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourComponent for RegenerationComponent {
    fn name(&self) -> &'static str {
        "regeneration"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        if ped.heart_level == 0 {
            self.enabled = false;
            return;
        }
        if ped.health >= ped.max_health {
            self.elapsed_ms = 0;
            return;
        }
        let interval = ctx.config.regen_interval_ms.max(1);
        self.elapsed_ms += ctx.elapsed_ms;
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            ped.heal(i32::from(ped.heart_level));
        }
    }

    fn handle_event(&mut self, _ped: &mut Ped, _event: &BehaviourEvent, _ctx: &mut BehaviourContext<'_>) {}
}
