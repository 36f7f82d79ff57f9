//! A ped's ordered list of components, and the standard lists per ped kind.

use std::fmt;
use std::str::FromStr;

use log::debug;

use sq_agent::{Ped, PedKind};

use crate::components::{
    HostileComponent, PanicComponent, PersuadableComponent, PersuadedComponent, PoliceComponent,
    RegenerationComponent,
};
use crate::{BehaviorError, BehaviourComponent, BehaviourContext, BehaviourEvent};

// ── ComponentSet ──────────────────────────────────────────────────────────────

/// Named standard component lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentSet {
    Agent,
    Civilian,
    Police,
    Guard,
    Criminal,
    /// Anyone brought over by a persuadotron.
    Persuaded,
}

impl ComponentSet {
    pub fn for_kind(kind: PedKind) -> Self {
        match kind {
            PedKind::Agent => ComponentSet::Agent,
            PedKind::Civilian => ComponentSet::Civilian,
            PedKind::Police => ComponentSet::Police,
            PedKind::Guard => ComponentSet::Guard,
            PedKind::Criminal => ComponentSet::Criminal,
        }
    }

    /// Fresh components, in execution order.
    pub fn build(self) -> Vec<Box<dyn BehaviourComponent>> {
        match self {
            ComponentSet::Agent => vec![Box::new(RegenerationComponent::new())],
            ComponentSet::Civilian => vec![
                Box::new(PersuadableComponent::new()),
                Box::new(PanicComponent::new()),
            ],
            ComponentSet::Police => vec![
                Box::new(PersuadableComponent::new()),
                Box::new(PoliceComponent::new()),
            ],
            ComponentSet::Guard | ComponentSet::Criminal => vec![
                Box::new(PersuadableComponent::new()),
                Box::new(HostileComponent::new()),
            ],
            ComponentSet::Persuaded => vec![
                Box::new(RegenerationComponent::new()),
                Box::new(PersuadedComponent::new()),
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentSet::Agent => "agent",
            ComponentSet::Civilian => "civilian",
            ComponentSet::Police => "police",
            ComponentSet::Guard => "guard",
            ComponentSet::Criminal => "criminal",
            ComponentSet::Persuaded => "persuaded",
        }
    }
}

impl fmt::Display for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentSet {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "agent" => Ok(ComponentSet::Agent),
            "civilian" => Ok(ComponentSet::Civilian),
            "police" => Ok(ComponentSet::Police),
            "guard" => Ok(ComponentSet::Guard),
            "criminal" => Ok(ComponentSet::Criminal),
            "persuaded" => Ok(ComponentSet::Persuaded),
            _ => Err(BehaviorError::UnknownComponentSet(s.to_owned())),
        }
    }
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

/// Ordered components driving one ped.  Created with the ped and dropped
/// with it; persuasion swaps the whole list.
#[derive(Default)]
pub struct Behaviour {
    components: Vec<Box<dyn BehaviourComponent>>,
}

impl Behaviour {
    pub fn new(components: Vec<Box<dyn BehaviourComponent>>) -> Self {
        Self { components }
    }

    pub fn from_set(set: ComponentSet) -> Self {
        Self::new(set.build())
    }

    pub fn for_kind(kind: PedKind) -> Self {
        Self::from_set(ComponentSet::for_kind(kind))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.components.iter().any(|c| c.name() == name && c.is_enabled())
    }

    pub fn replace_components(&mut self, components: Vec<Box<dyn BehaviourComponent>>) {
        self.components = components;
    }

    /// Run every enabled component once.
    pub fn execute(&mut self, ped: &mut Ped, ctx: &mut BehaviourContext<'_>) {
        if !ped.is_alive() {
            return;
        }
        for component in self.components.iter_mut() {
            if component.is_enabled() {
                component.execute(ped, ctx);
            }
            if ctx.swap_pending() {
                break;
            }
        }
        self.apply_swap(ped, ctx);
    }

    /// Offer `event` to every component, enabled or not.
    pub fn handle_behaviour_event(
        &mut self,
        ped:   &mut Ped,
        event: &BehaviourEvent,
        ctx:   &mut BehaviourContext<'_>,
    ) {
        if !ped.is_alive() {
            return;
        }
        for component in self.components.iter_mut() {
            component.handle_event(ped, event, ctx);
            if ctx.swap_pending() {
                break;
            }
        }
        self.apply_swap(ped, ctx);
    }

    fn apply_swap(&mut self, ped: &Ped, ctx: &mut BehaviourContext<'_>) {
        if let Some(set) = ctx.take_swap() {
            debug!("{} switches to {set} behaviour", ped.id);
            self.replace_components(set.build());
        }
    }
}
