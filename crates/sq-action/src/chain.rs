//! Per-ped action arena and the three chains threaded through it.

use log::{debug, error};
use sq_core::{ActionId, PedId};

use crate::{Action, ActionError, ActionKind, ActionResult};

/// Which of a ped's chains an action belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChainKind {
    Current,
    Default,
    Alt,
}

impl ChainKind {
    pub const ALL: [ChainKind; 3] = [ChainKind::Current, ChainKind::Default, ChainKind::Alt];

    #[inline]
    fn slot(self) -> usize {
        match self {
            ChainKind::Current => 0,
            ChainKind::Default => 1,
            ChainKind::Alt => 2,
        }
    }
}

/// Arena of one ped's actions plus the chain heads, cursors and weapon slot.
///
/// Slots are recycled through a free list; an [`ActionId`] is only valid
/// until its action is destroyed.
#[derive(Clone, Debug)]
pub struct ActionChains {
    slots:    Vec<Option<Action>>,
    free:     Vec<ActionId>,
    heads:    [Option<ActionId>; 3],
    cursors:  [Option<ActionId>; 3],
    source:   ChainKind,
    fallback: ChainKind,
    /// Source switch refused by an atomic action, applied once it ends.
    pending:  Option<ChainKind>,
    weapon:   Option<ActionId>,
}

impl Default for ActionChains {
    fn default() -> Self {
        Self {
            slots:    Vec::new(),
            free:     Vec::new(),
            heads:    [None; 3],
            cursors:  [None; 3],
            source:   ChainKind::Default,
            fallback: ChainKind::Default,
            pending:  None,
            weapon:   None,
        }
    }
}

impl ActionChains {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Arena ─────────────────────────────────────────────────────────────

    fn alloc(&mut self, action: Action) -> ActionId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(action);
                id
            }
            None => {
                let id = ActionId(self.slots.len() as u32);
                self.slots.push(Some(action));
                id
            }
        }
    }

    fn release(&mut self, id: ActionId) -> Option<Action> {
        let taken = self.slots.get_mut(id.index()).and_then(Option::take);
        if taken.is_some() {
            self.free.push(id);
        } else {
            error!("double free of action {id}");
            debug_assert!(false, "double free of action {id}");
        }
        taken
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live actions, weapon slot included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Links ─────────────────────────────────────────────────────────────

    fn set_next(&mut self, id: Option<ActionId>, next: Option<ActionId>) {
        if let Some(a) = id.and_then(|id| self.get_mut(id)) {
            a.next = next;
        }
    }

    fn set_prev(&mut self, id: Option<ActionId>, prev: Option<ActionId>) {
        if let Some(a) = id.and_then(|id| self.get_mut(id)) {
            a.prev = prev;
        }
    }

    fn tail(&self, kind: ChainKind) -> Option<ActionId> {
        let mut cur = self.heads[kind.slot()]?;
        while let Some(next) = self.get(cur).and_then(Action::next) {
            cur = next;
        }
        Some(cur)
    }

    /// Link a free-floating action at the end of `kind`.
    fn link_back(&mut self, kind: ChainKind, id: ActionId) {
        let tail = self.tail(kind);
        if let Some(a) = self.get_mut(id) {
            a.chain = Some(kind);
            a.prev = tail;
            a.next = None;
        }
        match tail {
            Some(_) => self.set_next(tail, Some(id)),
            None => self.heads[kind.slot()] = Some(id),
        }
        if self.cursors[kind.slot()].is_none() {
            self.cursors[kind.slot()] = Some(id);
        }
    }

    /// Link a free-floating action right before `at`, in `at`'s chain.
    fn link_before(&mut self, at: ActionId, id: ActionId) {
        let Some((kind, prev)) = self.get(at).and_then(|a| a.chain.map(|k| (k, a.prev))) else {
            return;
        };
        if let Some(a) = self.get_mut(id) {
            a.chain = Some(kind);
            a.prev = prev;
            a.next = Some(at);
        }
        self.set_prev(Some(at), Some(id));
        match prev {
            Some(_) => self.set_next(prev, Some(id)),
            None => self.heads[kind.slot()] = Some(id),
        }
    }

    /// Link a free-floating action right after `at`, in `at`'s chain.
    fn link_after(&mut self, at: ActionId, id: ActionId) {
        let Some((kind, next)) = self.get(at).and_then(|a| a.chain.map(|k| (k, a.next))) else {
            return;
        };
        if let Some(a) = self.get_mut(id) {
            a.chain = Some(kind);
            a.prev = Some(at);
            a.next = next;
        }
        self.set_next(Some(at), Some(id));
        self.set_prev(next, Some(id));
    }

    /// Take `id` out of its chain, joining its neighbours.  A cursor on `id`
    /// moves to the next action.
    fn unlink(&mut self, id: ActionId) -> ActionResult<()> {
        let (kind, prev, next) = {
            let a = self.get(id).ok_or(ActionError::UnknownAction(id))?;
            (a.chain.ok_or(ActionError::NotInChain(id))?, a.prev, a.next)
        };
        self.set_next(prev, next);
        self.set_prev(next, prev);
        if self.heads[kind.slot()] == Some(id) {
            self.heads[kind.slot()] = next;
        }
        if self.cursors[kind.slot()] == Some(id) {
            self.cursors[kind.slot()] = next;
        }
        if let Some(a) = self.get_mut(id) {
            a.chain = None;
            a.next = None;
            a.prev = None;
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn head(&self, kind: ChainKind) -> Option<ActionId> {
        self.heads[kind.slot()]
    }

    pub fn cursor(&self, kind: ChainKind) -> Option<ActionId> {
        self.cursors[kind.slot()]
    }

    /// A source switch waiting for an atomic action to end.
    #[inline]
    pub fn pending_source(&self) -> Option<ChainKind> {
        self.pending
    }

    /// The chain whose cursor executes.
    #[inline]
    pub fn source(&self) -> ChainKind {
        self.source
    }

    /// The action that executes next frame, without any fallback applied.
    #[inline]
    pub fn active(&self) -> Option<ActionId> {
        self.cursors[self.source.slot()]
    }

    pub fn active_action(&self) -> Option<&Action> {
        self.active().and_then(|id| self.get(id))
    }

    pub fn iter(&self, kind: ChainKind) -> ChainIter<'_> {
        ChainIter { chains: self, next: self.heads[kind.slot()] }
    }

    pub fn chain_len(&self, kind: ChainKind) -> usize {
        self.iter(kind).count()
    }

    /// `true` when nothing is left to run in any chain.
    pub fn is_idle(&self) -> bool {
        ChainKind::ALL.iter().all(|&k| self.cursors[k.slot()].is_none())
    }

    // ── Chain building ────────────────────────────────────────────────────

    /// Queue an order on the current chain and make it the source.
    ///
    /// With `append = false` the existing current chain is replaced.  If the
    /// running action cannot be suspended the switch is deferred: a
    /// `ReplaceCurrent` marker is spliced after it and the new action waits,
    /// unlinked, until the marker is reached.
    pub fn add_to_current(&mut self, action: Action, append: bool) -> ActionId {
        self.pending = None;
        let id = self.alloc(action);
        if append {
            self.link_back(ChainKind::Current, id);
            if self.source != ChainKind::Current {
                let start = self.cursors[ChainKind::Current.slot()].unwrap_or(id);
                self.take_over(start);
            }
        } else {
            self.take_over(id);
        }
        id
    }

    /// Append to the scripted default routine.
    pub fn add_to_default(&mut self, action: Action) -> ActionId {
        let id = self.alloc(action);
        self.link_back(ChainKind::Default, id);
        id
    }

    /// Append to the reactive alternative chain.
    pub fn add_to_alt(&mut self, action: Action) -> ActionId {
        let id = self.alloc(action);
        self.link_back(ChainKind::Alt, id);
        id
    }

    /// Run `action` before anything else, e.g. a hit reaction.  The running
    /// action is suspended and resumes afterwards; an atomic one finishes
    /// first, then the rest of its chain is dropped in favour of `action`.
    pub fn insert_priority(&mut self, action: Action) -> ActionId {
        let id = self.alloc(action);
        let refuses = self
            .active()
            .and_then(|a| self.get(a))
            .is_some_and(|a| a.kind.is_atomic() && a.status().is_active());
        if refuses {
            self.take_over(id);
            return id;
        }
        match self.active() {
            Some(active) if self.source == ChainKind::Current => self.link_before(active, id),
            _ => match self.heads[ChainKind::Current.slot()] {
                Some(head) => self.link_before(head, id),
                None => self.link_back(ChainKind::Current, id),
            },
        }
        self.take_over(id);
        id
    }

    /// Switch execution to `kind`, suspending the running action.
    ///
    /// Returns `false` if the running action is atomic and refuses to
    /// suspend.  The switch is then deferred and happens as soon as that
    /// action ends; a later switch or order supersedes it.
    pub fn change_source_of_actions(&mut self, kind: ChainKind) -> bool {
        self.pending = None;
        if self.source == kind {
            return true;
        }
        if let Some(a) = self.active().and_then(|id| self.get_mut(id)) {
            if !a.suspend() {
                debug!("switch to {kind:?} chain deferred behind atomic action");
                self.pending = Some(kind);
                return false;
            }
        }
        debug!("action source {:?} -> {:?}", self.source, kind);
        if kind != ChainKind::Current {
            self.fallback = kind;
        }
        self.source = kind;
        if self.cursors[kind.slot()].is_none() {
            self.cursors[kind.slot()] = self.heads[kind.slot()];
        }
        true
    }

    /// Replay `kind` from its head: every member goes back to `NotStarted`.
    pub fn reset_chain(&mut self, kind: ChainKind) {
        let ids: Vec<ActionId> = self.iter(kind).map(|(id, _)| id).collect();
        for id in ids {
            if let Some(a) = self.get_mut(id) {
                a.reset();
            }
        }
        self.cursors[kind.slot()] = self.heads[kind.slot()];
    }

    /// Replay the default routine from its head.
    pub fn reset_default(&mut self) {
        self.reset_chain(ChainKind::Default);
    }

    /// Drop the current chain and restart `kind` from its head as the source.
    pub fn restart(&mut self, kind: ChainKind) {
        self.pending = None;
        if kind != ChainKind::Current {
            self.destroy_chain(ChainKind::Current);
            self.fallback = kind;
        }
        self.reset_chain(kind);
        self.source = kind;
    }

    /// Unlink `id` from its chain, join its neighbours, and hand the action
    /// back to the caller.  The id becomes invalid.
    pub fn remove_and_join_chain(&mut self, id: ActionId) -> ActionResult<Action> {
        self.unlink(id)?;
        self.release(id).ok_or(ActionError::UnknownAction(id))
    }

    /// Destroy every action of `kind`.
    pub fn destroy_chain(&mut self, kind: ChainKind) {
        let mut orphans = Vec::new();
        let mut cur = self.heads[kind.slot()];
        while let Some(id) = cur {
            cur = self.get(id).and_then(Action::next);
            if let Some(Action { kind: ActionKind::ReplaceCurrent { target }, .. }) = self.release(id) {
                orphans.push(target);
            }
        }
        // Deferred targets of dropped markers were never linked anywhere.
        for target in orphans {
            let floating = self.get(target).is_some_and(|a| a.chain.is_none());
            if floating && self.weapon != Some(target) {
                self.release(target);
            }
        }
        self.heads[kind.slot()] = None;
        self.cursors[kind.slot()] = None;
        if self.source == kind && kind == ChainKind::Current {
            self.source = self.fallback;
        }
    }

    /// Destroy everything, e.g. on death.
    pub fn destroy_all(&mut self) {
        *self = Self::default();
    }

    /// Point every ped-targeted action of `kind` at `ped`.  Returns how many
    /// actions were updated.
    pub fn retarget_chain(&mut self, kind: ChainKind, ped: PedId) -> usize {
        let ids: Vec<ActionId> = self.iter(kind).map(|(id, _)| id).collect();
        let mut n = 0;
        for id in ids {
            if self.get_mut(id).is_some_and(|a| a.kind.retarget(ped)) {
                n += 1;
            }
        }
        n
    }

    // ── Engine support ────────────────────────────────────────────────────

    /// Make `target` run now.  `target` is either already linked into the
    /// current chain (the cursor jumps to it) or free-floating (it replaces
    /// the current chain).  If the running action refuses to suspend, a
    /// `ReplaceCurrent` marker defers the switch.
    fn take_over(&mut self, target: ActionId) {
        if let Some(active) = self.active().filter(|&a| a != target) {
            let suspended = self.get_mut(active).is_none_or(Action::suspend);
            if !suspended {
                let marker = self.alloc(Action::new(ActionKind::ReplaceCurrent { target }));
                self.link_after(active, marker);
                debug!("deferring switch to {target} behind atomic {active}");
                return;
            }
        }
        self.install(target);
    }

    fn install(&mut self, target: ActionId) {
        if self.source != ChainKind::Current {
            self.fallback = self.source;
        }
        if self.get(target).is_some_and(|a| a.chain.is_none()) {
            self.destroy_chain(ChainKind::Current);
            self.link_back(ChainKind::Current, target);
        }
        self.cursors[ChainKind::Current.slot()] = Some(target);
        self.source = ChainKind::Current;
    }

    /// Apply a reached `ReplaceCurrent` marker: remove it, then switch to its
    /// target.
    pub(crate) fn apply_replace(&mut self, marker: ActionId, target: ActionId) {
        if let Err(e) = self.remove_and_join_chain(marker) {
            error!("replace-current marker {marker} vanished: {e}");
            return;
        }
        if self.get(target).is_none() {
            debug!("replace-current target {target} no longer exists");
            return;
        }
        self.install(target);
    }

    /// Resolve which action should execute, falling back from an exhausted
    /// current chain to the previous source and from an exhausted alt chain
    /// to the default routine.
    pub(crate) fn runnable(&mut self) -> Option<ActionId> {
        if let Some(kind) = self.pending {
            let held = self
                .active_action()
                .is_some_and(|a| a.kind.is_control() || (a.kind.is_atomic() && !a.status().is_finished()));
            if !held {
                self.change_source_of_actions(kind);
            }
        }
        // Current -> Alt -> Default at most.
        for _ in 0..2 {
            if self.active().is_some() {
                break;
            }
            match self.source {
                ChainKind::Current if self.fallback != ChainKind::Current => {
                    self.source = self.fallback;
                }
                ChainKind::Alt => {
                    self.source = ChainKind::Default;
                    self.fallback = ChainKind::Default;
                }
                _ => break,
            }
            debug!("falling back to {:?} chain", self.source);
        }
        self.active()
    }

    /// Advance past a finished action, destroying it unless it is a scripted
    /// chain member.
    pub(crate) fn finish(&mut self, id: ActionId) {
        let Some(a) = self.get(id) else { return };
        let (kind, next, scripted) = (a.chain, a.next, a.scripted);
        if let Some(kind) = kind {
            if self.cursors[kind.slot()] == Some(id) {
                self.cursors[kind.slot()] = next;
            }
        }
        if scripted && kind.is_some() {
            return;
        }
        if kind.is_some() {
            let _ = self.unlink(id);
        }
        if self.weapon == Some(id) {
            self.weapon = None;
        }
        self.release(id);
    }

    // ── Weapon slot ───────────────────────────────────────────────────────

    /// The weapon-use action, if one is running.
    pub fn use_weapon(&self) -> Option<ActionId> {
        self.weapon
    }

    /// A weapon may be used when none is in use and the running chain action
    /// is not exclusive.
    pub fn can_use_weapon(&self) -> bool {
        self.weapon.is_none()
            && !self
                .active_action()
                .is_some_and(|a| a.exclusive && !a.status().is_finished())
    }

    pub fn set_use_weapon(&mut self, action: Action) -> ActionResult<ActionId> {
        if !self.can_use_weapon() {
            return Err(ActionError::WeaponBlocked);
        }
        let id = self.alloc(action);
        self.weapon = Some(id);
        Ok(id)
    }

    /// Stop using the weapon; the action is destroyed.
    pub fn clear_use_weapon(&mut self) -> Option<Action> {
        let id = self.weapon.take()?;
        self.release(id)
    }
}

/// Iterator over one chain, head to tail.
pub struct ChainIter<'a> {
    chains: &'a ActionChains,
    next:   Option<ActionId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (ActionId, &'a Action);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let action = self.chains.get(id)?;
        self.next = action.next;
        Some((id, action))
    }
}
