//! Card registry and arbitrator
//!
//! Runs the activation protocol once per tick:
//! 1. postconditions of the active card
//! 2. if they hold (or nothing is active), first card in priority order whose
//!    preconditions hold, else the fallback card
//! 3. reset the winner if it differs from the previous active card
//! 4. one state machine step of the winner
//!
//! Faults from any guard or action are resolved inside the tick: the fallback
//! card runs instead, or the safe default frame when the fallback cannot.

pub mod outcome;
pub mod registry;

pub use outcome::{ArbiterStats, Resolution, TickOutcome};
pub use registry::RegistryBuilder;

use crate::card::Card;
use crate::core::error::CardFault;
use crate::core::types::Tick;
use crate::ports::{Ports, Reads, Writes};
use crate::world::WorldSnapshot;

/// Registered card plus a copy of its ports, so reads can borrow the
/// declaration while the card itself is stepped
pub(crate) struct Entry {
    ports: Ports,
    card: Box<dyn Card>,
}

impl Entry {
    pub(crate) fn new(card: Box<dyn Card>) -> Self {
        Self {
            ports: card.ports().clone(),
            card,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    None,
    Card(usize),
    Fallback,
}

type Faulted = (Active, CardFault);

/// Owns the registry and the single active-card pointer
pub struct Arbiter {
    cards: Vec<Entry>,
    fallback: Option<Entry>,
    active: Active,
    tick: Tick,
    stats: ArbiterStats,
}

impl Arbiter {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(cards: Vec<Entry>, fallback: Option<Entry>) -> Self {
        Self {
            cards,
            fallback,
            active: Active::None,
            tick: 0,
            stats: ArbiterStats::default(),
        }
    }

    fn entry(&self, slot: Active) -> Option<&Entry> {
        match slot {
            Active::None => None,
            Active::Card(i) => self.cards.get(i),
            Active::Fallback => self.fallback.as_ref(),
        }
    }

    /// Run one arbitration + execution cycle against this tick's snapshot
    pub fn tick(&mut self, snapshot: &WorldSnapshot) -> TickOutcome {
        self.tick += 1;
        self.stats.ticks += 1;
        let now = self.tick;
        let previous = self.active;

        match self.run_protocol(previous, now, snapshot) {
            Ok(outcome) => outcome,
            Err((culprit, fault)) => self.recover(culprit, fault, previous, now, snapshot),
        }
    }

    fn run_protocol(
        &mut self,
        previous: Active,
        now: Tick,
        snapshot: &WorldSnapshot,
    ) -> Result<TickOutcome, Faulted> {
        let (next, kept) = self.select(snapshot)?;
        self.execute(next, previous, kept, now, snapshot)
    }

    /// Steps 1 and 2: postcondition check, then priority scan
    fn select(&self, snapshot: &WorldSnapshot) -> Result<(Active, bool), Faulted> {
        if let Active::Card(i) = self.active {
            let entry = &self.cards[i];
            let reads = Reads::new(entry.card.name(), entry.ports.reads(), snapshot);
            let finished = entry
                .card
                .postconditions(&reads)
                .map_err(|fault| (self.active, fault))?;
            if !finished {
                return Ok((self.active, true));
            }
            tracing::debug!("Postconditions of '{}' hold", entry.card.name());
        }

        for (i, entry) in self.cards.iter().enumerate() {
            let reads = Reads::new(entry.card.name(), entry.ports.reads(), snapshot);
            let applies = entry
                .card
                .preconditions(&reads)
                .map_err(|fault| (Active::Card(i), fault))?;
            if applies {
                return Ok((Active::Card(i), false));
            }
        }

        if self.fallback.is_some() {
            Ok((Active::Fallback, false))
        } else {
            Ok((Active::None, false))
        }
    }

    /// Steps 3 and 4: reset on activation, then one step
    fn execute(
        &mut self,
        next: Active,
        previous: Active,
        kept: bool,
        now: Tick,
        snapshot: &WorldSnapshot,
    ) -> Result<TickOutcome, Faulted> {
        let entry = match next {
            Active::None => None,
            Active::Card(i) => self.cards.get_mut(i),
            Active::Fallback => self.fallback.as_mut(),
        };
        let Some(Entry { ports, card }) = entry else {
            // Startup validation guarantees a fallback or catch-all card
            tracing::warn!("Tick {}: no card applicable, issuing safe default", now);
            self.active = Active::None;
            self.stats.safe_default_ticks += 1;
            return Ok(TickOutcome::safe_default(now, None));
        };

        let activated = next != previous;
        if activated {
            card.reset(now);
        }

        let reads = Reads::new(card.name(), ports.reads(), snapshot);
        let mut writes = Writes::new(card.name(), ports.skills());
        let report = card
            .execute_step(now, &reads, &mut writes)
            .map_err(|fault| (next, fault))?;
        let name = card.name();
        let state = card.current_state();
        let frame = writes.into_frame();

        if activated {
            self.stats.activations += 1;
            tracing::info!(
                "Tick {}: card '{}' activated in state '{}' (was {:?})",
                now,
                name,
                report.from,
                self.entry(previous).map(|e| e.card.name())
            );
        }
        if report.transitioned() {
            tracing::debug!(
                "Tick {}: '{}' {} -> {} via {:?}",
                now,
                name,
                report.from,
                report.to,
                report.guard
            );
        }

        let resolution = if next == Active::Fallback {
            self.stats.fallback_ticks += 1;
            Resolution::Fallback
        } else if kept {
            Resolution::Kept
        } else if activated {
            Resolution::Switched
        } else {
            Resolution::Reselected
        };
        self.active = next;

        Ok(TickOutcome {
            tick: now,
            active: Some(name),
            state: Some(state),
            resolution,
            activated,
            transitioned: report.transitioned(),
            guard: report.guard,
            frame,
            fault: None,
        })
    }

    /// Resolve a faulted tick to the fallback card or the safe default frame
    fn recover(
        &mut self,
        culprit: Active,
        fault: CardFault,
        previous: Active,
        now: Tick,
        snapshot: &WorldSnapshot,
    ) -> TickOutcome {
        self.stats.faults += 1;
        let (card_name, state_name) = self
            .entry(culprit)
            .map(|e| (e.card.name(), e.card.current_state()))
            .unwrap_or(("<none>", "<none>"));
        tracing::warn!(
            "Tick {}: card '{}' faulted in state '{}': {}",
            now,
            card_name,
            state_name,
            fault
        );

        if culprit != Active::Fallback {
            if let Some(Entry { ports, card }) = self.fallback.as_mut() {
                let activated = previous != Active::Fallback;
                if activated {
                    card.reset(now);
                }
                let reads = Reads::new(card.name(), ports.reads(), snapshot);
                let mut writes = Writes::new(card.name(), ports.skills());
                match card.execute_step(now, &reads, &mut writes) {
                    Ok(report) => {
                        if activated {
                            self.stats.activations += 1;
                        }
                        self.stats.fallback_ticks += 1;
                        self.active = Active::Fallback;
                        return TickOutcome {
                            tick: now,
                            active: Some(card.name()),
                            state: Some(card.current_state()),
                            resolution: Resolution::Fallback,
                            activated,
                            transitioned: report.transitioned(),
                            guard: report.guard,
                            frame: writes.into_frame(),
                            fault: Some(fault),
                        };
                    }
                    Err(second) => {
                        self.stats.faults += 1;
                        tracing::warn!(
                            "Tick {}: fallback card '{}' faulted too: {}",
                            now,
                            card.name(),
                            second
                        );
                    }
                }
            }
        }

        self.active = Active::None;
        self.stats.safe_default_ticks += 1;
        TickOutcome::safe_default(now, Some(fault))
    }

    /// Name of the card that ran last tick
    pub fn active_card(&self) -> Option<&'static str> {
        self.entry(self.active).map(|e| e.card.name())
    }

    /// State of the active card
    pub fn active_state(&self) -> Option<&'static str> {
        self.entry(self.active).map(|e| e.card.current_state())
    }

    /// Registered cards in priority order, fallback excluded
    pub fn card_names(&self) -> Vec<&'static str> {
        self.cards.iter().map(|e| e.card.name()).collect()
    }

    pub fn fallback_name(&self) -> Option<&'static str> {
        self.fallback.as_ref().map(|e| e.card.name())
    }

    /// Cursor state of any card, active or not
    pub fn card_state(&self, name: &str) -> Option<&'static str> {
        self.cards
            .iter()
            .chain(self.fallback.iter())
            .find(|e| e.card.name() == name)
            .map(|e| e.card.current_state())
    }

    /// Number of completed ticks
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn stats(&self) -> ArbiterStats {
        self.stats
    }
}
