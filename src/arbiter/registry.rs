//! Registry construction and startup validation

use std::collections::HashSet;

use crate::arbiter::{Arbiter, Entry};
use crate::card::Card;
use crate::core::error::{CardError, Result};
use crate::ports::Wiring;

/// Collects cards in priority order; earlier registration wins ties
#[derive(Default)]
pub struct RegistryBuilder {
    cards: Vec<Box<dyn Card>>,
    fallback: Option<Box<dyn Card>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card at the lowest priority so far
    pub fn register(self, card: impl Card + 'static) -> Self {
        self.register_boxed(Box::new(card))
    }

    pub fn register_boxed(mut self, card: Box<dyn Card>) -> Self {
        self.cards.push(card);
        self
    }

    /// Card that runs when no registered card applies or a card faults
    pub fn fallback(mut self, card: impl Card + 'static) -> Self {
        self.fallback = Some(Box::new(card));
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Validate wiring and arbitration coverage, then hand over to the arbiter
    pub fn build(self, wiring: &Wiring) -> Result<Arbiter> {
        if self.cards.is_empty() {
            return Err(CardError::EmptyRegistry);
        }

        let mut names = HashSet::new();
        for card in self.cards.iter().chain(self.fallback.iter()) {
            if !names.insert(card.name()) {
                return Err(CardError::DuplicateCard(card.name()));
            }
            wiring.bind(card.name(), card.ports())?;
        }

        let catch_all = self.cards.iter().position(|c| c.is_catch_all());
        if self.fallback.is_none() && catch_all.is_none() {
            return Err(CardError::NoFallback);
        }
        if let Some(pos) = catch_all {
            for shadowed in &self.cards[pos + 1..] {
                tracing::warn!(
                    "Card '{}' is unreachable behind catch-all card '{}'",
                    shadowed.name(),
                    self.cards[pos].name()
                );
            }
        }

        tracing::debug!(
            "Registry built with {} cards, fallback: {:?}",
            self.cards.len(),
            self.fallback.as_ref().map(|c| c.name())
        );

        Ok(Arbiter::from_parts(
            self.cards.into_iter().map(Entry::new).collect(),
            self.fallback.map(Entry::new),
        ))
    }
}
