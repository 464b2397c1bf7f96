//! Linear flashcard review over one or more modules
//!
//! A session moves from `Selecting` (choosing modules) to `Loading` (cards
//! being fetched for every selected module) to `Reviewing` (a cursor over the
//! concatenated cards). The only way back to `Selecting` is [`ReviewSession::reset`].

use serde::Serialize;

use super::models::Flashcard;

/// Identifies one fetch; results carrying an older ticket are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Outcome a reviewer reports for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Judgment {
    KnewIt,
    ReviewAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewPhase {
    Selecting,
    Loading,
    Reviewing,
}

#[derive(Debug, Clone)]
enum State {
    Selecting,
    Loading {
        ticket: LoadTicket,
    },
    Reviewing {
        cards: Vec<Flashcard>,
        index: usize,
        revealed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    selected: Vec<String>,
    state: State,
    generation: u64,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            state: State::Selecting,
            generation: 0,
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        match self.state {
            State::Selecting => ReviewPhase::Selecting,
            State::Loading { .. } => ReviewPhase::Loading,
            State::Reviewing { .. } => ReviewPhase::Reviewing,
        }
    }

    /// Selected module ids, in selection order
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    // ==================== Selecting ====================

    /// Add a module to the selection. Ignored outside `Selecting` and for
    /// modules already selected.
    pub fn select(&mut self, module_id: impl Into<String>) -> bool {
        if !matches!(self.state, State::Selecting) {
            return false;
        }
        let module_id = module_id.into();
        if self.selected.contains(&module_id) {
            return false;
        }
        self.selected.push(module_id);
        true
    }

    pub fn deselect(&mut self, module_id: &str) -> bool {
        if !matches!(self.state, State::Selecting) {
            return false;
        }
        let before = self.selected.len();
        self.selected.retain(|id| id != module_id);
        self.selected.len() != before
    }

    /// Replace the selection, dropping duplicates but keeping first-seen order
    pub fn set_selection<I, S>(&mut self, module_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !matches!(self.state, State::Selecting) {
            return false;
        }
        self.selected.clear();
        for id in module_ids {
            let id = id.into();
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        true
    }

    // ==================== Loading ====================

    /// Move to `Loading`. Returns `None` when nothing is selected or the
    /// session is not in `Selecting`.
    pub fn begin_loading(&mut self) -> Option<LoadTicket> {
        if !matches!(self.state, State::Selecting) || self.selected.is_empty() {
            return None;
        }
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        self.state = State::Loading { ticket };
        Some(ticket)
    }

    /// Deliver fetched cards, already concatenated in selection order.
    ///
    /// Returns `false` and drops the cards when the ticket no longer matches
    /// the session's in-flight load.
    pub fn finish_loading(&mut self, ticket: LoadTicket, cards: Vec<Flashcard>) -> bool {
        match self.state {
            State::Loading { ticket: current } if current == ticket => {
                self.state = State::Reviewing {
                    cards,
                    index: 0,
                    revealed: false,
                };
                true
            }
            _ => {
                log::debug!("Discarding stale flashcard load {:?}", ticket);
                false
            }
        }
    }

    /// Abandon a load that failed, returning to `Selecting` with the
    /// selection intact
    pub fn abort_loading(&mut self, ticket: LoadTicket) -> bool {
        match self.state {
            State::Loading { ticket: current } if current == ticket => {
                self.state = State::Selecting;
                true
            }
            _ => false,
        }
    }

    /// Full reload: back to an empty `Selecting`. Any load in flight becomes
    /// stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selected.clear();
        self.state = State::Selecting;
    }

    // ==================== Reviewing ====================

    pub fn cards(&self) -> &[Flashcard] {
        match &self.state {
            State::Reviewing { cards, .. } => cards,
            _ => &[],
        }
    }

    /// Reviewing with nothing to show ("no flashcards found")
    pub fn is_empty_review(&self) -> bool {
        matches!(&self.state, State::Reviewing { cards, .. } if cards.is_empty())
    }

    pub fn current(&self) -> Option<&Flashcard> {
        match &self.state {
            State::Reviewing { cards, index, .. } => cards.get(*index),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match &self.state {
            State::Reviewing { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, State::Reviewing { revealed: true, .. })
    }

    /// The side of the current card on display
    pub fn visible_text(&self) -> Option<&str> {
        let card = self.current()?;
        if self.is_revealed() {
            Some(&card.answer)
        } else {
            Some(&card.question)
        }
    }

    /// 1-based position and total, e.g. `(3, 10)` for "Card 3 / 10"
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.state {
            State::Reviewing { cards, index, .. } if !cards.is_empty() => {
                Some((index + 1, cards.len()))
            }
            _ => None,
        }
    }

    pub fn reveal(&mut self) {
        if let State::Reviewing { revealed, .. } = &mut self.state {
            *revealed = true;
        }
    }

    /// Hide the answer and advance, staying on the last card at the end
    pub fn next(&mut self) {
        if let State::Reviewing {
            cards,
            index,
            revealed,
        } = &mut self.state
        {
            *revealed = false;
            if *index + 1 < cards.len() {
                *index += 1;
            }
        }
    }

    /// Hide the answer and step back, staying on the first card
    pub fn prev(&mut self) {
        if let State::Reviewing { index, revealed, .. } = &mut self.state {
            *revealed = false;
            *index = index.saturating_sub(1);
        }
    }

    /// Record a judgment. No scheduling state is kept; both judgments advance.
    pub fn judge(&mut self, judgment: Judgment) {
        log::debug!("Card judged {:?}", judgment);
        self.next();
    }

    pub fn knew_it(&mut self) {
        self.judge(Judgment::KnewIt);
    }

    pub fn review_again(&mut self) {
        self.judge(Judgment::ReviewAgain);
    }
}
