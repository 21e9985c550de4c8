//! Stuck-prompt correction.
//!
//! After a word is typed the prompt on screen should change. If the next
//! readings keep producing the token that was current when the word was
//! typed, the image is re-read with broader profiles, up to a retry ceiling.
//!
//! Idle → AwaitingConfirmation on an accepted action; AwaitingConfirmation →
//! Escalating when the stuck token reappears and retries remain; Escalating →
//! Idle when a different reading is found, otherwise back to
//! AwaitingConfirmation with one more retry spent.

use crate::ocr::Token;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorrectionState {
    Idle,
    AwaitingConfirmation { last_accepted: Token, retry_count: u32 },
    Escalating { last_accepted: Token, retry_count: u32 },
}

#[derive(Clone, Debug)]
pub struct PromptCorrector {
    state: CorrectionState,
    ceiling: u32,
}

impl PromptCorrector {
    pub fn new(ceiling: u32) -> Self {
        Self {
            state: CorrectionState::Idle,
            ceiling,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &CorrectionState {
        &self.state
    }

    /// Remembers the token on screen when an action was accepted.
    ///
    /// An empty token leaves nothing to watch for, so the corrector goes idle.
    pub fn on_action_accepted(&mut self, current: &Token) {
        self.state = if current.is_empty() {
            CorrectionState::Idle
        } else {
            CorrectionState::AwaitingConfirmation {
                last_accepted: current.clone(),
                retry_count: 0,
            }
        };
    }

    /// Checks a fresh reading; returns the attempt number when it should be escalated.
    pub fn begin_cycle(&mut self, fused: &Token) -> Option<u32> {
        match &self.state {
            CorrectionState::AwaitingConfirmation {
                last_accepted,
                retry_count,
            } if !fused.is_empty() && fused == last_accepted && *retry_count < self.ceiling => {
                let attempt = retry_count + 1;
                self.state = CorrectionState::Escalating {
                    last_accepted: last_accepted.clone(),
                    retry_count: attempt,
                };
                Some(attempt)
            }
            _ => None,
        }
    }

    /// Applies the result of an escalated reading and returns the working token.
    ///
    /// If an action was accepted while the escalation ran, the newer state is
    /// kept and the stuck token is returned unchanged.
    pub fn finish_escalation(&mut self, stuck: &Token, alternate: &Token) -> Token {
        let CorrectionState::Escalating {
            last_accepted,
            retry_count,
        } = &self.state
        else {
            return stuck.clone();
        };

        if !alternate.is_empty() && alternate != stuck {
            self.state = CorrectionState::Idle;
            return alternate.clone();
        }

        self.state = CorrectionState::AwaitingConfirmation {
            last_accepted: last_accepted.clone(),
            retry_count: *retry_count,
        };
        stuck.clone()
    }

    pub fn last_accepted(&self) -> Option<&Token> {
        match &self.state {
            CorrectionState::Idle => None,
            CorrectionState::AwaitingConfirmation { last_accepted, .. }
            | CorrectionState::Escalating { last_accepted, .. } => Some(last_accepted),
        }
    }

    pub fn retry_count(&self) -> u32 {
        match &self.state {
            CorrectionState::Idle => 0,
            CorrectionState::AwaitingConfirmation { retry_count, .. }
            | CorrectionState::Escalating { retry_count, .. } => *retry_count,
        }
    }

    /// True while retries have been spent and `current` is still the stuck token.
    pub fn is_correcting_for(&self, current: &Token) -> bool {
        self.last_accepted() == Some(current) && self.retry_count() > 0
    }

    /// True once the ceiling is reached and `current` is still the stuck token.
    ///
    /// A different reading means the prompt moved on, so nothing is reported
    /// even though no further retries happen until the next action.
    pub fn is_exhausted_for(&self, current: &Token) -> bool {
        matches!(
            &self.state,
            CorrectionState::AwaitingConfirmation { last_accepted, retry_count }
                if last_accepted == current && *retry_count >= self.ceiling
        )
    }
}
