//! Per-form submission state machine.
//!
//! Each form cycles `Idle -> Submitting -> (Succeeded | Failed) -> Idle`
//! on its own. `is_loading` is what disables the submit button.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    phase: FormPhase,
}

impl FormState {
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// `Idle -> Submitting`.
    pub fn begin_submit(&mut self) -> Result<()> {
        self.transition(FormPhase::Idle, FormPhase::Submitting)
    }

    /// `Submitting -> Succeeded`.
    pub fn succeed(&mut self) -> Result<()> {
        self.transition(FormPhase::Submitting, FormPhase::Succeeded)
    }

    /// `Submitting -> Failed`.
    pub fn fail(&mut self) -> Result<()> {
        self.transition(FormPhase::Submitting, FormPhase::Failed)
    }

    /// `Succeeded | Failed -> Idle`. Already idle is a no-op.
    pub fn settle(&mut self) -> Result<()> {
        match self.phase {
            FormPhase::Succeeded | FormPhase::Failed | FormPhase::Idle => {
                self.phase = FormPhase::Idle;
                Ok(())
            }
            FormPhase::Submitting => Err(Error::InvalidState(
                "cannot settle a form that is still submitting".to_string(),
            )),
        }
    }

    fn transition(&mut self, from: FormPhase, to: FormPhase) -> Result<()> {
        if self.phase != from {
            return Err(Error::InvalidState(format!(
                "cannot move form from {:?} to {:?}",
                self.phase, to
            )));
        }
        self.phase = to;
        Ok(())
    }
}
