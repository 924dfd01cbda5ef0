use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Revealed,
    HitHazard,
    Won,
    Exhausted,
}

/// Wires an agent to the board oracle: each step requests a move, consults
/// the field, and feeds the observation back into the agent.
#[derive(Clone, Debug)]
pub struct Session<P = FirstInOrder> {
    field: HazardField,
    agent: Agent<P>,
    state: SessionState,
    triggered_hazard: Option<Cell>,
}

impl Session<FirstInOrder> {
    pub fn new(field: HazardField, seed: u64) -> Self {
        let agent = Agent::new(field.grid_config(), seed);
        Self::with_agent(field, agent)
    }
}

impl<P: SafePicker> Session<P> {
    pub fn with_agent(field: HazardField, agent: Agent<P>) -> Self {
        Self {
            field,
            agent,
            state: Default::default(),
            triggered_hazard: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn agent(&self) -> &Agent<P> {
        &self.agent
    }

    pub fn field(&self) -> &HazardField {
        &self.field
    }

    pub fn triggered_hazard(&self) -> Option<Cell> {
        self.triggered_hazard
    }

    /// Plays one move. A `None` from the agent means every unplayed cell is a
    /// proven hazard, so the board is cleared.
    pub fn step(&mut self) -> Result<StepOutcome> {
        use StepOutcome::*;

        if self.state.is_finished() {
            return Err(GridError::SessionEnded);
        }

        let Some(cell) = self.agent.request_move() else {
            self.state = SessionState::Won;
            return Ok(Exhausted);
        };
        let cell = self.field.validate_cell(cell)?;

        if self.field.contains_hazard(cell) {
            self.triggered_hazard = Some(cell);
            self.state = SessionState::Lost;
            return Ok(HitHazard);
        }

        let count = self.field.neighbor_hazard_count(cell);
        self.agent.record(cell, count)?;

        if self.agent.knowledge().moves_made().len() == usize::from(self.field.safe_cell_count()) {
            self.state = SessionState::Won;
            Ok(Won)
        } else {
            Ok(Revealed)
        }
    }

    /// Drives the session to a terminal state.
    pub fn run(&mut self) -> Result<SessionState> {
        while !self.state.is_finished() {
            self.step()?;
        }
        Ok(self.state)
    }
}
