//! In-process duel environment for Python training loops.

use numpy::PyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{DuelConfig, DuelError, GameRng, Side};
use crate::duel::Duel;
use crate::observation::Observation;
use crate::rules::RulesEngine;

fn to_py_err(err: DuelError) -> PyErr {
    match err {
        DuelError::InvalidConfig(msg) => PyValueError::new_err(msg),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Self-play duel environment.
///
/// `step` plays for whichever side is to move, using the zero-based action
/// index of the wire protocol.
#[pyclass(name = "DuelEnv")]
pub struct PyDuelEnv {
    duel: Duel,
    last_events: Vec<String>,
}

impl PyDuelEnv {
    fn observation<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_vec_bound(py, Observation::from_duel(&self.duel).to_tensor())
    }

    /// Keep only the events of the latest call.
    fn collect_events(&mut self) {
        self.last_events = self
            .duel
            .drain_events()
            .iter()
            .map(ToString::to_string)
            .collect();
    }
}

#[pymethods]
impl PyDuelEnv {
    /// Create an environment.
    ///
    /// # Arguments
    /// - seed: RNG seed; random when omitted
    /// - max_lives: Starting and maximum lives per side
    #[new]
    #[pyo3(signature = (seed = None, max_lives = 4))]
    fn new(seed: Option<u64>, max_lives: u32) -> PyResult<Self> {
        let config = DuelConfig::default()
            .with_max_lives(max_lives)
            .with_auto_start(true);
        let rng = seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let mut duel = Duel::with_rng(config, rng).map_err(to_py_err)?;
        let _ = duel.drain_events();
        Ok(Self {
            duel,
            last_events: Vec::new(),
        })
    }

    /// Start a new match and return the first observation.
    fn reset<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f32>>> {
        self.duel.reset_match();
        self.duel.start_round().map_err(to_py_err)?;
        self.collect_events();
        Ok(self.observation(py))
    }

    /// Apply an action for the side to move.
    ///
    /// Returns (observation, reward, done).
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action_index: usize,
    ) -> PyResult<(Bound<'py, PyArray1<f32>>, f32, bool)> {
        let side = self
            .duel
            .current_turn()
            .ok_or_else(|| PyRuntimeError::new_err("no side to move; call reset()"))?;
        let code = u8::try_from(action_index.saturating_add(1)).unwrap_or(u8::MAX);
        let outcome = self.duel.execute_code(side, code).map_err(to_py_err)?;
        self.collect_events();
        Ok((self.observation(py), outcome.reward, outcome.match_over))
    }

    /// Current observation.
    fn state<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        self.observation(py)
    }

    /// Descriptions of what happened during the last `reset` or `step`.
    fn events(&self) -> Vec<String> {
        self.last_events.clone()
    }

    /// Zero-based indices of the legal actions for the side to move.
    fn legal_actions(&self) -> Vec<usize> {
        match self.duel.current_turn() {
            Some(side) => self
                .duel
                .legal_actions(side)
                .into_iter()
                .map(|a| a.index())
                .collect(),
            None => Vec::new(),
        }
    }

    /// 0 for side A, 1 for side B, None when nobody is to move.
    fn current_turn(&self) -> Option<usize> {
        self.duel.current_turn().map(Side::index)
    }

    /// Winner index once the match is over.
    fn winner(&self) -> Option<usize> {
        self.duel.is_terminal().map(|r| r.winner().index())
    }

    /// Lives of side 0 (A) or 1 (B).
    fn lives(&self, side: usize) -> PyResult<u32> {
        let side = Side::ALL
            .get(side)
            .copied()
            .ok_or_else(|| PyValueError::new_err(format!("side must be 0 or 1, got {side}")))?;
        Ok(self.duel.player(side).lives())
    }

    fn __repr__(&self) -> String {
        let status = if self.duel.is_match_over() {
            "over"
        } else {
            "ongoing"
        };
        format!(
            "DuelEnv(round={}, turn={:?}, status={})",
            self.duel.round(),
            self.duel.current_turn(),
            status
        )
    }
}
