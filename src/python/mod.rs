//! Python bindings for the duel simulation.
//!
//! # Quick Start
//!
//! ```python
//! import buckshot_duel
//!
//! env = buckshot_duel.DuelEnv(seed=42)
//! obs = env.reset()
//! done = False
//! while not done:
//!     action = policy(obs, env.legal_actions())
//!     obs, reward, done = env.step(action)
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::PyDuelEnv;

/// buckshot_duel: two-sided duel environment for agent training.
#[pymodule]
fn buckshot_duel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDuelEnv>()?;
    m.add("OBSERVATION_LEN", crate::observation::OBSERVATION_LEN)?;
    Ok(())
}
