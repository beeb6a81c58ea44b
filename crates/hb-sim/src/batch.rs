//! Stepping several independent arenas.
//!
//! Arenas share nothing, so with the `parallel` feature each one runs to
//! completion on its own Rayon task.  Results are identical to running them
//! one after another.

use hb_agent::ActionSource;

use crate::{Sim, SimError, SimObserver, SimResult};

/// Run every sim to its `end_tick`, each with the observer at the same index.
///
/// Stops at the first error; with `parallel` other arenas may still have
/// run to completion.
pub fn run_arenas<S, O>(sims: &mut [Sim<S>], observers: &mut [O]) -> SimResult<()>
where
    S: ActionSource,
    O: SimObserver + Send,
{
    if sims.len() != observers.len() {
        return Err(SimError::ArenaCountMismatch {
            expected: sims.len(),
            got:      observers.len(),
            what:     "observers",
        });
    }

    #[cfg(not(feature = "parallel"))]
    {
        sims.iter_mut()
            .zip(observers.iter_mut())
            .try_for_each(|(sim, observer)| sim.run(observer))
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        sims.par_iter_mut()
            .zip(observers.par_iter_mut())
            .try_for_each(|(sim, observer)| sim.run(observer))
    }
}
