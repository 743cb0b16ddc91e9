//! Deterministic, synchronous playback of a script against a session.
//!
//! Waits are split at gravity deadlines so every gravity step gets its own
//! observation, the same granularity the async engine produces.

use crate::core::{GameSession, Observation};
use crate::script::ScriptStep;

/// Run `steps`, handing each observation to `emit`.
///
/// One observation follows every command and every gravity step inside a wait.
/// Stops at the first error from `emit`.
pub fn play<E, F>(session: &mut GameSession, steps: &[ScriptStep], mut emit: F) -> Result<(), E>
where
    F: FnMut(Observation) -> Result<(), E>,
{
    for step in steps {
        match *step {
            ScriptStep::Command(command) => {
                session.apply(command);
                emit(session.observe())?;
            }
            ScriptStep::Wait(ms) => {
                let mut left = ms;
                while left > 0 {
                    let chunk = session
                        .gravity_remaining_ms()
                        .map_or(left, |remaining| remaining.clamp(1, left));
                    if session.tick(chunk) {
                        emit(session.observe())?;
                    }
                    left -= chunk;
                }
            }
        }
    }
    Ok(())
}
