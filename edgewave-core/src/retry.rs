use crate::solver::{SolveStatus, Solver, StepReport};
use crate::SolverError;
use log::{info, warn};

/// The solver that finished the retry loop and how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome {
    pub solver: Solver,
    pub attempts: u32,
}

impl RetryOutcome {
    pub fn resolved(&self) -> bool {
        self.solver.status() == SolveStatus::Resolved
    }
}

/// What an observer of [`until_resolved_with`] is told about.
#[derive(Debug, Clone, Copy)]
pub enum SolveEvent<'a> {
    /// A fresh solver was built; nothing has been collapsed yet.
    Started { attempt: u32, seed: u64 },
    /// One `step()` returned.
    Stepped(&'a StepReport),
}

/// Builds and runs solvers with seeds `base_seed`, `base_seed + 1`, ... until one
/// resolves or `max_attempts` solves have been tried.
///
/// The returned solver is the resolved one, or the last contradicted one when
/// every attempt failed. `max_attempts` of zero is treated as one.
pub fn until_resolved<F>(
    max_attempts: u32,
    base_seed: u64,
    make_solver: F,
) -> Result<RetryOutcome, SolverError>
where
    F: FnMut(u64) -> Result<Solver, SolverError>,
{
    until_resolved_with(max_attempts, base_seed, make_solver, |_, _| Ok(()))
}

/// [`until_resolved`] with a callback after every build and every step.
///
/// An error from `observe` stops the loop and is returned as is.
pub fn until_resolved_with<F, O, E>(
    max_attempts: u32,
    base_seed: u64,
    mut make_solver: F,
    mut observe: O,
) -> Result<RetryOutcome, E>
where
    F: FnMut(u64) -> Result<Solver, E>,
    O: FnMut(&Solver, SolveEvent<'_>) -> Result<(), E>,
    E: From<SolverError>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        let seed = base_seed.wrapping_add(u64::from(attempt));
        attempt += 1;
        let mut solver = make_solver(seed)?;
        observe(&solver, SolveEvent::Started { attempt, seed })?;
        while !solver.status().is_terminal() {
            let report = solver.step()?;
            observe(&solver, SolveEvent::Stepped(&report))?;
        }

        let status = solver.status();
        match status {
            SolveStatus::Resolved => {
                info!("Resolved with seed {seed} on attempt {attempt}/{max_attempts}");
                return Ok(RetryOutcome {
                    solver,
                    attempts: attempt,
                });
            }
            SolveStatus::Contradiction { at } if attempt < max_attempts => {
                warn!("Attempt {attempt}/{max_attempts} (seed {seed}) hit a contradiction at {at}, retrying");
            }
            _ => {
                warn!("Giving up after {attempt} attempt(s): {status}");
                return Ok(RetryOutcome {
                    solver,
                    attempts: attempt,
                });
            }
        }
    }
}
