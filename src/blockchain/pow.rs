use sha2::{Digest, Sha256};

use super::DIFFICULTY_PREFIX;

/// How many candidates are tried between two polls of the stop condition.
const STOP_POLL_INTERVAL: u64 = 4096;

/// Check the puzzle relation between two consecutive solutions: the hex
/// SHA-256 of the decimal text of `solution² - previous²` must start with
/// [`DIFFICULTY_PREFIX`]. The difference may be negative.
pub fn is_valid_proof(previous_solution: u64, solution: u64) -> bool {
    let previous = i128::from(previous_solution);
    let current = i128::from(solution);
    // Squares above i128::MAX cannot be rendered, so they never satisfy the puzzle.
    let Some(delta) = current
        .checked_mul(current)
        .zip(previous.checked_mul(previous))
        .and_then(|(c, p)| c.checked_sub(p))
    else {
        return false;
    };

    let digest = hex::encode(Sha256::digest(delta.to_string().as_bytes()));
    digest.starts_with(DIFFICULTY_PREFIX)
}

/// Brute-force the smallest solution (counting up from 1) that satisfies
/// [`is_valid_proof`] against `previous_solution`. Blocks until found.
pub fn solve(previous_solution: u64) -> u64 {
    let mut solution = 1;
    while !is_valid_proof(previous_solution, solution) {
        solution += 1;
    }
    solution
}

/// Same search as [`solve`], but `should_stop` is polled periodically and the
/// search gives up with `None` as soon as it returns `true`.
pub fn solve_until(previous_solution: u64, mut should_stop: impl FnMut() -> bool) -> Option<u64> {
    let mut solution: u64 = 1;
    loop {
        if (solution - 1) % STOP_POLL_INTERVAL == 0 && should_stop() {
            return None;
        }
        if is_valid_proof(previous_solution, solution) {
            return Some(solution);
        }
        solution = solution.checked_add(1)?;
    }
}
