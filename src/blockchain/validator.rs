use super::Block;
use super::pow::is_valid_proof;

/// Validate a candidate chain end to end.
///
/// Every block after the first must carry the digest of its predecessor as
/// `previous_hash` and a `puzzle_solution` that satisfies the proof relation
/// with the predecessor's solution. Stops at the first broken link. A lone
/// block is trivially valid; an empty chain is not a chain at all.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }

    chain.windows(2).all(|pair| {
        let (previous, current) = (&pair[0], &pair[1]);
        current.previous_hash == previous.digest()
            && is_valid_proof(previous.puzzle_solution, current.puzzle_solution)
    })
}
