//! "Primarily diverse" classification.
//!
//! A company is primarily diverse when more than half of its declared
//! founders responded and at least half of the responders who answered
//! (decline-all responses excluded) hold at least one diverse identity.
//!
//! The diverse-responder count comes from the aggregate's
//! `diverse_responders` counter, bumped once per qualifying submission, so a
//! founder who is both a woman and Asian is counted once rather than twice.
//! Comparisons are done in integer arithmetic so the 0.5 boundaries are
//! exact.

use vcc_types::Aggregate;

/// Returns the statutory flag. `total_founders == 0` is always false.
pub fn is_primarily_diverse(aggregate: &Aggregate, total_founders: u32) -> bool {
    if total_founders == 0 {
        return false;
    }

    // response rate > 0.5
    if 2 * aggregate.total_responses <= u64::from(total_founders) {
        return false;
    }

    let answered = aggregate.answered_responses();
    if answered == 0 {
        return false;
    }

    // diverse share >= 0.5
    let diverse = aggregate.diverse_responders.min(answered);
    2 * diverse >= answered
}

/// Share of answering responders with a diverse identity, for reporting.
pub fn diverse_share(aggregate: &Aggregate) -> f64 {
    match aggregate.answered_responses() {
        0 => 0.0,
        answered => aggregate.diverse_responders.min(answered) as f64 / answered as f64,
    }
}
