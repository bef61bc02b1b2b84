use vcc_ledger::classifier::{diverse_share, is_primarily_diverse};
use vcc_types::{Aggregate, CompanyId};

fn aggregate(total: u64, declined_all: u64, diverse: u64) -> Aggregate {
    let mut agg = Aggregate::empty(CompanyId::new());
    agg.total_responses = total;
    agg.total_declined_all = declined_all;
    agg.diverse_responders = diverse;
    agg
}

#[test]
fn zero_founders_is_false_not_an_error() {
    assert!(!is_primarily_diverse(&aggregate(0, 0, 0), 0));
    assert!(!is_primarily_diverse(&aggregate(3, 0, 3), 0));
}

#[test]
fn response_rate_must_exceed_half() {
    // exactly 0.5 is not enough
    assert!(!is_primarily_diverse(&aggregate(2, 0, 2), 4));
    assert!(is_primarily_diverse(&aggregate(3, 0, 3), 4));
}

#[test]
fn diverse_share_of_exactly_half_qualifies() {
    assert!(is_primarily_diverse(&aggregate(4, 0, 2), 4));
    assert!(!is_primarily_diverse(&aggregate(4, 0, 1), 4));
}

#[test]
fn decline_all_responses_are_excluded_from_share() {
    // 3 of 4 responded, one declined everything, one of the other two diverse
    let agg = aggregate(3, 1, 1);
    assert!(is_primarily_diverse(&agg, 4));
    assert_eq!(diverse_share(&agg), 0.5);
}

#[test]
fn all_declined_is_false() {
    assert!(!is_primarily_diverse(&aggregate(3, 3, 0), 4));
    assert_eq!(diverse_share(&aggregate(3, 3, 0)), 0.0);
}

#[test]
fn more_responses_than_founders_still_classifies() {
    assert!(is_primarily_diverse(&aggregate(5, 0, 3), 4));
}

#[test]
fn no_responses_is_false() {
    assert!(!is_primarily_diverse(&aggregate(0, 0, 0), 4));
}
