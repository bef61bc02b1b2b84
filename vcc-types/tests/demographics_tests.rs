use std::collections::HashSet;
use vcc_types::{Category, Dimension};

#[test]
fn every_category_has_a_unique_column() {
    let columns: HashSet<_> = Category::ALL.iter().map(|c| c.column()).collect();
    assert_eq!(columns.len(), Category::ALL.len());
}

#[test]
fn columns_are_sql_safe_identifiers() {
    for c in Category::ALL {
        assert!(
            c.column()
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch == '_'),
            "{c:?}"
        );
    }
}

#[test]
fn every_dimension_has_a_decline_answer() {
    for d in Dimension::ALL {
        assert_eq!(d.categories().filter(|c| c.is_decline()).count(), 1, "{d}");
    }
}

#[test]
fn parse_is_scoped_to_dimension() {
    assert_eq!(Category::parse(Dimension::Gender, "woman"), Some(Category::GenderWoman));
    assert_eq!(Category::parse(Dimension::Lgbtq, "yes"), Some(Category::LgbtqYes));
    assert_eq!(Category::parse(Dimension::Disability, "yes"), Some(Category::DisabilityYes));
    assert_eq!(Category::parse(Dimension::Race, "woman"), None);
    assert_eq!(
        Category::parse(Dimension::Veteran, "disabled_veteran"),
        Some(Category::VeteranDisabled)
    );
}

#[test]
fn residency_is_never_diverse() {
    assert!(Dimension::CaResident.categories().all(|c| !c.is_diverse()));
}

#[test]
fn diverse_categories_match_statute() {
    let diverse: Vec<_> = Category::ALL.into_iter().filter(|c| c.is_diverse()).collect();
    assert_eq!(
        diverse,
        vec![
            Category::GenderWoman,
            Category::GenderNonbinary,
            Category::GenderTransgender,
            Category::RaceBlack,
            Category::RaceAsian,
            Category::RaceHispanic,
            Category::RaceNativeAmerican,
            Category::RacePacificIslander,
            Category::LgbtqYes,
            Category::DisabilityYes,
            Category::VeteranYes,
            Category::VeteranDisabled,
        ]
    );
}

#[test]
fn only_gender_and_race_are_multi_select() {
    let multi: Vec<_> = Dimension::ALL.into_iter().filter(|d| d.is_multi_select()).collect();
    assert_eq!(multi, vec![Dimension::Gender, Dimension::Race]);
}

#[test]
fn dimension_serde_uses_wire_names() {
    let json = serde_json::to_string(&Dimension::CaResident).unwrap();
    assert_eq!(json, "\"ca_resident\"");
}
