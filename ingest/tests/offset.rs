use ingest::offset;
use pretty_assertions::assert_eq;

#[test]
fn faceit_display_numbers() {
    assert_eq!(1, offset::display_round_number(3, Some("faceit")));
    assert_eq!(2, offset::display_round_number(4, Some("faceit")));
    // stored 1 and 2 clamp to 1 but never appear in listings
    assert_eq!(1, offset::display_round_number(1, Some("faceit")));
    assert_eq!(1, offset::display_round_number(2, Some("faceit")));
    assert!(!offset::is_listed(1, Some("faceit")));
    assert!(!offset::is_listed(2, Some("faceit")));
    assert!(offset::is_listed(3, Some("faceit")));
}

#[test]
fn unknown_sources_are_identity() {
    for source in [None, Some("matchmaking"), Some("other")] {
        for stored in 1..=30 {
            assert_eq!(stored, offset::display_round_number(stored, source));
            assert_eq!(stored, offset::stored_round_number(stored, source));
            assert!(offset::is_listed(stored, source));
        }
    }
}

#[test]
fn round_trip_for_every_listed_round() {
    for source in [None, Some("faceit"), Some("esea"), Some("matchmaking")] {
        for stored in 1..=40 {
            if !offset::is_listed(stored, source) {
                continue;
            }

            let display = offset::display_round_number(stored, source);
            assert!(display >= 1);
            assert_eq!(stored, offset::stored_round_number(display, source));
        }
    }
}
