use crate::booking::quote::{DistanceError, DistanceResolver, OutwardCodeTable};

fn table() -> OutwardCodeTable {
    let csv = "outward_code,distance_miles\nNR2,10.0\nIP1,35.0\n";
    OutwardCodeTable::from_reader(csv.as_bytes()).expect("table parses")
}

#[test]
fn resolves_by_outward_segment_ignoring_case_and_spacing() {
    let table = table();
    for postcode in ["NR2 1AB", "nr2 1ab", "NR21AB", "  NR2 1AB  "] {
        assert_eq!(
            table.resolve_distance_miles(postcode).expect("resolves"),
            10.0,
            "'{postcode}' should resolve"
        );
    }
}

#[test]
fn unknown_outward_code_is_unresolved() {
    assert!(matches!(
        table().resolve_distance_miles("ZZ9 9ZZ"),
        Err(DistanceError::Unresolved { .. })
    ));
}

#[test]
fn non_ascii_postcodes_fail_as_unresolved() {
    let table = table();
    for postcode in ["Aéé", "NR2 1ÄB", "日本1AB", "éé"] {
        assert!(
            matches!(
                table.resolve_distance_miles(postcode),
                Err(DistanceError::Unresolved { .. })
            ),
            "'{postcode}' should be unresolved"
        );
    }
}

#[test]
fn punctuation_is_stripped_before_lookup() {
    assert_eq!(
        table()
            .resolve_distance_miles("NR2-1AB")
            .expect("resolves"),
        10.0
    );
}
