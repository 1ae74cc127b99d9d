use super::common::*;
use crate::booking::domain::ServiceKind;
use crate::booking::pricing::{PricingConfigError, PricingError, QuoteEngine};

#[test]
fn three_room_carpet_clean_inside_free_radius() {
    let quote = engine()
        .calculate(ServiceKind::CarpetCleaning, &room_params(3), 10.0)
        .expect("quote computes");

    assert_eq!(quote.breakdown.base_price, 75.0);
    assert_eq!(quote.breakdown.add_on_fee, 0.0);
    assert_eq!(quote.service_cost, 75.0);
    assert_eq!(quote.travel_cost, 0.0);
    assert_eq!(quote.total_cost, 75.0);
    assert!(!quote.outside_service_area);
}

#[test]
fn stain_removal_add_on_is_a_flat_surcharge() {
    let mut params = room_params(3);
    params.stain_removal = true;

    let quote = engine()
        .calculate(ServiceKind::CarpetCleaning, &params, 10.0)
        .expect("quote computes");

    assert_eq!(quote.breakdown.add_on_fee, 15.0);
    assert_eq!(quote.service_cost, 90.0);
    assert_eq!(quote.total_cost, 90.0);
}

#[test]
fn travel_cost_applies_beyond_the_free_radius() {
    let quote = engine()
        .calculate(ServiceKind::CarpetCleaning, &room_params(2), 35.0)
        .expect("quote computes");

    // 15 billable miles at 0.78/mile.
    assert_eq!(quote.travel_cost, 11.7);
    assert_eq!(quote.total_cost, quote.service_cost + 11.7);
}

#[test]
fn quote_is_still_priced_outside_the_service_radius() {
    let quote = engine()
        .calculate(ServiceKind::CarpetCleaning, &room_params(2), 120.0)
        .expect("quote computes");

    assert!(quote.outside_service_area);
    assert!(quote.total_cost > 0.0);
    // Travel is never capped at the service radius.
    assert_eq!(quote.travel_cost, (100.0f64 * 0.78 * 100.0).round() / 100.0);
}

#[test]
fn travel_cost_is_zero_exactly_at_the_free_radius() {
    let at_boundary = engine()
        .calculate(ServiceKind::CarpetCleaning, &room_params(2), 20.0)
        .expect("quote computes");
    assert_eq!(at_boundary.travel_cost, 0.0);

    let just_beyond = engine()
        .calculate(ServiceKind::CarpetCleaning, &room_params(2), 20.01)
        .expect("quote computes");
    assert!(just_beyond.travel_cost > 0.0);
}

#[test]
fn service_cost_is_non_decreasing_in_room_count() {
    let quote_engine = engine();
    let mut previous = 0.0;
    for rooms in 1..=8 {
        let quote = quote_engine
            .calculate(ServiceKind::CarpetCleaning, &room_params(rooms), 5.0)
            .expect("quote computes");
        assert!(quote.service_cost >= previous);
        previous = quote.service_cost;
    }
}

#[test]
fn travel_cost_is_linear_in_billable_miles() {
    let quote_engine = engine();
    let near = quote_engine
        .calculate(ServiceKind::RugCleaning, &flat_params(), 25.0)
        .expect("quote computes");
    let far = quote_engine
        .calculate(ServiceKind::RugCleaning, &flat_params(), 30.0)
        .expect("quote computes");

    assert!(far.travel_cost > near.travel_cost);
    assert_eq!(far.travel_cost - near.travel_cost, 3.9);
}

#[test]
fn identical_inputs_yield_identical_quotes() {
    let quote_engine = engine();
    let first = quote_engine
        .calculate(ServiceKind::CommercialCleaning, &area_params(80.0), 42.0)
        .expect("quote computes");
    let second = quote_engine
        .calculate(ServiceKind::CommercialCleaning, &area_params(80.0), 42.0)
        .expect("quote computes");

    assert_eq!(first, second);
}

#[test]
fn total_matches_the_rounded_component_sum() {
    let quote_engine = engine();
    for distance in [0.0, 19.99, 20.0, 21.3, 57.77, 120.0] {
        let quote = quote_engine
            .calculate(ServiceKind::CommercialCleaning, &area_params(63.5), distance)
            .expect("quote computes");
        let expected = ((quote.service_cost + quote.travel_cost) * 100.0).round() / 100.0;
        assert_eq!(quote.total_cost, expected);
    }
}

#[test]
fn room_priced_services_bill_at_least_one_room() {
    let mut params = room_params(1);
    params.room_count = None;

    let quote = engine()
        .calculate(ServiceKind::UpholsteryCleaning, &params, 0.0)
        .expect("quote computes");
    assert_eq!(quote.breakdown.base_price, 25.0);

    params.room_count = Some(0);
    let quote = engine()
        .calculate(ServiceKind::UpholsteryCleaning, &params, 0.0)
        .expect("quote computes");
    assert_eq!(quote.breakdown.base_price, 25.0);
}

#[test]
fn area_priced_services_fall_back_to_the_assumed_area() {
    let mut params = area_params(1.0);
    params.square_meters = None;

    let quote = engine()
        .calculate(ServiceKind::CommercialCleaning, &params, 0.0)
        .expect("quote computes");
    assert_eq!(quote.breakdown.base_price, 1.5 * 50.0);
}

#[test]
fn flat_priced_services_ignore_size_fields() {
    let mut params = flat_params();
    params.room_count = Some(9);
    params.square_meters = Some(400.0);

    let quote = engine()
        .calculate(ServiceKind::MattressCleaningKing, &params, 0.0)
        .expect("quote computes");
    assert_eq!(quote.breakdown.base_price, 45.0);
}

#[test]
fn standalone_stain_removal_carries_no_add_on_fee() {
    let mut params = flat_params();
    params.stain_removal = true;

    let quote = engine()
        .calculate(ServiceKind::StainRemoval, &params, 0.0)
        .expect("quote computes");
    assert_eq!(quote.breakdown.add_on_fee, 0.0);
    assert_eq!(quote.service_cost, 45.0);
}

#[test]
fn malformed_distance_is_a_programming_error() {
    let quote_engine = engine();

    match quote_engine.calculate(ServiceKind::CarpetCleaning, &room_params(2), -1.0) {
        Err(PricingError::InvalidDistance(found)) => assert_eq!(found, -1.0),
        other => panic!("expected invalid distance error, got {other:?}"),
    }

    assert!(matches!(
        quote_engine.calculate(ServiceKind::CarpetCleaning, &room_params(2), f64::NAN),
        Err(PricingError::InvalidDistance(_))
    ));
}

#[test]
fn malformed_area_is_rejected() {
    assert!(matches!(
        engine().calculate(ServiceKind::CommercialCleaning, &area_params(-4.0), 0.0),
        Err(PricingError::InvalidArea(_))
    ));
}

#[test]
fn missing_flat_rate_is_a_configuration_error() {
    let mut config = pricing_config();
    config.flat_rate_by_service.remove(&ServiceKind::CarValeting);

    assert_eq!(
        config.validate(),
        Err(PricingConfigError::MissingFlatRate(ServiceKind::CarValeting))
    );

    // A gap slipping past startup validation still fails loudly.
    let quote_engine = QuoteEngine::new(config);
    assert!(matches!(
        quote_engine.calculate(ServiceKind::CarValeting, &flat_params(), 0.0),
        Err(PricingError::MissingFlatRate(ServiceKind::CarValeting))
    ));
}

#[test]
fn standard_rate_card_passes_validation() {
    assert!(pricing_config().validate().is_ok());
}

#[test]
fn rounding_is_half_away_from_zero_at_each_boundary() {
    let mut config = pricing_config();
    config.per_mile_rate = 0.125;
    let quote_engine = QuoteEngine::new(config);

    // 1 billable mile at 0.125 rounds up to 0.13, not down to 0.12.
    let quote = quote_engine
        .calculate(ServiceKind::RugCleaning, &flat_params(), 21.0)
        .expect("quote computes");
    assert_eq!(quote.travel_cost, 0.13);
    assert_eq!(quote.total_cost, 30.13);
}
