use super::*;

#[test]
fn endpoints_are_fixed_for_every_curve() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-9, "{}", ease.name());
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{}", ease.name());
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InQuad.apply(-3.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(7.0), 1.0);
}

#[test]
fn in_out_curves_are_symmetric_at_midpoint() {
    for ease in [Ease::InOutQuad, Ease::InOutCubic, Ease::InOutSine] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-9);
    }
}

#[test]
fn names_roundtrip_through_from_str_and_serde() {
    for ease in Ease::ALL {
        assert_eq!(ease.name().parse::<Ease>().unwrap(), ease);
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
    assert!("bounce".parse::<Ease>().is_err());
}
