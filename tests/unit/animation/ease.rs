use super::*;

#[test]
fn endpoints_are_exact() {
    for ease in [Ease::RaisedCosine, Ease::Linear, Ease::InOutCubic] {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn raised_cosine_is_symmetric_and_flat_at_ends() {
    assert!((raised_cosine(0.5) - 0.5).abs() < 1e-12);
    for t in [0.1, 0.25, 0.4] {
        assert!((raised_cosine(t) + raised_cosine(1.0 - t) - 1.0).abs() < 1e-12);
    }
    let h = 1e-6;
    assert!(raised_cosine(h) / h < 1e-3);
    assert!((1.0 - raised_cosine(1.0 - h)) / h < 1e-3);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::RaisedCosine.apply(-3.0), 0.0);
    assert!((Ease::RaisedCosine.apply(7.0) - 1.0).abs() < 1e-12);
    assert_eq!(Ease::default(), Ease::RaisedCosine);
}
