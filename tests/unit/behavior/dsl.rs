use super::*;

#[test]
fn builds_raw_request() {
    let r = RequestBuilder::new()
        .composition(CompositionMode::Append)
        .start(0.5)
        .instruction(gaze("CAMERA").start(0.0).end(2.0))
        .instruction(head("NOD").relax(1.0).shift(false))
        .build()
        .unwrap();
    assert_eq!(r.composition, CompositionMode::Append);
    assert_eq!(r.start, Some(0.5));
    assert_eq!(r.instructions.len(), 2);
    assert_eq!(r.instructions[0].timing.end, Some(2.0));
    assert_eq!(
        r.instructions[1].fields.get("lexeme"),
        Some(&Value::from("NOD"))
    );
    assert_eq!(r.instructions[1].shift, Some(false));
}

#[test]
fn empty_request_is_rejected() {
    assert!(RequestBuilder::new().build().is_err());
}

#[test]
fn built_request_serializes_like_wire_json() {
    let r = RequestBuilder::new()
        .instruction(gesture("WAVE").stroke(0.2, 0.5, 0.6).field("hand", "RIGHT"))
        .build()
        .unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["composition"], Value::from("MERGE"));
    assert_eq!(v["gesture"]["stroke"], Value::from(0.5));
    assert_eq!(v["gesture"]["hand"], Value::from("RIGHT"));
}
