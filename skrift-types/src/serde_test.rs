use super::*;

#[test]
fn glyph_id_and_fixed_round_trip_json() {
    let gid = GlyphId::new(42);
    let json = serde_json::to_string(&gid).unwrap();
    assert_eq!(serde_json::from_str::<GlyphId>(&json).unwrap(), gid);

    let scale = F2Dot14::from_bits(0x2000);
    let json = serde_json::to_string(&scale).unwrap();
    assert_eq!(serde_json::from_str::<F2Dot14>(&json).unwrap(), scale);
}

#[test]
fn tag_serializes_as_string() {
    let json = serde_json::to_string(&Tag::new(b"glyf")).unwrap();
    assert_eq!(json, "\"glyf\"");
}

#[test]
fn bbox_serializes_fields() {
    let bbox = BoundingBox {
        x_min: 1,
        y_min: 2,
        x_max: 3,
        y_max: 4,
    };
    let json = serde_json::to_value(bbox).unwrap();
    assert_eq!(json["x_max"], 3);
}
