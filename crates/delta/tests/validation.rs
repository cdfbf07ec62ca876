use quilt_delta::{Attribute, AttributeScope};
use serde_json::json;

#[test]
fn link_requires_absolute_http_uri() {
    assert!(Attribute::link("not a url").is_err());
    assert!(Attribute::link("example.com/page").is_err());
    assert!(Attribute::link("ftp://example.com").is_err());
    assert!(Attribute::link("https://").is_err());

    let attr = Attribute::link("https://example.com").unwrap();
    assert_eq!(attr.key(), "link");
    assert_eq!(attr.scope(), AttributeScope::Inline);
    assert_eq!(attr.value().and_then(|v| v.as_str()), Some("https://example.com"));

    assert!(Attribute::link("http://example.com/a?b=c#d").is_ok());
}

#[test]
fn boolean_attributes_only_take_true() {
    assert!(Attribute::new("bold", json!(true)).is_ok());
    assert!(Attribute::new("bold", json!(false)).is_err());
    assert!(Attribute::new("quote", json!("yes")).is_err());
}

#[test]
fn heading_levels_are_bounded() {
    assert!(Attribute::heading(0).is_err());
    assert!(Attribute::heading(4).is_err());

    let attr = Attribute::heading(2).unwrap();
    assert_eq!(attr.scope(), AttributeScope::Block);
    assert_eq!(attr.value().and_then(|v| v.as_u64()), Some(2));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Attribute::new("blink", json!(true)).unwrap_err();
    assert!(err.message().contains("blink"));
    assert!(Attribute::unset_key("blink").is_err());
}

#[test]
fn embed_values_need_a_known_type() {
    assert!(Attribute::embed(json!({ "type": "rule" })).is_ok());
    assert!(Attribute::embed(json!({ "type": "image", "source": "a.png" })).is_ok());
    assert!(Attribute::embed(json!({ "type": "video" })).is_err());
    assert!(Attribute::embed(json!({})).is_err());
    assert!(Attribute::embed(json!("rule")).is_err());
}

#[test]
fn unset_forms_never_validate() {
    let unset = Attribute::unset_key("link").unwrap();
    assert!(unset.is_unset());
    assert!(unset.validate().is_ok());

    let from_instance = Attribute::link("https://example.com").unwrap().unset();
    assert!(from_instance.is_unset());
    assert_eq!(from_instance.key(), "link");
}
