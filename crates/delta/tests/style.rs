use quilt_delta::{Attribute, Style};
use serde_json::Value;

fn link(target: &str) -> Attribute {
    Attribute::link(target).unwrap()
}

#[test]
fn put_overwrites_and_remove_drops() {
    let style = Style::single(&Attribute::bold())
        .put(&link("https://example.com"))
        .put(&link("https://example.org"));

    assert_eq!(style.len(), 2);
    assert!(style.contains(&link("https://example.org")));
    assert!(!style.contains(&link("https://example.com")));

    let style = style.remove("link");
    assert_eq!(style.len(), 1);
    assert!(style.contains(&Attribute::bold()));
}

#[test]
fn contains_distinguishes_value_from_key() {
    let style = Style::single(&Attribute::heading(2).unwrap());

    assert!(style.contains(&Attribute::heading(2).unwrap()));
    assert!(!style.contains(&Attribute::heading(1).unwrap()));
    assert!(style.contains_same(&Attribute::heading(1).unwrap()));
    assert!(!style.contains_same(&Attribute::bold()));
}

#[test]
fn merge_overrides_and_null_removes() {
    let base = Style::single(&Attribute::bold()).put(&Attribute::italic());
    let patch = Style::single(&Attribute::bold().unset()).put(&link("https://example.com"));

    let merged = base.merge(&patch);
    assert!(!merged.contains_same(&Attribute::bold()));
    assert!(merged.contains(&Attribute::italic()));
    assert!(merged.contains(&link("https://example.com")));
}

#[test]
fn merge_contains_same_follows_the_override_rule() {
    let bold = Attribute::bold();
    let s1 = Style::single(&bold);

    // Other sets the key: present regardless of self.
    let set = Style::new().merge(&Style::single(&bold));
    assert!(set.contains_same(&bold));

    // Other unsets the key: absent even though self had it.
    let unset = s1.merge(&Style::single(&bold.unset()));
    assert!(!unset.contains_same(&bold));

    // Other silent, self had it: survives.
    let kept = s1.merge(&Style::single(&Attribute::italic()));
    assert!(kept.contains_same(&bold));
}

#[test]
fn intersect_keeps_only_agreeing_entries() {
    let a = Style::single(&Attribute::bold()).put(&link("https://a.example.com"));
    let b = Style::single(&Attribute::bold()).put(&link("https://b.example.com"));

    let common = Style::intersect(&a, &b);
    assert!(common.contains(&Attribute::bold()));
    assert!(!common.contains_same(&link("https://a.example.com")));
}

#[test]
fn compose_keeps_or_drops_unset_markers() {
    let base = Style::single(&Attribute::bold());
    let patch = Style::single(&Attribute::bold().unset());

    let kept = Style::compose(&base, &patch, true);
    assert_eq!(kept.get("bold"), Some(&Value::Null));

    let dropped = Style::compose(&base, &patch, false);
    assert!(dropped.is_empty());
}

#[test]
fn diff_produces_minimal_patch() {
    let a = Style::single(&Attribute::bold());
    let b = Style::single(&Attribute::italic());

    let patch = Style::diff(&a, &b);
    assert_eq!(patch.get("bold"), Some(&Value::Null));
    assert_eq!(patch.get("italic"), Some(&Value::Bool(true)));
    assert_eq!(a.merge(&patch), b);
}

#[test]
fn invert_restores_touched_keys() {
    let base = Style::single(&Attribute::bold());
    let patch = Style::single(&Attribute::bold().unset()).put(&Attribute::italic());

    let inverted = Style::invert(&patch, &base);
    assert_eq!(inverted.get("bold"), Some(&Value::Bool(true)));
    assert_eq!(inverted.get("italic"), Some(&Value::Null));

    let after = base.merge(&patch);
    assert_eq!(after.merge(&inverted), base);
}
