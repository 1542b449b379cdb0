//! Substitution behaviour of the built-in rule
//!
//! Fixed scenarios plus property tests for idempotence and the boundary set.

use proptest::prelude::*;
use tw_patcher::SubstitutionRule;

fn fix(input: &str) -> String {
    SubstitutionRule::builtin().apply(input).text
}

#[test]
fn test_scenario_double_quoted_class() {
    assert_eq!(fix(r#"class="text-muted""#), r#"class="text-muted-foreground""#);
}

#[test]
fn test_scenario_already_migrated() {
    assert_eq!(
        fix(r#"class="text-muted-foreground""#),
        r#"class="text-muted-foreground""#
    );
}

#[test]
fn test_scenario_mixed() {
    assert_eq!(
        fix("text-muted text-muted-foreground text-muted'"),
        "text-muted-foreground text-muted-foreground text-muted-foreground'"
    );
}

#[test]
fn test_scenario_no_boundary() {
    assert_eq!(fix("text-mutedXYZ"), "text-mutedXYZ");
}

#[test]
fn test_tsx_fragment() {
    let input = r#"<div className="flex gap-2">
  <span className='text-sm text-muted'>Delivery</span>
  <p className={cn("text-muted", active && "font-bold")}>{price}</p>
  <p className="text-muted-foreground">ok</p>
  <p className={`text-muted
    px-2`}>multi</p>
</div>
"#;
    let expected = r#"<div className="flex gap-2">
  <span className='text-sm text-muted-foreground'>Delivery</span>
  <p className={cn("text-muted-foreground", active && "font-bold")}>{price}</p>
  <p className="text-muted-foreground">ok</p>
  <p className={`text-muted
    px-2`}>multi</p>
</div>
"#;
    let result = SubstitutionRule::builtin().apply(input);
    assert_eq!(result.text, expected);
    assert_eq!(result.replacements, 2);
}

#[test]
fn test_escaped_quote_in_string_literal() {
    assert_eq!(
        fix(r#"const c = "<p class=\"text-muted\">";"#),
        r#"const c = "<p class=\"text-muted-foreground\">";"#
    );
}

fn content() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("text-muted".to_string()),
        Just("text-muted-foreground".to_string()),
        Just(" ".to_string()),
        Just("\"".to_string()),
        Just("'".to_string()),
        Just("\\".to_string()),
        Just("\n".to_string()),
        Just("-".to_string()),
        "[a-zA-Z0-9é]{0,4}",
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn prop_idempotent(input in content()) {
        let once = fix(&input);
        let twice = fix(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_only_token_text_changes(input in content()) {
        let result = SubstitutionRule::builtin().apply(&input);
        let removed = result.text.replace("text-muted-foreground", "text-muted");
        let original = input.replace("text-muted-foreground", "text-muted");
        prop_assert_eq!(removed, original);
        prop_assert_eq!(
            result.text.len(),
            input.len() + result.replacements * "-foreground".len()
        );
    }

    #[test]
    fn prop_no_boundary_no_change(input in "[a-zA-Z0-9\\-\n\t.:]{0,64}") {
        let wrapped = format!("{input}text-muted");
        prop_assert_eq!(fix(&wrapped), wrapped);
    }

    #[test]
    fn prop_idempotent_rules_are_stable(
        token in "[ab]{1,3}",
        replacement in "[ab ]{0,4}",
        input in "[ab ]{0,10}",
    ) {
        prop_assume!(token != replacement);
        let rule = SubstitutionRule::new(token, replacement).unwrap();
        if rule.is_idempotent() {
            let once = rule.apply(&input).text;
            prop_assert_eq!(rule.apply(&once).text, once);
        }
    }
}
