use exprops_core::expander::{PatternVariableExpander, SimpleVariableExpander};
use exprops_core::resolver::MapResolver;
use exprops_core::{Error, ExpansionContext, InvocationContext, Result, VariableExpander};

fn expand(expander: &dyn VariableExpander, template: &str) -> Result<String> {
    let resolver = MapResolver::new([
        ("env", "prod"),
        ("region", "eu"),
        ("self", "${self}"),
    ]);
    let ctx = InvocationContext::detached();
    expander.expand(&ExpansionContext::new(&ctx, &resolver), template)
}

#[test]
fn test_simple_expansion() {
    let expander = SimpleVariableExpander::new();
    assert_eq!(expand(&expander, "db.${env}.url").unwrap(), "db.prod.url");
    assert_eq!(expand(&expander, "${env}-${region}").unwrap(), "prod-eu");
    assert_eq!(expand(&expander, "no placeholders").unwrap(), "no placeholders");
    assert_eq!(expand(&expander, "").unwrap(), "");
}

#[test]
fn test_simple_expansion_keeps_malformed_tokens() {
    let expander = SimpleVariableExpander::new();
    assert_eq!(expand(&expander, "a.${env").unwrap(), "a.${env");
    assert_eq!(expand(&expander, "a.${}.${env}").unwrap(), "a.${}.prod");
}

#[test]
fn test_expansion_is_single_pass() {
    let expander = SimpleVariableExpander::new();
    assert_eq!(expand(&expander, "x.${self}").unwrap(), "x.${self}");
}

#[test]
fn test_unresolvable_placeholder_fails() {
    let err = expand(&SimpleVariableExpander::new(), "db.${missing}.url").unwrap_err();
    assert!(matches!(
        err,
        Error::VariableExpansion { ref placeholder, ref template }
            if placeholder == "missing" && template == "db.${missing}.url"
    ));
    assert_eq!(
        err.to_string(),
        "Failed to expand \"missing\" variable in \"db.${missing}.url\". Variable cannot be resolved."
    );
}

#[test]
fn test_custom_delimiters() {
    let expander = SimpleVariableExpander::with_delimiters("#[", "]").unwrap();
    assert_eq!(expand(&expander, "db.#[env].url").unwrap(), "db.prod.url");
    assert_eq!(expand(&expander, "db.${env}.url").unwrap(), "db.${env}.url");
    assert!(SimpleVariableExpander::with_delimiters("", "}").is_err());
}

#[test]
fn test_pattern_expansion() {
    let expander = PatternVariableExpander::new().unwrap();
    assert_eq!(expand(&expander, "${env}/${region}").unwrap(), "prod/eu");
    assert!(matches!(
        expand(&expander, "${nope}"),
        Err(Error::VariableExpansion { .. })
    ));

    let percent = PatternVariableExpander::with_pattern(r"%(\w+)%").unwrap();
    assert_eq!(expand(&percent, "%env%.%region%").unwrap(), "prod.eu");
}

#[test]
fn test_pattern_without_capture_group_is_rejected() {
    assert!(matches!(
        PatternVariableExpander::with_pattern(r"\$\w+"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        PatternVariableExpander::with_pattern("(unclosed"),
        Err(Error::Configuration(_))
    ));
}
