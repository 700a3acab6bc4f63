#![allow(clippy::unwrap_used, reason = "Unwrap is not an issue in tests")]

use msad_sid_mapper::memory::DirectoryQuery;
use msad_sid_mapper::{Condition, MappingConfig, rewrite_query};

fn query() -> DirectoryQuery {
    DirectoryQuery::new()
        .with_condition(Condition::equal("sid", "AQEAAAAAAAUSAAAA"))
        .with_condition(Condition::equal("mail", "jdoe@example.com"))
        .with_condition(Condition::raw_filter("(objectClass=user)"))
}

#[test]
fn renames_and_flags_mapped_condition_only() {
    let config = MappingConfig::object_sid("sid");
    let mut request = query();
    rewrite_query(&config, &mut request);

    let conditions = request.conditions();
    assert_eq!(conditions[0].parameter_name(), Some("objectSid"));
    assert!(conditions[0].is_binary());
    assert_eq!(conditions[0].value(), "AQEAAAAAAAUSAAAA");
    assert_eq!(conditions[1], Condition::equal("mail", "jdoe@example.com"));
    assert_eq!(conditions[2], Condition::raw_filter("(objectClass=user)"));
}

#[test]
fn requests_directory_attribute_read_only() {
    let config = MappingConfig::object_sid("sid");
    let mut request = DirectoryQuery::new();
    rewrite_query(&config, &mut request);

    assert_eq!(request.returning_attributes(), ["objectSid"]);
    assert_eq!(request.returning_read_only_attributes(), ["objectSid"]);
    assert!(request.conditions().is_empty());
}

#[test]
fn rewriting_twice_equals_rewriting_once() {
    let config = MappingConfig::object_sid("sid");
    let mut once = query();
    rewrite_query(&config, &mut once);
    let mut twice = once.clone();
    rewrite_query(&config, &mut twice);
    assert_eq!(once, twice);
}

#[test]
fn model_name_matches_ignoring_case() {
    let config = MappingConfig::object_sid("objectSidString");
    let mut request =
        DirectoryQuery::new().with_condition(Condition::equal("OBJECTSIDSTRING", "x"));
    rewrite_query(&config, &mut request);
    assert_eq!(request.conditions()[0].parameter_name(), Some("objectSid"));
    assert!(request.conditions()[0].is_binary());
}
