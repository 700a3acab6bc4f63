//! Outgoing search adjustments.

use std::collections::BTreeSet;

use crate::MappingConfig;
use crate::directory::SearchRequest;
use crate::utils::names_match;

/// Points `request` at the directory attribute instead of the model attribute.
///
/// The directory attribute is always requested (and flagged read-only when the
/// mapping is). Conditions on the model attribute are renamed, and every
/// condition on either name gets the mapping's binary flag. Running it twice
/// leaves the request as running it once.
///
/// # Examples
/// ```rust
/// # use msad_sid_mapper::{rewrite_query, Condition, MappingConfig};
/// # use msad_sid_mapper::memory::DirectoryQuery;
/// let config = MappingConfig::object_sid("sid");
/// let mut query = DirectoryQuery::new().with_condition(Condition::equal("SID", "AQEAAAAAAAUSAAAA"));
/// rewrite_query(&config, &mut query);
/// assert_eq!(query.conditions()[0].parameter_name(), Some("objectSid"));
/// assert!(query.conditions()[0].is_binary());
/// assert_eq!(query.returning_attributes(), ["objectSid"]);
/// ```
#[inline]
pub fn rewrite_query<Q: SearchRequest + ?Sized>(config: &MappingConfig, request: &mut Q) {
    let model_name = config.model_attribute_name();
    let directory_name = config.directory_attribute_name();

    request.add_returning_attribute(directory_name);
    if config.is_read_only() {
        request.add_returning_read_only_attribute(directory_name);
    }

    for condition in request.conditions_mut() {
        condition.update_parameter_name(model_name, directory_name);
        let targets_mapping = condition.parameter_name().is_some_and(|name| {
            names_match(name, model_name) || names_match(name, directory_name)
        });
        if targets_mapping {
            condition.set_binary(config.is_binary());
        }
    }
}

/// Directory attributes a search must constrain, `None` for no constraint.
#[inline]
#[must_use]
pub fn mandatory_attribute_names(config: &MappingConfig) -> Option<BTreeSet<String>> {
    config
        .is_mandatory()
        .then(|| BTreeSet::from([config.directory_attribute_name().to_owned()]))
}
