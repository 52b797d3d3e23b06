//! Declarative field validation with localized messages.
//!
//! Fields declare a list of [`Rule`]s. Evaluation stops at the first failing
//! rule and renders its message from a [`LocaleCatalog`], the same catalog
//! format the browser form library loads (`{"code": .., "messages": ..}`).
//!
//! Only `required` rejects an empty value; every other rule treats an empty
//! value as valid so optional fields stay optional.

mod catalog;
mod rules;

pub use catalog::{LocaleCatalog, LocaleParseError};
pub use rules::Rule;

/// Validate `value` against `rules`, returning the first failure message.
///
/// `field` is the field key; its display name comes from the catalog's
/// `names` table when present.
#[must_use]
pub fn validate_field(
    field: &str,
    value: &str,
    rules: &[Rule],
    catalog: &LocaleCatalog,
) -> Option<String> {
    rules
        .iter()
        .find(|rule| !rule.check(value))
        .map(|rule| catalog.message(field, rule, value))
}
