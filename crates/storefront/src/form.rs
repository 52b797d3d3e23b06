//! Order form state with validate-on-input.

use std::collections::BTreeMap;
use std::sync::Arc;

use shopfront_core::{LocaleCatalog, OrderField, OrderForm, ValidationErrors, validate_order};

/// The order form as the user is editing it.
///
/// Every [`input`](Self::input) re-validates the edited field, so
/// [`error`](Self::error) always reflects the current value of fields the
/// user has touched.
#[derive(Debug, Clone, Default)]
pub struct OrderFormState {
    values: OrderForm,
    errors: BTreeMap<OrderField, String>,
    catalog: Arc<LocaleCatalog>,
}

impl OrderFormState {
    /// An empty form rendering messages from `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<LocaleCatalog>) -> Self {
        Self {
            values: OrderForm::default(),
            errors: BTreeMap::new(),
            catalog,
        }
    }

    /// Swap the message catalog, e.g. once the locale file has loaded.
    pub fn set_catalog(&mut self, catalog: Arc<LocaleCatalog>) {
        self.catalog = catalog;
    }

    /// Catalog used to render messages.
    #[must_use]
    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    /// Record an edit and validate that field.
    pub fn input(&mut self, field: OrderField, value: impl Into<String>) {
        self.values.set(field, value);
        match self.values.validate_field(field, &self.catalog) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Validate every field, replacing the error map.
    ///
    /// # Errors
    ///
    /// Returns the messages of all invalid fields.
    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        let result = validate_order(&self.values, &self.catalog);
        self.errors = match &result {
            Ok(()) => BTreeMap::new(),
            Err(errors) => errors
                .iter()
                .map(|(field, message)| (field, message.to_string()))
                .collect(),
        };
        result
    }

    /// Current field values, as they would be posted.
    #[must_use]
    pub const fn values(&self) -> &OrderForm {
        &self.values
    }

    /// Current message for a field.
    #[must_use]
    pub fn error(&self, field: OrderField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether any touched field is currently invalid.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Clear values and messages. The catalog is kept.
    pub fn reset(&mut self) {
        self.values = OrderForm::default();
        self.errors.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validates_immediately() {
        let mut form = OrderFormState::default();

        form.input(OrderField::Email, "nope");
        assert_eq!(
            form.error(OrderField::Email),
            Some("The email field must be a valid email")
        );

        form.input(OrderField::Email, "ming@example.com");
        assert!(form.error(OrderField::Email).is_none());
        assert!(!form.has_errors());
    }

    #[test]
    fn test_untouched_fields_have_no_message_until_validate_all() {
        let mut form = OrderFormState::default();
        form.input(OrderField::Name, "王小明");
        assert!(form.error(OrderField::Tel).is_none());

        let errors = form.validate_all().unwrap_err();
        assert!(errors.get(OrderField::Tel).is_some());
        assert_eq!(form.error(OrderField::Tel), Some("The tel field is required"));
    }

    #[test]
    fn test_reset_keeps_catalog() {
        let catalog = LocaleCatalog::from_json(
            r#"{"code": "zh_TW", "messages": {"required": "{_field_} 為必填"}}"#,
        )
        .unwrap();
        let mut form = OrderFormState::new(Arc::new(catalog));
        form.input(OrderField::Name, "");
        assert_eq!(form.error(OrderField::Name), Some("name 為必填"));

        form.reset();
        assert_eq!(form.values(), &OrderForm::default());
        assert!(!form.has_errors());
        assert_eq!(form.catalog().code, "zh_TW");
    }
}
