//! Order form types and their field rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{LocaleCatalog, Rule, validate_field};

/// Contact details of the person placing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUser {
    pub name: String,
    pub email: String,
    pub tel: String,
    pub address: String,
}

/// The order form as posted to the API: `{"user": {...}, "message": ".."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub user: OrderUser,
    #[serde(default)]
    pub message: String,
}

/// A field of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderField {
    Name,
    Email,
    Tel,
    Address,
    Message,
}

impl OrderField {
    /// Every field, in form order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Tel,
        Self::Address,
        Self::Message,
    ];

    /// Field key, as used in catalogs and on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Address => "address",
            Self::Message => "message",
        }
    }

    /// Rules applied to this field.
    #[must_use]
    pub const fn rules(self) -> &'static [Rule] {
        match self {
            Self::Name | Self::Address => &[Rule::Required],
            Self::Email => &[Rule::Required, Rule::Email],
            Self::Tel => &[Rule::Required, Rule::Min(8), Rule::Max(10)],
            Self::Message => &[],
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for OrderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown order field: {s}"))
    }
}

impl OrderForm {
    /// Current value of a field.
    #[must_use]
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Name => &self.user.name,
            OrderField::Email => &self.user.email,
            OrderField::Tel => &self.user.tel,
            OrderField::Address => &self.user.address,
            OrderField::Message => &self.message,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let slot = match field {
            OrderField::Name => &mut self.user.name,
            OrderField::Email => &mut self.user.email,
            OrderField::Tel => &mut self.user.tel,
            OrderField::Address => &mut self.user.address,
            OrderField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Validate a single field, returning its failure message.
    #[must_use]
    pub fn validate_field(&self, field: OrderField, catalog: &LocaleCatalog) -> Option<String> {
        validate_field(field.key(), self.get(field), field.rules(), catalog)
    }
}

/// Failure messages for every invalid field of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<OrderField, String>);

impl ValidationErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for one field.
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterate failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(OrderField, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (OrderField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.values().map(String::as_str).collect::<Vec<_>>().join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate every field of `form`.
///
/// # Errors
///
/// Returns the messages of all invalid fields.
pub fn validate_order(form: &OrderForm, catalog: &LocaleCatalog) -> Result<(), ValidationErrors> {
    let errors: ValidationErrors = OrderField::ALL
        .into_iter()
        .filter_map(|field| form.validate_field(field, catalog).map(|message| (field, message)))
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
