//! # Product Templates
//!
//! Named presets for the product form ("Beer", "Day ticket", ...). A template
//! maps form fields to typed values and is checked against the form schema
//! before anything on the form changes.
//!
//! ```text
//!  [templates.beer]                 product form
//!  title = "Beer"          ──►      title               "Beer"
//!  cost = 250              ──►      cost                "2.50"
//!  maxSoldPerCustomer = 10 ──►      maxSoldPerCustomer  "10"
//!  chOnly = true           ──►      chOnly              [x]
//!                                   reservable          [ ]  (untouched)
//! ```
//!
//! Fields the template does not name keep their current value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TemplateError;
use crate::money::Money;

// =============================================================================
// Schema
// =============================================================================

/// What a form field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A price, given in cents.
    Cents,
    /// A non-negative whole number.
    Count,
    /// A checkbox.
    Flag,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Text => "text",
            FieldKind::Cents => "an amount in cents",
            FieldKind::Count => "a whole number",
            FieldKind::Flag => "a true/false flag",
        };
        f.write_str(s)
    }
}

/// The fields of a form and their kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldKind>,
}

impl FieldSchema {
    pub fn new<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldKind)>) -> Self {
        FieldSchema {
            fields: fields.into_iter().map(|(k, kind)| (k.into(), kind)).collect(),
        }
    }

    /// The product form of the admin dashboard.
    pub fn product_form() -> Self {
        FieldSchema::new([
            ("title", FieldKind::Text),
            ("description", FieldKind::Text),
            ("cost", FieldKind::Cents),
            ("maxSold", FieldKind::Count),
            ("maxSoldPerCustomer", FieldKind::Count),
            ("chOnly", FieldKind::Flag),
            ("reservable", FieldKind::Flag),
        ])
    }

    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Converts a template value into what the form field will hold.
    fn coerce(
        &self,
        template: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<FormValue, TemplateError> {
        let kind = self
            .kind_of(field)
            .ok_or_else(|| TemplateError::UnknownField {
                template: template.to_string(),
                field: field.to_string(),
            })?;

        let mismatch = || TemplateError::KindMismatch {
            template: template.to_string(),
            field: field.to_string(),
            expected: kind,
        };
        let negative = || TemplateError::Negative {
            template: template.to_string(),
            field: field.to_string(),
        };

        match (kind, value) {
            (FieldKind::Text, FieldValue::Text(text)) => Ok(FormValue::Value(text.clone())),
            (FieldKind::Flag, FieldValue::Flag(flag)) => Ok(FormValue::Checkbox(*flag)),
            (FieldKind::Count, FieldValue::Number(n)) if *n < 0 => Err(negative()),
            (FieldKind::Count, FieldValue::Number(n)) => Ok(FormValue::Value(n.to_string())),
            (FieldKind::Cents, FieldValue::Number(n)) if *n < 0 => Err(negative()),
            (FieldKind::Cents, FieldValue::Number(n)) => Ok(FormValue::Value(
                Money::from_cents(*n).to_decimal_string(),
            )),
            (FieldKind::Cents, FieldValue::Text(text)) => Money::parse(text)
                .map(|money| FormValue::Value(money.to_decimal_string()))
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        }
    }
}

// =============================================================================
// Values
// =============================================================================

/// A typed template value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

/// What a form input holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FormValue {
    Value(String),
    Checkbox(bool),
}

/// Current values of a form, by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductForm {
    values: BTreeMap<String, FormValue>,
}

impl ProductForm {
    /// A blank form: empty inputs, unchecked boxes.
    pub fn blank(schema: &FieldSchema) -> Self {
        let values = schema
            .fields()
            .map(|(name, kind)| {
                let value = match kind {
                    FieldKind::Flag => FormValue::Checkbox(false),
                    _ => FormValue::Value(String::new()),
                };
                (name.to_string(), value)
            })
            .collect();
        ProductForm { values }
    }

    pub fn get(&self, field: &str) -> Option<&FormValue> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FormValue) {
        self.values.insert(field.into(), value);
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A named template: field name → value.
pub type Template = BTreeMap<String, FieldValue>;

/// All templates of a deployment, by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Template>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        TemplateCatalog::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, template: Template) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Checks every template against the schema without touching a form.
    pub fn validate(&self, schema: &FieldSchema) -> Result<(), TemplateError> {
        for (name, template) in &self.templates {
            for (field, value) in template {
                schema.coerce(name, field, value)?;
            }
        }
        Ok(())
    }

    /// Applies a template to a form.
    ///
    /// Every value is checked first; on error the form is untouched.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::template::{FieldSchema, FieldValue, FormValue, ProductForm, TemplateCatalog};
    ///
    /// let mut catalog = TemplateCatalog::new();
    /// catalog.insert("beer", [
    ///     ("title".to_string(), FieldValue::Text("Beer".to_string())),
    ///     ("cost".to_string(), FieldValue::Number(250)),
    /// ].into_iter().collect());
    ///
    /// let schema = FieldSchema::product_form();
    /// let mut form = ProductForm::blank(&schema);
    /// catalog.apply("beer", &schema, &mut form).unwrap();
    ///
    /// assert_eq!(form.get("cost"), Some(&FormValue::Value("2.50".to_string())));
    /// ```
    pub fn apply(
        &self,
        name: &str,
        schema: &FieldSchema,
        form: &mut ProductForm,
    ) -> Result<(), TemplateError> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))?;

        let updates = template
            .iter()
            .map(|(field, value)| Ok((field.clone(), schema.coerce(name, field, value)?)))
            .collect::<Result<Vec<_>, TemplateError>>()?;

        for (field, value) in updates {
            form.set(field, value);
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
