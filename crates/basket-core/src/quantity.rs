//! # Quantity Form
//!
//! Transient per-row quantity inputs for ordering without a basket (mode B).
//! Held in memory for one page view and never persisted.
//!
//! ```text
//!   Ticket A   [ − ] [ 0 ] [ + ]
//!   Beer       [ − ] [ 2 ] [ + ]      submit ──► encoder (mode B)
//!   Cola       [ − ] [ x ] [ + ]      "x" counts as 0
//! ```
//!
//! Controls start at 0. Decrease stops at 0, increase stops at
//! [`MAX_REQUESTED_AMOUNT`]. Typed text is kept verbatim and only
//! interpreted at encoding time, by its leading integer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::encoder::{leading_integer, parse_requested, FormField, OrderEncoder};
use crate::error::{BasketError, BasketResult, ValidationError};
use crate::{MAX_ORDER_UNITS, MAX_REQUESTED_AMOUNT};

/// One quantity control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityControl {
    pub key: String,
    /// Raw text of the input.
    pub raw: String,
}

impl QuantityControl {
    /// The value as the control buttons read it.
    pub fn value(&self) -> u32 {
        parse_requested(&self.raw)
    }
}

/// The quantity controls of one page, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityForm {
    controls: Vec<QuantityControl>,
}

impl QuantityForm {
    /// Creates one control per key, each starting at 0.
    ///
    /// A key listed twice keeps its first position only.
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        let mut form = QuantityForm::default();
        for key in keys {
            let key = key.into();
            if form.control(&key).is_none() {
                form.controls.push(QuantityControl {
                    key,
                    raw: "0".to_string(),
                });
            }
        }
        form
    }

    pub fn controls(&self) -> &[QuantityControl] {
        &self.controls
    }

    pub fn control(&self, key: &str) -> Option<&QuantityControl> {
        self.controls.iter().find(|c| c.key == key)
    }

    /// "+" button: value + 1, never above [`MAX_REQUESTED_AMOUNT`].
    pub fn increase(&mut self, key: &str) -> BasketResult<u32> {
        let control = self.control_mut(key)?;
        let next = (control.value() + 1).min(MAX_REQUESTED_AMOUNT);
        control.raw = next.to_string();
        Ok(next)
    }

    /// "−" button: value − 1, never below 0.
    pub fn decrease(&mut self, key: &str) -> BasketResult<u32> {
        let control = self.control_mut(key)?;
        let current = control.value();
        if current > 0 {
            control.raw = (current - 1).to_string();
        }
        Ok(current.saturating_sub(1))
    }

    /// Typed input, stored as-is.
    pub fn set_raw(&mut self, key: &str, raw: impl Into<String>) -> BasketResult<()> {
        self.control_mut(key)?.raw = raw.into();
        Ok(())
    }

    /// Puts every control back to 0.
    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.raw = "0".to_string();
        }
    }

    /// `(key, requested amount)` for every control, zeros included.
    pub fn requested(&self) -> Vec<(&str, u32)> {
        self.controls
            .iter()
            .map(|c| (c.key.as_str(), c.value()))
            .collect()
    }

    /// Checks the typed input before it is encoded.
    ///
    /// ## Rules
    /// - no row asks for more than [`MAX_REQUESTED_AMOUNT`]
    /// - all rows together ask for at most [`MAX_ORDER_UNITS`]
    pub fn check_limits(&self) -> Result<(), ValidationError> {
        let mut total: u32 = 0;
        for control in &self.controls {
            if leading_integer(&control.raw).is_some_and(|v| v > i64::from(MAX_REQUESTED_AMOUNT)) {
                return Err(ValidationError::OutOfRange {
                    field: format!("quantities[{}]", control.key),
                    min: 0,
                    max: i64::from(MAX_REQUESTED_AMOUNT),
                });
            }
            total += control.value();
            if total > MAX_ORDER_UNITS {
                return Err(ValidationError::OutOfRange {
                    field: "quantities".to_string(),
                    min: 0,
                    max: i64::from(MAX_ORDER_UNITS),
                });
            }
        }
        Ok(())
    }

    /// Fields for the current input, zeros excluded.
    pub fn encode(&self, encoder: &OrderEncoder) -> Vec<FormField> {
        encoder.encode_quantities(
            self.controls
                .iter()
                .map(|c| (c.key.as_str(), c.raw.as_str())),
        )
    }

    fn control_mut(&mut self, key: &str) -> BasketResult<&mut QuantityControl> {
        self.controls
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| BasketError::NotFound {
                key: key.to_string(),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_start_at_zero() {
        let form = QuantityForm::new(["A", "B", "A"]);
        assert_eq!(form.controls().len(), 2);
        assert_eq!(form.requested(), vec![("A", 0), ("B", 0)]);
    }

    #[test]
    fn test_increase_and_decrease() {
        let mut form = QuantityForm::new(["A"]);

        assert_eq!(form.increase("A").unwrap(), 1);
        assert_eq!(form.increase("A").unwrap(), 2);
        assert_eq!(form.decrease("A").unwrap(), 1);
        assert_eq!(form.decrease("A").unwrap(), 0);
        assert_eq!(form.decrease("A").unwrap(), 0);
        assert_eq!(form.control("A").unwrap().raw, "0");
    }

    #[test]
    fn test_unknown_control() {
        let mut form = QuantityForm::new(["A"]);
        assert!(matches!(
            form.increase("Z"),
            Err(BasketError::NotFound { .. })
        ));
    }

    #[test]
    fn test_typed_garbage_counts_as_zero() {
        let mut form = QuantityForm::new(["A", "B"]);
        form.set_raw("A", "lots").unwrap();
        form.set_raw("B", "2").unwrap();

        assert_eq!(form.requested(), vec![("A", 0), ("B", 2)]);
        // "+" on garbage starts counting from 0.
        assert_eq!(form.increase("A").unwrap(), 1);
    }

    #[test]
    fn test_typed_text_counts_by_leading_integer() {
        let mut form = QuantityForm::new(["A", "B"]);
        form.set_raw("A", "2.5").unwrap();
        form.set_raw("B", "3 tickets").unwrap();

        assert_eq!(form.requested(), vec![("A", 2), ("B", 3)]);
        assert_eq!(form.increase("A").unwrap(), 3);
    }

    #[test]
    fn test_increase_stops_at_ceiling() {
        let mut form = QuantityForm::new(["A"]);
        form.set_raw("A", MAX_REQUESTED_AMOUNT.to_string()).unwrap();

        assert_eq!(form.increase("A").unwrap(), MAX_REQUESTED_AMOUNT);
        assert_eq!(form.control("A").unwrap().raw, MAX_REQUESTED_AMOUNT.to_string());
    }

    #[test]
    fn test_check_limits() {
        let mut form = QuantityForm::new(["A", "B"]);
        form.set_raw("A", "4000000000").unwrap();
        assert!(matches!(
            form.check_limits(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "quantities[A]"
        ));

        form.set_raw("A", MAX_REQUESTED_AMOUNT.to_string()).unwrap();
        form.set_raw("B", "-7").unwrap();
        assert!(form.check_limits().is_ok());

        let keys: Vec<String> = (0..=MAX_ORDER_UNITS / MAX_REQUESTED_AMOUNT)
            .map(|i| format!("K{}", i))
            .collect();
        let mut crowded = QuantityForm::new(keys.iter().cloned());
        for key in &keys {
            crowded.set_raw(key, MAX_REQUESTED_AMOUNT.to_string()).unwrap();
        }
        assert!(matches!(
            crowded.check_limits(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "quantities"
        ));
    }

    #[test]
    fn test_encode_per_unit() {
        let mut form = QuantityForm::new(["A", "B", "C"]);
        for _ in 0..3 {
            form.increase("A").unwrap();
        }
        form.increase("C").unwrap();

        let fields = form.encode(&OrderEncoder::per_unit());
        let got: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("products[0].key", "A"),
                ("products[1].key", "A"),
                ("products[2].key", "A"),
                ("products[3].key", "C"),
            ]
        );

        form.reset();
        assert!(form.encode(&OrderEncoder::per_unit()).is_empty());
    }
}
