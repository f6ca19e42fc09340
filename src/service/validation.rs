use rust_decimal::Decimal;

use crate::types::{PopsicleFields, ValidationErrors};

pub const NAME_MAX_LEN: usize = 100;
pub const FLAVOR_MAX_LEN: usize = 50;

/// Checks a create/replace payload or a patched projection. All rules are
/// evaluated so the caller gets every failing field at once.
pub fn validate(fields: &PopsicleFields) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(&mut errors, "name", &fields.name, NAME_MAX_LEN);
    check_text(&mut errors, "flavor", &fields.flavor, FLAVOR_MAX_LEN);

    if fields.price <= Decimal::ZERO {
        errors.push("price", "price must be greater than zero");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
    } else if value.chars().count() > max_len {
        errors.push(field, format!("{field} must not exceed {max_len} characters"));
    }
}
