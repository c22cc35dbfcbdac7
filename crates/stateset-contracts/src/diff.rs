//! # Immutability Checker
//!
//! Structural diff between two versions of the same record family, driven
//! by the family's field table. A rule names the fields it lets change;
//! every other field must compare equal. Identity fields are compared even
//! when a rule lists them.

use thiserror::Error;

use crate::schema::{FieldRole, FieldValue, RecordSchema};

/// A field that changed without a rule allowing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}` changed from {prior} to {proposed}")]
pub struct DiffViolation {
    pub field: String,
    pub prior: FieldValue,
    pub proposed: FieldValue,
}

/// Verify that `proposed` differs from `prior` only in `allowed` fields.
///
/// Fields are visited in schema order, so the reported violation is the
/// first offending field in declaration order.
pub fn check_only_fields_changed<R: RecordSchema>(
    prior: &R,
    proposed: &R,
    allowed: &[R::Field],
) -> Result<(), DiffViolation> {
    for spec in R::schema() {
        let may_change = spec.role == FieldRole::Mutable && allowed.contains(&spec.field);
        if may_change {
            continue;
        }
        let before = prior.field_value(spec.field);
        let after = proposed.field_value(spec.field);
        if before != after {
            return Err(DiffViolation {
                field: spec.field.to_string(),
                prior: before,
                proposed: after,
            });
        }
    }
    Ok(())
}

/// Every field whose value differs between the two versions.
pub fn changed_fields<R: RecordSchema>(prior: &R, proposed: &R) -> Vec<R::Field> {
    R::schema()
        .iter()
        .filter(|s| prior.field_value(s.field) != proposed.field_value(s.field))
        .map(|s| s.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountField, TypeOfBusiness};
    use stateset_core::{Party, PartyKey};

    fn party(key: &str) -> Party {
        Party::new(key.to_uppercase(), PartyKey::new(key).unwrap()).unwrap()
    }

    fn account() -> Account {
        Account {
            account_id: "ACC-1".into(),
            name: "Acme".into(),
            business_type: TypeOfBusiness::Hotels,
            industry: "Hospitality".into(),
            phone: "555".into(),
            year_started: 1987,
            annual_revenue: 900,
            address: "3 Bay Rd".into(),
            city: "Miami".into(),
            state: "FL".into(),
            zip_code: "33101".into(),
            controller: party("a"),
            processor: party("x"),
        }
    }

    #[test]
    fn identical_versions_pass_with_empty_allowance() {
        assert!(check_only_fields_changed(&account(), &account(), &[]).is_ok());
    }

    #[test]
    fn allowed_field_may_differ() {
        let mut next = account();
        next.controller = party("b");
        assert!(check_only_fields_changed(&account(), &next, &[AccountField::Controller]).is_ok());
    }

    #[test]
    fn first_offending_field_in_schema_order_is_reported() {
        let mut next = account();
        next.zip_code = "00000".into();
        next.phone = "999".into();
        let err = check_only_fields_changed(&account(), &next, &[]).unwrap_err();
        assert_eq!(err.field, "phone");
        assert_eq!(err.prior, FieldValue::Text("555".into()));
        assert_eq!(err.proposed, FieldValue::Text("999".into()));
    }

    #[test]
    fn identity_fields_cannot_be_allowed() {
        let mut next = account();
        next.account_id = "ACC-2".into();
        let err = check_only_fields_changed(&account(), &next, &[AccountField::AccountId]).unwrap_err();
        assert_eq!(err.field, "account_id");
    }

    #[test]
    fn processor_is_frozen_even_when_listed() {
        let mut next = account();
        next.processor = party("y");
        let err = check_only_fields_changed(&account(), &next, &[AccountField::Processor]).unwrap_err();
        assert_eq!(err.field, "processor");
    }

    #[test]
    fn changed_fields_lists_every_difference() {
        let mut next = account();
        next.city = "Tampa".into();
        next.processor = party("y");
        assert_eq!(
            changed_fields(&account(), &next),
            vec![AccountField::City, AccountField::Processor]
        );
    }
}
