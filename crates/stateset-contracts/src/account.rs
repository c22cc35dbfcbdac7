//! # Account Contract
//!
//! Accounts have no status. Their lifecycle is presence or absence:
//!
//! ```text
//!  (none) ──CreateAccount──▶ Account ──DeleteAccount──▶ (none)
//!                              │  ▲
//!                              └──┘ TransferAccount / ShareAccount
//! ```
//!
//! Transfer may change only the controller. Share changes nothing: the
//! processor is already a participant of the consumed version. Every
//! intent must be signed by the controller of the resulting record, or of
//! the consumed record for a delete.

use serde::{Deserialize, Serialize};
use stateset_core::Party;

use crate::authz::{self, SignerRequirement};
use crate::command::Intent;
use crate::contract::{check_cardinality, check_produced_invariants, Contract};
use crate::diff::check_only_fields_changed;
use crate::reject::RejectReason;
use crate::schema::{FieldSpec, FieldValue, RecordFamily, RecordSchema};
use crate::transition::{Cardinality, SignerSet};

// ─── Business Classification ─────────────────────────────────────────

/// Closed classification of an account's line of business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOfBusiness {
    Accounting,
    Amusement,
    AutoRepair,
    BusinessServices,
    Catering,
    ChildCare,
    ComputerServices,
    ConsumerGoodsRetailStore,
    ConsumerGoodsOnlineStore,
    ConsumerGoodsOnlineAndOffline,
    Construction,
    Dentists,
    DryCleaning,
    Equipment,
    FoodService,
    Grocery,
    Health,
    HomeRepair,
    Hotels,
    Insurance,
    Janitorial,
    Landscape,
    Optometrist,
    Physicians,
    Restaurants,
    Salons,
    Taxis,
    Trucking,
    /// Older ledgers spelled this `Veterinrians`; both forms are read.
    #[serde(alias = "Veterinrians")]
    Veterinarians,
}

impl std::fmt::Display for TypeOfBusiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

// ─── Account Record ──────────────────────────────────────────────────

/// One version of a business account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique within the account family; never changes.
    pub account_id: String,
    pub name: String,
    pub business_type: TypeOfBusiness,
    pub industry: String,
    pub phone: String,
    pub year_started: i64,
    /// Whole currency units.
    pub annual_revenue: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Primary owner; authorizes every change.
    pub controller: Party,
    /// Secondary holder granted visibility.
    pub processor: Party,
}

/// Field names of [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    AccountId,
    Name,
    BusinessType,
    Industry,
    Phone,
    YearStarted,
    AnnualRevenue,
    Address,
    City,
    State,
    ZipCode,
    Controller,
    Processor,
}

impl AccountField {
    /// The serialized field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountId => "account_id",
            Self::Name => "name",
            Self::BusinessType => "business_type",
            Self::Industry => "industry",
            Self::Phone => "phone",
            Self::YearStarted => "year_started",
            Self::AnnualRevenue => "annual_revenue",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zip_code",
            Self::Controller => "controller",
            Self::Processor => "processor",
        }
    }
}

impl std::fmt::Display for AccountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ACCOUNT_SCHEMA: [FieldSpec<AccountField>; 13] = [
    FieldSpec::identity(AccountField::AccountId),
    FieldSpec::identity(AccountField::Name),
    FieldSpec::identity(AccountField::BusinessType),
    FieldSpec::identity(AccountField::Industry),
    FieldSpec::identity(AccountField::Phone),
    FieldSpec::identity(AccountField::YearStarted),
    FieldSpec::identity(AccountField::AnnualRevenue),
    FieldSpec::identity(AccountField::Address),
    FieldSpec::identity(AccountField::City),
    FieldSpec::identity(AccountField::State),
    FieldSpec::identity(AccountField::ZipCode),
    FieldSpec::mutable(AccountField::Controller),
    FieldSpec::identity(AccountField::Processor),
];

impl RecordSchema for Account {
    type Field = AccountField;

    const FAMILY: RecordFamily = RecordFamily::Account;

    fn schema() -> &'static [FieldSpec<AccountField>] {
        &ACCOUNT_SCHEMA
    }

    fn field_value(&self, field: AccountField) -> FieldValue {
        match field {
            AccountField::AccountId => FieldValue::Text(self.account_id.clone()),
            AccountField::Name => FieldValue::Text(self.name.clone()),
            AccountField::BusinessType => FieldValue::Text(self.business_type.to_string()),
            AccountField::Industry => FieldValue::Text(self.industry.clone()),
            AccountField::Phone => FieldValue::Text(self.phone.clone()),
            AccountField::YearStarted => FieldValue::Integer(self.year_started),
            AccountField::AnnualRevenue => FieldValue::Integer(self.annual_revenue),
            AccountField::Address => FieldValue::Text(self.address.clone()),
            AccountField::City => FieldValue::Text(self.city.clone()),
            AccountField::State => FieldValue::Text(self.state.clone()),
            AccountField::ZipCode => FieldValue::Text(self.zip_code.clone()),
            AccountField::Controller => FieldValue::Participant(self.controller.clone()),
            AccountField::Processor => FieldValue::Participant(self.processor.clone()),
        }
    }

    fn participants(&self) -> Vec<&Party> {
        vec![&self.controller, &self.processor]
    }

    fn check_invariants(&self) -> Result<(), String> {
        if self.account_id.trim().is_empty() {
            return Err("account_id must not be empty".into());
        }
        Ok(())
    }
}

// ─── Intents ─────────────────────────────────────────────────────────

/// What an account transaction is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountIntent {
    Create,
    Transfer,
    Share,
    Delete,
}

impl AccountIntent {
    /// Fields the intent lets differ between consumed and produced versions.
    pub fn allowed_changes(&self) -> &'static [AccountField] {
        match self {
            Self::Transfer => &[AccountField::Controller],
            Self::Create | Self::Share | Self::Delete => &[],
        }
    }
}

impl Intent for AccountIntent {
    const ALL: &'static [Self] = &[Self::Create, Self::Transfer, Self::Share, Self::Delete];

    fn command_name(&self) -> &'static str {
        match self {
            Self::Create => "CreateAccount",
            Self::Transfer => "TransferAccount",
            Self::Share => "ShareAccount",
            Self::Delete => "DeleteAccount",
        }
    }

    fn cardinality(&self) -> Cardinality {
        match self {
            Self::Create => Cardinality::new(0, 1),
            Self::Transfer | Self::Share => Cardinality::new(1, 1),
            Self::Delete => Cardinality::new(1, 0),
        }
    }
}

impl std::fmt::Display for AccountIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command_name())
    }
}

// ─── Contract ────────────────────────────────────────────────────────

/// Validation rules for the account family. Carries no configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountContract;

impl SignerRequirement<Account> for AccountContract {
    type Intent = AccountIntent;

    fn required_signers(&self, intent: AccountIntent, consumed: &[Account], produced: &[Account]) -> SignerSet {
        let owner = match intent {
            AccountIntent::Delete => consumed.first(),
            AccountIntent::Create | AccountIntent::Transfer | AccountIntent::Share => produced.first(),
        };
        owner
            .map(|a| a.controller.owning_key.clone())
            .into_iter()
            .collect()
    }
}

impl Contract for AccountContract {
    type Record = Account;
    type Intent = AccountIntent;

    fn verify(
        &self,
        intent: AccountIntent,
        consumed: &[Account],
        produced: &[Account],
        supplied: &SignerSet,
    ) -> Result<(), RejectReason> {
        check_cardinality(Account::FAMILY, intent, consumed.len(), produced.len())?;
        check_produced_invariants(produced)?;

        if let ([prior], [next]) = (consumed, produced) {
            check_only_fields_changed(prior, next, intent.allowed_changes())?;
        }

        let required = self.required_signers(intent, consumed, produced);
        authz::verify(&required, supplied)?;
        Ok(())
    }
}
