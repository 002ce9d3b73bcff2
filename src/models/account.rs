use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AccountType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    ContaCorrente,
    Carteira,
    CartaoCredito,
    Poupanca,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::ContaCorrente => "CONTA_CORRENTE",
            AccountType::Carteira => "CARTEIRA",
            AccountType::CartaoCredito => "CARTAO_CREDITO",
            AccountType::Poupanca => "POUPANCA",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::ContaCorrente => "Checking account",
            AccountType::Carteira => "Wallet",
            AccountType::CartaoCredito => "Credit card",
            AccountType::Poupanca => "Savings account",
        }
    }

    /// Credit cards carry a limit and statement/payment days.
    pub fn has_credit_fields(&self) -> bool {
        matches!(self, AccountType::CartaoCredito)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A user's bank account, wallet, or card.
///
/// Monetary fields are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    pub account_name: String,
    pub account_description: Option<String>,
    pub account_type: AccountType,
    pub bank_institution_name: Option<String>,
    pub account_credit_limit: Option<i64>,
    /// Day of month the card statement closes.
    pub account_statement_closing_date: Option<u32>,
    /// Day of month the card payment is due.
    pub account_payment_due_date: Option<u32>,
    pub account_current_balance: i64,
    pub account_current_balance_formatted: Option<String>,
    pub account_currency: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// AccountQuery / CreateAccountRequest
// ---------------------------------------------------------------------------

/// Selects which user's accounts a load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountQuery {
    pub user_id: i64,
}

impl AccountQuery {
    pub fn for_user(user_id: i64) -> Self {
        Self { user_id }
    }
}

/// Payload for creating an account; also sent in full on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_current_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_institution_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_credit_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_statement_closing_date: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_payment_due_date: Option<u32>,
    pub user_id: i64,
}

impl CreateAccountRequest {
    pub fn new(user_id: i64, account_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_description: None,
            account_current_balance: None,
            account_currency: None,
            bank_institution_id: None,
            account_type: None,
            account_credit_limit: None,
            account_statement_closing_date: None,
            account_payment_due_date: None,
            user_id,
        }
    }
}
