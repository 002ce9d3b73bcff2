use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Implements `as_str` and `Display` from the wire representation.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

wire_enum!(TransactionType { Income => "INCOME", Expense => "EXPENSE" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

wire_enum!(PaymentStatus { Pending => "PENDING", Paid => "PAID", Failed => "FAILED" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

wire_enum!(RecurrencePattern {
    Daily => "DAILY",
    Weekly => "WEEKLY",
    Monthly => "MONTHLY",
    Yearly => "YEARLY",
});

/// What a transaction does to the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountOperationType {
    InitialBalance,
    Salary,
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
    Interest,
    Fee,
    Adjustment,
    Refund,
    Payment,
    Reward,
    LoanPayment,
    LoanDisbursement,
    Dividend,
    Tax,
    Other,
}

wire_enum!(AccountOperationType {
    InitialBalance => "INITIAL_BALANCE",
    Salary => "SALARY",
    Deposit => "DEPOSIT",
    Withdrawal => "WITHDRAWAL",
    TransferIn => "TRANSFER_IN",
    TransferOut => "TRANSFER_OUT",
    Interest => "INTEREST",
    Fee => "FEE",
    Adjustment => "ADJUSTMENT",
    Refund => "REFUND",
    Payment => "PAYMENT",
    Reward => "REWARD",
    LoanPayment => "LOAN_PAYMENT",
    LoanDisbursement => "LOAN_DISBURSEMENT",
    Dividend => "DIVIDEND",
    Tax => "TAX",
    Other => "OTHER",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

wire_enum!(SortDirection { Asc => "ASC", Desc => "DESC" });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
    #[default]
    DueDate,
    CreatedAt,
    Amount,
    Description,
}

wire_enum!(SortField {
    DueDate => "DUE_DATE",
    CreatedAt => "CREATED_AT",
    Amount => "AMOUNT",
    Description => "DESCRIPTION",
});

// ---------------------------------------------------------------------------
// TransactionDetail — Search result row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentInfo {
    pub total_installments: u32,
    pub current_installment: u32,
    pub installment_value: f64,
}

/// A single income or expense. `amount` is in reais.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub down_payment: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub operation_type: AccountOperationType,
    pub status: PaymentStatus,
    pub category_id: i64,
    pub category_name: String,
    pub due_date: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub notes: Option<String>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub installment_info: Option<InstallmentInfo>,
    pub user_id: i64,
    pub account_id: i64,
    pub account_name: String,
}

// ---------------------------------------------------------------------------
// TransactionSearchParams
// ---------------------------------------------------------------------------

/// Parameters for the paginated transaction search.
///
/// `user_id` and the date range are required. When an optional field is
/// `None`, the corresponding filter is left out of the request. Unset paging
/// and sorting fall back to page 0, [`DEFAULT_PAGE_SIZE`](crate::config::DEFAULT_PAGE_SIZE),
/// and due date descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSearchParams {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<PaymentStatus>,
    pub category_id: Option<i64>,
    pub is_recurring: Option<bool>,
    pub has_installments: Option<bool>,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_field: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
}

impl TransactionSearchParams {
    pub fn new(user_id: i64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            user_id,
            start_date,
            end_date,
            ..Self::default()
        }
    }

    /// Same filters, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub operation_type: AccountOperationType,
    pub status: PaymentStatus,
    pub category_id: i64,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_installment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    pub user_id: i64,
    pub account_id: i64,
}

/// Partial update; only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<AccountOperationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
}
