//! Client-side checks run before any request is made.
//!
//! A failed check surfaces as [`FinanceError::Validation`] naming the
//! offending field; the gateway is never called.

use crate::error::{FinanceError, Result};
use crate::models::{
    AccountQuery, CategoryRequest, CreateAccountRequest, CreateTransactionRequest,
    FinancialStatsParams, LoginRequest, PasswordChangeRequest, PasswordResetRequest,
    RegisterRequest,
    TransactionSearchParams, UpdateTransactionRequest,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for () {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FinanceError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(FinanceError::validation(field, "must be greater than zero"));
    }
    Ok(())
}

fn require_id(field: &'static str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(FinanceError::validation(field, "must be a positive id"));
    }
    Ok(())
}

fn require_day_of_month(field: &'static str, day: Option<u32>) -> Result<()> {
    match day {
        Some(d) if !(1..=31).contains(&d) => Err(FinanceError::validation(
            field,
            "must be a day of the month (1-31)",
        )),
        _ => Ok(()),
    }
}

fn require_ordered_amounts(min: Option<f64>, max: Option<f64>) -> Result<()> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(FinanceError::validation(
            "minAmount",
            "must not exceed maxAmount",
        )),
        _ => Ok(()),
    }
}

/// Loose shape check: something before and after a single `@`, and a dot in
/// the domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

impl Validate for AccountQuery {
    fn validate(&self) -> Result<()> {
        require_id("userId", self.user_id)
    }
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> Result<()> {
        require_text("accountName", &self.account_name)?;
        require_id("userId", self.user_id)?;
        if matches!(self.account_credit_limit, Some(limit) if limit < 0) {
            return Err(FinanceError::validation(
                "accountCreditLimit",
                "must not be negative",
            ));
        }
        require_day_of_month(
            "accountStatementClosingDate",
            self.account_statement_closing_date,
        )?;
        require_day_of_month("accountPaymentDueDate", self.account_payment_due_date)
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

impl Validate for TransactionSearchParams {
    fn validate(&self) -> Result<()> {
        require_id("userId", self.user_id)?;
        if self.start_date > self.end_date {
            return Err(FinanceError::validation(
                "startDate",
                "must not be after endDate",
            ));
        }
        if self.size == Some(0) {
            return Err(FinanceError::validation("size", "must be greater than zero"));
        }
        require_ordered_amounts(self.min_amount, self.max_amount)
    }
}

impl Validate for CreateTransactionRequest {
    fn validate(&self) -> Result<()> {
        require_text("description", &self.description)?;
        require_positive("amount", self.amount)?;
        require_id("categoryId", self.category_id)?;
        require_id("accountId", self.account_id)?;
        require_id("userId", self.user_id)?;
        if let Some(down) = self.down_payment {
            if down < 0.0 || down > self.amount {
                return Err(FinanceError::validation(
                    "downPayment",
                    "must be between zero and the amount",
                ));
            }
        }
        match (self.current_installment, self.total_installments) {
            (_, Some(0)) => Err(FinanceError::validation(
                "totalInstallments",
                "must be greater than zero",
            )),
            (Some(current), Some(total)) if current == 0 || current > total => {
                Err(FinanceError::validation(
                    "currentInstallment",
                    "must be between 1 and totalInstallments",
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Validate for UpdateTransactionRequest {
    fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
        }
        if let Some(category_id) = self.category_id {
            require_id("categoryId", category_id)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Categories and balance
// ---------------------------------------------------------------------------

impl Validate for CategoryRequest {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("icon", &self.icon)?;
        if !self.color.starts_with('#') {
            return Err(FinanceError::validation("color", "must be a hex color"));
        }
        Ok(())
    }
}

impl Validate for FinancialStatsParams {
    fn validate(&self) -> Result<()> {
        require_id("userId", self.user_id)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(FinanceError::validation(
                    "startDate",
                    "must not be after endDate",
                ));
            }
        }
        require_ordered_amounts(self.min_amount, self.max_amount)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

impl Validate for LoginRequest {
    fn validate(&self) -> Result<()> {
        require_text("username", &self.username)?;
        require_text("password", &self.password)
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<()> {
        require_text("username", &self.username)?;
        if !is_valid_email(&self.email) {
            return Err(FinanceError::validation("email", "is not a valid address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FinanceError::validation(
                "password",
                format!("must have at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

impl Validate for PasswordResetRequest {
    fn validate(&self) -> Result<()> {
        if !is_valid_email(&self.email) {
            return Err(FinanceError::validation("email", "is not a valid address"));
        }
        Ok(())
    }
}

impl Validate for PasswordChangeRequest {
    fn validate(&self) -> Result<()> {
        require_text("newPassword", &self.new_password)?;
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FinanceError::validation(
                "newPassword",
                format!("must have at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(FinanceError::validation(
                "confirmPassword",
                "does not match the new password",
            ));
        }
        Ok(())
    }
}
