//! Derived views: pure functions of store snapshots.
//!
//! Nothing here is cached or stored. Call these on every render with the
//! current items (e.g. `views::total(store.state().items())`) and they can
//! never disagree with the store.

use std::collections::BTreeMap;

use crate::models::{
    Account, BankInstitution, Category, FinancialSummary, TransactionDetail, TransactionType,
};

/// Items that contribute a monetary amount to totals.
pub trait HasAmount {
    fn amount(&self) -> f64;
}

impl HasAmount for TransactionDetail {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Account balances are in cents, so totals over accounts are in cents too.
impl HasAmount for Account {
    fn amount(&self) -> f64 {
        self.account_current_balance as f64
    }
}

impl<T: HasAmount> HasAmount for &T {
    fn amount(&self) -> f64 {
        (**self).amount()
    }
}

// ---------------------------------------------------------------------------
// Generic aggregates
// ---------------------------------------------------------------------------

/// Sum of every item's amount; `0.0` for an empty slice.
pub fn total<T: HasAmount>(items: &[T]) -> f64 {
    items.iter().map(HasAmount::amount).sum()
}

/// `round(100 * numerator / denominator)`, or `0` when the denominator is not
/// positive. Halves round away from zero.
pub fn percentage(numerator: f64, denominator: f64) -> i64 {
    if denominator > 0.0 {
        (100.0 * numerator / denominator).round() as i64
    } else {
        0
    }
}

/// Group items by key. Within a group, items keep their original order.
pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<&T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TypeTotals {
    pub income: f64,
    pub expense: f64,
}

impl TypeTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

pub fn totals_by_type(transactions: &[TransactionDetail]) -> TypeTotals {
    transactions
        .iter()
        .fold(TypeTotals::default(), |mut acc, tx| {
            match tx.transaction_type {
                TransactionType::Income => acc.income += tx.amount,
                TransactionType::Expense => acc.expense += tx.amount,
            }
            acc
        })
}

/// Share of income already spent, as a whole percentage.
pub fn expense_ratio(summary: &FinancialSummary) -> i64 {
    percentage(summary.total_expense, summary.total_income)
}

// ---------------------------------------------------------------------------
// Accounts and banks
// ---------------------------------------------------------------------------

/// Accounts keyed by bank institution name; `None` collects accounts with no
/// institution (wallets, mostly).
pub fn accounts_by_bank(accounts: &[Account]) -> BTreeMap<Option<String>, Vec<&Account>> {
    group_by(accounts, |a| a.bank_institution_name.clone())
}

/// Sum of account balances, in cents.
pub fn total_balance(accounts: &[Account]) -> i64 {
    accounts.iter().map(|a| a.account_current_balance).sum()
}

/// Institution name for `id`, or a placeholder when it is not in the list.
pub fn bank_institution_name(banks: &[BankInstitution], id: i64) -> String {
    banks
        .iter()
        .find(|b| b.institution_id == id)
        .map(|b| b.institution_name.clone())
        .unwrap_or_else(|| format!("Institution {}", id))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Which part of the category tree to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentFilter {
    #[default]
    All,
    Root,
    Parent(i64),
}

pub fn root_categories(categories: &[Category]) -> Vec<&Category> {
    categories.iter().filter(|c| c.is_root()).collect()
}

pub fn subcategories(categories: &[Category], parent_id: i64) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| c.parent_id == Some(parent_id))
        .collect()
}

pub fn category_name(categories: &[Category], id: i64) -> Option<&str> {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
}

/// Case-insensitive name search combined with a tree-position filter.
/// A blank search matches everything.
pub fn filter_categories<'a>(
    categories: &'a [Category],
    search: &str,
    parent: ParentFilter,
) -> Vec<&'a Category> {
    let needle = search.trim().to_lowercase();
    categories
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .filter(|c| match parent {
            ParentFilter::All => true,
            ParentFilter::Root => c.is_root(),
            ParentFilter::Parent(id) => c.parent_id == Some(id),
        })
        .collect()
}
