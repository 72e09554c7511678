//! Page controllers. Each view owns the list and form state one page of the
//! UI needs and drives the entity services; rendering is left to whatever
//! shell embeds them. State changes follow the page contract: lists are
//! mutated in place after a confirmed backend outcome, never refetched.

pub mod crops;
pub mod expenses;
pub mod farms;
pub mod income;
pub mod tasks;

pub use crops::CropsView;
pub use expenses::ExpensesView;
pub use farms::FarmsView;
pub use income::IncomeView;
pub use tasks::TasksView;

use chrono::NaiveDate;

/// Blocking yes/no interaction gating destructive actions. A desktop or web
/// shell implements this over its dialog system.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Approves every confirmation. Suits embeddings that gate destructive
/// actions upstream of the view layer.
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

#[cfg(test)]
pub struct DenyConfirm;

#[cfg(test)]
impl ConfirmPrompt for DenyConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// Optional foreign-key select: an empty selection means "none", anything
/// unparseable is treated the same way.
pub(crate) fn optional_id(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
