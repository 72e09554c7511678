use std::sync::Arc;

use crate::notify::Notifier;
use crate::services::{Expense, ExpenseInput, ExpenseService, Farm, FarmService};

use super::{optional_id, parse_date, ConfirmPrompt};

#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub farm_id: String,
}

impl ExpenseForm {
    fn from_expense(expense: &Expense) -> Self {
        ExpenseForm {
            date: expense.date.to_string(),
            category: expense.category.clone(),
            amount: expense.amount.to_string(),
            description: expense.description.clone(),
            farm_id: expense.farm_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

pub struct ExpensesView {
    expense_service: ExpenseService,
    farm_service: FarmService,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmPrompt>,
    pub expenses: Vec<Expense>,
    pub farms: Vec<Farm>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub editing: Option<Expense>,
    pub form: ExpenseForm,
}

impl ExpensesView {
    pub fn new(
        expense_service: ExpenseService,
        farm_service: FarmService,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        ExpensesView {
            expense_service,
            farm_service,
            notifier,
            confirm,
            expenses: Vec::new(),
            farms: Vec::new(),
            loading: true,
            error: None,
            modal_open: false,
            editing: None,
            form: ExpenseForm::default(),
        }
    }

    pub async fn load(&mut self) {
        self.error = None;
        self.loading = true;
        match tokio::try_join!(
            self.expense_service.try_get_all(),
            self.farm_service.try_get_all()
        ) {
            Ok((expenses, farms)) => {
                self.expenses = expenses;
                self.farms = farms;
            }
            Err(err) => {
                tracing::error!("Failed to load expenses page: {}", err);
                self.error = Some("Failed to load expenses. Please try again.".to_string());
            }
        }
        self.loading = false;
    }

    pub fn open_modal(&mut self, expense: Option<&Expense>) {
        match expense {
            Some(expense) => {
                self.editing = Some(expense.clone());
                self.form = ExpenseForm::from_expense(expense);
            }
            None => {
                self.editing = None;
                self.form = ExpenseForm::default();
            }
        }
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.form = ExpenseForm::default();
    }

    pub async fn submit(&mut self) {
        if self.form.date.trim().is_empty()
            || self.form.category.trim().is_empty()
            || self.form.amount.trim().is_empty()
            || self.form.description.trim().is_empty()
        {
            self.notifier.error("Please fill in all required fields");
            return;
        }
        let Some(date) = parse_date(&self.form.date) else {
            self.notifier.error("Please enter a valid date");
            return;
        };
        let Ok(amount) = self.form.amount.trim().parse::<f64>() else {
            self.notifier.error("Amount must be a number");
            return;
        };

        let input = ExpenseInput {
            date,
            category: self.form.category.trim().to_string(),
            amount,
            description: self.form.description.trim().to_string(),
            farm_id: optional_id(&self.form.farm_id),
        };

        match self.editing.as_ref().map(|expense| expense.id) {
            Some(id) => match self.expense_service.update(id, &input).await {
                Some(updated) => {
                    if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == id) {
                        *slot = updated;
                    }
                    self.notifier.success("Expense updated successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to update expense"),
            },
            None => match self.expense_service.create(&input).await {
                Some(created) => {
                    self.expenses.push(created);
                    self.notifier.success("Expense recorded successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to record expense"),
            },
        }
    }

    pub async fn delete(&mut self, id: i32) {
        if !self.confirm.confirm(
            "Are you sure you want to delete this expense? This action cannot be undone.",
        ) {
            return;
        }
        if self.expense_service.delete(id).await {
            self.expenses.retain(|e| e.id != id);
            self.notifier.success("Expense deleted successfully");
        }
    }

    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}
