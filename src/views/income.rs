use std::sync::Arc;

use crate::notify::Notifier;
use crate::services::{Crop, CropService, Income, IncomeInput, IncomeService};

use super::{parse_date, ConfirmPrompt};

#[derive(Debug, Clone, Default)]
pub struct IncomeForm {
    pub date: String,
    pub crop_id: String,
    pub quantity: String,
    pub price_per_unit: String,
    pub buyer: String,
}

impl IncomeForm {
    fn from_income(income: &Income) -> Self {
        IncomeForm {
            date: income.date.to_string(),
            crop_id: income.crop_id.to_string(),
            quantity: income.quantity.to_string(),
            price_per_unit: income.price_per_unit.to_string(),
            buyer: income.buyer.clone(),
        }
    }
}

pub struct IncomeView {
    income_service: IncomeService,
    crop_service: CropService,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmPrompt>,
    pub incomes: Vec<Income>,
    pub crops: Vec<Crop>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub editing: Option<Income>,
    pub form: IncomeForm,
}

impl IncomeView {
    pub fn new(
        income_service: IncomeService,
        crop_service: CropService,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        IncomeView {
            income_service,
            crop_service,
            notifier,
            confirm,
            incomes: Vec::new(),
            crops: Vec::new(),
            loading: true,
            error: None,
            modal_open: false,
            editing: None,
            form: IncomeForm::default(),
        }
    }

    /// Crops load alongside income records to feed the crop selector.
    pub async fn load(&mut self) {
        self.error = None;
        self.loading = true;
        match tokio::try_join!(
            self.income_service.try_get_all(),
            self.crop_service.try_get_all()
        ) {
            Ok((incomes, crops)) => {
                self.incomes = incomes;
                self.crops = crops;
            }
            Err(err) => {
                tracing::error!("Failed to load income page: {}", err);
                self.error = Some("Failed to load income. Please try again.".to_string());
            }
        }
        self.loading = false;
    }

    pub fn open_modal(&mut self, income: Option<&Income>) {
        match income {
            Some(income) => {
                self.editing = Some(income.clone());
                self.form = IncomeForm::from_income(income);
            }
            None => {
                self.editing = None;
                self.form = IncomeForm::default();
            }
        }
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.form = IncomeForm::default();
    }

    pub async fn submit(&mut self) {
        if self.form.date.trim().is_empty()
            || self.form.crop_id.trim().is_empty()
            || self.form.quantity.trim().is_empty()
            || self.form.price_per_unit.trim().is_empty()
            || self.form.buyer.trim().is_empty()
        {
            self.notifier.error("Please fill in all required fields");
            return;
        }
        let Some(date) = parse_date(&self.form.date) else {
            self.notifier.error("Please enter a valid date");
            return;
        };
        let Ok(crop_id) = self.form.crop_id.trim().parse::<i32>() else {
            self.notifier.error("Please select a crop");
            return;
        };
        let (Ok(quantity), Ok(price_per_unit)) = (
            self.form.quantity.trim().parse::<f64>(),
            self.form.price_per_unit.trim().parse::<f64>(),
        ) else {
            self.notifier
                .error("Quantity and price per unit must be numbers");
            return;
        };

        let input = IncomeInput {
            date,
            crop_id,
            quantity,
            price_per_unit,
            buyer: self.form.buyer.trim().to_string(),
        };

        match self.editing.as_ref().map(|income| income.id) {
            Some(id) => match self.income_service.update(id, &input).await {
                Some(updated) => {
                    if let Some(slot) = self.incomes.iter_mut().find(|i| i.id == id) {
                        *slot = updated;
                    }
                    self.notifier.success("Income updated successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to update income"),
            },
            None => match self.income_service.create(&input).await {
                Some(created) => {
                    self.incomes.push(created);
                    self.notifier.success("Income recorded successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to record income"),
            },
        }
    }

    pub async fn delete(&mut self, id: i32) {
        if !self.confirm.confirm(
            "Are you sure you want to delete this income record? This action cannot be undone.",
        ) {
            return;
        }
        if self.income_service.delete(id).await {
            self.incomes.retain(|i| i.id != id);
            self.notifier.success("Income deleted successfully");
        }
    }

    pub fn crop_name(&self, crop_id: i32) -> Option<&str> {
        self.crops
            .iter()
            .find(|c| c.id == crop_id)
            .map(|c| c.crop_name.as_str())
    }

    pub fn total_income(&self) -> f64 {
        self.incomes.iter().map(|i| i.total_amount).sum()
    }
}
