use std::sync::Arc;

use crate::notify::Notifier;
use crate::records::RecordStore;
use crate::services::{CropService, ExpenseService, FarmService, IncomeService, TaskService};

/// Shared application state: one explicitly constructed record-store handle,
/// threaded into every entity service. No service reaches for a global
/// client.
#[derive(Clone)]
pub struct AppState {
    pub farms: FarmService,
    pub crops: CropService,
    pub expenses: ExpenseService,
    pub income: IncomeService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        AppState {
            farms: FarmService::new(store.clone(), notifier.clone()),
            crops: CropService::new(store.clone(), notifier.clone()),
            expenses: ExpenseService::new(store.clone(), notifier.clone()),
            income: IncomeService::new(store.clone(), notifier.clone()),
            tasks: TaskService::new(store, notifier),
        }
    }
}
