use std::sync::Arc;

use crate::notify::Notifier;
use crate::services::{AreaUnit, Crop, CropService, Farm, FarmInput, FarmService};

use super::ConfirmPrompt;

#[derive(Debug, Clone, Default)]
pub struct FarmForm {
    pub name: String,
    pub location: String,
    pub total_area: String,
    pub unit: AreaUnit,
    pub notes: String,
}

impl FarmForm {
    fn from_farm(farm: &Farm) -> Self {
        FarmForm {
            name: farm.name.clone(),
            location: farm.location.clone(),
            total_area: farm.total_area.to_string(),
            unit: farm.unit,
            notes: farm.notes.clone().unwrap_or_default(),
        }
    }
}

pub struct FarmsView {
    farm_service: FarmService,
    crop_service: CropService,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmPrompt>,
    pub farms: Vec<Farm>,
    pub crops: Vec<Crop>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub editing: Option<Farm>,
    pub form: FarmForm,
}

impl FarmsView {
    pub fn new(
        farm_service: FarmService,
        crop_service: CropService,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        FarmsView {
            farm_service,
            crop_service,
            notifier,
            confirm,
            farms: Vec::new(),
            crops: Vec::new(),
            loading: true,
            error: None,
            modal_open: false,
            editing: None,
            form: FarmForm::default(),
        }
    }

    /// Mount-time load; farms and crops are fetched together so the per-farm
    /// crop counts render with the list. A failure here is fatal to the page
    /// and recoverable only by calling `load` again.
    pub async fn load(&mut self) {
        self.error = None;
        self.loading = true;
        match tokio::try_join!(
            self.farm_service.try_get_all(),
            self.crop_service.try_get_all()
        ) {
            Ok((farms, crops)) => {
                self.farms = farms;
                self.crops = crops;
            }
            Err(err) => {
                tracing::error!("Failed to load farms page: {}", err);
                self.error = Some("Failed to load farms. Please try again.".to_string());
            }
        }
        self.loading = false;
    }

    pub fn open_modal(&mut self, farm: Option<&Farm>) {
        match farm {
            Some(farm) => {
                self.editing = Some(farm.clone());
                self.form = FarmForm::from_farm(farm);
            }
            None => {
                self.editing = None;
                self.form = FarmForm::default();
            }
        }
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.form = FarmForm::default();
    }

    pub async fn submit(&mut self) {
        if self.form.name.trim().is_empty()
            || self.form.location.trim().is_empty()
            || self.form.total_area.trim().is_empty()
        {
            self.notifier.error("Please fill in all required fields");
            return;
        }
        let Ok(total_area) = self.form.total_area.trim().parse::<f64>() else {
            self.notifier.error("Total area must be a number");
            return;
        };

        let input = FarmInput {
            name: self.form.name.trim().to_string(),
            location: self.form.location.trim().to_string(),
            total_area,
            unit: self.form.unit,
            notes: {
                let notes = self.form.notes.trim();
                (!notes.is_empty()).then(|| notes.to_string())
            },
        };

        match self.editing.as_ref().map(|farm| farm.id) {
            Some(id) => match self.farm_service.update(id, &input).await {
                Some(updated) => {
                    if let Some(slot) = self.farms.iter_mut().find(|f| f.id == id) {
                        *slot = updated;
                    }
                    self.notifier.success("Farm updated successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to update farm"),
            },
            None => match self.farm_service.create(&input).await {
                Some(created) => {
                    self.farms.push(created);
                    self.notifier.success("Farm created successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to create farm"),
            },
        }
    }

    pub async fn delete(&mut self, id: i32) {
        if !self.confirm.confirm(
            "Are you sure you want to delete this farm? This action cannot be undone.",
        ) {
            return;
        }
        if self.farm_service.delete(id).await {
            self.farms.retain(|f| f.id != id);
            self.notifier.success("Farm deleted successfully");
        }
    }

    pub fn crop_count(&self, farm_id: i32) -> usize {
        self.crops.iter().filter(|c| c.farm_id == farm_id).count()
    }

    pub fn active_crop_count(&self, farm_id: i32) -> usize {
        self.crops
            .iter()
            .filter(|c| c.farm_id == farm_id && c.status.is_active())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::BufferNotifier;
    use crate::records::memory::InMemoryStore;
    use crate::services::{CropInput, CropStatus};
    use crate::views::{AlwaysConfirm, DenyConfirm};
    use chrono::NaiveDate;

    struct Fixture {
        store: Arc<InMemoryStore>,
        notifier: Arc<BufferNotifier>,
        farm_service: FarmService,
        crop_service: CropService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(BufferNotifier::new());
        let farm_service = FarmService::new(store.clone(), notifier.clone());
        let crop_service = CropService::new(store.clone(), notifier.clone());
        Fixture {
            store,
            notifier,
            farm_service,
            crop_service,
        }
    }

    fn view(fx: &Fixture, confirm: Arc<dyn ConfirmPrompt>) -> FarmsView {
        FarmsView::new(
            fx.farm_service.clone(),
            fx.crop_service.clone(),
            fx.notifier.clone(),
            confirm,
        )
    }

    fn farm_input(name: &str) -> FarmInput {
        FarmInput {
            name: name.to_string(),
            location: "Valley Rd".to_string(),
            total_area: 12.5,
            unit: AreaUnit::Acres,
            notes: None,
        }
    }

    fn crop_input(farm_id: i32, status: CropStatus) -> CropInput {
        CropInput {
            crop_name: "Tomatoes".to_string(),
            variety: "Roma".to_string(),
            planting_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            expected_harvest_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            area_planted: 1.0,
            status,
            notes: None,
            farm_id,
        }
    }

    #[tokio::test]
    async fn load_fills_both_lists_and_clears_loading() {
        let fx = fixture();
        let farm = fx.farm_service.create(&farm_input("North Field")).await.unwrap();
        fx.crop_service.create(&crop_input(farm.id, CropStatus::Growing)).await;
        fx.crop_service.create(&crop_input(farm.id, CropStatus::Harvested)).await;

        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.load().await;

        assert!(!view.loading);
        assert!(view.error.is_none());
        assert_eq!(view.farms.len(), 1);
        assert_eq!(view.crop_count(farm.id), 2);
        assert_eq!(view.active_crop_count(farm.id), 1);
    }

    #[tokio::test]
    async fn load_failure_is_fatal_to_the_page() {
        let fx = fixture();
        fx.store.fail_everything("record service unavailable");

        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.load().await;

        assert!(!view.loading);
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to load farms. Please try again.")
        );
        assert!(view.farms.is_empty());
    }

    #[tokio::test]
    async fn submit_rejects_missing_required_fields_without_touching_the_store() {
        let fx = fixture();
        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.open_modal(None);
        view.form.name = "North Field".to_string();
        view.submit().await;

        assert!(view.modal_open);
        assert_eq!(fx.store.record_count("farm_c"), 0);
        assert_eq!(
            fx.notifier.errors(),
            vec!["Please fill in all required fields".to_string()]
        );
    }

    #[tokio::test]
    async fn successful_create_appends_and_closes_the_modal() {
        let fx = fixture();
        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.open_modal(None);
        view.form.name = "North Field".to_string();
        view.form.location = "Valley Rd".to_string();
        view.form.total_area = "12.5".to_string();
        view.submit().await;

        assert!(!view.modal_open);
        assert_eq!(view.farms.len(), 1);
        assert_eq!(view.farms[0].name, "North Field");
        assert!((view.farms[0].total_area - 12.5).abs() < f64::EPSILON);
        assert!(fx
            .notifier
            .successes()
            .contains(&"Farm created successfully".to_string()));
    }

    #[tokio::test]
    async fn failed_create_keeps_the_modal_open() {
        let fx = fixture();
        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.open_modal(None);
        view.form.name = "North Field".to_string();
        view.form.location = "Valley Rd".to_string();
        view.form.total_area = "12.5".to_string();
        fx.store.reject_writes("Farm name already in use", &[]);
        view.submit().await;

        assert!(view.modal_open);
        assert!(view.farms.is_empty());
        assert!(fx
            .notifier
            .errors()
            .contains(&"Failed to create farm".to_string()));
    }

    #[tokio::test]
    async fn edit_replaces_the_record_in_place() {
        let fx = fixture();
        let farm = fx.farm_service.create(&farm_input("North Field")).await.unwrap();

        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.load().await;
        view.open_modal(Some(&farm.clone()));
        assert_eq!(view.form.total_area, "12.5");

        view.form.name = "North Field II".to_string();
        view.submit().await;

        assert_eq!(view.farms.len(), 1);
        assert_eq!(view.farms[0].id, farm.id);
        assert_eq!(view.farms[0].name, "North Field II");
        assert!(!view.modal_open);
    }

    #[tokio::test]
    async fn declined_confirmation_leaves_the_list_alone() {
        let fx = fixture();
        let farm = fx.farm_service.create(&farm_input("North Field")).await.unwrap();

        let mut view = view(&fx, Arc::new(DenyConfirm));
        view.load().await;
        view.delete(farm.id).await;

        assert_eq!(view.farms.len(), 1);
        assert_eq!(fx.store.record_count("farm_c"), 1);
    }

    #[tokio::test]
    async fn delete_removes_from_the_list_only_after_backend_success() {
        let fx = fixture();
        let farm = fx.farm_service.create(&farm_input("North Field")).await.unwrap();

        let mut view = view(&fx, Arc::new(AlwaysConfirm));
        view.load().await;

        fx.store.fail_everything("record service unavailable");
        view.delete(farm.id).await;
        assert_eq!(view.farms.len(), 1);

        fx.store.clear_failures();
        view.delete(farm.id).await;
        assert!(view.farms.is_empty());
        assert_eq!(fx.store.record_count("farm_c"), 0);
    }
}
