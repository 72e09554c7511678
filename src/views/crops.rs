use std::sync::Arc;

use crate::notify::Notifier;
use crate::services::{Crop, CropInput, CropService, CropStatus, Farm, FarmService};

use super::{parse_date, ConfirmPrompt};

#[derive(Debug, Clone, Default)]
pub struct CropForm {
    pub crop_name: String,
    pub variety: String,
    pub planting_date: String,
    pub expected_harvest_date: String,
    pub area_planted: String,
    pub status: CropStatus,
    pub notes: String,
    pub farm_id: String,
}

impl CropForm {
    fn from_crop(crop: &Crop) -> Self {
        CropForm {
            crop_name: crop.crop_name.clone(),
            variety: crop.variety.clone(),
            planting_date: crop.planting_date.to_string(),
            expected_harvest_date: crop.expected_harvest_date.to_string(),
            area_planted: crop.area_planted.to_string(),
            status: crop.status,
            notes: crop.notes.clone().unwrap_or_default(),
            farm_id: crop.farm_id.to_string(),
        }
    }
}

pub struct CropsView {
    crop_service: CropService,
    farm_service: FarmService,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmPrompt>,
    pub crops: Vec<Crop>,
    pub farms: Vec<Farm>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub editing: Option<Crop>,
    pub form: CropForm,
}

impl CropsView {
    pub fn new(
        crop_service: CropService,
        farm_service: FarmService,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        CropsView {
            crop_service,
            farm_service,
            notifier,
            confirm,
            crops: Vec::new(),
            farms: Vec::new(),
            loading: true,
            error: None,
            modal_open: false,
            editing: None,
            form: CropForm::default(),
        }
    }

    /// Farms load alongside crops to feed the farm selector.
    pub async fn load(&mut self) {
        self.error = None;
        self.loading = true;
        match tokio::try_join!(
            self.crop_service.try_get_all(),
            self.farm_service.try_get_all()
        ) {
            Ok((crops, farms)) => {
                self.crops = crops;
                self.farms = farms;
            }
            Err(err) => {
                tracing::error!("Failed to load crops page: {}", err);
                self.error = Some("Failed to load crops. Please try again.".to_string());
            }
        }
        self.loading = false;
    }

    pub fn open_modal(&mut self, crop: Option<&Crop>) {
        match crop {
            Some(crop) => {
                self.editing = Some(crop.clone());
                self.form = CropForm::from_crop(crop);
            }
            None => {
                self.editing = None;
                self.form = CropForm::default();
            }
        }
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.form = CropForm::default();
    }

    pub async fn submit(&mut self) {
        if self.form.crop_name.trim().is_empty()
            || self.form.planting_date.trim().is_empty()
            || self.form.expected_harvest_date.trim().is_empty()
            || self.form.area_planted.trim().is_empty()
            || self.form.farm_id.trim().is_empty()
        {
            self.notifier.error("Please fill in all required fields");
            return;
        }
        let (Some(planting_date), Some(expected_harvest_date)) = (
            parse_date(&self.form.planting_date),
            parse_date(&self.form.expected_harvest_date),
        ) else {
            self.notifier.error("Please enter valid dates");
            return;
        };
        let Ok(area_planted) = self.form.area_planted.trim().parse::<f64>() else {
            self.notifier.error("Area planted must be a number");
            return;
        };
        let Ok(farm_id) = self.form.farm_id.trim().parse::<i32>() else {
            self.notifier.error("Please select a farm");
            return;
        };

        let input = CropInput {
            crop_name: self.form.crop_name.trim().to_string(),
            variety: self.form.variety.trim().to_string(),
            planting_date,
            expected_harvest_date,
            area_planted,
            status: self.form.status,
            notes: {
                let notes = self.form.notes.trim();
                (!notes.is_empty()).then(|| notes.to_string())
            },
            farm_id,
        };

        match self.editing.as_ref().map(|crop| crop.id) {
            Some(id) => match self.crop_service.update(id, &input).await {
                Some(updated) => {
                    if let Some(slot) = self.crops.iter_mut().find(|c| c.id == id) {
                        *slot = updated;
                    }
                    self.notifier.success("Crop updated successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to update crop"),
            },
            None => match self.crop_service.create(&input).await {
                Some(created) => {
                    self.crops.push(created);
                    self.notifier.success("Crop created successfully");
                    self.close_modal();
                }
                None => self.notifier.error("Failed to create crop"),
            },
        }
    }

    pub async fn delete(&mut self, id: i32) {
        if !self.confirm.confirm(
            "Are you sure you want to delete this crop? This action cannot be undone.",
        ) {
            return;
        }
        if self.crop_service.delete(id).await {
            self.crops.retain(|c| c.id != id);
            self.notifier.success("Crop deleted successfully");
        }
    }

    pub fn farm_name(&self, farm_id: i32) -> Option<&str> {
        self.farms
            .iter()
            .find(|f| f.id == farm_id)
            .map(|f| f.name.as_str())
    }

    pub fn active_count(&self) -> usize {
        self.crops.iter().filter(|c| c.status.is_active()).count()
    }
}
