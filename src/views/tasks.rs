use std::sync::Arc;

use crate::notify::Notifier;
use crate::services::{
    Crop, CropService, Farm, FarmService, Task, TaskInput, TaskPriority, TaskService, TaskUpdate,
};

use super::{optional_id, parse_date, ConfirmPrompt};

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: TaskPriority,
    pub farm_id: String,
    pub crop_id: String,
}

impl TaskForm {
    fn from_task(task: &Task) -> Self {
        TaskForm {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task.due_date.to_string(),
            priority: task.priority,
            farm_id: task.farm_id.map(|id| id.to_string()).unwrap_or_default(),
            crop_id: task.crop_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

pub struct TasksView {
    task_service: TaskService,
    farm_service: FarmService,
    crop_service: CropService,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmPrompt>,
    pub tasks: Vec<Task>,
    pub farms: Vec<Farm>,
    pub crops: Vec<Crop>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub editing: Option<Task>,
    pub form: TaskForm,
}

impl TasksView {
    pub fn new(
        task_service: TaskService,
        farm_service: FarmService,
        crop_service: CropService,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        TasksView {
            task_service,
            farm_service,
            crop_service,
            notifier,
            confirm,
            tasks: Vec::new(),
            farms: Vec::new(),
            crops: Vec::new(),
            loading: true,
            error: None,
            modal_open: false,
            editing: None,
            form: TaskForm::default(),
        }
    }

    /// Tasks, farms and crops load together; the selectors need both parents.
    pub async fn load(&mut self) {
        self.error = None;
        self.loading = true;
        match tokio::try_join!(
            self.task_service.try_get_all(),
            self.farm_service.try_get_all(),
            self.crop_service.try_get_all()
        ) {
            Ok((tasks, farms, crops)) => {
                self.tasks = tasks;
                self.farms = farms;
                self.crops = crops;
            }
            Err(err) => {
                tracing::error!("Failed to load tasks page: {}", err);
                self.error = Some("Failed to load tasks. Please try again.".to_string());
            }
        }
        self.loading = false;
    }

    pub fn open_modal(&mut self, task: Option<&Task>) {
        match task {
            Some(task) => {
                self.editing = Some(task.clone());
                self.form = TaskForm::from_task(task);
            }
            None => {
                self.editing = None;
                self.form = TaskForm::default();
            }
        }
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.form = TaskForm::default();
    }

    pub async fn submit(&mut self) {
        if self.form.title.trim().is_empty() || self.form.due_date.trim().is_empty() {
            self.notifier.error("Please fill in all required fields");
            return;
        }
        let Some(due_date) = parse_date(&self.form.due_date) else {
            self.notifier.error("Please enter a valid due date");
            return;
        };

        let description = {
            let description = self.form.description.trim();
            (!description.is_empty()).then(|| description.to_string())
        };
        let farm_id = optional_id(&self.form.farm_id);
        let crop_id = optional_id(&self.form.crop_id);

        match self.editing.clone() {
            Some(task) => {
                // Completion state rides along unchanged; editing a task never
                // flips it.
                let input = TaskUpdate {
                    title: self.form.title.trim().to_string(),
                    description,
                    due_date,
                    priority: self.form.priority,
                    completed: task.completed,
                    completed_at: task.completed_at,
                    farm_id,
                    crop_id,
                };
                match self.task_service.update(task.id, &input).await {
                    Some(updated) => {
                        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                            *slot = updated;
                        }
                        self.notifier.success("Task updated successfully");
                        self.close_modal();
                    }
                    None => self.notifier.error("Failed to update task"),
                }
            }
            None => {
                let input = TaskInput {
                    title: self.form.title.trim().to_string(),
                    description,
                    due_date,
                    priority: self.form.priority,
                    farm_id,
                    crop_id,
                };
                match self.task_service.create(&input).await {
                    Some(created) => {
                        self.tasks.push(created);
                        self.notifier.success("Task created successfully");
                        self.close_modal();
                    }
                    None => self.notifier.error("Failed to create task"),
                }
            }
        }
    }

    pub async fn toggle(&mut self, id: i32) {
        if let Some(updated) = self.task_service.toggle_complete(id).await {
            if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                *slot = updated;
            }
        }
    }

    pub async fn delete(&mut self, id: i32) {
        if !self.confirm.confirm(
            "Are you sure you want to delete this task? This action cannot be undone.",
        ) {
            return;
        }
        if self.task_service.delete(id).await {
            self.tasks.retain(|t| t.id != id);
            self.notifier.success("Task deleted successfully");
        }
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}
