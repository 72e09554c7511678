#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::notify::BufferNotifier;
    use crate::records::memory::InMemoryStore;
    use crate::services::{
        AreaUnit, CropInput, CropService, CropStatus, ExpenseInput, ExpenseService, FarmInput,
        FarmService, IncomeInput, IncomeService, TaskInput, TaskPriority, TaskService, TaskUpdate,
    };

    struct Fixture {
        store: Arc<InMemoryStore>,
        notifier: Arc<BufferNotifier>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                store: Arc::new(InMemoryStore::new()),
                notifier: Arc::new(BufferNotifier::new()),
            }
        }

        fn farms(&self) -> FarmService {
            FarmService::new(self.store.clone(), self.notifier.clone())
        }

        fn crops(&self) -> CropService {
            CropService::new(self.store.clone(), self.notifier.clone())
        }

        fn expenses(&self) -> ExpenseService {
            ExpenseService::new(self.store.clone(), self.notifier.clone())
        }

        fn income(&self) -> IncomeService {
            IncomeService::new(self.store.clone(), self.notifier.clone())
        }

        fn tasks(&self) -> TaskService {
            TaskService::new(self.store.clone(), self.notifier.clone())
        }
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

    fn crop_input(farm_id: i32, name: &str) -> CropInput {
        CropInput {
            crop_name: name.to_string(),
            variety: "standard".to_string(),
            planting_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            expected_harvest_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            area_planted: 1.5,
            status: CropStatus::Growing,
            notes: None,
            farm_id,
        }
    }

    fn task_input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            priority: TaskPriority::Medium,
            farm_id: None,
            crop_id: None,
        }
    }

    #[tokio::test]
    async fn created_farms_show_up_in_the_list_with_fresh_ids() {
        let fx = Fixture::new();
        let farms = fx.farms();

        let first = farms.create(&farm_input("North Field")).await.unwrap();
        let second = farms.create(&farm_input("South Field")).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = farms.get_all().await;
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|f| f.id == first.id));
        assert!(all.iter().any(|f| f.id == second.id));
    }

    #[tokio::test]
    async fn the_north_field_scenario_round_trips_exactly() {
        let fx = Fixture::new();
        let farms = fx.farms();

        let created = farms.create(&farm_input("North Field")).await.unwrap();
        let fetched = farms.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched.name, "North Field");
        assert_eq!(fetched.location, "Valley Rd");
        assert_eq!(fetched.unit, AreaUnit::Acres);
        assert!((fetched.total_area - 12.5).abs() < f64::EPSILON);
        assert!(fetched.created_on.is_some());
        assert_eq!(fetched.display_name.as_deref(), Some("North Field"));
    }

    #[tokio::test]
    async fn update_persists_every_supplied_field() {
        let fx = Fixture::new();
        let farms = fx.farms();
        let created = farms.create(&farm_input("North Field")).await.unwrap();

        let updated_input = FarmInput {
            name: "North Field II".to_string(),
            location: "Ridge Rd".to_string(),
            total_area: 20.0,
            unit: AreaUnit::Hectares,
            notes: Some("expanded".to_string()),
        };
        farms.update(created.id, &updated_input).await.unwrap();

        let fetched = farms.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.name, "North Field II");
        assert_eq!(fetched.location, "Ridge Rd");
        assert_eq!(fetched.unit, AreaUnit::Hectares);
        assert_eq!(fetched.notes.as_deref(), Some("expanded"));
        assert!((fetched.total_area - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn deleted_records_are_gone() {
        let fx = Fixture::new();
        let farms = fx.farms();
        let created = farms.create(&farm_input("North Field")).await.unwrap();

        assert!(farms.delete(created.id).await);
        assert!(farms.get_by_id(created.id).await.is_none());
        assert!(farms.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_record_reports_failure() {
        let fx = Fixture::new();
        let farms = fx.farms();
        assert!(!farms.delete(999).await);
        assert_eq!(fx.notifier.errors(), vec!["Record 999 does not exist"]);
    }

    #[tokio::test]
    async fn income_total_is_quantity_times_price() {
        let fx = Fixture::new();
        let income = fx.income();

        let created = income
            .create(&IncomeInput {
                date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
                crop_id: 1,
                quantity: 37.5,
                price_per_unit: 1.19,
                buyer: "Greenmarket Co".to_string(),
            })
            .await
            .unwrap();

        assert!((created.total_amount - 37.5 * 1.19).abs() < 1e-9);

        let fetched = income.get_by_id(created.id).await.unwrap();
        assert!((fetched.total_amount - 37.5 * 1.19).abs() < 1e-9);
    }

    #[tokio::test]
    async fn toggle_complete_sets_and_clears_the_timestamp() {
        let fx = Fixture::new();
        let tasks = fx.tasks();
        let created = tasks.create(&task_input("Irrigate block A")).await.unwrap();
        assert!(!created.completed);
        assert!(created.completed_at.is_none());

        let toggled = tasks.toggle_complete(created.id).await.unwrap();
        assert!(toggled.completed);
        assert!(toggled.completed_at.is_some());
        // The partial update must not disturb the rest of the record.
        assert_eq!(toggled.title, "Irrigate block A");
        assert_eq!(toggled.priority, TaskPriority::Medium);

        let restored = tasks.toggle_complete(created.id).await.unwrap();
        assert!(!restored.completed);
        assert!(restored.completed_at.is_none());
    }

    #[tokio::test]
    async fn toggling_a_missing_task_is_a_quiet_none() {
        let fx = Fixture::new();
        let tasks = fx.tasks();
        assert!(tasks.toggle_complete(404).await.is_none());
        assert!(fx.notifier.notices().is_empty());
        assert_eq!(fx.store.record_count("task_c"), 0);
    }

    #[tokio::test]
    async fn full_task_update_reflects_every_field() {
        let fx = Fixture::new();
        let tasks = fx.tasks();
        let created = tasks.create(&task_input("Irrigate block A")).await.unwrap();

        let update = TaskUpdate {
            title: "Irrigate block B".to_string(),
            description: Some("after sunset".to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 9).unwrap(),
            priority: TaskPriority::High,
            completed: false,
            completed_at: None,
            farm_id: Some(2),
            crop_id: None,
        };
        tasks.update(created.id, &update).await.unwrap();

        let fetched = tasks.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.title, "Irrigate block B");
        assert_eq!(fetched.description.as_deref(), Some("after sunset"));
        assert_eq!(fetched.priority, TaskPriority::High);
        assert_eq!(fetched.farm_id, Some(2));
        assert_eq!(fetched.crop_id, None);
    }

    #[tokio::test]
    async fn crops_partition_cleanly_by_farm() {
        let fx = Fixture::new();
        let farms = fx.farms();
        let crops = fx.crops();

        let north = farms.create(&farm_input("North Field")).await.unwrap();
        let south = farms.create(&farm_input("South Field")).await.unwrap();

        crops.create(&crop_input(north.id, "Tomatoes")).await.unwrap();
        crops.create(&crop_input(north.id, "Peppers")).await.unwrap();
        crops.create(&crop_input(south.id, "Squash")).await.unwrap();

        let north_crops = crops.get_by_farm_id(north.id).await;
        let south_crops = crops.get_by_farm_id(south.id).await;
        let empty = crops.get_by_farm_id(9999).await;

        assert_eq!(north_crops.len(), 2);
        assert!(north_crops.iter().all(|c| c.farm_id == north.id));
        assert_eq!(south_crops.len(), 1);
        assert_eq!(south_crops[0].crop_name, "Squash");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_degrades_every_operation_to_a_sentinel() {
        let fx = Fixture::new();
        let farms = fx.farms();
        let created = farms.create(&farm_input("North Field")).await.unwrap();

        fx.notifier.clear();
        fx.store.fail_everything("record service unavailable");

        assert!(farms.get_all().await.is_empty());
        assert!(farms.get_by_id(created.id).await.is_none());
        assert!(farms.create(&farm_input("South Field")).await.is_none());
        assert!(farms.update(created.id, &farm_input("Renamed")).await.is_none());
        assert!(!farms.delete(created.id).await);

        // get_all, create, update and delete each notify once; the by-id
        // lookup path stays silent.
        assert_eq!(
            fx.notifier.errors(),
            vec![
                "record service unavailable".to_string(),
                "record service unavailable".to_string(),
                "record service unavailable".to_string(),
                "record service unavailable".to_string(),
            ]
        );

        fx.store.clear_failures();
        assert_eq!(farms.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_writes_fan_out_field_errors_and_return_none() {
        let fx = Fixture::new();
        let farms = fx.farms();

        fx.store.reject_writes(
            "Farm could not be saved",
            &[("Name", "is required"), ("Total Area", "must be positive")],
        );

        assert!(farms.create(&farm_input("North Field")).await.is_none());
        assert_eq!(
            fx.notifier.errors(),
            vec![
                "Name: is required".to_string(),
                "Total Area: must be positive".to_string(),
                "Farm could not be saved".to_string(),
            ]
        );
        assert_eq!(fx.store.record_count("farm_c"), 0);
    }

    #[tokio::test]
    async fn expense_foreign_key_round_trips_through_the_lookup_shape() {
        let fx = Fixture::new();
        let farms = fx.farms();
        let expenses = fx.expenses();

        let farm = farms.create(&farm_input("North Field")).await.unwrap();
        let created = expenses
            .create(&ExpenseInput {
                date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                category: "Seeds".to_string(),
                amount: 230.40,
                description: "Spring seed order".to_string(),
                farm_id: Some(farm.id),
            })
            .await
            .unwrap();

        assert_eq!(created.farm_id, Some(farm.id));

        let fetched = expenses.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.farm_id, Some(farm.id));
        assert_eq!(fetched.display_name.as_deref(), Some("Spring seed order"));
    }
}
