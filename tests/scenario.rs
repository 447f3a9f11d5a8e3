use std::time::Instant;

use rstest::{fixture, rstest};
use taskpad::view::ListView;
use taskpad::{
    Controller, FileStore, KeyValueStore, MemoryStore, Priority, StatusFilter, TaskDraft, Theme,
    ValidationError,
};

#[fixture]
fn controller() -> Controller<MemoryStore> {
    Controller::load(MemoryStore::new())
}

#[rstest]
fn call_alice_lifecycle(mut controller: Controller<MemoryStore>) {
    let id = controller
        .create(
            TaskDraft::new("Call Alice")
                .with_priority(Priority::High)
                .with_category("Work"),
        )
        .unwrap();
    assert_eq!(controller.tasks().len(), 1);

    assert!(controller.toggle_complete(id));
    assert!(controller.get(id).unwrap().completed);
    let stats = controller.stats();
    assert_eq!(stats.total_label(), "1 tasks");
    assert_eq!(stats.completion_label(), "100% complete");

    assert!(controller.delete(id));
    assert!(controller.tasks().is_empty());
    assert_eq!(
        controller.view().list,
        ListView::Empty {
            message: "No tasks to display"
        }
    );
}

#[rstest]
#[case("a")]
#[case("  padded  ")]
#[case("Buy Milk")]
fn create_grows_by_one(mut controller: Controller<MemoryStore>, #[case] text: &str) {
    controller.create(TaskDraft::new("seed")).unwrap();
    let before = controller.tasks().len();
    let id = controller.create(TaskDraft::new(text)).unwrap();
    assert_eq!(controller.tasks().len(), before + 1);
    assert!(!controller.get(id).unwrap().completed);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn blank_form_is_rejected(mut controller: Controller<MemoryStore>, #[case] text: &str) {
    let now = Instant::now();
    controller.form_mut().text = text.to_string();
    assert_eq!(controller.submit_form(now), Err(ValidationError::EmptyText));
    assert!(controller.tasks().is_empty());
    assert!(controller.form().has_error(now));
}

#[rstest]
fn form_submit_clears_only_free_text_fields(mut controller: Controller<MemoryStore>) {
    let form = controller.form_mut();
    form.text = "Dentist".into();
    form.due_date = "2025-03-01".into();
    form.priority = Priority::Low;
    form.category = "Health".into();
    form.location = "Main St".into();

    let id = controller.submit_form(Instant::now()).unwrap();
    let task = controller.get(id).unwrap();
    assert_eq!(task.location.as_deref(), Some("Main St"));

    let form = controller.form();
    assert!(form.text.is_empty() && form.due_date.is_empty() && form.location.is_empty());
    assert_eq!(form.priority, Priority::Low);
    assert_eq!(form.category, "Health");
}

#[rstest]
fn filters_partition_and_search_folds_case(mut controller: Controller<MemoryStore>) {
    let milk = controller.create(TaskDraft::new("Buy Milk").with_category("Shopping")).unwrap();
    controller.create(TaskDraft::new("Gym").with_location("Downtown")).unwrap();
    controller.create(TaskDraft::new("Report").with_category("Work")).unwrap();
    controller.toggle_complete(milk);

    controller.set_filter(StatusFilter::Completed);
    let completed: Vec<u64> = controller.visible().iter().map(|t| t.id).collect();
    controller.set_filter(StatusFilter::Active);
    let active: Vec<u64> = controller.visible().iter().map(|t| t.id).collect();
    assert_eq!(completed.len() + active.len(), 3);
    assert!(completed.iter().all(|id| !active.contains(id)));

    controller.set_filter(StatusFilter::All);
    controller.set_search("milk");
    assert_eq!(controller.visible().len(), 1);
    controller.set_search("DOWN");
    assert_eq!(controller.visible()[0].text, "Gym");
}

#[rstest]
fn theme_round_trip_is_persisted(mut controller: Controller<MemoryStore>) {
    assert_eq!(controller.theme(), Theme::Light);
    assert_eq!(controller.toggle_theme(), Theme::Dark);
    assert_eq!(controller.store().get_string("theme").as_deref(), Some("dark"));
    assert_eq!(controller.toggle_theme(), Theme::Light);
    assert_eq!(controller.store().get_string("theme").as_deref(), Some("light"));
}

#[test]
fn state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let (kept, dropped) = {
        let mut controller = Controller::load(FileStore::open(dir.path()).unwrap());
        let kept = controller.create(TaskDraft::new("Water plants")).unwrap();
        let dropped = controller.create(TaskDraft::new("Old chore")).unwrap();
        controller.toggle_complete(kept);
        controller.delete(dropped);
        controller.set_theme(Theme::Dark);
        (kept, dropped)
    };

    let controller = Controller::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(controller.theme(), Theme::Dark);
    assert_eq!(controller.tasks().len(), 1);
    assert!(controller.get(kept).unwrap().completed);
    assert!(controller.get(dropped).is_none());
}

#[test]
fn odd_stored_records_do_not_wipe_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store
        .set_string(
            "tasks",
            r#"[
                {"id": 1736000000000, "text": "Keep me", "priority": "urgent",
                 "category": "Work", "createdAt": "2025-01-04T14:13:20Z"},
                {"id": 18446744073709551615, "text": "Too big", "priority": "low",
                 "category": "Work", "createdAt": "2025-01-04T14:13:20Z"},
                {"id": 1736000000001, "text": 42}
            ]"#
            .into(),
        )
        .unwrap();

    let mut controller = Controller::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].priority, Priority::Medium);

    controller.create(TaskDraft::new("Fresh")).unwrap();
    let saved = controller.store().get_string("tasks").unwrap();
    assert!(saved.contains("Keep me"));
    assert!(saved.contains("Fresh"));
}

#[test]
fn corrupt_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.set_string("tasks", "{\"not\": \"a list\"}".into()).unwrap();
    store.set_string("theme", "neon".into()).unwrap();

    let controller = Controller::load(FileStore::open(dir.path()).unwrap());
    assert!(controller.tasks().is_empty());
    assert_eq!(controller.theme(), Theme::Light);
}
