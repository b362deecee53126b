use super::*;

fn open(id: &str) -> EditorController {
    let mut c = EditorController::new();
    c.navigate(DocumentId::new(id));
    c
}

// =============================================================
// Defaults and sessions
// =============================================================

#[test]
fn defaults_match_fresh_session() {
    let c = EditorController::new();
    assert_eq!(c.color(), DEFAULT_COLOR);
    assert_eq!(c.font_size(), 24.0);
    assert_eq!(c.font_family(), "Arial");
    assert_eq!(c.pen_width(), 3.0);
    assert_eq!(c.tool(), ToolMode::Idle);
    assert!(!c.has_selection());
    assert!(!c.is_loading());
    assert!(!c.is_saving());
    assert!(c.status().is_none());
    assert!(c.document_id().is_none());
    assert!(c.is_subscribed());
}

#[test]
fn navigate_resets_session_and_bumps_generation() {
    let mut c = open("a");
    c.change_color("#ff0000");
    c.toggle_pen();
    c.add_rectangle();
    let before = c.generation();

    c.navigate(DocumentId::new("b"));

    assert_eq!(c.generation(), before + 1);
    assert_eq!(c.document_id().map(DocumentId::as_str), Some("b"));
    assert_eq!(c.color(), DEFAULT_COLOR);
    assert_eq!(c.tool(), ToolMode::Idle);
    assert!(c.surface().is_empty());
    assert!(!c.surface().is_drawing_mode());
    assert!(c.is_subscribed());
}

#[test]
fn navigate_keeps_viewport() {
    let mut c = open("a");
    c.on_resize(1250.0, 800.0);
    c.navigate(DocumentId::new("b"));
    assert_eq!(c.surface().viewport_width, 1000.0);
    assert_eq!(c.surface().viewport_height, 800.0);
}

#[test]
fn teardown_releases_subscription_and_objects() {
    let mut c = open("a");
    c.add_circle();
    c.teardown();
    assert!(!c.is_subscribed());
    assert!(c.surface().is_empty());
    assert!(!c.has_selection());
}

// =============================================================
// Adding objects
// =============================================================

#[test]
fn add_rectangle_uses_placement_and_session_color() {
    let mut c = open("a");
    c.change_color("#E74C3C");
    let id = c.add_rectangle();

    let obj = c.surface().object(&id).expect("rect added");
    assert_eq!((obj.left, obj.top), (100.0, 100.0));
    assert_eq!(obj.shape, Shape::Rect { width: 150.0, height: 100.0 });
    assert_eq!(obj.fill(), Some("#e74c3c"));
    assert_eq!(obj.stroke.as_deref(), Some(SHAPE_STROKE));
    assert_eq!(obj.stroke_width, 2.0);
    assert_eq!(c.selection(), Some(id));
}

#[test]
fn add_circle_uses_placement() {
    let mut c = open("a");
    let id = c.add_circle();
    let obj = c.surface().object(&id).expect("circle added");
    assert_eq!((obj.left, obj.top), (150.0, 150.0));
    assert_eq!(obj.shape, Shape::Ellipse { radius: 60.0 });
    assert_eq!(obj.fill(), Some(DEFAULT_COLOR));
}

#[test]
fn add_text_uses_session_font() {
    let mut c = open("a");
    c.change_font_family("Georgia");
    c.change_font_size(40.0);
    let id = c.add_text();
    let obj = c.surface().object(&id).expect("text added");
    assert_eq!(obj.font_family(), Some("Georgia"));
    assert_eq!(obj.font_size(), Some(40.0));
    assert!(matches!(&obj.shape, Shape::Text { text, .. } if text == TEXT_PLACEHOLDER));
    assert!(c.text_selected());
}

#[test]
fn each_add_selects_newest_object() {
    let mut c = open("a");
    c.add_rectangle();
    let second = c.add_circle();
    assert_eq!(c.surface().len(), 2);
    assert_eq!(c.selection(), Some(second));
}

// =============================================================
// Tool panel intent
// =============================================================

#[test]
fn change_color_recolors_fillable_selection() {
    let mut c = open("a");
    let id = c.add_rectangle();
    c.change_color("#00ff00");
    assert_eq!(c.surface().object(&id).and_then(SceneObject::fill), Some("#00ff00"));
    assert_eq!(c.color(), "#00ff00");
}

#[test]
fn change_color_leaves_unselected_objects_alone() {
    let mut c = open("a");
    c.change_color("#ff0000");
    let rect = c.add_rectangle();
    c.change_color("#0000ff");
    let circle = c.add_circle();
    // Inside the rectangle, outside the circle.
    c.on_pointer_down(Point::new(245.0, 105.0));
    c.on_pointer_up(Point::new(245.0, 105.0));
    assert_eq!(c.selection(), Some(rect));

    c.change_color("#00ff00");

    assert_eq!(c.surface().object(&rect).and_then(SceneObject::fill), Some("#00ff00"));
    assert_eq!(c.surface().object(&circle).and_then(SceneObject::fill), Some("#0000ff"));
    assert_eq!(c.color(), "#00ff00");
}

#[test]
fn change_color_ignores_invalid_input() {
    let mut c = open("a");
    c.change_color("not-a-color");
    assert_eq!(c.color(), DEFAULT_COLOR);
}

#[test]
fn change_color_updates_live_brush() {
    let mut c = open("a");
    c.toggle_pen();
    c.change_color("#123456");
    assert_eq!(c.surface().brush().map(|b| b.color.as_str()), Some("#123456"));
}

#[test]
fn font_size_is_clamped() {
    let mut c = open("a");
    c.change_font_size(2.0);
    assert_eq!(c.font_size(), FONT_SIZE_MIN);
    c.change_font_size(500.0);
    assert_eq!(c.font_size(), FONT_SIZE_MAX);
    c.change_font_size(f64::NAN);
    assert_eq!(c.font_size(), FONT_SIZE_MAX);
}

#[test]
fn font_changes_apply_to_selected_text_only() {
    let mut c = open("a");
    let text = c.add_text();
    c.change_font_size(60.0);
    c.change_font_family("Impact");
    let obj = c.surface().object(&text).expect("text");
    assert_eq!(obj.font_size(), Some(60.0));
    assert_eq!(obj.font_family(), Some("Impact"));

    let rect = c.add_rectangle();
    c.change_font_size(30.0);
    assert_eq!(c.surface().object(&rect).and_then(SceneObject::font_size), None);
    assert_eq!(c.font_size(), 30.0);
}

#[test]
fn pen_width_is_clamped_and_applied_while_drawing() {
    let mut c = open("a");
    c.change_pen_width(0.0);
    assert_eq!(c.pen_width(), PEN_WIDTH_MIN);
    c.toggle_pen();
    c.change_pen_width(80.0);
    assert_eq!(c.pen_width(), PEN_WIDTH_MAX);
    assert_eq!(c.surface().brush().map(|b| b.width), Some(PEN_WIDTH_MAX));
}

#[test]
fn toggle_pen_configures_brush_from_session() {
    let mut c = open("a");
    c.change_color("#abcdef");
    c.change_pen_width(7.0);
    c.toggle_pen();
    assert!(c.is_pen_active());
    assert!(c.surface().is_drawing_mode());
    let brush = c.surface().brush().expect("brush");
    assert_eq!(brush.color, "#abcdef");
    assert_eq!(brush.width, 7.0);

    c.toggle_pen();
    assert!(!c.is_pen_active());
    assert!(!c.surface().is_drawing_mode());
}

#[test]
fn pen_stroke_adds_path_and_keeps_objects_on_toggle() {
    let mut c = open("a");
    c.add_rectangle();
    c.toggle_pen();
    c.on_pointer_down(Point::new(400.0, 400.0));
    c.on_pointer_move(Point::new(420.0, 410.0));
    c.on_pointer_up(Point::new(440.0, 430.0));
    assert_eq!(c.surface().len(), 2);
    c.toggle_pen();
    assert_eq!(c.surface().len(), 2);
}

#[test]
fn selected_text_is_none_for_shapes() {
    let mut c = open("a");
    c.add_rectangle();
    assert_eq!(c.selected_text(), None);
    c.edit_selected_text("ignored");
    assert_eq!(c.selected_text(), None);
}

#[test]
fn delete_selected_removes_object() {
    let mut c = open("a");
    c.add_rectangle();
    c.delete_selected();
    assert!(c.surface().is_empty());
    assert!(!c.has_selection());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut c = open("a");
    c.add_rectangle();
    c.on_pointer_down(Point::new(900.0, 900.0));
    assert!(!c.has_selection());
    c.delete_selected();
    assert_eq!(c.surface().len(), 1);
}

#[test]
fn edit_selected_text_replaces_string() {
    let mut c = open("a");
    let id = c.add_text();
    assert_eq!(c.selected_text(), Some(TEXT_PLACEHOLDER));
    c.edit_selected_text("hello");
    assert_eq!(c.selected_text(), Some("hello"));
    let obj = c.surface().object(&id).expect("text");
    assert!(matches!(&obj.shape, Shape::Text { text, .. } if text == "hello"));
}

// =============================================================
// Selection mirroring and input
// =============================================================

#[test]
fn selecting_object_mirrors_fill_into_session_color() {
    let mut c = open("a");
    c.change_color("#ff0000");
    c.add_rectangle();
    c.change_color("#0000ff");
    c.add_circle();
    // Click inside the rectangle but outside the circle.
    c.on_pointer_down(Point::new(245.0, 105.0));
    c.on_pointer_up(Point::new(245.0, 105.0));
    assert_eq!(c.color(), "#ff0000");
}

#[test]
fn clicking_empty_space_clears_selection_but_keeps_color() {
    let mut c = open("a");
    c.change_color("#ff0000");
    c.add_rectangle();
    c.on_pointer_down(Point::new(900.0, 900.0));
    assert!(!c.has_selection());
    assert_eq!(c.color(), "#ff0000");
}

#[test]
fn delete_key_removes_selection_and_prevents_default() {
    let mut c = open("a");
    c.add_rectangle();
    let outcome = c.on_key_down(&Key::from("Backspace"));
    assert!(outcome.prevent_default);
    assert!(c.surface().is_empty());
}

#[test]
fn other_keys_pass_through() {
    let mut c = open("a");
    c.add_rectangle();
    assert_eq!(c.on_key_down(&Key::from("a")), KeyOutcome::default());
    assert_eq!(c.surface().len(), 1);

    c.on_pointer_down(Point::new(900.0, 900.0));
    assert!(!c.on_key_down(&Key::from("Delete")).prevent_default);
}

#[test]
fn text_at_requires_selected_text_under_point() {
    let mut c = open("a");
    c.add_text();
    assert!(c.text_at(Point::new(110.0, 110.0)));
    assert!(!c.text_at(Point::new(900.0, 900.0)));
    c.add_rectangle();
    assert!(!c.text_at(Point::new(110.0, 110.0)));
}

#[test]
fn render_requests_are_taken_once() {
    let mut c = open("a");
    c.take_render_request();
    assert!(!c.take_render_request());
    c.request_render();
    assert!(c.take_render_request());
    assert!(!c.take_render_request());
}

#[test]
fn resize_reserves_tool_panel() {
    let mut c = open("a");
    c.on_resize(1024.0, 768.0);
    assert_eq!(c.surface().viewport_width, 774.0);
    assert_eq!(c.surface().viewport_height, 768.0);
    c.on_resize(100.0, 768.0);
    assert_eq!(c.surface().viewport_width, 0.0);
}

// =============================================================
// Save
// =============================================================

#[test]
fn begin_save_serializes_surface() {
    let mut c = open("doc-1");
    c.add_rectangle();
    let ticket = c.begin_save().expect("save starts");
    assert_eq!(ticket.document_id.as_str(), "doc-1");
    assert_eq!(ticket.generation, c.generation());
    assert_eq!(ticket.payload["objects"].as_array().map(Vec::len), Some(1));
    assert!(c.is_saving());
}

#[test]
fn second_save_is_rejected_while_in_flight() {
    let mut c = open("doc-1");
    c.begin_save().expect("first save");
    assert_eq!(c.begin_save(), Err(SaveRejected::InProgress));
    assert_eq!(c.status().map(|s| s.text.as_str()), Some(SAVE_IN_PROGRESS));
}

#[test]
fn save_without_document_is_rejected() {
    let mut c = EditorController::new();
    assert_eq!(c.begin_save(), Err(SaveRejected::NoDocument));
    assert!(!c.is_saving());
}

#[test]
fn finish_save_success_sets_clearable_status() {
    let mut c = open("doc-1");
    let ticket = c.begin_save().expect("save");
    let status = c.finish_save(ticket.generation, Ok(())).expect("status ticket");
    assert!(!c.is_saving());
    assert_eq!(c.status().map(|s| (s.kind, s.text.as_str())), Some((StatusKind::Success, SAVE_SUCCEEDED)));

    c.clear_status(status);
    assert!(c.status().is_none());
}

#[test]
fn finish_save_failure_sets_error_status() {
    let mut c = open("doc-1");
    let ticket = c.begin_save().expect("save");
    let status = c.finish_save(ticket.generation, Err(StoreError::Transport("offline".into())));
    assert!(status.is_none());
    assert!(!c.is_saving());
    assert_eq!(c.status().map(|s| (s.kind, s.text.as_str())), Some((StatusKind::Error, SAVE_FAILED)));
}

#[test]
fn stale_clear_does_not_remove_newer_status() {
    let mut c = open("doc-1");
    let first = c.begin_save().expect("save");
    let old = c.finish_save(first.generation, Ok(())).expect("ticket");
    let second = c.begin_save().expect("save");
    c.finish_save(second.generation, Err(StoreError::Transport("x".into())));
    c.clear_status(old);
    assert_eq!(c.status().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn begin_save_clears_previous_status() {
    let mut c = open("doc-1");
    let first = c.begin_save().expect("save");
    c.finish_save(first.generation, Err(StoreError::Transport("x".into())));
    c.begin_save().expect("save");
    assert!(c.status().is_none());
}

#[test]
fn save_completion_from_old_session_is_ignored() {
    let mut c = open("doc-1");
    let ticket = c.begin_save().expect("save");
    c.navigate(DocumentId::new("doc-2"));
    assert!(c.finish_save(ticket.generation, Ok(())).is_none());
    assert!(c.status().is_none());
}

// =============================================================
// Load
// =============================================================

#[test]
fn load_replaces_surface_contents() {
    let mut source = open("doc-1");
    source.add_rectangle();
    source.add_text();
    let blob = source.begin_save().expect("save").payload;

    let mut c = open("doc-1");
    let ticket = c.begin_load().expect("load starts");
    assert!(c.is_loading());
    c.finish_load(ticket.generation, Ok(Some(blob)));
    assert!(!c.is_loading());
    assert_eq!(c.surface().len(), 2);
    assert!(c.status().is_none());
}

#[test]
fn load_of_empty_row_leaves_blank_surface() {
    let mut c = open("doc-1");
    let ticket = c.begin_load().expect("load");
    c.finish_load(ticket.generation, Ok(None));
    assert!(!c.is_loading());
    assert!(c.surface().is_empty());
    assert!(c.status().is_none());
}

#[test]
fn load_failure_reports_and_stays_usable() {
    let mut c = open("doc-1");
    let ticket = c.begin_load().expect("load");
    c.finish_load(ticket.generation, Err(StoreError::Missing(DocumentId::new("doc-1"))));
    assert!(!c.is_loading());
    assert_eq!(c.status().map(|s| s.text.as_str()), Some(LOAD_FAILED));
    c.add_rectangle();
    assert_eq!(c.surface().len(), 1);
}

#[test]
fn malformed_blob_reports_error() {
    let mut c = open("doc-1");
    let ticket = c.begin_load().expect("load");
    c.finish_load(ticket.generation, Ok(Some(serde_json::json!({ "version": 99 }))));
    assert_eq!(c.status().map(|s| s.kind), Some(StatusKind::Error));
    assert!(c.surface().is_empty());
}

#[test]
fn load_completion_from_old_session_is_ignored() {
    let mut source = open("x");
    source.add_rectangle();
    let blob = source.begin_save().expect("save").payload;

    let mut c = open("doc-1");
    let ticket = c.begin_load().expect("load");
    c.navigate(DocumentId::new("doc-2"));
    c.begin_load().expect("load");
    c.finish_load(ticket.generation, Ok(Some(blob)));
    assert!(c.surface().is_empty());
    assert!(c.is_loading());
}

#[test]
fn begin_load_requires_document() {
    let mut c = EditorController::new();
    assert!(c.begin_load().is_none());
}

// =============================================================
// Handles
// =============================================================

#[test]
fn shared_handle_runs_closure() {
    let handle = Rc::new(RefCell::new(open("doc-1")));
    let id = handle.with_controller(EditorController::add_rectangle);
    assert!(id.is_some());
    assert_eq!(handle.borrow().surface().len(), 1);
}

#[test]
fn shared_handle_returns_none_while_borrowed() {
    let handle = Rc::new(RefCell::new(open("doc-1")));
    let _guard = handle.borrow();
    assert!(handle.with_controller(|c| c.generation()).is_none());
}

#[test]
fn pointer_down_is_ignored_while_loading() {
    let mut c = open("a");
    c.add_rectangle();
    c.on_pointer_down(Point::new(900.0, 900.0));
    assert!(!c.has_selection());
    c.begin_load().expect("document open");

    c.on_pointer_down(Point::new(120.0, 120.0));

    assert!(!c.has_selection());
    let generation = c.generation();
    c.finish_load(generation, Ok(None));
    c.on_pointer_down(Point::new(120.0, 120.0));
    assert!(c.has_selection());
}
