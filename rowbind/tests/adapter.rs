//! Tests for the list adapter against a recording host.

mod common;

use std::sync::{Arc, Mutex};

use common::{Item, RecordingHost, item, items};
use rowbind::actions::{ActionRegistry, BarItem, Callback, ContextMenuItem, MenuEntry};
use rowbind::adapter::ListAdapter;
use rowbind::chrome::BarSide;
use rowbind::config::AdapterConfig;
use rowbind::host::{Animation, HostUpdate, Placement};
use rowbind::mover::MoveState;
use rowbind::row::RowId;

fn adapter(host: RecordingHost) -> ListAdapter<Item, RecordingHost> {
    ListAdapter::with_host(AdapterConfig::default(), host)
}

fn reorderable(host: RecordingHost) -> ListAdapter<Item, RecordingHost> {
    let mut adapter = adapter(host);
    adapter.set_reorder_enabled(true);
    adapter
}

fn ids(adapter: &ListAdapter<Item, RecordingHost>) -> Vec<String> {
    adapter.rows().iter().map(|r| r.id().to_string()).collect()
}

fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Arc<Mutex<Vec<T>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    (Arc::clone(&log), log)
}

// ============================================================================
// Stream emissions
// ============================================================================

#[test]
fn test_first_emission_renders_rows() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(items(&["a", "b", "c"]));

    assert_eq!(host.ids(), vec!["a", "b", "c"]);
    assert!(adapter.title_bar().revealed);
}

#[test]
fn test_identical_emission_is_noop() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(items(&["a", "b"]));
    let applied = host.applied_count();
    adapter.receive(items(&["a", "b"]));

    assert_eq!(host.applied_count(), applied);
}

#[test]
fn test_payload_change_reported_as_update() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(vec![item("x", 1)]);
    adapter.receive(vec![item("x", 2)]);

    let (update, animation) = host.last_applied().unwrap();
    let HostUpdate::Script(script) = update else {
        panic!("expected a script");
    };
    assert_eq!(script.updates(), 1);
    assert_eq!(script.inserts(), 0);
    assert_eq!(script.deletes(), 0);
    assert_eq!(animation, Animation::Animated);
    assert_eq!(host.state.lock().unwrap().rows[0].payload().v, 2);
}

#[test]
fn test_reorder_emission_not_animated() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(items(&["a", "b", "c"]));
    adapter.receive(items(&["c", "a", "b"]));

    let (_, animation) = host.last_applied().unwrap();
    assert_eq!(animation, Animation::None);
    assert_eq!(host.ids(), vec!["c", "a", "b"]);
}

#[test]
fn test_duplicate_ids_keep_last() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(vec![item("a", 1), item("b", 0), item("a", 2)]);

    assert_eq!(ids(&adapter), vec!["b", "a"]);
    assert_eq!(host.ids(), vec!["b", "a"]);
}

#[test]
fn test_duplicate_ids_rejected_when_strict() {
    let host = RecordingHost::new();
    let mut adapter = ListAdapter::with_host(AdapterConfig::new().strict(), host.clone());

    adapter.receive(items(&["a", "b"]));
    adapter.receive(items(&["a", "a"]));

    assert_eq!(ids(&adapter), vec!["a", "b"]);
    assert_eq!(host.ids(), vec!["a", "b"]);
}

#[test]
fn test_attach_late_host_catches_up() {
    let mut adapter: ListAdapter<Item, RecordingHost> = ListAdapter::new(AdapterConfig::new().row_spacing(6.0));
    adapter.receive(items(&["a", "b"]));

    let host = RecordingHost::new();
    adapter.attach_host(host.clone());

    assert_eq!(host.ids(), vec!["a", "b"]);
    assert_eq!(host.state.lock().unwrap().spacing, 6.0);
}

// ============================================================================
// Moves
// ============================================================================

#[test]
fn test_move_first_to_last() {
    let host = RecordingHost::new();
    let mut adapter = reorderable(host.clone());
    let (moves, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().on_move(move |from, to| {
        sink.lock().unwrap().push((from, to));
    }));

    adapter.receive(items(&["a", "b", "c"]));
    assert!(adapter.move_row(0, 2));
    adapter.process_completions();

    assert_eq!(*moves.lock().unwrap(), vec![(0, 2)]);
    assert_eq!(ids(&adapter), vec!["b", "c", "a"]);
    assert_eq!(host.ids(), vec!["b", "c", "a"]);
    let (update, animation) = host.last_applied().unwrap();
    assert_eq!(
        update,
        HostUpdate::Move {
            id: RowId::new("a"),
            placement: Placement::After(RowId::new("c")),
        }
    );
    assert_eq!(animation, Animation::None);
    assert_eq!(*adapter.move_state(), MoveState::Idle);
}

#[test]
fn test_move_to_same_index_reports_once() {
    let host = RecordingHost::new();
    let mut adapter = reorderable(host.clone());
    let (moves, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().on_move(move |from, to| {
        sink.lock().unwrap().push((from, to));
    }));

    adapter.receive(items(&["a", "b"]));
    let applied = host.applied_count();
    assert!(adapter.move_row(1, 1));

    assert_eq!(*moves.lock().unwrap(), vec![(1, 1)]);
    assert_eq!(host.applied_count(), applied);
    assert!(!adapter.is_moving());
}

#[test]
fn test_tap_suppressed_until_move_settles() {
    let host = RecordingHost::holding();
    let mut adapter = reorderable(host.clone());
    let (taps, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().on_tap(move |id: &RowId| {
        sink.lock().unwrap().push(id.clone());
    }));

    adapter.receive(items(&["a", "b", "c"]));
    host.release();
    adapter.process_completions();

    adapter.move_row(0, 2);
    assert!(adapter.is_moving());
    assert!(!adapter.tap(&RowId::new("a")));
    assert!(!adapter.tap(&RowId::new("b")));
    assert!(taps.lock().unwrap().is_empty());

    host.release();
    adapter.process_completions();
    assert!(!adapter.is_moving());
    assert!(adapter.tap(&RowId::new("a")));
    assert_eq!(*taps.lock().unwrap(), vec![RowId::new("a")]);
}

#[test]
fn test_overlapping_move_ignored() {
    let host = RecordingHost::holding();
    let mut adapter = reorderable(host.clone());
    let (moves, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().on_move(move |from, to| {
        sink.lock().unwrap().push((from, to));
    }));

    adapter.receive(items(&["a", "b", "c"]));
    assert!(adapter.move_row(0, 1));
    assert!(!adapter.move_row(2, 0));

    assert_eq!(*moves.lock().unwrap(), vec![(0, 1)]);
    assert_eq!(ids(&adapter), vec!["b", "a", "c"]);
}

#[test]
fn test_detach_mid_move_returns_to_idle() {
    let host = RecordingHost::holding();
    let mut adapter = reorderable(host.clone());

    adapter.receive(items(&["a", "b", "c"]));
    adapter.move_row(2, 0);
    assert!(adapter.is_moving());

    adapter.detach_host();
    assert!(!adapter.is_moving());
    assert_eq!(adapter.pending_completions(), 0);

    // Completions from the detached host are ignored.
    host.release();
    adapter.process_completions();
    assert!(!adapter.is_moving());
}

#[test]
fn test_owner_persisted_move_reemits_without_changes() {
    let host = RecordingHost::new();
    let mut adapter = reorderable(host.clone());
    let (owned, sink) = recorder();
    sink.lock().unwrap().extend(items(&["a", "b", "c"]));
    adapter.set_actions(ActionRegistry::new().on_move(move |from, to| {
        let mut list = sink.lock().unwrap();
        let row = list.remove(from);
        list.insert(to, row);
    }));

    adapter.receive(owned.lock().unwrap().clone());
    adapter.move_row(0, 2);
    adapter.process_completions();
    let applied = host.applied_count();

    adapter.receive(owned.lock().unwrap().clone());
    assert_eq!(host.applied_count(), applied);
    assert_eq!(host.ids(), vec!["b", "c", "a"]);
}

#[test]
fn test_dropped_move_completion_settles() {
    let host = RecordingHost::holding();
    let mut adapter = reorderable(host.clone());

    adapter.receive(items(&["a", "b"]));
    adapter.move_row(0, 1);
    assert!(adapter.is_moving());
    host.forget();
    adapter.process_completions();

    assert!(!adapter.is_moving());
    assert_eq!(adapter.pending_completions(), 0);
    assert!(adapter.move_row(1, 0));
}

#[test]
fn test_dropped_render_completions_do_not_accumulate() {
    let host = RecordingHost::holding();
    let mut adapter = adapter(host.clone());

    for v in 0..100 {
        adapter.receive(vec![item("a", v)]);
        host.forget();
        adapter.process_completions();
    }

    assert_eq!(adapter.pending_completions(), 0);
}

#[test]
fn test_dropped_reload_skips_done_callback() {
    let host = RecordingHost::holding();
    let mut adapter = adapter(host.clone());
    let (done, sink) = recorder::<()>();
    let on_done: Callback = Arc::new(move || sink.lock().unwrap().push(()));
    adapter.set_reload_done(Some(on_done));

    adapter.receive(items(&["a"]));
    adapter.reload(true);
    host.forget();
    adapter.process_completions();

    assert!(done.lock().unwrap().is_empty());
    assert_eq!(adapter.pending_completions(), 0);
}

#[test]
fn test_move_ignored_while_reorder_disabled() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());
    let (moves, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().on_move(move |from, to| {
        sink.lock().unwrap().push((from, to));
    }));

    adapter.receive(items(&["a", "b", "c"]));
    assert!(!adapter.can_move(0));
    assert!(!adapter.move_row(0, 2));

    assert!(moves.lock().unwrap().is_empty());
    assert_eq!(ids(&adapter), vec!["a", "b", "c"]);
    assert_eq!(host.ids(), vec!["a", "b", "c"]);

    adapter.set_reorder_enabled(true);
    assert!(adapter.can_move(0));
    assert!(!adapter.can_move(3));
    assert!(adapter.move_row(0, 2));
    assert_eq!(*moves.lock().unwrap(), vec![(0, 2)]);
}

#[test]
fn test_can_move_false_while_dragging() {
    let host = RecordingHost::holding();
    let mut adapter = reorderable(host.clone());

    adapter.receive(items(&["a", "b"]));
    adapter.move_row(0, 1);

    assert!(!adapter.can_move(0));
    host.release();
    adapter.process_completions();
    assert!(adapter.can_move(0));
}

// ============================================================================
// Taps, edits, deletes
// ============================================================================

#[test]
fn test_tap_refreshes_visible_rows() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());
    adapter.set_actions(ActionRegistry::new().on_tap(|_| {}));

    adapter.receive(items(&["a"]));
    assert!(adapter.tap(&RowId::new("a")));

    assert_eq!(host.refreshes(), 1);
}

#[test]
fn test_swipe_delete_calls_owner_before_host() {
    let host = RecordingHost::new();
    let events = Arc::clone(&host.events);
    let mut adapter = adapter(host.clone());
    adapter.set_actions(ActionRegistry::new().on_delete(move |id| {
        events.lock().unwrap().push(format!("on_delete {id}"));
    }));

    adapter.receive(items(&["r1", "r2", "r3"]));
    host.events.lock().unwrap().clear();

    assert!(adapter.swipe_delete(2));

    assert_eq!(
        *host.events.lock().unwrap(),
        vec!["on_delete r3".to_string(), "host:delete r3".to_string()]
    );
    assert_eq!(ids(&adapter), vec!["r1", "r2"]);
    assert_eq!(host.ids(), vec!["r1", "r2"]);
    assert_eq!(host.last_applied().unwrap().1, Animation::Animated);
}

#[test]
fn test_swipe_delete_without_handler_is_suppressed() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());

    adapter.receive(items(&["a"]));
    assert!(adapter.swipe_actions(0).is_empty());
    assert!(!adapter.swipe_delete(0));
    assert_eq!(ids(&adapter), vec!["a"]);
}

#[test]
fn test_affordances_follow_handlers() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host);
    adapter.receive(items(&["a"]));

    let bare = adapter.affordances(&RowId::new("a"));
    assert!(!bare.edit && !bare.delete && !bare.swipe_delete);

    adapter.set_actions(ActionRegistry::new().on_edit(|_| {}).on_delete(|_| {}));
    adapter.set_reorder_enabled(true);
    let full = adapter.affordances(&RowId::new("a"));
    assert!(full.edit && full.delete && full.swipe_delete && full.movable);
    assert_eq!(adapter.swipe_actions(0).trailing.len(), 1);
}

// ============================================================================
// Context menus
// ============================================================================

#[test]
fn test_menu_item_visibility_per_row() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host);
    adapter.set_actions(ActionRegistry::new().additional_context_menu_items(vec![
        ContextMenuItem::action("Pin", |_| {}).should_appear(|id| id != "locked"),
    ]));
    adapter.receive(items(&["a", "locked"]));

    let menu = adapter.open_context_menu(&RowId::new("a")).unwrap();
    assert!(menu.find("Pin").is_some());

    let menu = adapter.open_context_menu(&RowId::new("locked")).unwrap();
    assert!(menu.find("Pin").is_none());
}

#[test]
fn test_select_menu_items() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host);
    let (calls, sink) = recorder();
    let edits = Arc::clone(&sink);
    let pins = Arc::clone(&sink);
    adapter.set_actions(
        ActionRegistry::new()
            .on_edit(move |id| edits.lock().unwrap().push(format!("edit {id}")))
            .additional_context_menu_items(vec![ContextMenuItem::submenu("More", move |_| {
                let pins = Arc::clone(&pins);
                vec![ContextMenuItem::action("Pin", move |id| {
                    pins.lock().unwrap().push(format!("pin {id}"));
                })]
            })]),
    );
    adapter.receive(items(&["a", "b"]));

    let menu = adapter.open_context_menu(&RowId::new("b")).unwrap();
    let edit = menu.find("Edit").unwrap().id();
    assert!(adapter.select_menu_item(edit));

    let menu = adapter.open_context_menu(&RowId::new("a")).unwrap();
    let Some(MenuEntry::Action { id: pin, .. }) = menu.find("Pin").cloned() else {
        panic!("expected pin action");
    };
    assert!(adapter.select_menu_item(pin));

    // The menu closes after a selection.
    assert!(!adapter.select_menu_item(pin));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["edit b".to_string(), "pin a".to_string()]
    );
}

// ============================================================================
// Reload and chrome
// ============================================================================

#[test]
fn test_reload_pulse_cross_fades_then_calls_done() {
    let host = RecordingHost::holding();
    let mut adapter = adapter(host.clone());
    let (done, sink) = recorder();
    let on_done: Callback = Arc::new(move || sink.lock().unwrap().push(()));
    adapter.set_reload_done(Some(on_done));

    adapter.reload(false);
    assert_eq!(host.applied_count(), 0);

    adapter.reload(true);
    assert_eq!(
        host.last_applied(),
        Some((HostUpdate::Reload, Animation::CrossFade))
    );
    adapter.process_completions();
    assert!(done.lock().unwrap().is_empty());

    host.release();
    adapter.process_completions();
    assert_eq!(done.lock().unwrap().len(), 1);
}

#[test]
fn test_title_bar_and_bar_items() {
    let host = RecordingHost::new();
    let mut adapter = adapter(host.clone());
    let (taps, sink) = recorder();
    adapter.set_actions(ActionRegistry::new().bar_item(
        BarSide::Right,
        BarItem::new("plus", move || sink.lock().unwrap().push("plus")),
    ));
    adapter.show_title_area();
    adapter.set_title("Inbox");

    let bar = host.state.lock().unwrap().title_bar.clone().unwrap();
    assert!(bar.has_title_area);
    assert_eq!(bar.title, "Inbox");
    assert_eq!(bar.icon(BarSide::Right), Some("plus"));
    assert_eq!(bar.icon(BarSide::Left), None);

    assert!(adapter.bar_item_tapped(BarSide::Right));
    assert!(!adapter.bar_item_tapped(BarSide::Left));
    assert_eq!(*taps.lock().unwrap(), vec!["plus"]);
}
