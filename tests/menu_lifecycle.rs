//! Menu lifecycle tests: scripted input driven through whole menus.
//!
//! Every test uses a `MemoryTerminal`; scripted terminals close their input
//! once the script is consumed, so `Menu::enter` always returns.
//!
//! Run with: cargo test --test menu_lifecycle

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use boxterm::config::ToolkitConfig;
use boxterm::input::KeyEvent;
use boxterm::widget::{Button, EntryTextBox, ExitButton, LiveTextBox, MenuButton, TextBox};
use boxterm::{
    Alignment, AutoPrintState, Console, Distribution, InputEvent, MemoryTerminal, Menu, MenuManager, MouseEvent,
    Position, Reply,
};

// =============================================================================
// HELPERS
// =============================================================================

fn manager_for(terminal: &MemoryTerminal, auto_print: bool) -> Arc<MenuManager> {
    let console = Console::new(Box::new(terminal.clone()));
    let mut config = ToolkitConfig::default();
    config.menu.use_auto_print = auto_print;
    MenuManager::new(console, &config)
}

/// Menu whose children pack into the top-left corner.
fn corner_menu(manager: &Arc<MenuManager>) -> Menu {
    let menu = Menu::new(manager);
    menu.set_alignment(Alignment::LEFT | Alignment::TOP);
    menu.with_container(|root| root.set_distribution(Distribution::None));
    menu
}

fn click(col: i32, row: i32) -> InputEvent {
    MouseEvent::click(Position::new(col, row)).into()
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

// =============================================================================
// ENTER / EXIT
// =============================================================================

#[test]
fn test_exit_button_returns_exit_reply_and_restores_console() {
    let terminal = MemoryTerminal::scripted(20, 5, vec![click(1, 0)]);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);
    menu.insert(ExitButton::new(4, 1, "Quit"));
    menu.set_exit_reply(Reply::Exit);

    assert_eq!(menu.enter(), Reply::Exit);
    assert!(terminal.row(0).starts_with("Quit"));
    assert!(terminal.flush_count() > 0);
    assert!(!terminal.is_entered());
    assert_eq!(manager.stack_depth(), 0);
    assert_eq!(manager.auto_print_state(), AutoPrintState::Inactive);
}

#[test]
fn test_console_is_entered_while_menu_runs() {
    let terminal = MemoryTerminal::scripted(10, 3, vec![click(0, 2)]);
    let manager = manager_for(&terminal, false);
    let menu = Menu::new(&manager);

    let seen = Arc::new(AtomicUsize::new(0));
    let screen = terminal.clone();
    let flag = Arc::clone(&seen);
    menu.add_input_hook(move |_| {
        if screen.is_entered() {
            flag.fetch_add(1, Ordering::SeqCst);
        }
    });

    menu.enter();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert!(!terminal.is_entered());
}

#[test]
fn test_menu_can_be_entered_again() {
    let terminal = MemoryTerminal::new(12, 2);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);
    menu.insert(ExitButton::new(4, 1, "Done"));

    terminal.push_event(MouseEvent::click(Position::new(0, 0)));
    menu.enter();
    assert!(!menu.is_entered());

    terminal.push_event(MouseEvent::click(Position::new(0, 0)));
    menu.enter();
    assert_eq!(terminal.pending_events(), 0);
}

// =============================================================================
// DISPATCH
// =============================================================================

#[test]
fn test_refresh_reply_repaints() {
    let counter = Arc::new(AtomicI32::new(0));
    let terminal = MemoryTerminal::scripted(10, 2, vec![click(0, 0), click(0, 0)]);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);

    let bump = Arc::clone(&counter);
    menu.insert(Button::new(3, 1, "inc").with_action(move |_| {
        bump.fetch_add(1, Ordering::SeqCst);
        Reply::Refresh
    }));
    menu.insert(LiveTextBox::new(4, 1).with_binding(Arc::clone(&counter)));

    menu.enter();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert!(terminal.row(1).starts_with('2'), "{:?}", terminal.row(1));
}

#[test]
fn test_hook_sees_events_newest_first_and_can_veto() {
    let terminal = MemoryTerminal::scripted(10, 2, vec![click(0, 0)]);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);

    let order = Arc::new(Mutex::new(Vec::new()));
    let pressed = Arc::new(AtomicUsize::new(0));
    let hit = Arc::clone(&pressed);
    menu.insert(Button::new(4, 1, "btn").with_action(move |_| {
        hit.fetch_add(1, Ordering::SeqCst);
        Reply::Continue
    }));

    let log = Arc::clone(&order);
    menu.add_input_hook(move |_| log.lock().unwrap().push("old"));
    let log = Arc::clone(&order);
    menu.add_input_hook(move |event| {
        log.lock().unwrap().push("new");
        event.invalidate();
    });

    menu.enter();
    assert_eq!(*order.lock().unwrap(), vec!["new"]);
    assert_eq!(pressed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_keys_without_focus_do_not_reach_widgets() {
    let events = vec![KeyEvent::press('x').into(), KeyEvent::press('\r').into()];
    let terminal = MemoryTerminal::scripted(10, 2, events);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);
    let layer = menu.insert(EntryTextBox::new(6, 1, "name"));

    menu.enter();
    menu.with_container(|root| match root.get_mut(layer).and_then(|w| w.as_entry_mut()) {
        Some(entry) => assert_eq!(entry.input(), ""),
        None => panic!("entry box missing"),
    });
}

#[test]
fn test_entry_focus_then_click_outside_cancels() {
    let events = vec![
        click(0, 0),
        KeyEvent::press('h').into(),
        KeyEvent::press('i').into(),
        click(9, 1),
        KeyEvent::press('z').into(),
    ];
    let terminal = MemoryTerminal::scripted(10, 2, events);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);

    let cancelled = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&cancelled);
    let mut entry = EntryTextBox::new(6, 1, "name");
    entry.set_cancel_handler(move |input| *sink.lock().unwrap() = Some(input.clone()));
    let layer = menu.insert(entry);

    menu.enter();
    assert_eq!(cancelled.lock().unwrap().as_deref(), Some("hi"));
    menu.with_container(|root| {
        let entry = root.get_mut(layer).and_then(|w| w.as_entry_mut()).expect("entry box");
        assert!(!entry.is_interacting());
        assert_eq!(entry.input(), "hi");
    });
}

#[test]
fn test_entry_focus_with_auto_refresh_paints_input() {
    let events = vec![click(0, 0), KeyEvent::press('4').into(), KeyEvent::press('2').into()];
    let terminal = MemoryTerminal::scripted(10, 2, events);
    let manager = manager_for(&terminal, false);
    let menu = corner_menu(&manager);

    let mut entry = EntryTextBox::new(6, 1, "num");
    entry.set_auto_menu_refresh(true);
    menu.insert(entry);

    menu.enter();
    assert!(terminal.row(0).starts_with("42"), "{:?}", terminal.row(0));
}

// =============================================================================
// SUB-MENUS
// =============================================================================

#[test]
fn test_menu_button_runs_sub_menu() {
    let terminal = MemoryTerminal::scripted(12, 3, vec![click(0, 0), click(0, 0)]);
    let manager = manager_for(&terminal, false);

    let depth_inside = Arc::new(AtomicUsize::new(0));
    let sub = corner_menu(&manager);
    sub.insert(ExitButton::new(4, 1, "Back"));
    sub.set_exit_reply(Reply::Refresh);
    let watched = Arc::clone(&manager);
    let depth = Arc::clone(&depth_inside);
    sub.add_input_hook(move |_| depth.store(watched.stack_depth(), Ordering::SeqCst));

    let main = corner_menu(&manager);
    main.insert(MenuButton::new(4, 1, "Open").with_menu(&sub));

    main.enter();
    assert_eq!(depth_inside.load(Ordering::SeqCst), 2);
    assert_eq!(manager.stack_depth(), 0);
    // The sub-menu's Refresh reply repainted the main menu.
    assert!(terminal.row(0).starts_with("Open"));
}

#[test]
fn test_menu_button_back_to_menu_already_on_stack() {
    let events = vec![
        click(0, 0), // home -> settings
        click(0, 0), // settings -> home, entered a second time
        click(0, 1), // inner home quits
        click(0, 1), // settings quits
        click(8, 2), // outer home still running
    ];
    let terminal = MemoryTerminal::scripted(10, 3, events);
    let manager = manager_for(&terminal, false);
    let home = corner_menu(&manager);
    let settings = corner_menu(&manager);

    home.insert(MenuButton::new(4, 1, "toB").with_menu(&settings));
    home.insert(ExitButton::new(4, 1, "quit"));
    settings.insert(MenuButton::new(4, 1, "toA").with_menu(&home));
    settings.insert(ExitButton::new(4, 1, "back"));

    let depths = Arc::new(Mutex::new(Vec::new()));
    let watched = Arc::clone(&manager);
    let sink = Arc::clone(&depths);
    home.add_input_hook(move |_| sink.lock().unwrap().push(watched.stack_depth()));

    let (tx, rx) = mpsc::channel();
    let runner = home.clone();
    thread::spawn(move || {
        let _ = tx.send(runner.enter());
    });

    let reply = rx.recv_timeout(Duration::from_secs(5));
    assert_eq!(reply, Ok(Reply::Continue));
    assert_eq!(*depths.lock().unwrap(), vec![1, 3, 1]);
    assert_eq!(manager.stack_depth(), 0);
    assert!(!home.is_entered());
}

// =============================================================================
// AUTO-PRINT
// =============================================================================

#[test]
fn test_auto_print_state_follows_top_menu() {
    let terminal = MemoryTerminal::scripted(10, 2, vec![click(0, 1)]);
    let manager = manager_for(&terminal, true);
    let menu = Menu::new(&manager);

    let state = Arc::new(Mutex::new(None));
    let watched = Arc::clone(&manager);
    let sink = Arc::clone(&state);
    menu.add_input_hook(move |_| *sink.lock().unwrap() = Some(watched.auto_print_state()));

    menu.enter();
    assert_eq!(*state.lock().unwrap(), Some(AutoPrintState::Active));
    assert_eq!(manager.auto_print_state(), AutoPrintState::Inactive);
    assert_eq!(manager.live_frame_rate(), -1);
}

#[test]
fn test_auto_print_paused_when_menu_opts_out() {
    let terminal = MemoryTerminal::scripted(10, 2, vec![click(0, 1)]);
    let manager = manager_for(&terminal, false);
    let menu = Menu::new(&manager);

    let state = Arc::new(Mutex::new(None));
    let watched = Arc::clone(&manager);
    let sink = Arc::clone(&state);
    menu.add_input_hook(move |_| *sink.lock().unwrap() = Some(watched.auto_print_state()));

    menu.enter();
    assert_eq!(*state.lock().unwrap(), Some(AutoPrintState::Paused));
}

#[test]
fn test_auto_print_paints_without_print_on_enter() {
    let terminal = MemoryTerminal::new(16, 2);
    let manager = manager_for(&terminal, true);
    let menu = corner_menu(&manager);
    let mut options = menu.options();
    options.print_on_enter = false;
    options.frame_rate = 100;
    menu.set_options(options);
    menu.insert(TextBox::new(8, 1, "painted"));

    let runner = menu.clone();
    let handle = thread::spawn(move || runner.enter());

    let screen = terminal.clone();
    let painted = wait_for(|| screen.row(0).starts_with("painted"));
    terminal.close_input();
    assert_eq!(handle.join().expect("menu thread"), Reply::Continue);
    assert!(painted, "auto-print never painted: {:?}", terminal.row(0));
}

#[test]
fn test_frame_rate_change_wakes_sleeping_thread() {
    let terminal = MemoryTerminal::new(16, 2);
    let manager = manager_for(&terminal, true);
    let menu = corner_menu(&manager);
    let mut options = menu.options();
    options.frame_rate = 1;
    options.use_buffering = false;
    menu.set_options(options);
    menu.insert(TextBox::new(6, 1, "frames"));

    let runner = menu.clone();
    let handle = thread::spawn(move || runner.enter());
    assert!(wait_for(|| manager.auto_print_state() == AutoPrintState::Active));
    // The thread is now asleep until a full second has passed.
    thread::sleep(Duration::from_millis(150));

    options.frame_rate = 100;
    menu.set_options(options);
    let before = terminal.flush_count();
    thread::sleep(Duration::from_millis(400));
    let painted = terminal.flush_count() - before;

    terminal.close_input();
    assert_eq!(handle.join().expect("menu thread"), Reply::Continue);
    assert!(painted >= 10, "only {painted} flushes after speeding up");
}

#[test]
fn test_live_frame_rate_reported_while_active() {
    let terminal = MemoryTerminal::new(8, 1);
    let manager = manager_for(&terminal, true);
    let menu = corner_menu(&manager);
    let mut options = menu.options();
    options.frame_rate = 50;
    menu.set_options(options);
    menu.insert(TextBox::new(4, 1, "tick"));
    assert_eq!(manager.live_frame_rate(), -1);

    let runner = menu.clone();
    let handle = thread::spawn(move || runner.enter());
    let reported = wait_for(|| manager.live_frame_rate() > 0);

    terminal.close_input();
    handle.join().expect("menu thread");
    assert!(reported, "live frame rate stayed at {}", manager.live_frame_rate());
    assert_eq!(manager.live_frame_rate(), -1);
}

#[test]
fn test_sub_menu_without_auto_print_pauses_then_parent_resumes() {
    let events = vec![
        click(0, 0), // parent -> sub-menu
        click(0, 0), // sub-menu exits
        click(8, 2), // parent again
    ];
    let terminal = MemoryTerminal::scripted(10, 3, events);
    let manager = manager_for(&terminal, true);

    let sub = corner_menu(&manager);
    let mut options = sub.options();
    options.use_auto_print = false;
    sub.set_options(options);
    sub.insert(ExitButton::new(4, 1, "back"));

    let parent = corner_menu(&manager);
    parent.insert(MenuButton::new(4, 1, "open").with_menu(&sub));

    let states = Arc::new(Mutex::new(Vec::new()));
    for menu in [&parent, &sub] {
        let watched = Arc::clone(&manager);
        let sink = Arc::clone(&states);
        menu.add_input_hook(move |_| sink.lock().unwrap().push(watched.auto_print_state()));
    }

    parent.enter();
    assert_eq!(
        *states.lock().unwrap(),
        vec![AutoPrintState::Active, AutoPrintState::Paused, AutoPrintState::Active]
    );
    assert_eq!(manager.auto_print_state(), AutoPrintState::Inactive);
}

#[test]
fn test_default_frame_rate_is_floored() {
    let terminal = MemoryTerminal::new(4, 1);
    let manager = manager_for(&terminal, true);
    manager.set_default_frame_rate(0);
    assert_eq!(manager.default_frame_rate(), manager.minimum_frame_rate());
    manager.set_default_frame_rate(60);
    assert_eq!(manager.default_frame_rate(), 60);
}
