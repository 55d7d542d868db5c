//! Basic menu demo.
//!
//! A home page with a header, a sub-menu button, a digit-only entry field,
//! the live auto-print rate and an exit button.
//!
//! Run with: cargo run --example basic_menu
//! Logs go to `boxterm-demo.log`; set `RUST_LOG=boxterm=debug` for more.

use std::sync::{Arc, Mutex};

use boxterm::config::ToolkitConfig;
use boxterm::layout::HorizontalContainer;
use boxterm::logging::init_file_logging;
use boxterm::widget::{
    BoxWidget, EntryTextBox, ExitButton, LiveTextBox, MenuButton, ScrollingTextBox, TextBox,
};
use boxterm::{Console, CrosstermTerminal, Distribution, Menu, MenuManager, Result};

const ABOUT: &str = "boxterm lays widgets out in nested boxes. Containers split their \
interior between children along one axis and spread the leftover space as gaps. \
Scroll this text with the mouse wheel.\n\nClick Back to return.";

fn about_page(manager: &Arc<MenuManager>) -> Menu {
    let about = Menu::new(manager);
    let mut text = ScrollingTextBox::new(40, 6, ABOUT);
    text.set_border_size(1);
    about.insert(text);
    about.insert(ExitButton::new(8, 3, "Back"));
    about
}

fn home_page(manager: &Arc<MenuManager>, last_number: Arc<Mutex<String>>) -> Menu {
    let home = Menu::new(manager);

    let mut header = TextBox::new(30, 3, "boxterm demo");
    header.set_border_size(1);
    home.insert(header);

    let about = about_page(manager);
    let mut about_button = MenuButton::new(12, 3, "About").with_menu(&about);
    about_button.set_border_size(1);

    let mut entry = EntryTextBox::new(16, 3, "type digits");
    entry.set_border_size(1);
    entry.set_input_filter(|c| c.is_ascii_digit());
    entry.set_auto_menu_refresh(true);
    entry.set_process_handler(move |input| {
        tracing::info!(%input, "number entered");
        *last_number.lock().unwrap_or_else(|e| e.into_inner()) = input.clone();
    });

    let mut row = HorizontalContainer::new(40, 3);
    row.set_distribution(Distribution::SpacedToEdge);
    row.insert(about_button);
    row.insert(entry);
    home.insert(row);

    let mut fps = LiveTextBox::new(8, 1).with_binding(manager.live_frame_rate_binding());
    fps.set_transparent(true);
    home.insert(fps);

    let mut quit = ExitButton::new(8, 3, "Quit");
    quit.set_border_size(1);
    home.insert(quit);
    home
}

fn main() -> Result<()> {
    init_file_logging("boxterm-demo.log")?;
    let config = ToolkitConfig::load("boxterm.toml")?;

    let console = Console::with_config(Box::new(CrosstermTerminal::open()?), &config);
    let manager = MenuManager::new(console, &config);

    let last_number = Arc::new(Mutex::new(String::new()));
    let home = home_page(&manager, Arc::clone(&last_number));
    home.enter();

    let number = last_number.lock().unwrap_or_else(|e| e.into_inner());
    if !number.is_empty() {
        println!("last number entered: {}", number);
    }
    Ok(())
}
