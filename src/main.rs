mod app;
mod config;
mod history;
mod menu;
mod poller;
mod tray;
mod watcher;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::menu::{MenuEvent, MenuId};
use tray_icon::{TrayIcon, TrayIconBuilder};

use app::App;
use config::ConfigStore;
use history::History;
use tray::MenuAction;

const CONFIG_FILE: &str = ".cliptray.yaml";
const HISTORY_FILE: &str = ".cliptray-history.yaml";
const ICON_FILE: &str = ".cliptray.png";
const TOOLTIP: &str = "Clipboard history";

#[derive(Debug)]
enum UserEvent {
    Menu(MenuEvent),
    Rebuild,
}

fn main() -> Result<()> {
    // Init logging
    tracing_subscriber::fmt::init();

    let home = dirs::home_dir().context("Could not determine the home directory.")?;
    let config = ConfigStore::new(home.join(CONFIG_FILE));
    config.ensure_exists()?;
    let history_path = home.join(HISTORY_FILE);
    History::ensure_exists(&history_path)?;

    let app = Arc::new(App::new(config, history_path));
    let icon = tray::load_icon(&home.join(ICON_FILE))?;

    let mut event_loop_builder = EventLoopBuilder::<UserEvent>::with_user_event();
    #[cfg(target_os = "macos")]
    {
        // Tray-only utility: keep it out of the dock.
        use tao::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
        event_loop_builder.with_activation_policy(ActivationPolicy::Prohibited);
    }
    let event_loop = event_loop_builder.build();

    let menu_proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = menu_proxy.send_event(UserEvent::Menu(event));
    }));

    let poll_proxy = event_loop.create_proxy();
    poller::spawn(Arc::clone(&app), move || {
        let _ = poll_proxy.send_event(UserEvent::Rebuild);
    });

    let watch_proxy = event_loop.create_proxy();
    watcher::spawn(Arc::clone(&app), move || {
        let _ = watch_proxy.send_event(UserEvent::Rebuild);
    });

    let mut tray_icon: Option<TrayIcon> = None;
    let mut actions: HashMap<MenuId, MenuAction> = HashMap::new();

    tracing::info!("Starting tray event loop ...");
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            // The tray icon has to be created from inside the running loop.
            Event::NewEvents(StartCause::Init) => match tray::realize(&app.layout()) {
                Ok(tray_menu) => {
                    match TrayIconBuilder::new()
                        .with_menu(Box::new(tray_menu.menu))
                        .with_icon(icon.clone())
                        .with_tooltip(TOOLTIP)
                        .build()
                    {
                        Ok(built) => {
                            tray_icon = Some(built);
                            actions = tray_menu.actions;
                        }
                        Err(tray_error) => {
                            tracing::error!("Could not create the tray icon: {tray_error}");
                        }
                    }
                }
                Err(menu_error) => {
                    tracing::error!("Could not build the initial menu: {menu_error}");
                }
            },
            Event::UserEvent(UserEvent::Rebuild) => {
                rebuild_menu(&app, tray_icon.as_ref(), &mut actions);
            }
            Event::UserEvent(UserEvent::Menu(menu_event)) => match actions.get(menu_event.id()) {
                Some(MenuAction::Copy(text)) => {
                    if let Err(copy_error) = tray::copy_to_clipboard(text) {
                        tracing::error!("Could not copy entry to clipboard: {copy_error}");
                    }
                }
                Some(MenuAction::ToggleCapture) => {
                    match app.toggle_capture() {
                        Ok(enabled) => tracing::info!("Capture is now {}.", on_off(enabled)),
                        Err(toggle_error) => {
                            tracing::error!("Could not persist capture flag: {toggle_error}");
                        }
                    }
                    rebuild_menu(&app, tray_icon.as_ref(), &mut actions);
                }
                Some(MenuAction::OpenConfig) => {
                    if let Err(open_error) = tray::open_config(app.config().path()) {
                        tracing::error!("Could not open the config file: {open_error}");
                    }
                }
                Some(MenuAction::Quit) => {
                    tracing::info!("Quit selected, shutting down ...");
                    app.request_shutdown();
                    tray_icon = None;
                    *control_flow = ControlFlow::Exit;
                }
                None => {}
            },
            _ => {}
        }
    })
}

fn rebuild_menu(app: &App, tray_icon: Option<&TrayIcon>, actions: &mut HashMap<MenuId, MenuAction>) {
    let Some(tray_icon) = tray_icon else {
        return;
    };
    match tray::realize(&app.layout()) {
        Ok(tray_menu) => {
            tray_icon.set_menu(Some(Box::new(tray_menu.menu)));
            *actions = tray_menu.actions;
        }
        Err(menu_error) => {
            tracing::error!("Could not rebuild the tray menu: {menu_error}");
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
