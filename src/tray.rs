use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use arboard::Clipboard;
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::Icon;

use crate::menu::{self, MenuLayout};

const PLACEHOLDER_ICON_SIZE: u32 = 64;

/// What selecting a menu item does.
pub enum MenuAction {
    /// Copy the entry's full original text back to the clipboard.
    Copy(String),
    ToggleCapture,
    OpenConfig,
    Quit,
}

/// A realized tray menu plus the id table the event loop dispatches on.
pub struct TrayMenu {
    pub menu: Menu,
    pub actions: HashMap<MenuId, MenuAction>,
}

/// Realize a [`MenuLayout`] into toolkit menu items. The application
/// submenu is always present so the process stays quittable even when the
/// history fits under the display limit.
pub fn realize(layout: &MenuLayout) -> Result<TrayMenu> {
    let menu = Menu::new();
    let mut actions = HashMap::new();

    for entry in &layout.visible {
        let item = MenuItem::new(menu::label(entry), true, None);
        actions.insert(item.id().clone(), MenuAction::Copy(entry.clone()));
        menu.append(&item).context("Could not append history entry to menu.")?;
    }

    if !layout.overflow.is_empty() {
        let submenu = Submenu::new("More…", true);
        for entry in &layout.overflow {
            let item = MenuItem::new(menu::label(entry), true, None);
            actions.insert(item.id().clone(), MenuAction::Copy(entry.clone()));
            submenu
                .append(&item)
                .context("Could not append history entry to overflow submenu.")?;
        }
        menu.append(&submenu).context("Could not append overflow submenu.")?;
    }

    menu.append(&PredefinedMenuItem::separator())
        .context("Could not append separator.")?;

    let application = Submenu::new("Application", true);
    let toggle = MenuItem::new(menu::capture_toggle_label(layout.capture), true, None);
    let configure = MenuItem::new("Configure", true, None);
    let quit = MenuItem::new("Quit", true, None);
    actions.insert(toggle.id().clone(), MenuAction::ToggleCapture);
    actions.insert(configure.id().clone(), MenuAction::OpenConfig);
    actions.insert(quit.id().clone(), MenuAction::Quit);
    for item in [&toggle, &configure, &quit] {
        application
            .append(item)
            .context("Could not append application menu item.")?;
    }
    menu.append(&application)
        .context("Could not append application submenu.")?;

    Ok(TrayMenu { menu, actions })
}

/// Load the user's icon, substituting a fully transparent placeholder when
/// the file is absent or unreadable.
pub fn load_icon(path: &Path) -> Result<Icon> {
    match read_icon(path) {
        Ok(icon) => Ok(icon),
        Err(icon_error) => {
            tracing::warn!(
                "Could not load icon from {}: {icon_error}. Using a transparent placeholder.",
                path.display()
            );
            placeholder_icon()
        }
    }
}

fn placeholder_icon() -> Result<Icon> {
    let side = PLACEHOLDER_ICON_SIZE;
    let transparent = vec![0u8; (side * side * 4) as usize];
    Icon::from_rgba(transparent, side, side).context("Could not build the placeholder icon.")
}

fn read_icon(path: &Path) -> Result<Icon> {
    let image = image::open(path)
        .with_context(|| format!("Could not open image at {}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height)
        .context("Could not build a tray icon from the image data.")
}

pub fn copy_to_clipboard(value: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Could not initialize clipboard backend.")?;
    clipboard
        .set_text(value)
        .context("Could not set clipboard value.")?;
    tracing::info!("Successfully set value to clipboard.");
    Ok(())
}

/// Open the config file in the system's default handler for it.
pub fn open_config(path: &Path) -> Result<()> {
    editor_command(path)
        .spawn()
        .with_context(|| format!("Could not open {} in an editor.", path.display()))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-t").arg(path);
    command
}

#[cfg(target_os = "windows")]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_icon_file_falls_back_to_placeholder() {
        let dir = TempDir::new().unwrap();
        assert!(load_icon(&dir.path().join("no-such-icon.png")).is_ok());
    }

    #[test]
    fn unreadable_icon_file_falls_back_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, "definitely not a png").unwrap();
        assert!(load_icon(&path).is_ok());
    }
}
