use crate::config::Settings;

const LABEL_LIMIT: usize = 40;
const EMPTY_LABEL: &str = "(empty)";

/// Toolkit-free projection of (history, settings) into the tray menu.
///
/// The tray layer realizes this wholesale after every change; there is no
/// incremental diffing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuLayout {
    /// Most-recent entries shown at the top level, newest first.
    pub visible: Vec<String>,
    /// Older entries shown under "More…"; entries beyond the overflow
    /// cutoff are not shown at all.
    pub overflow: Vec<String>,
    pub capture: bool,
}

pub fn build_layout(history: &[String], settings: &Settings, capture: bool) -> MenuLayout {
    let newest_first: Vec<String> = history.iter().rev().cloned().collect();
    let (visible, overflow) = if newest_first.len() > settings.limit {
        let cutoff = newest_first.len().min(settings.max);
        let visible = newest_first[..settings.limit.min(cutoff)].to_vec();
        let overflow = newest_first[settings.limit.min(cutoff)..cutoff].to_vec();
        (visible, overflow)
    } else {
        (newest_first, Vec::new())
    };
    MenuLayout {
        visible,
        overflow,
        capture,
    }
}

/// Menu label for an entry: its first line, truncated to 40 characters with
/// an ellipsis when longer. Empty entries never reach the history under the
/// append rules, but render as a placeholder if one ever does.
pub fn label(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.is_empty() {
        return EMPTY_LABEL.to_owned();
    }
    if first_line.chars().count() > LABEL_LIMIT {
        let mut truncated: String = first_line.chars().take(LABEL_LIMIT - 1).collect();
        truncated.push('…');
        truncated
    } else {
        first_line.to_owned()
    }
}

pub fn capture_toggle_label(capture: bool) -> &'static str {
    if capture {
        "Disable capture"
    } else {
        "Enable capture"
    }
}
