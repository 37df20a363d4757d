//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Modifier for the form shortcuts (save, print, contrast, next, back)
/// - macOS: SUPER (Cmd key), with Ctrl accepted as well
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Whether `modifiers` carry the platform shortcut modifier (or Ctrl).
/// Ctrl+Alt is AltGr on some layouts and stays text input.
pub fn is_shortcut(modifiers: KeyModifiers) -> bool {
    (modifiers.contains(SHORTCUT_MODIFIER) || modifiers.contains(KeyModifiers::CONTROL))
        && !modifiers.contains(KeyModifiers::ALT)
}

/// Whether a character key with `modifiers` should be typed: plain Alt
/// chords are not, AltGr (reported as Ctrl+Alt) is
pub fn is_text_input(modifiers: KeyModifiers) -> bool {
    !modifiers.contains(KeyModifiers::ALT) || modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(target_os = "macos")]
pub const SAVE_SHORTCUT: &str = "Cmd+S";

#[cfg(not(target_os = "macos"))]
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

#[cfg(target_os = "macos")]
pub const PRINT_SHORTCUT: &str = "Cmd+P";

#[cfg(not(target_os = "macos"))]
pub const PRINT_SHORTCUT: &str = "Ctrl+P";

#[cfg(target_os = "macos")]
pub const CONTRAST_SHORTCUT: &str = "Cmd+T";

#[cfg(not(target_os = "macos"))]
pub const CONTRAST_SHORTCUT: &str = "Ctrl+T";

#[cfg(target_os = "macos")]
pub const NEXT_SHORTCUT: &str = "Cmd+N";

#[cfg(not(target_os = "macos"))]
pub const NEXT_SHORTCUT: &str = "Ctrl+N";

#[cfg(target_os = "macos")]
pub const BACK_SHORTCUT: &str = "Cmd+B";

#[cfg(not(target_os = "macos"))]
pub const BACK_SHORTCUT: &str = "Ctrl+B";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_is_always_a_shortcut() {
        assert!(is_shortcut(KeyModifiers::CONTROL));
        assert!(is_shortcut(KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert!(!is_shortcut(KeyModifiers::SHIFT));
        assert!(!is_shortcut(KeyModifiers::NONE));
    }

    #[test]
    fn test_altgr_is_text_not_a_shortcut() {
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        assert!(!is_shortcut(altgr));
        assert!(is_text_input(altgr));
        assert!(is_text_input(KeyModifiers::SHIFT));
        assert!(!is_text_input(KeyModifiers::ALT));
    }
}
