//! Keyboard polling (macroquad)

use macroquad::prelude::{is_key_down, KeyCode};

use super::Button;

/// Keys for each button; any of them holds the button down
const BINDINGS: [(Button, &[KeyCode]); 8] = [
    (Button::A, &[KeyCode::J, KeyCode::Z]),
    (Button::B, &[KeyCode::K, KeyCode::X]),
    (Button::Menu, &[KeyCode::Escape, KeyCode::Tab]),
    (Button::Home, &[KeyCode::Home, KeyCode::H]),
    (Button::Up, &[KeyCode::Up, KeyCode::W]),
    (Button::Down, &[KeyCode::Down, KeyCode::S]),
    (Button::Left, &[KeyCode::Left, KeyCode::A]),
    (Button::Right, &[KeyCode::Right, KeyCode::D]),
];

/// Mask of the buttons currently held on the keyboard
pub fn button_mask() -> u8 {
    BINDINGS
        .iter()
        .filter(|(_, keys)| keys.iter().any(|&key| is_key_down(key)))
        .fold(0, |mask, (button, _)| mask | button.mask())
}
