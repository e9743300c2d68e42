//! Gamepad polling
//!
//! Native: gilrs, first connected pad only
//! WASM: no gamepad backend, always reports nothing held

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use gilrs::{Button as GilrsButton, Gilrs};

    use super::super::Button;

    const BINDINGS: [(GilrsButton, Button); 8] = [
        (GilrsButton::South, Button::A),
        (GilrsButton::East, Button::B),
        (GilrsButton::Start, Button::Menu),
        (GilrsButton::Mode, Button::Home),
        (GilrsButton::DPadUp, Button::Up),
        (GilrsButton::DPadDown, Button::Down),
        (GilrsButton::DPadLeft, Button::Left),
        (GilrsButton::DPadRight, Button::Right),
    ];

    pub struct Gamepad {
        gilrs: Option<Gilrs>,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(err) => {
                    log::warn!("gamepad backend unavailable: {err}");
                    None
                }
            };
            Self { gilrs }
        }

        pub fn poll(&mut self) {
            let Some(gilrs) = self.gilrs.as_mut() else { return };
            // Drain events so gilrs updates its cached pad state
            while gilrs.next_event().is_some() {}
        }

        pub fn has_gamepad(&self) -> bool {
            self.gilrs.as_ref().is_some_and(|g| g.gamepads().next().is_some())
        }

        pub fn button_mask(&self) -> u8 {
            let Some(gilrs) = self.gilrs.as_ref() else { return 0 };
            let Some((_, pad)) = gilrs.gamepads().next() else { return 0 };
            BINDINGS
                .iter()
                .filter(|(gb, _)| pad.is_pressed(*gb))
                .fold(0, |mask, (_, button)| mask | button.mask())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod platform {
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Gamepad
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn button_mask(&self) -> u8 {
            0
        }
    }
}

pub use platform::Gamepad;

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}
