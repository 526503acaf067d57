//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` consumed
//! by the pointer tool and the shortcut map. Coordinates are canvas pixels.

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64 },

    /// Pointer moved, pressed or not.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// Key press, as `KeyboardEvent.key` plus modifiers.
    Key {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    /// A key with no modifiers held.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}

/// Cursor hint for the canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over an overlay, or while a placement follows the pointer.
    Move,
}

impl Cursor {
    /// CSS `cursor` property value.
    pub fn css_name(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_only_for_pointer_events() {
        assert_eq!(
            InputEvent::from_pointer_down(1.0, 2.0).position(),
            Some((1.0, 2.0))
        );
        assert_eq!(
            InputEvent::from_pointer_up(-3.5, 4.0).position(),
            Some((-3.5, 4.0))
        );
        assert_eq!(InputEvent::key("Delete").position(), None);
    }

    #[test]
    fn cursor_css_names() {
        assert_eq!(Cursor::Move.css_name(), "move");
        assert_eq!(Cursor::default().css_name(), "default");
    }
}
