pub mod input;
pub mod mutation;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use input::{Cursor, InputEvent};
pub use mutation::{SceneMutation, apply_mutation};
pub use session::{EditorSession, LoadOutcome, LoadTarget};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::PointerTool;
