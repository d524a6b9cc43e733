pub mod debounce;
pub mod events;

// Re-export the essential types
pub use debounce::{BreakpointWatcher, ResizeDebouncer};
pub use events::InputEvent;
