pub mod context;

pub use context::{RenderContext, RenderEnvironment};
