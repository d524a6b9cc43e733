//! Fire-and-forget analytics for map interactions

pub mod events;
pub mod sink;
pub mod tracker;

pub use events::{EventType, InteractionEvent};
pub use sink::{AnalyticsSink, ChannelSink, LogSink, MemorySink, NoopSink};
pub use tracker::InteractionTracker;
