pub mod decision;
pub mod library;
pub mod outcome;
pub mod tags;
pub mod watched;

pub use decision::{Action, Decision};
pub use library::LibraryEntry;
pub use outcome::ActionOutcome;
pub use tags::TagMap;
pub use watched::WatchedItem;
