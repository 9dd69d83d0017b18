// Crate root library declaration and module exports.
pub mod corpus;
pub mod cycle;
pub mod music;
pub mod psalter;
pub mod rules;
pub mod schedule;
pub mod scripture;

pub use music::{MusicPlan, MusicSlot};
pub use psalter::{PsalmReference, PsalmSelection, PsalmVerse};
pub use rules::{Season, SeasonalRules};
pub use schedule::ScheduleEntry;
pub use scripture::{Reading, VerseSegment};
