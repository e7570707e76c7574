pub mod events;

pub use events::{ReactionAdded, SlackEvent, SlashCommand, ViewSubmission};
