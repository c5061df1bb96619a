//! Reusable UI components.

mod input;
mod notification;
mod page_input;
mod tag_autocomplete;

pub use input::TextInput;
pub use notification::NotificationManager;
pub use page_input::{PageAction, PageInput};
pub use tag_autocomplete::{AutocompleteAction, TagAutocomplete};
