//! User interface components and views.
//!
//! This module contains all TUI rendering logic: the search field with its
//! suggestion panel, the result list, the pager and the preview popup.

mod components;
pub mod theme;
mod views;

pub use components::{
    AutocompleteAction, NotificationManager, PageAction, PageInput, TagAutocomplete,
};
pub use views::{PreviewAction, PreviewView, ResultsAction, ResultsView};
