//! Application views (screens).

mod preview;
mod results;

pub use preview::{PreviewAction, PreviewView};
pub use results::{ResultsAction, ResultsView};
