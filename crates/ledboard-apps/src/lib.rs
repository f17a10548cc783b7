//! Built-in apps shipped with the board.

pub mod clock;
pub mod status;
pub mod tally;
pub mod test_pattern;

mod text;

use ledboard_core::registry::{AppCatalog, AppDefinition};

pub use clock::ClockApp;
pub use status::StatusApp;
pub use tally::TallyApp;
pub use test_pattern::TestPatternApp;

/// Registers every built-in app, in default rotation order.
pub fn register_builtin(catalog: &mut AppCatalog) {
    catalog.register(AppDefinition::new("Clock", "clock", true, || {
        Box::new(ClockApp::new())
    }));
    catalog.register(AppDefinition::new("Status", "status", true, || {
        Box::new(StatusApp::new())
    }));
    catalog.register(AppDefinition::new("Test Pattern", "test_pattern", true, || {
        Box::new(TestPatternApp::new())
    }));
    catalog.register(AppDefinition::new("Tally", "tally", true, || {
        Box::new(TallyApp::new())
    }));
}
