pub mod list_picker;
pub mod menu;
pub mod progress_bar;
pub mod quiz_view;
pub mod results;
pub mod status;
