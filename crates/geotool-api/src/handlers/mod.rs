mod captures;
mod health;
mod layers;
mod offline;
mod tool;
mod track;

pub use captures::{capture_stats, clear_captures, delete_capture, export_captures, get_capture, list_captures};
pub use health::health_check;
pub use layers::{delete_layer, get_layer, layer_bounds, list_layers, set_layer_visibility, upload_layer};
pub use offline::{offline_status, proxy, push_notification, same_origin, trigger_sync};
pub use tool::{capture_state, deselect_tool, handle_click, select_tool};
pub use track::{get_track, record_position};
