pub mod altimetry;
pub mod attitude;
pub mod axis;
pub mod controller;
pub mod fleet;
pub mod height;
pub mod pid;

pub use altimetry::{resolve_height, DownRay, HeightMode};
pub use attitude::{AttitudeConfig, AttitudeController, PilotInput, VesselSensors};
pub use axis::{select_control_axis, ControlAxis, VesselFrame};
pub use controller::Controller;
pub use fleet::HoverControlSystem;
pub use height::HeightController;
pub use pid::{Pid, PidConfig, PidGains};
