pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod layouts;
pub mod loaders;
pub mod math;
pub mod picking;
pub mod render;
pub mod scene;
pub mod types;
pub mod viewport;

pub use camera::{CameraPose, CameraState, OrbitCamera, OrbitConfig, Projection};
pub use config::{ConfigError, ViewportConfig};
pub use layouts::{get_template, registered_ids, TemplateId, UnknownTemplateError};
pub use picking::{pick, PickResult};
pub use render::{HeadlessBackend, RenderBackend, RenderError};
pub use scene::{build, DomainKind, DomainTag, SceneGraph};
pub use types::{AgentRecord, AgentStatus, IconKind, OfficeTemplate, Partner};
pub use viewport::{ViewportError, ViewportHost};
