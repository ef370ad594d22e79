use uuid::Uuid;

use crate::config::{Artifact, Config};
use crate::docker::ToolCommand;

/// Fresh container name for one run: the configured prefix plus a v4 UUID.
pub fn container_name(cfg: &Config) -> String {
    format!("{}{}", cfg.container_prefix, Uuid::new_v4())
}

/// `build -t <image> .`, output streamed live.
pub fn build_command(cfg: &Config) -> ToolCommand {
    ToolCommand::new(["build", "-t", cfg.image.as_str(), "."])
}

/// `create --name <container> <image>`. Output is captured so the
/// container id doesn't clutter the console.
pub fn create_command(cfg: &Config, container: &str) -> ToolCommand {
    ToolCommand::new(["create", "--name", container, cfg.image.as_str()]).captured()
}

/// `cp <container>:<source> <dest>`.
pub fn copy_command(container: &str, artifact: &Artifact) -> ToolCommand {
    ToolCommand::new([
        "cp".to_string(),
        format!("{container}:{}", artifact.source),
        artifact.dest.clone(),
    ])
}

/// `rm <container>`, captured and non-fatal.
pub fn remove_command(container: &str) -> ToolCommand {
    ToolCommand::new(["rm", container]).captured().non_fatal()
}
