use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A prebuilt file copied out of the container onto the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Absolute path inside the container.
    pub source: String,
    /// Destination on the host, relative to the working directory.
    pub dest: String,
}

impl Artifact {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container CLI to invoke. Anything with docker-compatible
    /// `build`/`create`/`cp`/`rm` verbs works.
    pub tool: String,
    pub build_file: String,
    pub image: String,
    pub container_prefix: String,
    pub artifacts: Vec<Artifact>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: "docker".to_string(),
            build_file: "Dockerfile".to_string(),
            image: "git-changes-rs-app".to_string(),
            container_prefix: "temp-extractor-".to_string(),
            artifacts: vec![
                Artifact::new(
                    "/usr/local/bin/git-changes-rs-linux",
                    "./git-changes-rs-linux",
                ),
                Artifact::new("/usr/local/bin/git-changes-rs.exe", "./git-changes-rs.exe"),
            ],
        }
    }
}

impl Config {
    /// Reject configurations that could never produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("tool", &self.tool),
            ("build_file", &self.build_file),
            ("image", &self.image),
        ] {
            if value.trim().is_empty() {
                bail!("`{field}` must not be empty");
            }
        }
        if self.artifacts.is_empty() {
            bail!("at least one artifact must be configured");
        }
        for (i, artifact) in self.artifacts.iter().enumerate() {
            if artifact.source.trim().is_empty() || artifact.dest.trim().is_empty() {
                bail!("artifact #{} needs both a source and a dest", i + 1);
            }
            if self.artifacts[..i].iter().any(|a| a.dest == artifact.dest) {
                bail!("artifact dest `{}` is listed twice", artifact.dest);
            }
        }
        Ok(())
    }
}
