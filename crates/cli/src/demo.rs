//! Simulated embedded project used by the CLI.
//!
//! Each action sleeps for a configurable time and marks its stage as
//! reached. Construction only checks that the project directory exists.

use async_trait::async_trait;
use serde_json::Value;
use sk_core::logging::ProjectLogger;
use sk_core::project::{
    ActionFuture, ActionRegistry, Project, ProjectArgs, ProjectConfig, ProjectFactory,
};
use sk_protocol::stage_models::{Stage, StageSet};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

pub struct DemoProject {
    path: PathBuf,
    stages: StageSet,
    fail_on: HashSet<String>,
    step_delay: Duration,
    logger: ProjectLogger,
}

impl DemoProject {
    async fn step(&mut self, action: &str, reaches: Option<Stage>) -> anyhow::Result<()> {
        self.logger.info(format!("{action}: working"));
        tokio::time::sleep(self.step_delay).await;

        if self.fail_on.contains(action) {
            anyhow::bail!("{action} failed");
        }

        if let Some(stage) = reaches {
            self.stages.set(stage, true);
        }
        Ok(())
    }
}

fn generate(project: &mut DemoProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.step("generate", Some(Stage::Generated)))
}

fn init_toolchain(project: &mut DemoProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.step("init_toolchain", Some(Stage::ToolchainReady)))
}

fn patch(project: &mut DemoProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.step("patch", Some(Stage::Patched)))
}

fn build(project: &mut DemoProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.step("build", Some(Stage::Built)))
}

/// Forgets every stage past `INITIALIZED`.
fn clean(project: &mut DemoProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(async move {
        project.step("clean", None).await?;
        project.stages = StageSet::from_reached([Stage::Empty, Stage::Initialized]);
        Ok(())
    })
}

impl Project for DemoProject {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn state(&self) -> StageSet {
        self.stages.clone()
    }

    fn actions() -> ActionRegistry<Self> {
        ActionRegistry::new()
            .register("generate", 0, generate)
            .register("init_toolchain", 0, init_toolchain)
            .register("patch", 0, patch)
            .register("build", 0, build)
            .register("clean", 0, clean)
    }

    fn config(&self) -> ProjectConfig {
        let mut project = BTreeMap::new();
        project.insert("path".to_string(), self.path.display().to_string());
        let mut config = ProjectConfig::new();
        config.insert("project".to_string(), project);
        config
    }
}

/// Builds [`DemoProject`]s rooted at an existing directory.
pub struct DemoFactory {
    pub fail_on: HashSet<String>,
    pub step_delay: Duration,
}

#[async_trait]
impl ProjectFactory for DemoFactory {
    type Project = DemoProject;

    async fn construct(&self, args: ProjectArgs, logger: ProjectLogger) -> anyhow::Result<DemoProject> {
        let path = args
            .first()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("no project path given"))?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", path.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", path.display());
        }

        logger.info(format!("opened {}", path.display()));
        Ok(DemoProject {
            path,
            stages: StageSet::from_reached([Stage::Empty, Stage::Initialized]),
            fail_on: self.fail_on.clone(),
            step_delay: self.step_delay,
            logger,
        })
    }
}
