//! Scripted collaborator projects for deterministic testing.

use async_trait::async_trait;
use serde_json::Value;
use sk_core::logging::ProjectLogger;
use sk_core::project::{
    ActionFuture, ActionRegistry, Project, ProjectArgs, ProjectConfig, ProjectFactory,
};
use sk_protocol::stage_models::{Stage, StageSet};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A project whose operations only flip stage flags, optionally after a
/// delay, and fail when told to.
pub struct ScriptedProject {
    pub name: String,
    pub stages: StageSet,
    pub fail_on: HashSet<String>,
    pub delay: Duration,
    /// `Project` accessor (`"name"` or `"state"`) that panics when called.
    pub panics_in: Option<&'static str>,
    /// Names of invoked actions, shared with the factory for inspection.
    pub invocations: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProject {
    async fn perform(&mut self, action: &str, reaches: Option<Stage>) -> anyhow::Result<()> {
        self.invocations.lock().unwrap().push(action.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail_on.contains(action) {
            anyhow::bail!("{action} failed as scripted");
        }

        if let Some(stage) = reaches {
            self.stages.set(stage, true);
        }
        Ok(())
    }
}

fn generate(project: &mut ScriptedProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.perform("generate", Some(Stage::Generated)))
}

fn init_toolchain(project: &mut ScriptedProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.perform("init_toolchain", Some(Stage::ToolchainReady)))
}

fn patch(project: &mut ScriptedProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.perform("patch", Some(Stage::Patched)))
}

fn build(project: &mut ScriptedProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.perform("build", Some(Stage::Built)))
}

fn clean(project: &mut ScriptedProject, _args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(project.perform("clean", None))
}

/// Sleeps for `args[0]` milliseconds.
fn sleep(project: &mut ScriptedProject, args: Vec<Value>) -> ActionFuture<'_> {
    Box::pin(async move {
        let millis = args[0]
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("sleep takes a millisecond count"))?;
        tokio::time::sleep(Duration::from_millis(millis)).await;
        project.perform("sleep", None).await
    })
}

impl Project for ScriptedProject {
    fn name(&self) -> String {
        if self.panics_in == Some("name") {
            panic!("name lookup blew up");
        }
        self.name.clone()
    }

    fn state(&self) -> StageSet {
        if self.panics_in == Some("state") {
            panic!("stage scan blew up");
        }
        self.stages.clone()
    }

    fn actions() -> ActionRegistry<Self> {
        ActionRegistry::new()
            .register("generate", 0, generate)
            .register("init_toolchain", 0, init_toolchain)
            .register("patch", 0, patch)
            .register("build", 0, build)
            .register("clean", 0, clean)
            .register("sleep", 1, sleep)
    }

    fn config(&self) -> ProjectConfig {
        let mut project = BTreeMap::new();
        project.insert("name".to_string(), self.name.clone());
        let mut config = ProjectConfig::new();
        config.insert("project".to_string(), project);
        config
    }
}

/// Builds [`ScriptedProject`]s. Configure with the `with_*`/`failing_*`
/// builders before handing it to a handle.
#[derive(Default)]
pub struct ScriptedFactory {
    fail_on: HashSet<String>,
    action_delay: Duration,
    construct_delay: Duration,
    construct_error: Option<String>,
    initial_stages: Vec<Stage>,
    panics_in: Option<&'static str>,
    invocations: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedFactory {
    /// Every action succeeds immediately.
    pub fn succeeding() -> Self {
        Self {
            initial_stages: vec![Stage::Empty, Stage::Initialized],
            ..Self::default()
        }
    }

    /// Construction always fails with the given message.
    pub fn failing_construction(message: &str) -> Self {
        Self {
            construct_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, action: &str) -> Self {
        self.fail_on.insert(action.to_string());
        self
    }

    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    pub fn with_construct_delay(mut self, delay: Duration) -> Self {
        self.construct_delay = delay;
        self
    }

    /// Built projects panic whenever `accessor` (`"name"` or `"state"`) is called.
    pub fn panicking_in(mut self, accessor: &'static str) -> Self {
        self.panics_in = Some(accessor);
        self
    }

    /// Names of every action invoked on projects built by this factory.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectFactory for ScriptedFactory {
    type Project = ScriptedProject;

    async fn construct(
        &self,
        args: ProjectArgs,
        logger: ProjectLogger,
    ) -> anyhow::Result<ScriptedProject> {
        logger.info("constructing project");

        if !self.construct_delay.is_zero() {
            tokio::time::sleep(self.construct_delay).await;
        }

        if let Some(message) = &self.construct_error {
            anyhow::bail!("{message}");
        }

        let path = args
            .first()
            .ok_or_else(|| anyhow::anyhow!("no project path given"))?;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();

        Ok(ScriptedProject {
            name,
            stages: StageSet::from_reached(self.initial_stages.iter().copied()),
            fail_on: self.fail_on.clone(),
            delay: self.action_delay,
            panics_in: self.panics_in,
            invocations: Arc::clone(&self.invocations),
        })
    }
}
