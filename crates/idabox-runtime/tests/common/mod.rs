//! In-memory stand-in for the `docker` and `xhost` binaries.
//!
//! Answers invocations the way the real CLIs would for the handful of
//! subcommands the engine uses, and records every call.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use idabox_common::config::Config;
use idabox_common::error::{IdaboxError, Result};
use idabox_runtime::engine::{Engine, FlushObserver, RemovalFailure};
use idabox_runtime::host::Host;
use idabox_runtime::process::{CommandRunner, Invocation, Outcome, OutputMode};

#[derive(Debug)]
pub struct FakeState {
    pub image_present: bool,
    pub pull_succeeds: bool,
    pub xhost_succeeds: bool,
    pub xhost_installed: bool,
    pub docker_installed: bool,
    pub run_succeeds: bool,
    pub gui_exit_code: i32,
    pub running: BTreeSet<String>,
    pub stopped: BTreeSet<String>,
    pub failing_removals: BTreeSet<String>,
    pub calls: Vec<(Invocation, OutputMode)>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            image_present: true,
            pull_succeeds: true,
            xhost_succeeds: true,
            xhost_installed: true,
            docker_installed: true,
            run_succeeds: true,
            gui_exit_code: 0,
            running: BTreeSet::new(),
            stopped: BTreeSet::new(),
            failing_removals: BTreeSet::new(),
            calls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocker {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_running(self, names: &[&str]) -> Self {
        self.state()
            .running
            .extend(names.iter().map(ToString::to_string));
        self
    }

    pub fn with_stopped(self, names: &[&str]) -> Self {
        self.state()
            .stopped
            .extend(names.iter().map(ToString::to_string));
        self
    }

    pub fn configure(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state());
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    /// Every recorded call rendered as a command line.
    pub fn commands(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .map(|(inv, _)| inv.to_string())
            .collect()
    }

    /// Recorded docker subcommands (`ps`, `run`, `exec`, ...), in order.
    pub fn subcommands(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter(|(inv, _)| inv.program == "docker")
            .filter_map(|(inv, _)| inv.args.first().cloned())
            .collect()
    }

    /// Whether any call changed runtime state.
    pub fn mutated(&self) -> bool {
        self.subcommands()
            .iter()
            .any(|s| matches!(s.as_str(), "run" | "start" | "rm" | "exec" | "pull"))
    }

    pub fn exists(&self, name: &str) -> bool {
        let state = self.state();
        state.running.contains(name) || state.stopped.contains(name)
    }
}

impl CommandRunner for FakeDocker {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<Outcome> {
        let mut state = self.state();
        state.calls.push((invocation.clone(), mode));
        match invocation.program.as_str() {
            "xhost" if !state.xhost_installed => Err(IdaboxError::ProgramNotFound {
                program: "xhost".into(),
            }),
            "xhost" if state.xhost_succeeds => Ok(Outcome::ok("")),
            "xhost" => Ok(Outcome::failed(1, "unable to open display")),
            "docker" if !state.docker_installed => Err(IdaboxError::ProgramNotFound {
                program: "docker".into(),
            }),
            "docker" => Ok(docker(&mut state, &invocation.args)),
            other => Err(IdaboxError::ProgramNotFound {
                program: other.into(),
            }),
        }
    }
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn docker(state: &mut FakeState, args: &[String]) -> Outcome {
    match args.first().map(String::as_str) {
        Some("image") if state.image_present => Outcome::ok("[{}]"),
        Some("image") => Outcome::failed(1, "Error: No such image"),
        Some("pull") if state.pull_succeeds => {
            state.image_present = true;
            Outcome::ok("")
        }
        Some("pull") => Outcome::failed(1, "pull access denied"),
        Some("ps") => ps(state, args),
        Some("run") => {
            let name = value_after(args, "--name").unwrap_or_default().to_string();
            if !state.run_succeeds || state.running.contains(&name) || state.stopped.contains(&name)
            {
                return Outcome::failed(125, "Conflict. The container name is already in use");
            }
            let _ = state.running.insert(name);
            Outcome::ok("")
        }
        Some("exec") => {
            let name = &args[2];
            if !state.running.contains(name) {
                return Outcome::failed(1, "container is not running");
            }
            if args[1] == "-itd" {
                Outcome::ok("")
            } else {
                Outcome {
                    success: state.gui_exit_code == 0,
                    code: Some(state.gui_exit_code),
                    ..Outcome::default()
                }
            }
        }
        Some("start") => {
            let name = &args[1];
            if state.stopped.remove(name) {
                let _ = state.running.insert(name.clone());
                Outcome::ok(name.clone())
            } else if state.running.contains(name) {
                Outcome::ok(name.clone())
            } else {
                Outcome::failed(1, "No such container")
            }
        }
        Some("rm") => {
            let name = &args[2];
            if state.failing_removals.contains(name) {
                return Outcome::failed(1, "removal of container is already in progress");
            }
            if state.running.remove(name) || state.stopped.remove(name) {
                Outcome::ok(name.clone())
            } else {
                Outcome::failed(1, "No such container")
            }
        }
        _ => Outcome::failed(1, "unknown command"),
    }
}

fn ps(state: &FakeState, args: &[String]) -> Outcome {
    let all = args.iter().any(|a| a == "-a");
    let filter = value_after(args, "--filter").unwrap_or_default();
    let mut names: Vec<&String> = state.running.iter().collect();
    if all {
        names.extend(state.stopped.iter());
    }
    if let Some(needle) = filter.strip_prefix("name=") {
        names.retain(|n| n.contains(needle));
    }
    if value_after(args, "--format").is_some() {
        Outcome::ok(names.iter().map(|n| format!("{n}\n")).collect::<String>())
    } else {
        let mut table = String::from("CONTAINER ID   IMAGE     NAMES\n");
        for (i, n) in names.iter().enumerate() {
            table.push_str(&format!("{i:012x}   ida       {n}\n"));
        }
        Outcome::ok(table)
    }
}

pub fn host() -> Host {
    Host {
        display: Some(":0".into()),
        is_root: true,
        workdir: Some(PathBuf::from("/work/samples")),
    }
}

pub fn config() -> Config {
    Config::default().with_image("ida:test")
}

pub fn engine(docker: &FakeDocker) -> Engine {
    Engine::with_runner(config(), host(), Box::new(docker.clone()))
}

pub fn engine_with_host(docker: &FakeDocker, host: Host) -> Engine {
    Engine::with_runner(config(), host, Box::new(docker.clone()))
}

/// Flush observer with a scripted answer that records what it was told.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Reply to the prompt; `None` means prompting is a test failure.
    pub answer: Option<bool>,
    pub events: Vec<String>,
}

impl Recorder {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Some(answer),
            events: Vec::new(),
        }
    }

    pub fn never_asked() -> Self {
        Self::default()
    }
}

impl FlushObserver for Recorder {
    fn found(&mut self, count: usize) {
        self.events.push(format!("found {count}"));
    }

    fn confirm(&mut self, count: usize) -> Result<bool> {
        self.events.push(format!("confirm {count}"));
        Ok(self.answer.expect("must not prompt"))
    }

    fn removed(&mut self, name: &str) {
        self.events.push(format!("removed {name}"));
    }

    fn failed(&mut self, failure: &RemovalFailure) {
        self.events.push(format!("failed {}", failure.name));
    }
}
