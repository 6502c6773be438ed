// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use zendev::core::config::parse_environment_config;
use zendev::core::environment::ZenDevEnvironment;
use zendev::infra::command::{CapturedOutput, Executor, Invocation};

pub const ENV_CONFIG: &str = r#"
name = "dev"
root = "/envs/dev"
home = "/home/tester"

[[repositories]]
name = "control-center/serviced"
path = "golang/src/github.com/control-center/serviced"

[[repositories]]
name = "zenpacks/ZenPacks.zenoss.Core"
path = "zenpacks/ZenPacks.zenoss.Core"

[[repositories]]
name = "zenpacks/ZenPacks.zenoss.Impact"
path = "zenpacks/ZenPacks.zenoss.Impact"
products = ["resmgr"]

[[repositories]]
name = "zenoss-prodbin"
path = "zenoss-prodbin"
"#;

/// The environment used by most tests: everything lives below `/envs/dev`.
pub fn sample_environment() -> ZenDevEnvironment {
    let config = parse_environment_config(ENV_CONFIG).expect("sample config parses");
    ZenDevEnvironment::from_config(&config).expect("sample environment builds")
}

/// Records every invocation and answers from a script instead of starting
/// processes.
#[derive(Default)]
pub struct FakeExecutor {
    /// References `docker images -q` reports as present.
    pub existing_images: HashSet<String>,
    /// Exit code of `make devimg`.
    pub build_code: i32,
    /// Exit code of every `docker run`.
    pub run_code: i32,
    /// Exit codes of other make targets, by target name.
    pub make_codes: HashMap<String, i32>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, reference: &str) -> Self {
        self.existing_images.insert(reference.to_string());
        self
    }

    pub fn with_build_code(mut self, code: i32) -> Self {
        self.build_code = code;
        self
    }

    pub fn with_run_code(mut self, code: i32) -> Self {
        self.run_code = code;
        self
    }

    pub fn with_make_code(mut self, target: &str, code: i32) -> Self {
        self.make_codes.insert(target.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations whose program and first argument match.
    pub fn calls_to(&self, program: &str, first_arg: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|inv| inv.program == program && inv.args.first().map(String::as_str) == Some(first_arg))
            .collect()
    }

    fn record(&self, invocation: &Invocation) {
        self.calls.lock().unwrap().push(invocation.clone());
    }
}

impl Executor for FakeExecutor {
    async fn status(&self, invocation: &Invocation) -> Result<i32> {
        self.record(invocation);
        let first = invocation.args.first().map(String::as_str).unwrap_or_default();
        let code = match (invocation.program.as_str(), first) {
            ("make", "devimg") => self.build_code,
            ("make", target) => self.make_codes.get(target).copied().unwrap_or(0),
            ("docker", "run") => self.run_code,
            _ => 0,
        };
        Ok(code)
    }

    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput> {
        self.record(invocation);
        let stdout = match invocation.args.as_slice() {
            [images, q, reference] if images == "images" && q == "-q" => {
                if self.existing_images.contains(reference) {
                    "4f2a9c1e0b7d\n".to_string()
                } else {
                    String::new()
                }
            }
            _ => String::new(),
        };
        Ok(CapturedOutput {
            code: 0,
            stdout,
            stderr: String::new(),
        })
    }
}

/// Owned strings from string literals.
pub fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
