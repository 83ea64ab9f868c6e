//! Shared test helpers: a scripted process spawner for orchestration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::downloader::PlaylistDownloader;
use crate::error::Result;
use crate::process::{ProcessEvent, ProcessHandle, ProcessSpawner};

/// Script function: maps an invocation's arguments to its replayed events.
type Script = Box<dyn Fn(&[String]) -> Vec<ProcessEvent> + Send + Sync>;

/// [`ProcessSpawner`] that replays scripted output instead of launching
/// anything, recording every invocation for assertions.
pub(crate) struct ScriptedSpawner {
    script: Script,
    invocations: Mutex<Vec<Vec<String>>>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl ScriptedSpawner {
    pub(crate) fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&[String]) -> Vec<ProcessEvent> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            invocations: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        })
    }

    /// Every argument list this spawner has seen, in spawn order.
    pub(crate) fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// Whether the nth spawned process was asked to terminate.
    pub(crate) fn terminated(&self, index: usize) -> bool {
        self.tokens.lock().unwrap()[index].is_cancelled()
    }
}

#[async_trait]
impl ProcessSpawner for ScriptedSpawner {
    async fn spawn(&self, args: &[String]) -> Result<ProcessHandle> {
        self.invocations.lock().unwrap().push(args.to_vec());
        let (handle, token) = ProcessHandle::scripted((self.script)(args));
        self.tokens.lock().unwrap().push(token);
        Ok(handle)
    }
}

/// Downloader wired to a scripted spawner and a default config.
pub(crate) fn scripted_downloader(
    spawner: &Arc<ScriptedSpawner>,
) -> PlaylistDownloader {
    PlaylistDownloader::with_spawner(spawner.clone(), Config::default())
}

/// Convenience: a probe reply followed by a clean exit.
pub(crate) fn probe_reply(count: &str) -> Vec<ProcessEvent> {
    vec![
        ProcessEvent::Stdout(format!("{count}\n").into_bytes()),
        ProcessEvent::Exited(Some(1)),
    ]
}

/// Whether an argument list is the count probe (`-O` template output).
pub(crate) fn is_probe(args: &[String]) -> bool {
    args.iter().any(|a| a == "-O")
}

/// Whether an argument list is a details chunk (`--dump-json`).
pub(crate) fn is_dump(args: &[String]) -> bool {
    args.iter().any(|a| a == "--dump-json")
}

/// Extract the `--playlist-start`/`--playlist-end` pair from an argument
/// list.
pub(crate) fn playlist_range(args: &[String]) -> (String, String) {
    let value_after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
            .unwrap_or_default()
    };
    (value_after("--playlist-start"), value_after("--playlist-end"))
}
