//! Engine start-up: run mode, site gate, reactor install, initial sweep.

use dom::Dom;
use style::StyleResolver;

use crate::classifier::Classifier;
use crate::config::{EngineConfig, RunMode};
use crate::context::DocumentContext;
use crate::error::Result;
use crate::gate::{SiteGate, SiteMode, SiteOverride};
use crate::reactor::{MutationReactor, ReactorStats};
use crate::tags::TagTable;
use crate::walker::SweepStats;

/// Configured engine, ready to be started once per page load.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    gate: SiteGate,
    tags: TagTable,
}

/// What happened when the engine was asked to start on a page.
pub enum Startup {
    Disabled,
    Ignored,
    /// The override hook ran; the general engine did not.
    Special,
    /// `<html>` or `<body>` was missing, so there was nothing to guard.
    NoDocument,
    Running(RunningEngine),
}

impl Startup {
    pub fn into_running(self) -> Option<RunningEngine> {
        match self {
            Startup::Running(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Startup::Disabled => "disabled",
            Startup::Ignored => "ignored",
            Startup::Special => "special",
            Startup::NoDocument => "no-document",
            Startup::Running(_) => "running",
        }
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let gate = SiteGate::from_config(&config.sites)?;
        let tags = TagTable::new(&config.tags);
        Ok(Self { config, gate, tags })
    }

    /// Start on one page. `resolver` carries the page's stylesheets.
    ///
    /// The reactor is subscribed before the sweep begins, so anything the
    /// page inserts while the sweep runs is still queued for it.
    pub fn start(
        &self,
        mode: RunMode,
        host: &str,
        dom: &mut Dom,
        resolver: StyleResolver,
        hook: &dyn SiteOverride,
    ) -> Startup {
        if mode == RunMode::Disabled {
            tracing::info!(host, "engine disabled");
            return Startup::Disabled;
        }
        let site = self.gate.classify(host);
        tracing::info!(host, %site, "site gate");
        let ctx = DocumentContext::capture(dom);
        match site {
            SiteMode::Ignored => return Startup::Ignored,
            SiteMode::Special => {
                hook.apply(host, dom, ctx.as_ref());
                return Startup::Special;
            }
            SiteMode::General => {}
        }
        let Some(ctx) = ctx else {
            tracing::warn!(host, "document has no html/body, engine not started");
            return Startup::NoDocument;
        };

        let classifier = Classifier::new(self.tags.clone(), resolver);
        let reactor =
            MutationReactor::install(dom, classifier, ctx, self.config.reactor.clone());
        let sweep = reactor.walker().sweep(dom);
        Startup::Running(RunningEngine { reactor, sweep })
    }
}

/// A started engine. It stays active for the page's lifetime; the host calls
/// [`RunningEngine::pump`] whenever the page has had a turn.
pub struct RunningEngine {
    reactor: MutationReactor,
    sweep: SweepStats,
}

impl RunningEngine {
    pub fn pump(&mut self, dom: &mut Dom) -> usize {
        self.reactor.pump(dom)
    }

    pub fn sweep_stats(&self) -> SweepStats {
        self.sweep
    }

    pub fn reactor_stats(&self) -> ReactorStats {
        self.reactor.stats()
    }

    pub fn context(&self) -> &DocumentContext {
        self.reactor.context()
    }

    /// Run the full walk again over the current document.
    pub fn resweep(&self, dom: &mut Dom) -> SweepStats {
        self.reactor.walker().sweep(dom)
    }

    /// Teardown for tests and embedders; pages never stop a running engine.
    pub fn shutdown(self, dom: &mut Dom) -> ReactorStats {
        let stats = self.reactor.stats();
        self.reactor.uninstall(dom);
        stats
    }
}
