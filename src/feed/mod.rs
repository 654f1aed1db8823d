pub mod client;
pub mod decode;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::action::Action;
use crate::core::notify;
use decode::FeedOutcome;

pub use client::FeedClient;

/// A feed of actions that can be fetched. Seam for tests.
#[async_trait]
pub trait FeedSource {
    async fn fetch(&self) -> FeedOutcome;
}

/// Receives the derived window title after every refresh cycle.
pub trait TitleSink {
    fn apply(&mut self, title: &str);
}

/// State owned by the controller, replaced wholesale each cycle.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub actions: Vec<Action>,
    pub error_messages: Vec<String>,
    pub is_loading: bool,
}

/// Owns the feed state and drives the periodic fetch-and-reconcile cycle.
pub struct FeedController<S, T> {
    source: S,
    title_sink: T,
    pub state: FeedState,
}

impl<S: FeedSource, T: TitleSink> FeedController<S, T> {
    pub fn new(source: S, title_sink: T) -> Self {
        Self {
            source,
            title_sink,
            state: FeedState::default(),
        }
    }

    /// Run one fetch cycle: replace the action and error collections from
    /// the outcome, then emit the derived title.
    pub async fn refresh(&mut self) {
        self.state.is_loading = true;
        let outcome = self.source.fetch().await;
        self.state.actions = outcome.actions;
        self.state.error_messages = outcome.error_messages;
        self.state.is_loading = false;

        for message in &self.state.error_messages {
            log::error!("{}", message);
        }

        let now = Utc::now();
        let count = notify::notification_count(&self.state.actions, now);
        let title = notify::window_title(count, !self.state.error_messages.is_empty());
        self.title_sink.apply(&title);

        log::info!(
            "Refresh complete: {} actions, {} needing attention, {} errors",
            self.state.actions.len(),
            count,
            self.state.error_messages.len()
        );
    }

    /// Refresh immediately, then keep refreshing every `period` until the
    /// returned future is dropped. Cycles are serialized: at most one fetch
    /// is in flight, and a tick that fires during a slow fetch coalesces
    /// into the next cycle instead of overlapping it.
    pub async fn run(mut self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}
