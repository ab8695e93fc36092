/// Load lifecycle of a paginated collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    /// No request in flight; triggers are armed.
    #[default]
    Idle,
    /// A page request is in flight. Further triggers are suppressed.
    Loading,
    /// The last request failed. Only an explicit [`PaginationCoordinator::retry`]
    /// leaves this state.
    Error,
    /// The data source reported no more pages.
    Complete,
}

/// Configuration for [`PaginationCoordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginationOptions {
    /// Distance from the end of the scrolled content, in scroll units, at
    /// which the next page is requested.
    pub threshold: u64,
    /// Minimum time between two triggers. Keeps a fast fling from firing
    /// a burst of page requests.
    pub min_interval_ms: u64,
    /// Whether the data source starts out with more pages to fetch.
    pub has_more: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            threshold: 400,
            min_interval_ms: 500,
            has_more: true,
        }
    }
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_min_interval_ms(mut self, ms: u64) -> Self {
        self.min_interval_ms = ms;
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }
}

/// Decides when an infinite list should request its next page.
///
/// The coordinator is sans-IO: it never performs a request itself. Trigger
/// methods return `true` when the host should start one, and the host
/// reports the outcome back through [`load_succeeded`](Self::load_succeeded)
/// and [`load_failed`](Self::load_failed).
///
/// Two trigger paths feed the same guards, so a scroll-distance check and
/// an intersection-sentinel can be wired up together without double
/// requests: whichever fires first wins, and the other is suppressed by
/// the [`LoadState::Loading`] state and the minimum interval.
#[derive(Clone, Debug)]
pub struct PaginationCoordinator {
    options: PaginationOptions,
    state: LoadState,
    has_more: bool,
    last_trigger_ms: Option<u64>,
    failed_attempts: u32,
}

impl Default for PaginationCoordinator {
    fn default() -> Self {
        Self::new(PaginationOptions::default())
    }
}

impl PaginationCoordinator {
    pub fn new(options: PaginationOptions) -> Self {
        Self {
            has_more: options.has_more,
            options,
            state: LoadState::Idle,
            last_trigger_ms: None,
            failed_attempts: 0,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn threshold(&self) -> u64 {
        self.options.threshold
    }

    /// Consecutive failures since the last successful load.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Timestamp of the last accepted trigger, if any.
    pub fn last_trigger_ms(&self) -> Option<u64> {
        self.last_trigger_ms
    }

    /// Distance-based trigger. Returns `true` when the remaining content
    /// below the viewport is within the threshold and a load should start.
    pub fn on_scroll(
        &mut self,
        total_size: u64,
        scroll_offset: u64,
        viewport_main: u32,
        now_ms: u64,
    ) -> bool {
        let end = scroll_offset.saturating_add(u64::from(viewport_main));
        let remaining = total_size.saturating_sub(end);
        if remaining > self.options.threshold {
            return false;
        }
        self.try_trigger(now_ms)
    }

    /// Sentinel-based trigger, for hosts that also observe a marker element
    /// near the end of the list. Shares all guards with [`on_scroll`](Self::on_scroll).
    pub fn on_sentinel_visible(&mut self, now_ms: u64) -> bool {
        self.try_trigger(now_ms)
    }

    fn try_trigger(&mut self, now_ms: u64) -> bool {
        if self.state != LoadState::Idle || !self.has_more {
            return false;
        }
        if let Some(last) = self.last_trigger_ms {
            if now_ms.saturating_sub(last) < self.options.min_interval_ms {
                return false;
            }
        }
        self.state = LoadState::Loading;
        self.last_trigger_ms = Some(now_ms);
        wdebug!(now_ms, "page load triggered");
        true
    }

    /// Reports a finished page load. `has_more` comes from the response;
    /// `false` moves the coordinator to [`LoadState::Complete`].
    pub fn load_succeeded(&mut self, has_more: bool) {
        self.failed_attempts = 0;
        self.has_more = has_more;
        self.state = if has_more {
            LoadState::Idle
        } else {
            LoadState::Complete
        };
    }

    /// Reports a failed page load. The coordinator stays in
    /// [`LoadState::Error`] until [`retry`](Self::retry) is called; scroll
    /// and sentinel triggers never retry on their own.
    pub fn load_failed(&mut self) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.state = LoadState::Error;
        wwarn!(attempts = self.failed_attempts, "page load failed");
    }

    /// Explicit retry after a failure. Skips the minimum-interval guard
    /// since it is a deliberate user action. Returns `true` when a load
    /// should start.
    pub fn retry(&mut self, now_ms: u64) -> bool {
        if self.state != LoadState::Error {
            return false;
        }
        self.state = LoadState::Loading;
        self.last_trigger_ms = Some(now_ms);
        true
    }

    /// Overrides the has-more flag outside of a load response.
    ///
    /// Clearing it moves a non-loading coordinator straight to
    /// [`LoadState::Complete`]; setting it re-arms a completed one.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
        if !has_more {
            if self.state != LoadState::Loading {
                self.state = LoadState::Complete;
            }
        } else if self.state == LoadState::Complete {
            self.state = LoadState::Idle;
        }
    }

    /// Returns to the initial state, as if no page had ever been requested.
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.has_more = self.options.has_more;
        self.last_trigger_ms = None;
        self.failed_attempts = 0;
    }
}
