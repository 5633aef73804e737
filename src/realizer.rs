use crate::{
    behavior::{
        kind::ChannelKind,
        model::{CompositionMode, Instruction, RequestId},
        raw::RawRequest,
    },
    config::RealizerOpts,
    foundation::{arena::Arena, error::RejectReason, issue::ScheduleIssue, time::SimClock},
    normalize::request::normalize_request,
    schedule::{
        channels::{ChannelHandler, ChannelTable},
        dispatch::dispatch_due,
        pending::{PendingEntry, PendingStack},
        project::{check_invariants, project_request},
    },
};

/// Outcome of an accepted submission.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReport {
    /// Identifier assigned to the request.
    pub request: RequestId,
    /// Composition mode it was resolved with.
    pub composition: CompositionMode,
    /// Absolute start.
    pub start_global: f64,
    /// Absolute end.
    pub end_global: f64,
    /// Instructions that made it into a channel queue.
    pub projected: usize,
    /// Requests cancelled by a `Replace`.
    pub cancelled: Vec<RequestId>,
    /// Non-fatal problems met while normalizing and projecting.
    pub issues: Vec<ScheduleIssue>,
}

/// The behavior scheduling engine.
///
/// A host registers one handler per channel, submits requests as behavior events arrive and
/// calls [`Realizer::advance`] once per frame with its own clock. Every mutation happens inside
/// those calls; handlers run synchronously from `advance` and must not call back into the engine.
pub struct Realizer {
    opts: RealizerOpts,
    channels: ChannelTable,
    arena: Arena<Instruction>,
    pending: PendingStack,
    next_id: u64,
    last_now: Option<f64>,
    dispatched: u64,
}

impl Default for Realizer {
    fn default() -> Self {
        Self::new(RealizerOpts::default())
    }
}

impl std::fmt::Debug for Realizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Realizer")
            .field("channels", &self.channels.kinds().collect::<Vec<_>>())
            .field("pending", &self.pending.len())
            .field("queued", &self.arena.len())
            .field("last_now", &self.last_now)
            .finish()
    }
}

impl Realizer {
    /// Engine with no channels registered.
    pub fn new(opts: RealizerOpts) -> Self {
        Self {
            opts,
            channels: ChannelTable::default(),
            arena: Arena::new(),
            pending: PendingStack::new(),
            next_id: 0,
            last_now: None,
            dispatched: 0,
        }
    }

    /// Engine options.
    pub fn opts(&self) -> &RealizerOpts {
        &self.opts
    }

    /// Wire `handler` to `kind`.
    ///
    /// Channels are dispatched in the order they were first registered. Registering a kind again
    /// swaps its handler and keeps its queue and position.
    pub fn register_channel<H>(&mut self, kind: ChannelKind, handler: H)
    where
        H: ChannelHandler + 'static,
    {
        tracing::debug!(%kind, "register channel");
        self.channels.register(kind, Box::new(handler));
    }

    /// Kinds with a registered handler, in dispatch order.
    pub fn registered(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.channels.kinds()
    }

    /// Return `true` when `kind` has a handler.
    pub fn is_registered(&self, kind: ChannelKind) -> bool {
        self.channels.is_registered(kind)
    }

    /// Normalize, compose and project `raw` at time `now`.
    ///
    /// The only rejection is a request without content; every other problem is reported in the
    /// returned [`SubmitReport`] and costs at most the affected instruction.
    #[tracing::instrument(skip(self, raw), fields(composition = ?raw.composition))]
    pub fn submit_request(
        &mut self,
        raw: &RawRequest,
        now: f64,
    ) -> Result<SubmitReport, RejectReason> {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let mut issues = Vec::new();
        let mut request = normalize_request(raw, id, &self.opts, &mut issues)?;
        let (start_global, end_global) = self.pending.resolve(&request, now);
        request.start_global = start_global;
        request.end_global = end_global;

        let composition = request.composition;
        let cancelled = if composition == CompositionMode::Replace {
            self.cancel_inactive(now)
        } else {
            Vec::new()
        };

        let handles = project_request(request, &mut self.channels, &mut self.arena, &mut issues);
        if self.opts.check_invariants {
            check_invariants(&self.channels, &mut issues);
        }
        let projected = handles.len();
        self.pending.insert(
            PendingEntry {
                id,
                composition,
                start_global,
                end_global,
                active: false,
                handles,
            },
            now,
        );

        tracing::debug!(
            request = %id,
            start_global,
            end_global,
            projected,
            cancelled = cancelled.len(),
            issues = issues.len(),
            "request accepted"
        );
        Ok(SubmitReport {
            request: id,
            composition,
            start_global,
            end_global,
            projected,
            cancelled,
            issues,
        })
    }

    fn cancel_inactive(&mut self, now: f64) -> Vec<RequestId> {
        let cancelled = self.pending.cancel_inactive(now);
        if cancelled.is_empty() {
            return Vec::new();
        }
        for entry in &cancelled {
            for &h in &entry.handles {
                self.arena.remove(h);
            }
            tracing::debug!(request = %entry.id, "cancelled by replace");
        }
        for queue in self.channels.queues_mut() {
            queue.retain_live(&self.arena);
        }
        cancelled.into_iter().map(|e| e.id).collect()
    }

    /// Tick the engine to `now` and return the number of instructions dispatched.
    ///
    /// Pending requests that have started are marked active and those that have ended are
    /// forgotten; then every channel fires its due instructions. A `now` earlier than the previous
    /// tick is ignored.
    pub fn advance(&mut self, now: f64) -> usize {
        if !now.is_finite() {
            tracing::warn!(now, "ignoring non-finite tick");
            return 0;
        }
        if let Some(last) = self.last_now
            && now < last
        {
            tracing::warn!(now, last, "ignoring non-monotonic tick");
            return 0;
        }
        self.last_now = Some(now);

        let expired = self.pending.tick(now);
        if expired > 0 {
            tracing::debug!(expired, now, "pending requests finished");
        }
        let fired = dispatch_due(&mut self.channels, &mut self.arena, now);
        self.dispatched += fired as u64;
        fired
    }

    /// Step `clock` by `dt` and [`advance`](Self::advance) to its new time.
    pub fn update(&mut self, clock: &mut SimClock, dt: f64) -> usize {
        let now = clock.tick(dt);
        self.advance(now)
    }

    /// Drop every pending request and queued instruction.
    ///
    /// Registered handlers stay wired and request ids keep counting up. The monotonic-time guard
    /// is reset, so the host may restart its clock.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.arena.clear();
        for queue in self.channels.queues_mut() {
            queue.clear();
        }
        self.last_now = None;
        tracing::debug!("reset");
    }

    /// Accepted requests that have not finished yet.
    pub fn pending(&self) -> &[PendingEntry] {
        self.pending.entries()
    }

    /// Number of instructions queued on `kind`.
    pub fn queue_len(&self, kind: ChannelKind) -> usize {
        self.channels.queue(kind).map_or(0, |q| q.len())
    }

    /// Global windows queued on `kind`, in dispatch order.
    pub fn queued(&self, kind: ChannelKind) -> Vec<(f64, f64)> {
        self.channels
            .queue(kind)
            .map(|q| q.iter().map(|e| (e.start_global, e.end_global)).collect())
            .unwrap_or_default()
    }

    /// Queued instruction on `kind` at `index`, in dispatch order.
    pub fn queued_instruction(&self, kind: ChannelKind, index: usize) -> Option<&Instruction> {
        let entry = self.channels.queue(kind)?.iter().nth(index)?;
        self.arena.get(entry.handle)
    }

    /// Return `true` when nothing is pending or queued.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.arena.is_empty()
    }

    /// Earliest queued start over all channels.
    pub fn next_wake(&self) -> Option<f64> {
        self.channels
            .queues()
            .filter_map(|q| q.next_start())
            .reduce(f64::min)
    }

    /// Time of the last accepted tick.
    pub fn now(&self) -> Option<f64> {
        self.last_now
    }

    /// Instructions dispatched over the engine's lifetime.
    pub fn dispatched_total(&self) -> u64 {
        self.dispatched
    }
}

#[cfg(test)]
#[path = "../tests/unit/realizer.rs"]
mod tests;
