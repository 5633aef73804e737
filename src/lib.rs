//! Gesto is a behavior scheduling engine for virtual characters.
//!
//! Hosts submit BML-like behavior requests (gaze, head, face, gesture, speech, ...) with symbolic
//! timing and a composition mode. Gesto turns them into per-channel, time-ordered instruction
//! queues and hands each instruction to the channel's renderer exactly once, when its time comes.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: `RawRequest -> Request` (default timing filled in, payloads typed)
//! 2. **Compose**: place the request against pending work (`Merge`, `Append`, `Replace`,
//!    `Overwrite`)
//! 3. **Project**: each instruction gets an absolute window and a slot in its channel queue
//! 4. **Dispatch**: [`Realizer::advance`] fires due instructions into registered handlers
//!
//! Channel renderers turn a dispatched instruction into motion with a [`PhaseEnvelope`];
//! [`BlinkChannel`] is a complete example.
//!
//! The engine holds no clock: `now` is always passed in by the host, and nothing happens outside
//! `submit_request` and `advance`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod behavior;
mod channels;
mod config;
mod foundation;
mod normalize;
mod realizer;
mod schedule;
mod script;

pub use animation::ease::{Ease, raised_cosine};
pub use animation::envelope::{EnvelopeTiming, Phase, PhaseEnvelope};
pub use animation::value::{Lerp, Quat, Vec3};
pub use behavior::dsl::{
    InstructionBuilder, RequestBuilder, blink, face, gaze, gesture, head, speech,
};
pub use behavior::kind::ChannelKind;
pub use behavior::model::{
    Anchors, CompositionMode, Instruction, Request, RequestId, SyncPoints, resolve_reference,
};
pub use behavior::payload::{
    AnimationPayload, BlinkPayload, DirectionPayload, EmotionPayload, FacePayload, FacsPayload,
    GesturePayload, Hand, HeadPayload, LexemeAmount, Lexemes, Payload, PointingPayload,
    PosturePayload, SpeechPayload, ValenceArousalPayload,
};
pub use behavior::raw::{RawInstruction, RawRequest, RawTiming};
pub use behavior::timing::{TimingDefaults, TimingTable};
pub use channels::blink::{AutoBlink, AutoBlinkToken, BlinkChannel};
pub use config::RealizerOpts;
pub use foundation::arena::{Arena, Handle};
pub use foundation::error::{GestoError, GestoResult, RejectReason};
pub use foundation::issue::ScheduleIssue;
pub use foundation::time::{SimClock, TIME_EPSILON, TickRate};
pub use normalize::instruction::normalize_instruction;
pub use normalize::request::normalize_request;
pub use realizer::{Realizer, SubmitReport};
pub use schedule::channels::{ChannelHandler, Shared};
pub use schedule::pending::PendingEntry;
pub use schedule::queue::{ChannelQueue, QueueEntry};
pub use script::{Script, ScriptEvent};
