//! Speech input: the capability a recognizer must provide, and the session
//! that feeds its finalized transcripts into the pipeline

use crate::{PipelineError, TranscriptQueue};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

/// A piece of recognized speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSegment {
    /// Recognized text
    pub text: String,
    /// Whether the recognizer has committed to this text
    pub is_final: bool,
}

impl SpeechSegment {
    /// A committed segment
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    /// A provisional segment
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// What a recognizer can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// New results for the ongoing utterance
    Result(Vec<SpeechSegment>),
    /// The recognizer failed with an error code
    Error(String),
    /// The recognizer stopped on its own
    End,
}

/// A speech recognizer
///
/// Only [`SpeechSource::next_event`] is required. `None` means the source is
/// gone for good. `start` and `stop` default to no-ops for sources that
/// cannot be controlled.
pub trait SpeechSource {
    /// Wait for the next event
    fn next_event(&mut self) -> impl Future<Output = Option<SpeechEvent>> + Send;

    /// Begin (or resume) recognition
    fn start(&mut self) {}

    /// Stop recognition
    fn stop(&mut self) {}
}

/// Microphone indicator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MicStatus {
    /// Not listening
    Idle,
    /// Listening for speech
    Listening,
    /// The recognizer reported an error
    Error(String),
}

impl fmt::Display for MicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MicStatus::Idle => f.write_str("Mic idle"),
            MicStatus::Listening => f.write_str("Listening..."),
            MicStatus::Error(code) => write!(f, "Mic error: {}", code),
        }
    }
}

/// Drives a [`SpeechSource`] and enqueues finalized transcripts
///
/// While listening, a source that ends on its own is restarted, emulating
/// continuous recognition. Errors are surfaced on the mic status and do not
/// end the session.
pub struct ListeningSession<S> {
    source: Option<S>,
    queue: TranscriptQueue,
    listening: bool,
    status: MicStatus,
    display: String,
}

impl<S: SpeechSource> ListeningSession<S> {
    /// Create a session; `None` means speech recognition is unsupported
    pub fn new(source: Option<S>, queue: TranscriptQueue) -> Self {
        Self {
            source,
            queue,
            listening: false,
            status: MicStatus::Idle,
            display: String::new(),
        }
    }

    /// Whether a recognizer is attached
    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    /// Whether the session wants to keep listening
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Mic indicator state
    pub fn status(&self) -> &MicStatus {
        &self.status
    }

    /// Latest transcript text: finals, then interims on the next line
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Start listening; returns false if no recognizer is attached
    pub fn start(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        self.listening = true;
        source.start();
        self.status = MicStatus::Listening;
        info!("Listening started");
        true
    }

    /// Stop listening; the next `End` will not restart the source
    pub fn stop(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        self.listening = false;
        source.stop();
        info!("Listening stopped");
        true
    }

    /// Handle one event from the source
    ///
    /// Returns false once the source is exhausted (or absent).
    pub async fn step(&mut self) -> Result<bool, PipelineError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        let Some(event) = source.next_event().await else {
            return Ok(false);
        };
        self.handle(event)?;
        Ok(true)
    }

    /// Handle events until the source is exhausted
    pub async fn run(&mut self) -> Result<(), PipelineError> {
        while self.step().await? {}
        Ok(())
    }

    /// Apply one event
    pub fn handle(&mut self, event: SpeechEvent) -> Result<(), PipelineError> {
        match event {
            SpeechEvent::Result(segments) => {
                let mut finalized = String::new();
                let mut interim = String::new();
                for segment in &segments {
                    if segment.is_final {
                        finalized.push_str(&segment.text);
                    } else {
                        interim.push_str(&segment.text);
                    }
                }

                self.display = format!("{}\n{}", finalized, interim).trim().to_string();
                if self.queue.submit(&finalized)? {
                    debug!("Queued finalized transcript ({} chars)", finalized.trim().len());
                }
            }
            SpeechEvent::Error(code) => {
                warn!("Speech recognizer error: {}", code);
                self.status = MicStatus::Error(code);
            }
            SpeechEvent::End => {
                if self.listening {
                    debug!("Recognizer ended while listening, restarting");
                    if let Some(source) = self.source.as_mut() {
                        source.start();
                    }
                } else {
                    self.status = MicStatus::Idle;
                }
            }
        }
        Ok(())
    }
}

/// Deterministic speech source for testing
///
/// Replays a fixed list of events and counts start / stop calls.
///
/// # Examples
///
/// ```
/// use quorum_pipeline::{ScriptedSource, SpeechEvent, SpeechSegment};
///
/// let source = ScriptedSource::new(vec![
///     SpeechEvent::Result(vec![SpeechSegment::final_text("We will ship.")]),
///     SpeechEvent::End,
/// ]);
/// assert_eq!(source.remaining(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    events: VecDeque<SpeechEvent>,
    starts: usize,
    stops: usize,
}

impl ScriptedSource {
    /// Create a source that will replay `events` in order
    pub fn new(events: Vec<SpeechEvent>) -> Self {
        Self {
            events: events.into(),
            starts: 0,
            stops: 0,
        }
    }

    /// Times `start` was called
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Times `stop` was called
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Events not yet delivered
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl SpeechSource for ScriptedSource {
    async fn next_event(&mut self) -> Option<SpeechEvent> {
        self.events.pop_front()
    }

    fn start(&mut self) {
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}
