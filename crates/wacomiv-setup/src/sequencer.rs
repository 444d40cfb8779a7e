use std::fmt;
use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use wacomiv_tablet::{Capabilities, EventSink, Model, ResponseKind, Version};

use crate::commands;
use crate::device::{Tablet, Wait};
use crate::error::{Result, SetupError};

/// Default wait for each query response.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// One write (and, for queries, the wait that follows it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    StopStreaming,
    QueryModel,
    QueryConfiguration,
    QueryCoordinates,
    SendModeCommands,
}

impl SetupStep {
    fn for_query(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Model => SetupStep::QueryModel,
            ResponseKind::Configuration => SetupStep::QueryConfiguration,
            ResponseKind::Coordinates => SetupStep::QueryCoordinates,
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetupStep::StopStreaming => "stop streaming",
            SetupStep::QueryModel => "model query",
            SetupStep::QueryConfiguration => "configuration query",
            SetupStep::QueryCoordinates => "coordinates query",
            SetupStep::SendModeCommands => "mode commands",
        })
    }
}

/// Where the sequencer is in bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupPhase {
    Idle,
    StoppingStream,
    AwaitingModel,
    AwaitingConfiguration,
    AwaitingCoordinates,
    SendingModeCommand,
    /// Mode commands sent; packets flow.
    Streaming,
    /// Queries done but streaming was not requested.
    Identified,
    Failed,
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Command written; no response expected.
    Sent,
    /// The expected response arrived.
    Answered,
    /// A response arrived but not the one asked for.
    Unexpected,
    /// Not sent: disabled, or the model already supplied the answer.
    Skipped,
    /// Unanswered; defaults stay in effect.
    Defaulted,
    /// Unanswered, but a partial response was decoded as-is.
    Recovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: SetupStep,
    pub outcome: StepOutcome,
}

/// What bring-up learned about the tablet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub model: Model,
    pub version: Version,
    pub capabilities: Capabilities,
    pub steps: Vec<StepReport>,
    pub streaming: bool,
}

impl SetupReport {
    pub fn outcome_of(&self, step: SetupStep) -> Option<StepOutcome> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.outcome)
    }
}

/// Knobs for [`run_setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupConfig {
    /// Wait per query.
    pub timeout: Duration,
    /// Send the configuration query at all.
    pub query_configuration: bool,
    /// Skip queries whose answer the model profile already provided.
    pub skip_answered_queries: bool,
    /// Send mode commands at the end. Off for a probe.
    pub start_streaming: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_RESPONSE_TIMEOUT,
            query_configuration: true,
            skip_answered_queries: true,
            start_streaming: true,
        }
    }
}

/// Drives the setup handshake over `writer` while responses arrive
/// through the shared [`Tablet`] handle.
pub struct Sequencer<'a, S, W> {
    tablet: &'a Tablet<S>,
    writer: &'a mut W,
    config: SetupConfig,
    phase: SetupPhase,
    steps: Vec<StepReport>,
}

impl<'a, S: EventSink, W: Write> Sequencer<'a, S, W> {
    pub fn new(tablet: &'a Tablet<S>, writer: &'a mut W, config: SetupConfig) -> Self {
        Self {
            tablet,
            writer,
            config,
            phase: SetupPhase::Idle,
            steps: Vec::new(),
        }
    }

    pub fn phase(&self) -> SetupPhase {
        self.phase
    }

    /// Run every step in order. The first fatal error leaves the
    /// sequencer in [`SetupPhase::Failed`].
    pub fn run(&mut self) -> Result<SetupReport> {
        match self.run_steps() {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(phase = ?self.phase, error = %e, "tablet setup failed");
                self.phase = SetupPhase::Failed;
                Err(e)
            }
        }
    }

    fn run_steps(&mut self) -> Result<SetupReport> {
        self.phase = SetupPhase::StoppingStream;
        self.send(SetupStep::StopStreaming, &[commands::STOP_SENDING_PACKETS])?;

        self.phase = SetupPhase::AwaitingModel;
        self.query(ResponseKind::Model, true)?;
        let state = self.tablet.state();
        tracing::info!(
            model = %state.model(),
            version = %state.version(),
            "tablet identified"
        );

        self.phase = SetupPhase::AwaitingConfiguration;
        if !self.config.query_configuration {
            self.record(SetupStep::QueryConfiguration, StepOutcome::Skipped);
        } else if self.config.skip_answered_queries && self.tablet.state().resolution().is_some() {
            tracing::debug!("resolution known from model, skipping configuration query");
            self.record(SetupStep::QueryConfiguration, StepOutcome::Skipped);
        } else {
            self.query(ResponseKind::Configuration, false)?;
        }

        self.phase = SetupPhase::AwaitingCoordinates;
        if self.config.skip_answered_queries && self.tablet.state().bounds().is_some() {
            tracing::debug!("bounds known from model, skipping coordinates query");
            self.record(SetupStep::QueryCoordinates, StepOutcome::Skipped);
        } else {
            self.query(ResponseKind::Coordinates, false)?;
        }

        let state = self.tablet.state();
        let streaming = self.config.start_streaming;
        if streaming {
            self.phase = SetupPhase::SendingModeCommand;
            self.send(
                SetupStep::SendModeCommands,
                commands::mode_commands(state.model()),
            )?;
            self.phase = SetupPhase::Streaming;
        } else {
            self.phase = SetupPhase::Identified;
        }

        let capabilities = state.capabilities();
        tracing::info!(
            model = %state.model(),
            bounds = ?capabilities.bounds,
            resolution = ?capabilities.resolution,
            max_pressure = capabilities.max_pressure,
            streaming,
            "tablet setup complete"
        );

        Ok(SetupReport {
            model: state.model(),
            version: state.version(),
            capabilities,
            steps: std::mem::take(&mut self.steps),
            streaming,
        })
    }

    fn write(&mut self, step: SetupStep, tokens: &[&str]) -> Result<()> {
        let wire = commands::encode(tokens);
        tracing::debug!(%step, command = %String::from_utf8_lossy(&wire).escape_debug(), "writing to tablet");
        self.writer
            .write_all(&wire)
            .and_then(|()| self.writer.flush())
            .map_err(|source| SetupError::Write { step, source })
    }

    fn send(&mut self, step: SetupStep, tokens: &[&str]) -> Result<()> {
        self.write(step, tokens)?;
        self.record(step, StepOutcome::Sent);
        Ok(())
    }

    /// Arm, write, wait. `required` queries fail setup on timeout; others
    /// fall back to a partial response or defaults.
    fn query(&mut self, kind: ResponseKind, required: bool) -> Result<()> {
        let step = SetupStep::for_query(kind);
        self.tablet.arm(kind);
        self.write(step, &[commands::query_for(kind)])?;

        let outcome = match self.tablet.wait(self.config.timeout) {
            Wait::Completed { expected, outcome } if outcome.kind() == Some(expected) => {
                StepOutcome::Answered
            }
            Wait::Completed { expected, outcome } => {
                tracing::warn!(%expected, ?outcome, "unexpected response to {step}");
                StepOutcome::Unexpected
            }
            Wait::Closed => return Err(SetupError::Disconnected(step)),
            Wait::TimedOut { .. } if required => {
                return Err(SetupError::Timeout {
                    step,
                    timeout: self.config.timeout,
                })
            }
            Wait::TimedOut { buffered: 0 } => {
                tracing::warn!("no response to {step}, using defaults");
                StepOutcome::Defaulted
            }
            Wait::TimedOut { buffered } => match self.tablet.recover_partial() {
                Some(outcome) => {
                    tracing::warn!(buffered, ?outcome, "{step} timed out, decoded partial response");
                    StepOutcome::Recovered
                }
                None => {
                    tracing::warn!(buffered, "{step} timed out mid-packet, using defaults");
                    StepOutcome::Defaulted
                }
            },
        };
        self.record(step, outcome);
        Ok(())
    }

    fn record(&mut self, step: SetupStep, outcome: StepOutcome) {
        self.steps.push(StepReport { step, outcome });
    }
}

/// Run the full setup handshake.
pub fn run_setup<S: EventSink, W: Write>(
    tablet: &Tablet<S>,
    writer: &mut W,
    config: SetupConfig,
) -> Result<SetupReport> {
    Sequencer::new(tablet, writer, config).run()
}
