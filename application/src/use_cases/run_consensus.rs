//! Run Consensus use case
//!
//! Orchestrates the full consensus flow: fan-out to every configured
//! provider, a success gate, judge selection, structured synthesis and
//! payload assembly.

use crate::config::ConsensusConfig;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::verdict_validator::VerdictValidator;
use crate::use_cases::shared::generate;
use consensus_domain::{
    Credentials, FanOutStrategy, FinalPayload, Phase, PromptTemplate, ProviderId,
    ProviderOutcome, Question, RoundResult, Verdict, VerdictError, verdict_json_schema,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while synthesizing the verdict
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("no responding provider is eligible to judge")]
    NoJudge,

    #[error("judge {provider} call failed: {source}")]
    Judge {
        provider: ProviderId,
        #[source]
        source: GatewayError,
    },

    #[error("judge {provider} returned an invalid verdict: {source}")]
    InvalidVerdict {
        provider: ProviderId,
        #[source]
        source: VerdictError,
    },
}

/// Errors that can occur during a consensus run
#[derive(Error, Debug)]
pub enum RunConsensusError {
    #[error("All providers failed to respond")]
    AllProvidersFailed { failures: Vec<String> },

    #[error("Only {got} of the required {required} providers responded")]
    InsufficientResponses {
        required: usize,
        got: usize,
        failures: Vec<String>,
    },

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(#[from] SynthesisError),

    #[error("Consensus run timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl RunConsensusError {
    /// Per-provider failure messages, when the error came from the fan-out gate
    pub fn failures(&self) -> &[String] {
        match self {
            RunConsensusError::AllProvidersFailed { failures }
            | RunConsensusError::InsufficientResponses { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct RunConsensusInput {
    /// The question to ask
    pub question: Question,
    /// Caller-supplied provider secrets for this request only
    pub credentials: Credentials,
}

impl RunConsensusInput {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            credentials: Credentials::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Use case for running one consensus request
pub struct RunConsensusUseCase<G: LlmGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    validator: Arc<dyn VerdictValidator>,
    config: ConsensusConfig,
}

impl<G: LlmGateway + ?Sized + 'static> RunConsensusUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        validator: Arc<dyn VerdictValidator>,
        config: ConsensusConfig,
    ) -> Self {
        Self {
            gateway,
            validator,
            config,
        }
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConsensusInput,
    ) -> Result<FinalPayload, RunConsensusError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks, bounded by the request timeout
    pub async fn execute_with_progress(
        &self,
        input: RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalPayload, RunConsensusError> {
        let limit = self.config.execution().request_timeout;
        match tokio::time::timeout(limit, self.run(input, progress)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Consensus run exceeded {:?}", limit);
                Err(RunConsensusError::Timeout(limit))
            }
        }
    }

    async fn run(
        &self,
        input: RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalPayload, RunConsensusError> {
        let policy = self.config.policy();
        info!(
            "Starting consensus with {} providers ({})",
            policy.providers().len(),
            policy.strategy()
        );

        // Phase 1: Fan-out
        let round = self.query_all(&input, progress).await;
        self.check_successes(&round)?;

        // Phase 2: Synthesis
        let judge = policy
            .judge_priority()
            .choose(&round)
            .ok_or(SynthesisError::NoJudge)?;
        info!("Judge selected: {}", judge);
        progress.on_judge_selected(judge);

        let verdict = self
            .phase_synthesis(&input, &round, judge, progress)
            .await?;

        Ok(FinalPayload::assemble(verdict, judge, &round))
    }

    /// Phase 1: Ask every configured provider the user's question
    async fn query_all(
        &self,
        input: &RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> RoundResult {
        let providers = self.config.policy().providers();
        info!("Phase 1: Fan-out");
        progress.on_phase_start(&Phase::FanOut, providers.len());

        let gathered = match self.config.policy().strategy() {
            FanOutStrategy::Parallel => self.query_parallel(input, progress).await,
            FanOutStrategy::Sequential { delay } => {
                self.query_sequential(input, delay, progress).await
            }
        };

        progress.on_phase_complete(&Phase::FanOut);
        let round = RoundResult::collect(providers, gathered);
        info!(
            "{} of {} providers responded",
            round.success_count(),
            round.len()
        );
        round
    }

    async fn query_parallel(
        &self,
        input: &RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> Vec<(ProviderId, ProviderOutcome)> {
        let mut join_set = JoinSet::new();

        for &provider in self.config.policy().providers() {
            let gateway = Arc::clone(&self.gateway);
            let question = input.question.content().to_string();
            let credential = input.credentials.get(provider).map(str::to_string);

            join_set.spawn(async move {
                let outcome = generate(
                    gateway.as_ref(),
                    provider,
                    &question,
                    PromptTemplate::answer_system(),
                    credential.as_deref(),
                )
                .await;
                (provider, outcome)
            });
        }

        let mut gathered = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((provider, outcome)) => {
                    progress.on_task_complete(&Phase::FanOut, provider, outcome.is_success());
                    gathered.push((provider, outcome));
                }
                Err(e) => {
                    // The provider's slot is filled as failed when the round is collected
                    warn!("Task join error: {}", e);
                }
            }
        }

        gathered
    }

    async fn query_sequential(
        &self,
        input: &RunConsensusInput,
        delay: Duration,
        progress: &dyn ProgressNotifier,
    ) -> Vec<(ProviderId, ProviderOutcome)> {
        let providers = self.config.policy().providers();
        let mut gathered = Vec::with_capacity(providers.len());

        for (i, &provider) in providers.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                debug!("Waiting {:?} before querying {}", delay, provider);
                tokio::time::sleep(delay).await;
            }

            let gateway = Arc::clone(&self.gateway);
            let question = input.question.content().to_string();
            let credential = input.credentials.get(provider).map(str::to_string);

            // Each call runs as its own task so a crash stays confined to this provider
            let handle = tokio::spawn(async move {
                generate(
                    gateway.as_ref(),
                    provider,
                    &question,
                    PromptTemplate::answer_system(),
                    credential.as_deref(),
                )
                .await
            });
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Task join error for {}: {}", provider, e);
                    ProviderOutcome::error(format!("provider task failed: {e}"))
                }
            };
            progress.on_task_complete(&Phase::FanOut, provider, outcome.is_success());
            gathered.push((provider, outcome));
        }

        gathered
    }

    fn check_successes(&self, round: &RoundResult) -> Result<(), RunConsensusError> {
        let got = round.success_count();
        let required = self.config.policy().min_successes();

        if got == 0 {
            return Err(RunConsensusError::AllProvidersFailed {
                failures: round.failure_messages(),
            });
        }
        if got < required {
            return Err(RunConsensusError::InsufficientResponses {
                required,
                got,
                failures: round.failure_messages(),
            });
        }
        Ok(())
    }

    /// Phase 2: Have the judge cross-reference the raw answers
    async fn phase_synthesis(
        &self,
        input: &RunConsensusInput,
        round: &RoundResult,
        judge: ProviderId,
        progress: &dyn ProgressNotifier,
    ) -> Result<Verdict, SynthesisError> {
        info!("Phase 2: Synthesis");
        progress.on_phase_start(&Phase::Synthesis, 1);

        let result = self.synthesize(input, round, judge).await;

        progress.on_task_complete(&Phase::Synthesis, judge, result.is_ok());
        progress.on_phase_complete(&Phase::Synthesis);
        result
    }

    async fn synthesize(
        &self,
        input: &RunConsensusInput,
        round: &RoundResult,
        judge: ProviderId,
    ) -> Result<Verdict, SynthesisError> {
        let banding = self.config.policy().banding();
        let responders = round.responders();
        let schema = verdict_json_schema(&responders);
        let prompt = PromptTemplate::synthesis_prompt(input.question.content(), round, banding);

        let raw = async {
            let session = self
                .gateway
                .create_session(
                    judge,
                    input.credentials.get(judge),
                    PromptTemplate::synthesis_system(),
                )
                .await?;
            session.send_structured(&prompt, &schema).await
        }
        .await
        .map_err(|source| SynthesisError::Judge {
            provider: judge,
            source,
        })?;

        self.validator
            .validate(&raw, &responders, banding)
            .map_err(|source| {
                warn!("Judge {} produced an invalid verdict: {}", judge, source);
                SynthesisError::InvalidVerdict {
                    provider: judge,
                    source,
                }
            })
    }
}
