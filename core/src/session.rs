//! Onboarding session — owns the step pointer and the applicant record,
//! and drives the one-shot compliance submission.
//!
//! RULES:
//!   - One session per applicant, constructed explicitly and dropped when
//!     onboarding completes or is abandoned. There is no global session.
//!   - The sequence, progress and risk assessment are derived on every
//!     read. Only the record and the pointer are stored.
//!   - COMPLETED is absorbing. Only a successful submission enters it.
//!   - At most one compliance call per session is ever in flight, and no
//!     call is made after a successful one.
//!   - The state lock is never held across an await point.
//!   - The spawned call settles the session itself. Dropping a `submit()`
//!     future leaves the call in flight; only a dropped session ignores
//!     its result.

use crate::{
    compliance::{ComplianceResult, ComplianceService},
    customer_id::{CustomerIdGenerator, UuidCustomerIds},
    error::{OnboardingError, OnboardingResult},
    event::{EventLog, EventLogEntry, SessionEvent},
    record::{ApplicantRecord, StepData},
    risk_model::{RiskAssessment, RiskModel},
    sequencer::{StepSequence, StepSequencer},
    snapshot::SessionSnapshot,
    step::StepId,
    types::{AccountType, CustomerId, Percent},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Shown to the applicant after any failed submission. The detailed
/// cause goes to the caller and the log, never to this field.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "We could not submit your application. Please try again.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    NotStarted,
    InFlight,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(ComplianceResult),
    /// A previous call already succeeded. The service was not called.
    AlreadyCompleted,
    /// Another call is still waiting on the service. It was not called again.
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct SessionState {
    current_step:      StepId,
    record:            ApplicantRecord,
    customer_id:       Option<CustomerId>,
    compliance_result: Option<ComplianceResult>,
    submission:        SubmissionState,
    error:             Option<String>,
    events:            EventLog,
}

impl SessionState {
    fn account_type(&self) -> AccountType {
        self.record.account_type.unwrap_or_default()
    }

    fn is_completed(&self) -> bool {
        self.current_step.is_terminal()
    }

    fn move_to(&mut self, to: StepId) {
        let from = self.current_step;
        if from == to {
            return;
        }
        self.current_step = to;
        log::debug!("step {from} -> {to}");
        self.events.append(SessionEvent::StepChanged { from, to });
    }
}

pub struct OnboardingSession {
    state:      Arc<Mutex<SessionState>>,
    sequencer:  StepSequencer,
    compliance: Arc<dyn ComplianceService>,
    ids:        Arc<dyn CustomerIdGenerator>,
}

impl OnboardingSession {
    pub fn new(
        sequencer: StepSequencer,
        compliance: Arc<dyn ComplianceService>,
        ids: Arc<dyn CustomerIdGenerator>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            sequencer,
            compliance,
            ids,
        }
    }

    /// Session with the built-in risk tables and random customer ids.
    pub fn build(compliance: Arc<dyn ComplianceService>) -> Self {
        Self::new(
            StepSequencer::new(RiskModel::default()),
            compliance,
            Arc::new(UuidCustomerIds),
        )
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    // ── Read side ─────────────────────────────────────────────

    pub fn current_step(&self) -> StepId {
        self.lock().current_step
    }

    pub fn account_type(&self) -> AccountType {
        self.lock().account_type()
    }

    /// A copy of the record. Writes go through `update`.
    pub fn data(&self) -> ApplicantRecord {
        self.lock().record.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().submission == SubmissionState::InFlight
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.lock().customer_id.clone()
    }

    pub fn compliance_result(&self) -> Option<ComplianceResult> {
        self.lock().compliance_result.clone()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.lock().submission
    }

    pub fn risk_assessment(&self) -> RiskAssessment {
        let state = self.lock();
        self.sequencer.model().assess(&state.record)
    }

    pub fn sequence(&self) -> StepSequence {
        let state = self.lock();
        self.sequencer.sequence(state.account_type(), &state.record)
    }

    /// 100 once completed, otherwise the current step's position in a
    /// freshly derived sequence.
    pub fn progress(&self) -> Percent {
        let state = self.lock();
        if state.is_completed() {
            return 100;
        }
        self.sequencer
            .progress(state.account_type(), &state.record, state.current_step)
    }

    pub fn events(&self) -> Vec<EventLogEntry> {
        self.lock().events.entries().to_vec()
    }

    /// How many events of one type the session has recorded.
    pub fn event_count(&self, event_type: &str) -> usize {
        self.lock().events.count(event_type)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        let account_type = state.account_type();
        let risk_assessment = self.sequencer.model().assess(&state.record);
        let sequence = self.sequencer.sequence(account_type, &state.record);
        let progress = if state.is_completed() {
            100
        } else {
            sequence.progress(state.current_step)
        };

        SessionSnapshot {
            current_step:      state.current_step,
            account_type,
            data:              state.record.clone(),
            sequence,
            progress,
            risk_assessment,
            is_loading:        state.submission == SubmissionState::InFlight,
            error:             state.error.clone(),
            customer_id:       state.customer_id.clone(),
            compliance_result: state.compliance_result.clone(),
        }
    }

    // ── Data ──────────────────────────────────────────────────

    /// Set the account type. The current step is left where it is, even
    /// if the new sequence no longer contains it.
    pub fn set_account_type(&self, account_type: AccountType) {
        let mut state = self.lock();
        state.record.merge(StepData::AccountType(account_type));
        log::info!("account type set to {}", account_type.as_str());
        state.events.append(SessionEvent::AccountTypeSet { account_type });
    }

    /// Replace one step's slot in the record. Never validates, never fails.
    pub fn update(&self, data: StepData) {
        if let StepData::AccountType(account_type) = data {
            self.set_account_type(account_type);
            return;
        }
        let mut state = self.lock();
        let step = state.record.merge(data);
        log::debug!("merged {step} data");
        state.events.append(SessionEvent::StepDataMerged { step });
    }

    // ── Navigation ────────────────────────────────────────────

    /// Advance one step in the freshly derived sequence. No-op on the
    /// last step.
    pub fn next(&self) -> StepId {
        let mut state = self.lock();
        if state.is_completed() {
            return state.current_step;
        }
        let to = self
            .sequencer
            .next(state.account_type(), &state.record, state.current_step);
        state.move_to(to);
        state.current_step
    }

    /// Go back one step. No-op on the first step.
    pub fn previous(&self) -> StepId {
        let mut state = self.lock();
        if state.is_completed() {
            return state.current_step;
        }
        let to = self
            .sequencer
            .previous(state.account_type(), &state.record, state.current_step);
        state.move_to(to);
        state.current_step
    }

    /// Jump straight to `step`. Reachability is not checked; callers such
    /// as the review screen's edit links are trusted. COMPLETED can only be
    /// entered by submitting, and never left.
    pub fn go_to(&self, step: StepId) -> StepId {
        let mut state = self.lock();
        if state.is_completed() {
            log::warn!("go_to({step}) ignored: onboarding already completed");
            return state.current_step;
        }
        if step.is_terminal() {
            log::warn!("go_to({step}) ignored: completion requires a submission");
            return state.current_step;
        }
        state.move_to(step);
        state.current_step
    }

    // ── Submission ────────────────────────────────────────────

    /// Send the record to the compliance service, once.
    ///
    /// Must run inside a tokio runtime. The call runs on a spawned task
    /// that settles the session itself, so dropping this future does not
    /// cancel it: the session stays in flight and takes the verdict when
    /// it arrives. Only dropping the session discards a late result.
    pub async fn submit(&self) -> OnboardingResult<SubmitOutcome> {
        let (customer_id, record) = {
            let mut state = self.lock();
            match state.submission {
                SubmissionState::Completed => {
                    log::info!("duplicate submission suppressed: already completed");
                    state
                        .events
                        .append(SessionEvent::DuplicateSubmissionSuppressed { in_flight: false });
                    return Ok(SubmitOutcome::AlreadyCompleted);
                }
                SubmissionState::InFlight => {
                    log::info!("duplicate submission suppressed: call in flight");
                    state
                        .events
                        .append(SessionEvent::DuplicateSubmissionSuppressed { in_flight: true });
                    return Ok(SubmitOutcome::AlreadyInFlight);
                }
                SubmissionState::NotStarted => {}
            }

            let customer_id = match &state.customer_id {
                Some(id) => id.clone(),
                None => {
                    let id = self.ids.generate();
                    state.customer_id = Some(id.clone());
                    id
                }
            };
            state.submission = SubmissionState::InFlight;
            state.error = None;
            state.events.append(SessionEvent::SubmissionStarted {
                customer_id: customer_id.clone(),
            });
            log::info!("submitting onboarding for customer {customer_id}");
            (customer_id, state.record.clone())
        };

        let service = Arc::clone(&self.compliance);
        let session_state = Arc::downgrade(&self.state);
        let task = tokio::spawn(async move {
            // Nested so a panicking client still reaches `settle`.
            let call_id = customer_id.clone();
            let call = tokio::spawn(async move {
                service.submit_onboarding(&call_id, &record).await
            });
            let outcome = match call.await {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(err)) => Err(OnboardingError::SubmissionFailed(err)),
                Err(join_err) => {
                    Err(OnboardingError::SubmissionTaskAborted(join_err.to_string()))
                }
            };
            settle(&session_state, &customer_id, &outcome);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome.map(SubmitOutcome::Submitted),
            Err(join_err) => Err(OnboardingError::SubmissionTaskAborted(join_err.to_string())),
        }
    }
}

/// Apply a finished call to the session, if the session still exists.
fn settle(
    session_state: &Weak<Mutex<SessionState>>,
    customer_id: &str,
    outcome: &OnboardingResult<ComplianceResult>,
) {
    let Some(shared) = session_state.upgrade() else {
        log::info!("session for customer {customer_id} dropped; late compliance result ignored");
        return;
    };
    let mut state = lock_state(&shared);
    match outcome {
        Ok(result) => {
            state.submission = SubmissionState::Completed;
            state.compliance_result = Some(result.clone());
            state.events.append(SessionEvent::SubmissionSucceeded {
                customer_id: customer_id.to_string(),
                status:      result.status,
            });
            state.move_to(StepId::Completed);
            log::info!("customer {customer_id} submitted: {:?}", result.status);
        }
        Err(err) => {
            let reason = err.to_string();
            state.submission = SubmissionState::NotStarted;
            state.error = Some(SUBMISSION_FAILED_MESSAGE.to_string());
            state.events.append(SessionEvent::SubmissionFailed {
                customer_id: customer_id.to_string(),
                reason:      reason.clone(),
            });
            log::warn!("submission for customer {customer_id} failed: {reason}");
        }
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    // Every critical section leaves the state consistent, so a
    // poisoned lock still guards valid data.
    state.lock().unwrap_or_else(|e| e.into_inner())
}
