use chrono::{Local, NaiveDate};

use super::domain::{BookingConfirmation, BookingDraft, BookingInput, QuoteResult};
use super::gateway::SubmissionError;
use super::quote::QuoteError;
use super::validation::{validate_all, validate_step, BookingStep, FieldError};

/// Correlates an asynchronous quote calculation with the wizard state that
/// triggered it. Outcomes carrying a superseded ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Side effect requested by a transition. The host driver executes the
/// effect against the quote adapter or booking gateway and feeds the outcome
/// back through `apply_quote_outcome` / `apply_submission_outcome`.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEffect {
    RecalculateQuote(QuoteTicket),
    Submit(SubmissionTicket, BookingInput),
}

/// Rejected wizard operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("step '{}' is incomplete", step.label())]
    Validation {
        step: BookingStep,
        errors: Vec<FieldError>,
    },
    #[error("a quote or submission is still in flight")]
    OperationInFlight,
    #[error("already on the first step")]
    AtFirstStep,
    #[error("already on the final step; submission completes the booking")]
    NoNextStep,
    #[error("step '{}' has not been reached yet", .0.label())]
    StepNotReached(BookingStep),
    #[error("no quote is available yet")]
    QuoteNotReady,
    #[error("submission is only permitted from the confirm step")]
    NotOnConfirmStep,
    #[error("this booking has already been submitted")]
    AlreadySubmitted,
    #[error("draft is missing fields that validation should have required")]
    IncompleteDraft,
}

/// Last surfaced retriable failure, kept alongside the step it belongs to so
/// the rendering layer can offer the matching retry affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardFailure {
    Quote(String),
    Submission(String),
}

impl WizardFailure {
    pub fn message(&self) -> &str {
        match self {
            WizardFailure::Quote(message) | WizardFailure::Submission(message) => message,
        }
    }
}

/// Finite state machine behind the multi-step booking form.
///
/// One instance per form; single-threaded. At most one quote calculation and
/// one submission may be outstanding, and a newer trigger always supersedes
/// an unresolved older one (last-triggered-wins).
#[derive(Debug)]
pub struct BookingWizard {
    draft: BookingDraft,
    step: BookingStep,
    highest_reached: BookingStep,
    quote: Option<QuoteResult>,
    quote_epoch: u64,
    quote_in_flight: bool,
    submit_epoch: u64,
    submit_in_flight: bool,
    failure: Option<WizardFailure>,
    confirmation: Option<BookingConfirmation>,
    today: NaiveDate,
}

impl BookingWizard {
    pub fn new() -> Self {
        Self::anchored_to(Local::now().date_naive())
    }

    /// Build a wizard whose booking-window checks are anchored to a fixed
    /// date. Hosts and tests use this to keep validation deterministic.
    pub fn anchored_to(today: NaiveDate) -> Self {
        Self {
            draft: BookingDraft::default(),
            step: BookingStep::Contact,
            highest_reached: BookingStep::Contact,
            quote: None,
            quote_epoch: 0,
            quote_in_flight: false,
            submit_epoch: 0,
            submit_in_flight: false,
            failure: None,
            confirmation: None,
            today,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn highest_reached(&self) -> BookingStep {
        self.highest_reached
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn quote(&self) -> Option<&QuoteResult> {
        self.quote.as_ref()
    }

    pub fn failure(&self) -> Option<&WizardFailure> {
        self.failure.as_ref()
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_quote_in_flight(&self) -> bool {
        self.quote_in_flight
    }

    pub fn is_submission_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub fn is_submitted(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Apply an edit to the draft. When a field feeding the price changes,
    /// the stored quote is invalidated and any unresolved quote request is
    /// superseded, since its inputs no longer reflect the form.
    pub fn edit(
        &mut self,
        apply: impl FnOnce(&mut BookingDraft),
    ) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        let before = quote_inputs(&self.draft);
        apply(&mut self.draft);

        if quote_inputs(&self.draft) != before {
            self.quote = None;
            if self.quote_in_flight {
                self.quote_epoch += 1;
                self.quote_in_flight = false;
            }
        }

        Ok(())
    }

    /// Validation status of the active step, for incremental display.
    pub fn current_step_errors(&self) -> Vec<FieldError> {
        validate_step(self.step, &self.draft, self.today)
    }

    /// Advance one step. Gated by the active step's validators; entering the
    /// quote review step always requests a fresh calculation, even when a
    /// quote already exists.
    pub fn next(&mut self) -> Result<Option<WizardEffect>, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.quote_in_flight || self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        let errors = validate_step(self.step, &self.draft, self.today);
        if !errors.is_empty() {
            return Err(WizardError::Validation {
                step: self.step,
                errors,
            });
        }
        if self.step == BookingStep::QuoteReview && self.quote.is_none() {
            return Err(WizardError::QuoteNotReady);
        }

        let target = self.step.next().ok_or(WizardError::NoNextStep)?;
        self.step = target;
        if target > self.highest_reached {
            self.highest_reached = target;
        }

        Ok(self.step_entry_effect())
    }

    /// Move back one step; never validated, never permitted from the first
    /// step. Allowed while a quote request is outstanding. Landing on the
    /// quote review step re-triggers the calculation, the same as every
    /// other entry path.
    pub fn prev(&mut self) -> Result<Option<WizardEffect>, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        self.step = self.step.prev().ok_or(WizardError::AtFirstStep)?;
        Ok(self.step_entry_effect())
    }

    /// Jump to a previously reached step. Forward jumps past unresolved work
    /// are blocked like `next`; landing on the quote review step re-triggers
    /// the calculation.
    pub fn go_to(&mut self, target: BookingStep) -> Result<Option<WizardEffect>, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if target > self.highest_reached {
            return Err(WizardError::StepNotReached(target));
        }
        if self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }
        if target > self.step && self.quote_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        self.step = target;
        Ok(self.step_entry_effect())
    }

    /// Request another quote after a calculation failure. Permitted while an
    /// older request is still unresolved; the newer ticket supersedes it.
    pub fn retry_quote(&mut self) -> Result<WizardEffect, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.step != BookingStep::QuoteReview {
            return Err(WizardError::StepNotReached(BookingStep::QuoteReview));
        }
        if self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        Ok(self.begin_quote())
    }

    /// Finalize the booking from the confirm step. The entire input set is
    /// re-validated, guarding against stale state from back-navigation
    /// edits, and an immutable snapshot is handed to the effect.
    pub fn begin_submit(&mut self) -> Result<WizardEffect, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.step != BookingStep::Confirm {
            return Err(WizardError::NotOnConfirmStep);
        }
        if self.quote_in_flight || self.submit_in_flight {
            return Err(WizardError::OperationInFlight);
        }

        let errors = validate_all(&self.draft, self.today);
        if !errors.is_empty() {
            return Err(WizardError::Validation {
                step: BookingStep::Confirm,
                errors,
            });
        }

        let quote = self.quote.clone().ok_or(WizardError::QuoteNotReady)?;
        let input =
            BookingInput::from_draft(&self.draft, quote).ok_or(WizardError::IncompleteDraft)?;

        self.submit_epoch += 1;
        self.submit_in_flight = true;
        self.failure = None;

        Ok(WizardEffect::Submit(
            SubmissionTicket(self.submit_epoch),
            input,
        ))
    }

    /// Feed back a resolved quote calculation. Returns `false` when the
    /// ticket was superseded and the outcome discarded.
    pub fn apply_quote_outcome(
        &mut self,
        ticket: QuoteTicket,
        outcome: Result<QuoteResult, QuoteError>,
    ) -> bool {
        if ticket.0 != self.quote_epoch || !self.quote_in_flight {
            return false;
        }

        self.quote_in_flight = false;
        match outcome {
            Ok(quote) => {
                self.quote = Some(quote);
                self.failure = None;
            }
            Err(err) => {
                self.quote = None;
                self.failure = Some(WizardFailure::Quote(err.to_string()));
            }
        }

        true
    }

    /// Feed back a resolved submission. Success is terminal; failure leaves
    /// the wizard on the confirm step with every entered field preserved.
    pub fn apply_submission_outcome(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<BookingConfirmation, SubmissionError>,
    ) -> bool {
        if ticket.0 != self.submit_epoch || !self.submit_in_flight {
            return false;
        }

        self.submit_in_flight = false;
        match outcome {
            Ok(confirmation) => {
                self.confirmation = Some(confirmation);
                self.failure = None;
            }
            Err(err) => {
                self.failure = Some(WizardFailure::Submission(err.to_string()));
            }
        }

        true
    }

    fn begin_quote(&mut self) -> WizardEffect {
        self.quote_epoch += 1;
        self.quote_in_flight = true;
        self.failure = None;
        WizardEffect::RecalculateQuote(QuoteTicket(self.quote_epoch))
    }

    fn step_entry_effect(&mut self) -> Option<WizardEffect> {
        if self.step == BookingStep::QuoteReview {
            Some(self.begin_quote())
        } else {
            None
        }
    }
}

/// Projection of the draft fields that feed the price calculation.
fn quote_inputs(
    draft: &BookingDraft,
) -> (
    Option<super::domain::ServiceKind>,
    Option<u32>,
    Option<f64>,
    bool,
    Option<String>,
) {
    (
        draft.service,
        draft.room_count,
        draft.square_meters,
        draft.stain_removal,
        draft.postcode.clone(),
    )
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}
