use super::account::{AccountId, Balance, LEDGER_SCALE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Length of one calendar day in seconds. All deadline math is done on whole
/// day boundaries relative to a commitment's start date.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Denominator of the rake rate: 10_000 basis points == 100%.
pub const BASIS_POINTS_DIVISOR: u32 = 10_000;

/// Computes the protocol fee for a deposit at the given rake rate.
///
/// The result is truncated to the ledger scale (floor semantics); the
/// fractional remainder stays with the escrowed deposit rather than being
/// rounded into the fee.
pub fn rake_fee(deposit_value: Decimal, rake_basis_points: u32) -> Balance {
    let fee = deposit_value * Decimal::from(rake_basis_points)
        / Decimal::from(BASIS_POINTS_DIVISOR);
    Balance::new(fee.trunc_with_scale(LEDGER_SCALE))
}

/// Lifecycle state of a commitment. `Completed` and `Failed` are terminal and
/// mutually exclusive; there is no path back to `Active`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentState {
    Active,
    Completed,
    Failed,
}

/// How a check-in attempt relates to the commitment's day window at a given
/// instant. Day 0 is the calendar day beginning at `start_date`; a streak is
/// exactly one check-in per elapsed day, in sequence.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CheckInDay {
    /// The start date has not been reached yet.
    BeforeStart,
    /// A valid check-in already happened on the current day.
    Repeat,
    /// The current day is the next day in the streak.
    OnTime(u64),
    /// At least one required day passed without a check-in.
    Missed,
}

/// One user's pledge of funds against completing a daily check-in streak.
///
/// Records are never deleted: terminal commitments remain in the store as
/// audit history, with `settled` marking that the escrowed deposit has been
/// transferred out (exactly once, in exactly one direction).
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Commitment {
    pub id: u64,
    pub user: AccountId,
    /// Escrowed funds, net of the fee already routed to the treasury.
    pub deposit: Balance,
    /// Rake taken at creation time, at the rate in force at creation time.
    pub fee: Balance,
    pub target_days: u32,
    pub checked_in_days: u32,
    /// Calendar-day boundary at or after which check-ins become valid.
    /// Supplied by the caller, not derived by the engine.
    pub start_date: i64,
    pub last_check_in_day: Option<u64>,
    pub loss_account: AccountId,
    pub state: CommitmentState,
    pub title: String,
    /// Whether the escrowed deposit has already been transferred out.
    pub settled: bool,
}

impl Commitment {
    /// First instant at which the commitment can no longer complete: the
    /// midnight boundary after the last day of the streak. The deadline
    /// itself still counts as active (`now > deadline` means expired).
    pub fn deadline(&self) -> i64 {
        self.start_date + i64::from(self.target_days) * SECONDS_PER_DAY
    }

    pub fn is_past_deadline(&self, now: i64) -> bool {
        now > self.deadline()
    }

    /// Classifies a check-in attempt at `now` against the day window.
    pub fn assess_check_in(&self, now: i64) -> CheckInDay {
        if now < self.start_date {
            return CheckInDay::BeforeStart;
        }
        let today = ((now - self.start_date) / SECONDS_PER_DAY) as u64;
        let expected = self.last_check_in_day.map_or(0, |day| day + 1);
        // `today < expected` can only mean today == last_check_in_day, since
        // the clock source is monotonic.
        match today.cmp(&expected) {
            std::cmp::Ordering::Less => CheckInDay::Repeat,
            std::cmp::Ordering::Equal => CheckInDay::OnTime(today),
            std::cmp::Ordering::Greater => CheckInDay::Missed,
        }
    }

    /// Records a valid check-in for `day`. Returns true when the streak is
    /// now complete and the commitment must transition to `Completed`.
    pub fn record_check_in(&mut self, day: u64) -> bool {
        self.checked_in_days += 1;
        self.last_check_in_day = Some(day);
        self.checked_in_days == self.target_days
    }

    pub fn complete(&mut self) {
        self.state = CommitmentState::Completed;
        self.settled = true;
    }

    pub fn fail(&mut self) {
        self.state = CommitmentState::Failed;
        self.settled = true;
    }
}
