//! One-at-a-time gate per input form.
//!
//! Re-submitting the same form while its category suggestion is pending is
//! refused. Separate forms (expense vs income) own separate gates and run
//! independently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SubmitError;

#[derive(Debug, Clone, Default)]
pub struct FormGate {
    busy: Arc<AtomicBool>,
}

/// Held while a submission is in flight; releases the gate on drop.
#[derive(Debug)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl FormGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Result<InFlight, SubmitError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SubmitError::Busy)?;
        Ok(InFlight {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Whether the submit control should be disabled
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_refused() {
        let gate = FormGate::new();
        let first = gate.try_begin().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_begin(), Err(SubmitError::Busy)));
        drop(first);
        assert!(!gate.is_busy());
        assert!(gate.try_begin().is_ok());
    }

    #[test]
    fn test_forms_are_independent() {
        let expense = FormGate::new();
        let income = FormGate::new();
        let _e = expense.try_begin().unwrap();
        assert!(income.try_begin().is_ok());
    }
}
