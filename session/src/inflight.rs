//! Single-slot in-flight tokens, one per mutating operation class.

use std::sync::atomic::{AtomicBool, Ordering};

/// Mutual exclusion for one operation class (connect, mint, milestone, tip).
///
/// A caller that fails to acquire the slot knows an operation of that class
/// is already outstanding and must not start a second one. The token
/// releases the slot on drop, including on early returns.
#[derive(Default)]
pub struct OpGate {
    busy: AtomicBool,
}

impl OpGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if an operation is already in flight.
    pub fn try_acquire(&self) -> Option<OpToken<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(OpToken { gate: self })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

pub struct OpToken<'a> {
    gate: &'a OpGate,
}

impl Drop for OpToken<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slot() {
        let gate = OpGate::new();
        let token = gate.try_acquire().expect("free slot");
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());
        drop(token);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_released_on_early_return() {
        let gate = OpGate::new();
        fn bails(gate: &OpGate) -> Option<()> {
            let _token = gate.try_acquire()?;
            None
        }
        assert!(bails(&gate).is_none());
        assert!(!gate.is_busy());
    }
}
