//! C3 linearization.
//!
//! The calculator is a struct rather than a free function so that when a
//! merge fails, the evidence is still at hand: the residual queue heads
//! are exactly the types whose relative order could not be reconciled,
//! and they go into the error.

use smallvec::SmallVec;

use krait_core::{FastHashMap, TypeId, fast_map_new};

use super::TypeDescriptor;
use crate::errors::TypeDefError;

/// Compute the MRO of a type under construction from its declared bases.
/// The result starts with the new type itself; each base's MRO appears in
/// it as a subsequence.
pub(super) fn compute(
    new: TypeId,
    bases: &[TypeId],
    types: &[TypeDescriptor],
) -> Result<SmallVec<[TypeId; 8]>, TypeDefError> {
    if let [base] = bases {
        // Fast path: prepend the new type to the single base's MRO.
        let mut mro = SmallVec::with_capacity(1 + types[base.0 as usize].mro.len());
        mro.push(new);
        mro.extend_from_slice(&types[base.0 as usize].mro);
        return Ok(mro);
    }

    let mut calc = Calculator::new(bases, types);
    match calc.calculate() {
        Some(tail) => {
            let mut mro = SmallVec::with_capacity(1 + tail.len());
            mro.push(new);
            mro.extend_from_slice(&tail);
            Ok(mro)
        }
        None => Err(TypeDefError::InconsistentMro {
            bases: calc
                .remaining_heads()
                .into_iter()
                .map(|t| types[t.0 as usize].name.clone())
                .collect(),
        }),
    }
}

/// Residual MRO of one base while the merge consumes it.
struct Queue<'a> {
    head: usize,
    mro: &'a [TypeId],
}

impl Queue<'_> {
    fn is_empty(&self) -> bool {
        self.head >= self.mro.len()
    }

    fn peek(&self) -> Option<TypeId> {
        self.mro.get(self.head).copied()
    }

    fn pop(&mut self) {
        self.head += 1;
    }
}

struct Calculator<'a> {
    queues: Vec<Queue<'a>>,
    /// How many times each type occurs across all base MROs. A queue head
    /// is selectable once every remaining occurrence of it is itself a
    /// head, i.e. it sits in no queue's interior.
    uses: FastHashMap<TypeId, usize>,
}

impl<'a> Calculator<'a> {
    fn new(bases: &[TypeId], types: &'a [TypeDescriptor]) -> Self {
        let mut uses: FastHashMap<TypeId, usize> = fast_map_new();
        let mut queues = Vec::with_capacity(bases.len());
        for base in bases {
            let mro: &[TypeId] = &types[base.0 as usize].mro;
            for t in mro {
                *uses.entry(*t).or_insert(0) += 1;
            }
            queues.push(Queue { head: 0, mro });
        }
        Self { queues, uses }
    }

    fn calculate(&mut self) -> Option<Vec<TypeId>> {
        let mut mro = Vec::new();
        let mut done = self.queues.iter().all(Queue::is_empty);
        while !done {
            let h = (0..self.queues.len()).find_map(|i| self.good_head(i))?;
            mro.push(h);
            done = true;
            for q in &mut self.queues {
                if q.peek() == Some(h) {
                    q.pop();
                }
                done &= q.is_empty();
            }
        }
        Some(mro)
    }

    /// The head of queue `i`, if no other queue still needs something else
    /// to precede it.
    fn good_head(&self, i: usize) -> Option<TypeId> {
        let h = self.queues[i].peek()?;
        let mut remaining = self.uses[&h];
        for q in &self.queues {
            if q.peek() == Some(h) {
                remaining -= 1;
                if remaining == 0 {
                    return Some(h);
                }
            }
        }
        None
    }

    /// The heads that failed to merge, in queue order without duplicates.
    /// Meaningful only after `calculate` returned `None`.
    fn remaining_heads(&self) -> Vec<TypeId> {
        let mut heads = Vec::new();
        for q in &self.queues {
            if let Some(h) = q.peek() {
                if !heads.contains(&h) {
                    heads.push(h);
                }
            }
        }
        heads
    }
}
