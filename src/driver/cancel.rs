use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::core::SurfaceId;

/// Cooperative cancellation flag shared between a loop and whoever may supersede it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Tracks which loop currently owns each presentation surface.
///
/// Claiming a surface cancels the previous owner's token. The previous loop notices at the
/// top of its next tick; a pass already in progress is not interrupted.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    owners: HashMap<SurfaceId, CancelToken>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, surface: SurfaceId) -> CancelToken {
        let token = CancelToken::new();
        if let Some(prev) = self.owners.insert(surface, token.clone()) {
            tracing::debug!(?surface, "surface claimed by a new loop; cancelling previous");
            prev.cancel();
        }
        token
    }

    /// Drop ownership if `token` still owns `surface`.
    pub fn release(&mut self, surface: SurfaceId, token: &CancelToken) {
        if self.owners.get(&surface).is_some_and(|t| t.same_as(token)) {
            self.owners.remove(&surface);
        }
    }

    pub fn is_claimed(&self, surface: SurfaceId) -> bool {
        self.owners.contains_key(&surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/cancel.rs"]
mod tests;
