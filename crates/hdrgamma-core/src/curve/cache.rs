use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::{CurveKind, CurveRequest, TransferCurve};
use crate::error::Result;

/// Float parameters are keyed by bit pattern, so `0.0` and `-0.0` differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CurveKey {
    kind: CurveKind,
    size: usize,
    white_bits: u64,
    black_bits: u64,
    gamma_bits: u64,
}

impl From<&CurveRequest> for CurveKey {
    fn from(request: &CurveRequest) -> Self {
        match request {
            CurveRequest::Legacy { size, gamma } => Self {
                kind: CurveKind::Legacy,
                size: *size,
                white_bits: 0,
                black_bits: 0,
                gamma_bits: gamma.to_bits(),
            },
            CurveRequest::HdrAware(params) => Self {
                kind: CurveKind::HdrAware,
                size: params.size,
                white_bits: params.white_level_nits.to_bits(),
                black_bits: params.black_level_nits.to_bits(),
                gamma_bits: params.gamma.to_bits(),
            },
        }
    }
}

/// Generated curves, shared across apply cycles
///
/// Entries are inserted once and never replaced. A curve that fails to build
/// is not cached.
pub struct CurveCache {
    curves: RwLock<HashMap<CurveKey, Arc<TransferCurve>>>,
}

impl CurveCache {
    pub fn new() -> Self {
        Self {
            curves: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached curve for `request`, building it on a miss
    pub fn get_or_build(&self, request: &CurveRequest) -> Result<Arc<TransferCurve>> {
        let key = CurveKey::from(request);

        if let Some(curve) = self.get_key(&key) {
            debug!(kind = ?key.kind, size = key.size, "curve cache hit");
            return Ok(curve);
        }

        // Built outside the lock; a concurrent builder for the same key loses
        // the insert race and both callers end up with the first curve stored.
        let built = Arc::new(request.build()?);
        let mut curves = self.curves.write().unwrap_or_else(PoisonError::into_inner);
        let curve = curves.entry(key).or_insert(built).clone();
        debug!(kind = ?key.kind, size = key.size, cached = curves.len(), "curve cache miss");
        Ok(curve)
    }

    /// Look up without building
    pub fn get(&self, request: &CurveRequest) -> Option<Arc<TransferCurve>> {
        self.get_key(&CurveKey::from(request))
    }

    pub fn len(&self) -> usize {
        self.curves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_key(&self, key: &CurveKey) -> Option<Arc<TransferCurve>> {
        self.curves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl Default for CurveCache {
    fn default() -> Self {
        Self::new()
    }
}
