//! Customer id generation.
//!
//! A session asks for an id at most once, right before its first
//! submission attempt, and keeps it for every retry.
//!
//! SeededCustomerIds draws from a PCG stream so a replayed run hands
//! out the same ids in the same order.

use crate::types::CustomerId;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::sync::Mutex;

pub const CUSTOMER_ID_PREFIX: &str = "CUS";

pub trait CustomerIdGenerator: Send + Sync {
    fn generate(&self) -> CustomerId;
}

/// Random ids from uuid v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCustomerIds;

impl CustomerIdGenerator for UuidCustomerIds {
    fn generate(&self) -> CustomerId {
        let uuid = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{CUSTOMER_ID_PREFIX}-{}", &uuid[..12])
    }
}

/// Deterministic ids from a master seed.
pub struct SeededCustomerIds {
    inner: Mutex<Pcg64Mcg>,
}

impl SeededCustomerIds {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mutex::new(Pcg64Mcg::seed_from_u64(seed)),
        }
    }
}

impl CustomerIdGenerator for SeededCustomerIds {
    fn generate(&self) -> CustomerId {
        let bits = {
            let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            rng.next_u64()
        };
        // 48 bits, twelve hex digits, same width as the uuid form.
        format!("{CUSTOMER_ID_PREFIX}-{:012X}", bits & 0xFFFF_FFFF_FFFF)
    }
}
