// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! User accounts and host-supplied identity
//!
//! The account is an explicit, owned object passed by reference into the
//! manager; there is no ambient global user state. Its points total and
//! credited-identifier set are mutated from exactly one place, the
//! successful ledger credit.

use std::collections::HashSet;

use rrp_receipt::receipt_id::ReceiptId;
use serde::{Deserialize, Serialize};

/// Opaque user id sourced from the host platform's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity inputs the host platform supplies at session start.
///
/// Treated as opaque; never derived from or validated further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A user's reward state: points total and the set of receipt identifiers
/// already credited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserId,
    display_name: Option<String>,
    avatar_url: Option<String>,
    points: u64,
    credited: HashSet<ReceiptId>,
}

impl UserAccount {
    /// Creates the account on first login, with no points and no receipts.
    pub fn new(identity: Identity) -> Self {
        Self::with_points(identity, 0)
    }

    /// Creates an account with a known points total, for hosts that already
    /// track it.
    pub fn with_points(identity: Identity, points: u64) -> Self {
        Self {
            id: identity.user_id,
            display_name: identity.display_name,
            avatar_url: identity.avatar_url,
            points,
            credited: HashSet::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn has_receipt(&self, receipt_id: &ReceiptId) -> bool {
        self.credited.contains(receipt_id)
    }

    pub fn credited_count(&self) -> usize {
        self.credited.len()
    }

    /// Records a successful ledger credit. The sole mutation path.
    ///
    /// The total never decreases: a ledger echoing a stale value cannot
    /// take points away.
    pub(crate) fn apply_credit(&mut self, receipt_id: ReceiptId, ledger_total: u64) {
        self.points = self.points.max(ledger_total);
        self.credited.insert(receipt_id);
    }
}
