//! RosterChain - a minimal replicated ledger with round-robin block production
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`transaction`] - Value-transfer transactions
//! - [`block`] - Content-hashed blocks and chain linkage
//! - [`state`] - Account balances and transition rules
//! - [`chain`] - The consensus engine: chain, mempool and the production schedule
//!
//! ## Node Services
//! - [`miner`] - The periodic block-production task
//! - [`broadcast`] - Block delivery to peers
//! - [`api`] - REST surface (submission, peer delivery, reads)
//! - [`node`] - Orchestration
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod chain;
pub mod state;
pub mod transaction;

// ============================================================================
// Node Services
// ============================================================================
pub mod api;
pub mod broadcast;
pub mod miner;
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
