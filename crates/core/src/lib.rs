//! Core types and the storage contract for persisted alerts.
//!
//! This crate is the functional core of the alert store: domain types, the
//! [`storage::AlertStorage`] trait, the error taxonomy and the record codec.
//! Nothing in here touches the filesystem; concrete backends live in the
//! `alertstore` crate.

pub mod alert;
pub mod storage;
