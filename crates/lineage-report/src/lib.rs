//! Artifact emitters for one legacy view.
//!
//! - [`replication`]: replication task rules as JSON.
//! - [`quality`]: data-quality rule expressions, one file per environment.
//! - [`governance`]: column catalogs as `;`-delimited CSV.
//!
//! The emitters are independent; each takes the joined fields of a view and
//! produces its own artifact.

pub mod error;
pub mod governance;
pub mod quality;
pub mod replication;

pub use error::{ReportError, Result};
pub use governance::{
    GovernancePaths, GovernanceRow, GovernanceTables, Nullable, emit_governance, write_governance,
};
pub use quality::{QualityRule, QualityRuleEmitter, QualityRuleset, QualitySettings};
pub use replication::{
    Rule, RuleDocument, emit_replication_rules, render_rule_document, write_rule_document,
};
