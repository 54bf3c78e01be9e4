//! # Resume Matcher
//!
//! Scores a resume against a job description and keeps an append-only
//! history of every comparison.
//!
//! Two scores are produced:
//!
//! - **TF-IDF similarity**: cosine similarity of TF-IDF vectors fitted on the
//!   two documents.
//! - **Skill match**: the share of the job description's recognized skills
//!   that also appear in the resume.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐
//! │ Extractor │──▶│ Normalizer │──▶│  Scorer  │──▶│  Ledger  │
//! │ PDF / TXT │   │            │   │ TF-IDF + │   │ SQLite   │
//! │  (+ OCR)  │   │            │   │  skills  │   │          │
//! └───────────┘   └────────────┘   └──────────┘   └──────────┘
//!                          ▲
//!              ┌───────────┴───────────┐
//!              │     MatchService      │
//!              └───────────┬───────────┘
//!                  ┌───────┴───────┐
//!                  ▼               ▼
//!             ┌─────────┐     ┌─────────┐
//!             │   CLI   │     │  HTTP   │
//!             │(rmatch) │     │         │
//!             └─────────┘     └─────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | PDF/TXT text extraction with OCR fallback |
//! | [`normalize`] | Canonical lowercase token stream |
//! | [`skills`] | Skill vocabulary and skill-set extraction |
//! | [`score`] | TF-IDF similarity and skill coverage |
//! | [`ledger`] | Append-only match history |
//! | [`service`] | The comparison pipeline |
//! | [`server`] | JSON HTTP adapter |
//! | [`history`] | History listing for the CLI |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod config;
pub mod db;
pub mod extract;
pub mod history;
pub mod ledger;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod score;
pub mod server;
pub mod service;
pub mod skills;

pub use service::{MatchError, MatchReport, MatchService};
