//! # Tonecheck
//!
//! **Tone analysis and text regeneration from the command line, with a
//! local history of results.**
//!
//! Tonecheck sends text to an external analysis service, which replies
//! with a tone label (positive, neutral, negative), two or three
//! suggestions, and an alternative phrasing. Selected suggestions can be
//! fed back to regenerate the text. Every successful analysis is kept in a
//! local, newest-first history.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────┐
//! │   CLI    │──▶│ ApiClient  │──▶│  /analyze     │
//! │  (tone)  │   │ + schema   │   │  /generate    │
//! └────┬─────┘   └────────────┘   └──────────────┘
//!      │
//!      ▼
//! ┌──────────────┐   ┌──────────────┐
//! │ HistoryStore │──▶│ SQLite k/v   │
//! └──────────────┘   └──────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. The **client** ([`client`]) checks the request bounds and posts it.
//! 2. The response is validated by [`tonecheck_core::schema`]; anything
//!    malformed becomes an error, never a partial result.
//! 3. A validated analysis is prepended to the **history**
//!    ([`tonecheck_core::history`]), stored as one JSON array in SQLite
//!    ([`sqlite_store`]). Storage failures are logged, not returned.
//! 4. Errors are shown through [`tonecheck_core::format`] as short,
//!    categorized messages.
//!
//! ## Quick Start
//!
//! ```bash
//! tone health
//! tone analyze "Thanks for nothing, the report is late again."
//! tone history list
//! tone generate --from <id> --select 1,3 --copy
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`client`] | HTTP client for the analysis service |
//! | [`clipboard`] | Best-effort clipboard copy with fallback |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite key/value backend |
//! | [`analyze`] | `analyze` / `generate` commands |
//! | [`history_cmd`] | `history` / `copy` commands |
//! | [`health`] | `health` command |
//! | [`logging`] | Tracing subscriber setup |

pub mod analyze;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod db;
pub mod health;
pub mod history_cmd;
pub mod logging;
pub mod migrate;
pub mod sqlite_store;
