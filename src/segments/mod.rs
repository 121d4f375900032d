//! Campaign recipient selection.
//!
//! The composition wizard lets a user pick CRM tags, an ANY/ALL combination
//! rule, and then hand-tune the resulting recipient set. `filter` is the
//! pure state machine; `session` wraps it in the ephemeral wizard sessions
//! the HTTP surface exposes. Nothing here persists — a session lives exactly
//! as long as the wizard that created it.

mod filter;
mod session;

pub use filter::{FilterType, TagFilter};
pub use session::{SessionStore, WizardSession, WizardView};
