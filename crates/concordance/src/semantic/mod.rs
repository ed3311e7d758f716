//! Optional semantic analysis of divergent values.
//!
//! The engine works fully without a semantic analyzer. When one is
//! configured, its signals refine the uncertainty estimate; when it reports
//! `SemanticAvailability::Unavailable`, the estimator falls back to
//! structural conflict density.
//!
//! # Analyzers
//!
//! - **LexicalAnalyzer** - word-overlap heuristic, always available
//! - **UnavailableAnalyzer** - reports a missing capability on every call
//! - **MockAnalyzer** - fixed outcomes with a call counter, for tests

mod lexical;
mod mock;
mod provider;

pub use lexical::LexicalAnalyzer;
pub use mock::{MockAnalyzer, UnavailableAnalyzer};
pub use provider::{SemanticAnalyzer, SemanticAvailability, SemanticSignals};
