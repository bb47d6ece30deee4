//! Ant colony optimization for the traveling salesman problem.
//!
//! - [`Ant`] — builds one closed tour per iteration and deposits pheromone
//! - [`AntColony`] — seeds, iterates, evaporates, and tracks the best tour
//! - [`AcoConfig`] — validated run parameters
//! - [`IterationObserver`] — end-of-iteration notification hook
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V., & Colorni, A. (1996). "Ant system: optimization
//! by a colony of cooperating agents", *IEEE Transactions on Systems, Man,
//! and Cybernetics, Part B* 26(1), 29-41.

mod ant;
mod config;
mod observer;
mod solver;

pub use ant::Ant;
pub use config::{AcoConfig, HeuristicScale};
pub use observer::{
    HistoryRecorder, IterationEvent, IterationObserver, IterationRecord, ObserverError,
};
pub use solver::{AcoResult, AntColony, History};
