//! Incremental search over the repository list.
//!
//! A session is a [`NavigationState`]; keystrokes are fed in as
//! [`NavigationEvent`]s and a confirmed selection comes back as a
//! [`Destination`].

pub mod event;
pub mod filter;
pub mod state;

pub use event::{Destination, Disposition, Modifiers, NavigationEvent};
pub use state::{Catalog, NavigationState, Transition};
