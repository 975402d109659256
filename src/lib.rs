//! Model-View-Presenter framework for terminal applications.
//!
//! Views stay free of business logic: every user-triggerable operation is a
//! named action dispatched to a presenter, presenters follow a disciplined
//! lifecycle, and sibling presenters talk through a typed publish/subscribe
//! bus instead of holding references to each other.
//!
//! # Architecture
//!
//! ```text
//! element trigger ──→ Binder ──→ Dispatcher ──→ handler
//!                       ↑            │              │
//!                 enablement ←───────┘         EventBus ──→ other presenters
//! ```
//!
//! - **action**: action identities, the dispatcher, and the element binder
//! - **presenter**: the lifecycle state machine driving view attachment,
//!   action registration, and teardown
//! - **bus**: the event aggregator decoupling sibling presenters
//! - **view**: boundary traits a concrete UI implements
//! - **keymap**: key chord → action identity configuration
//! - **service**: platform collaborator boundaries and shared-state plumbing
//! - **widget**: demonstration ratatui elements

pub mod action;
pub mod bus;
pub mod keymap;
pub mod presenter;
pub mod service;
pub mod view;
pub mod widget;
