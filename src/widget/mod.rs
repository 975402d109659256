//! Demonstration interactive elements.
//!
//! Concrete rendering is outside the core: these widgets exist so the demo
//! app and test harnesses have real [`BindableElement`] implementations to
//! bind. Visuals are deliberately minimal.
//!
//! [`BindableElement`]: crate::view::BindableElement

mod button;

pub use button::Button;
