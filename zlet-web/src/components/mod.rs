pub(crate) mod day_stepper;
pub(crate) mod header_nav_item;
pub(crate) mod language_selector;
pub(crate) mod language_selector_button;
pub(crate) mod loading;
pub(crate) mod offering_card;
pub(crate) mod private_route;

// Re-export components for convenience
pub use day_stepper::DayStepper;
pub use loading::Loading;
pub use offering_card::{AppliedCard, OfferingCard};
