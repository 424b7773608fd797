mod property_form;

pub use property_form::{FormError, PropertyForm};
