mod photometric;
pub use photometric::adjust_photometric;

mod filter;
pub use filter::apply_filter;

mod segment;
pub use segment::{segment, watershed_markers, WATERSHED_COLOR};

mod morphology;
pub use morphology::apply_morphology;

mod enhance;
pub use enhance::enhance;
