//! Display use cases: pushing images to the table displays.

mod push_image;

pub use push_image::{PushImageCommand, PushImageError, PushImageHandler, PushImageReport};
