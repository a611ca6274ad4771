pub mod connection_dispatcher;
pub mod domain;
pub mod filter_image_use_case;
pub mod infrastructure;
