pub mod protocol_error;
pub mod request;
pub mod response;
