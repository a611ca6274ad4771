pub mod wire_format;
