mod deadline_stream;
pub mod tcp_server;
