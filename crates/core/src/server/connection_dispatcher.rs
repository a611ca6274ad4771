use std::io::{BufReader, BufWriter, Read, Write};

use crate::protocol::domain::protocol_error::MAX_MESSAGE_LEN;
use crate::protocol::domain::request::Request;
use crate::protocol::domain::response::{Response, ResponseLayout};
use crate::protocol::infrastructure::wire_format::{read_request, write_response};
use crate::server::domain::dispatch_error::DispatchError;
use crate::server::filter_image_use_case::FilterImageUseCase;

/// One request/response exchange per connection.
pub struct ConnectionDispatcher {
    use_case: FilterImageUseCase,
    layout: ResponseLayout,
}

impl ConnectionDispatcher {
    pub fn new(use_case: FilterImageUseCase, layout: ResponseLayout) -> Self {
        Self { use_case, layout }
    }

    /// Turns a request into the response frame to send back.
    pub fn process(&self, request: &Request) -> Response {
        match self.use_case.execute(
            &request.filter_name,
            request.radius,
            request.workers,
            &request.image,
        ) {
            Ok(filtered) => Response::Ok {
                elapsed_ns: Some(u64::try_from(filtered.elapsed.as_nanos()).unwrap_or(u64::MAX)),
                image: filtered.bytes,
            },
            Err(e) => {
                log::warn!("Request for {:?} failed: {}", request.filter_name, e);
                error_response(&e)
            }
        }
    }

    /// Reads one request from `stream`, processes it and writes the reply.
    ///
    /// A malformed request still gets an Error frame when the stream is
    /// writable; a transport failure returns without replying.
    pub fn handle<S: Read + Write>(&self, stream: &mut S) -> Result<(), DispatchError> {
        let read = read_request(&mut BufReader::new(&mut *stream));
        let request = match read {
            Ok(request) => request,
            Err(e) => {
                let err = DispatchError::Request(e);
                if !err.is_transport() {
                    self.reply(stream, &error_response(&err))?;
                }
                return Err(err);
            }
        };
        log::debug!(
            "Request: filter={:?} radius={} workers={} image={} bytes",
            request.filter_name,
            request.radius,
            request.workers,
            request.image.len()
        );

        let response = self.process(&request);
        self.respond(stream, &response)
    }

    /// Writes `response`, falling back to an Error frame when the response
    /// itself cannot be framed (an oversized output image).
    fn respond<S: Write>(&self, stream: &mut S, response: &Response) -> Result<(), DispatchError> {
        match self.reply(stream, response) {
            Err(err) if !err.is_transport() => {
                log::warn!("Could not send response: {err}");
                self.reply(stream, &error_response(&err))?;
                Err(err)
            }
            result => result,
        }
    }

    fn reply<S: Write>(&self, stream: &mut S, response: &Response) -> Result<(), DispatchError> {
        write_response(&mut BufWriter::new(stream), response, self.layout)
            .map_err(DispatchError::Reply)
    }
}

fn error_response(err: &DispatchError) -> Response {
    let mut message = err.to_string();
    let max = MAX_MESSAGE_LEN as usize;
    if message.len() > max {
        let mut end = max;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    Response::error(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter::FilterError;
    use crate::filtering::infrastructure::filter_engine::FilterEngine;
    use crate::imaging::domain::image_format::ImageFormat;
    use crate::imaging::infrastructure::image_codec;
    use crate::parallel::infrastructure::inline_executor::InlineExecutor;
    use crate::protocol::domain::protocol_error::{ProtocolError, MAX_IMAGE_LEN};
    use crate::protocol::infrastructure::wire_format::{read_response, write_request};
    use crate::shared::raster::Raster;
    use std::io::{self, Cursor};
    use std::sync::Arc;

    // --- Stubs ---

    /// In-memory duplex stream: reads from a canned request, collects writes.
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(input: Vec<u8>) -> Self {
            Self {
                input: Cursor::new(input),
                output: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Stream whose reads fail outright, as after a reset.
    struct BrokenStream {
        written: usize,
    }

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Write for BrokenStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // --- Helpers ---

    fn dispatcher(layout: ResponseLayout) -> ConnectionDispatcher {
        let engine = FilterEngine::new(Arc::new(InlineExecutor));
        ConnectionDispatcher::new(FilterImageUseCase::new(engine, 2), layout)
    }

    fn request_bytes(name: &str, image: Vec<u8>) -> Vec<u8> {
        let mut buf = Vec::new();
        write_request(&mut buf, &Request::new(name, 0, 0, image)).unwrap();
        buf
    }

    fn red_png() -> Vec<u8> {
        image_codec::encode(&Raster::filled(2, 2, [255, 0, 0, 255]), ImageFormat::Png).unwrap()
    }

    fn exchange(dispatcher: &ConnectionDispatcher, input: Vec<u8>) -> (Result<(), DispatchError>, Vec<u8>) {
        let mut stream = MockStream::new(input);
        let result = dispatcher.handle(&mut stream);
        (result, stream.output)
    }

    // --- Tests ---

    #[test]
    fn test_successful_exchange() {
        let d = dispatcher(ResponseLayout::Plain);
        let (result, output) = exchange(&d, request_bytes("invert", red_png()));
        result.unwrap();

        match read_response(&mut Cursor::new(output), ResponseLayout::Plain).unwrap() {
            Response::Ok { elapsed_ns, image } => {
                assert_eq!(elapsed_ns, None);
                let (raster, _) = image_codec::decode(&image).unwrap();
                assert_eq!(raster, Raster::filled(2, 2, [0, 255, 255, 255]));
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn test_timed_layout_reports_elapsed() {
        let d = dispatcher(ResponseLayout::Timed);
        let (result, output) = exchange(&d, request_bytes("median", red_png()));
        result.unwrap();
        let response = read_response(&mut Cursor::new(output), ResponseLayout::Timed).unwrap();
        assert!(matches!(response, Response::Ok { elapsed_ns: Some(_), .. }));
    }

    #[test]
    fn test_unknown_filter_gets_error_frame() {
        let d = dispatcher(ResponseLayout::Plain);
        let (result, output) = exchange(&d, request_bytes("foo", red_png()));
        // Processing failures are answered, so the exchange itself succeeds.
        result.unwrap();

        match read_response(&mut Cursor::new(output), ResponseLayout::Plain).unwrap() {
            Response::Error { message } => {
                assert!(message.contains("\"foo\""));
                for name in ["grayscale", "invert", "blur", "oilpaint"] {
                    assert!(message.contains(name), "{message}");
                }
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_request_gets_error_frame() {
        let d = dispatcher(ResponseLayout::Plain);
        let mut input = Vec::new();
        input.extend_from_slice(&0u32.to_be_bytes());
        let (result, output) = exchange(&d, input);

        assert!(matches!(result, Err(DispatchError::Request(_))));
        let response = read_response(&mut Cursor::new(output), ResponseLayout::Plain).unwrap();
        match response {
            Response::Error { message } => assert!(message.starts_with("malformed request")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_sends_nothing() {
        let d = dispatcher(ResponseLayout::Plain);
        let mut stream = BrokenStream { written: 0 };
        let err = d.handle(&mut stream).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(stream.written, 0);
    }

    #[test]
    fn test_oversized_output_falls_back_to_error_frame() {
        let d = dispatcher(ResponseLayout::Plain);
        let response = Response::Ok {
            elapsed_ns: None,
            image: vec![0; MAX_IMAGE_LEN as usize + 1],
        };
        let mut output = Vec::new();
        let err = d.respond(&mut output, &response).unwrap_err();
        assert!(matches!(err, DispatchError::Reply(ProtocolError::ImageLength(_))));
        assert!(!err.is_transport());

        match read_response(&mut Cursor::new(output), ResponseLayout::Plain).unwrap() {
            Response::Error { message } => assert!(message.contains("invalid image length")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_long_error_message_is_truncated() {
        let err = DispatchError::Filter(FilterError::Unknown {
            name: "é".repeat(40_000),
        });
        match error_response(&err) {
            Response::Error { message } => assert!(message.len() <= MAX_MESSAGE_LEN as usize),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
