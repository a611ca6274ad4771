//! Big-endian, length-prefixed framing for requests and responses.
//!
//! ```text
//! request:  u32 name_len | name | i32 radius | i32 workers | u64 image_len | image
//! response: u32 status = 0 | [u64 elapsed_ns] | u64 image_len | image
//!           u32 status = 1 | u32 msg_len | message
//! ```
//!
//! Every declared length is checked before anything of that size is
//! allocated, and payloads are read incrementally so a short stream never
//! forces the full declared allocation.

use std::io::{self, Read, Write};

use crate::protocol::domain::protocol_error::{
    ProtocolError, MAX_FILTER_NAME_LEN, MAX_IMAGE_LEN, MAX_MESSAGE_LEN,
};
use crate::protocol::domain::request::Request;
use crate::protocol::domain::response::{Response, ResponseLayout, STATUS_ERROR, STATUS_OK};

pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<(), ProtocolError> {
    let name = request.filter_name.as_bytes();
    let name_len = check_name_len(name.len() as u64)?;
    let image_len = check_image_len(request.image.len() as u64)?;

    writer.write_all(&name_len.to_be_bytes())?;
    writer.write_all(name)?;
    writer.write_all(&request.radius.to_be_bytes())?;
    writer.write_all(&request.workers.to_be_bytes())?;
    writer.write_all(&image_len.to_be_bytes())?;
    writer.write_all(&request.image)?;
    writer.flush()?;
    Ok(())
}

pub fn read_request<R: Read>(reader: &mut R) -> Result<Request, ProtocolError> {
    let name_len = check_name_len(u32::from_be_bytes(read_array(reader, "name_len")?) as u64)?;
    let name = read_payload(reader, name_len as u64, "filter name")?;
    let radius = i32::from_be_bytes(read_array(reader, "radius")?);
    let workers = i32::from_be_bytes(read_array(reader, "workers")?);
    let image_len = check_image_len(u64::from_be_bytes(read_array(reader, "image_len")?))?;
    let image = read_payload(reader, image_len, "image")?;

    Ok(Request {
        filter_name: String::from_utf8_lossy(&name).into_owned(),
        radius,
        workers,
        image,
    })
}

pub fn write_response<W: Write>(
    writer: &mut W,
    response: &Response,
    layout: ResponseLayout,
) -> Result<(), ProtocolError> {
    match response {
        Response::Ok { elapsed_ns, image } => {
            let image_len = check_image_len(image.len() as u64)?;
            writer.write_all(&response.status().to_be_bytes())?;
            if layout == ResponseLayout::Timed {
                writer.write_all(&elapsed_ns.unwrap_or(0).to_be_bytes())?;
            }
            writer.write_all(&image_len.to_be_bytes())?;
            writer.write_all(image)?;
        }
        Response::Error { message } => {
            let message_len = check_message_len(message.len() as u64)?;
            writer.write_all(&response.status().to_be_bytes())?;
            writer.write_all(&message_len.to_be_bytes())?;
            writer.write_all(message.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn read_response<R: Read>(
    reader: &mut R,
    layout: ResponseLayout,
) -> Result<Response, ProtocolError> {
    let status = u32::from_be_bytes(read_array(reader, "status")?);
    match status {
        STATUS_OK => {
            let elapsed_ns = match layout {
                ResponseLayout::Timed => Some(u64::from_be_bytes(read_array(reader, "elapsed_ns")?)),
                ResponseLayout::Plain => None,
            };
            let image_len = check_image_len(u64::from_be_bytes(read_array(reader, "image_len")?))?;
            let image = read_payload(reader, image_len, "image")?;
            Ok(Response::Ok { elapsed_ns, image })
        }
        STATUS_ERROR => {
            let message_len =
                check_message_len(u32::from_be_bytes(read_array(reader, "msg_len")?) as u64)?;
            let message = read_payload(reader, message_len as u64, "message")?;
            Ok(Response::Error {
                message: String::from_utf8_lossy(&message).into_owned(),
            })
        }
        other => Err(ProtocolError::UnknownStatus(other)),
    }
}

fn check_name_len(len: u64) -> Result<u32, ProtocolError> {
    if len == 0 || len > MAX_FILTER_NAME_LEN as u64 {
        return Err(ProtocolError::NameLength(len));
    }
    Ok(len as u32)
}

fn check_image_len(len: u64) -> Result<u64, ProtocolError> {
    if len == 0 || len > MAX_IMAGE_LEN {
        return Err(ProtocolError::ImageLength(len));
    }
    Ok(len)
}

fn check_message_len(len: u64) -> Result<u32, ProtocolError> {
    if len > MAX_MESSAGE_LEN as u64 {
        return Err(ProtocolError::MessageLength(len));
    }
    Ok(len as u32)
}

fn read_array<R: Read, const N: usize>(
    reader: &mut R,
    field: &'static str,
) -> Result<[u8; N], ProtocolError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, field))?;
    Ok(buf)
}

/// Reads exactly `len` bytes, letting the buffer grow as data arrives.
fn read_payload<R: Read>(
    reader: &mut R,
    len: u64,
    field: &'static str,
) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(len)
        .read_to_end(&mut buf)
        .map_err(|e| truncated(e, field))?;
    if (buf.len() as u64) < len {
        return Err(ProtocolError::Truncated { field });
    }
    Ok(buf)
}

fn truncated(err: io::Error, field: &'static str) -> ProtocolError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ProtocolError::Truncated { field }
    } else {
        ProtocolError::Io(err)
    }
}
