//! Image filtering over a length-prefixed TCP protocol.
//!
//! A request carries an encoded JPEG, PNG or GIF image plus a filter name;
//! the server splits the decoded image into row bands, runs the filter on a
//! shared worker pool and answers with the image re-encoded in its original
//! format.

pub mod client;
pub mod filtering;
pub mod imaging;
pub mod parallel;
pub mod protocol;
pub mod server;
pub mod shared;
