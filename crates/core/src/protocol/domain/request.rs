/// One filter request as carried on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub filter_name: String,
    /// Filter parameter: blur radius, block size, brush size or level count.
    pub radius: i32,
    /// Requested band count; zero or negative lets the server decide.
    pub workers: i32,
    /// Encoded JPEG, PNG or GIF bytes.
    pub image: Vec<u8>,
}

impl Request {
    pub fn new(filter_name: impl Into<String>, radius: i32, workers: i32, image: Vec<u8>) -> Self {
        Self {
            filter_name: filter_name.into(),
            radius,
            workers,
            image,
        }
    }
}
