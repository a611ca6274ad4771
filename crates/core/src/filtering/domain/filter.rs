use thiserror::Error;

/// Wire names of every supported filter, in protocol order.
pub const FILTER_NAMES: [&str; 9] = [
    "grayscale",
    "invert",
    "blur",
    "gaussian",
    "sobel",
    "median",
    "pixelate",
    "oilpaint",
    "posterizequantilescolor",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter {name:?}, use one of: {}", FILTER_NAMES.join("|"))]
    Unknown { name: String },
}

/// Box blur radius; values below 1 become 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurRadius(u32);

impl BlurRadius {
    pub fn new(raw: i32) -> Self {
        Self(raw.max(1) as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// Pixelate cell side; values below 2 become 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSize(u32);

impl BlockSize {
    pub fn new(raw: i32) -> Self {
        Self(raw.max(2) as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// Oil paint brush size; anything below 3 falls back to 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushSize(u32);

impl BrushSize {
    pub const DEFAULT: u32 = 5;

    pub fn new(raw: i32) -> Self {
        if raw < 3 {
            Self(Self::DEFAULT)
        } else {
            Self(raw as u32)
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Half-width of the square neighbourhood the brush samples.
    pub fn radius(self) -> usize {
        self.get() / 2
    }
}

/// Number of quantile bins per channel; values below 2 become 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantileLevels(u32);

impl QuantileLevels {
    pub fn new(raw: i32) -> Self {
        Self(raw.max(2) as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// The closed set of filters, each carrying its clamped parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Grayscale,
    Invert,
    BoxBlur(BlurRadius),
    Gaussian,
    Sobel,
    Median,
    Pixelate(BlockSize),
    OilPaint(BrushSize),
    PosterizeQuantiles(QuantileLevels),
}

impl Filter {
    /// Resolves a wire name and its raw `radius` field into a filter.
    ///
    /// The meaning of `param` depends on the filter (blur radius, block
    /// size, brush size or level count); filters without a parameter
    /// ignore it.
    pub fn resolve(name: &str, param: i32) -> Result<Self, FilterError> {
        let filter = match name {
            "grayscale" => Self::Grayscale,
            "invert" => Self::Invert,
            "blur" => Self::BoxBlur(BlurRadius::new(param)),
            "gaussian" => Self::Gaussian,
            "sobel" => Self::Sobel,
            "median" => Self::Median,
            "pixelate" => Self::Pixelate(BlockSize::new(param)),
            "oilpaint" => Self::OilPaint(BrushSize::new(param)),
            "posterizequantilescolor" => Self::PosterizeQuantiles(QuantileLevels::new(param)),
            _ => {
                return Err(FilterError::Unknown {
                    name: name.to_string(),
                })
            }
        };
        Ok(filter)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::BoxBlur(_) => "blur",
            Self::Gaussian => "gaussian",
            Self::Sobel => "sobel",
            Self::Median => "median",
            Self::Pixelate(_) => "pixelate",
            Self::OilPaint(_) => "oilpaint",
            Self::PosterizeQuantiles(_) => "posterizequantilescolor",
        }
    }
}
