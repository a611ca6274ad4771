mod box_blur;
pub mod filter_engine;
mod gaussian;
mod median;
mod oil_paint;
mod pixelate;
mod point_filters;
mod quantile_posterize;
mod sobel;
