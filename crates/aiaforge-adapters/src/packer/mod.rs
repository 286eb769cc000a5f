//! Archive packers.

mod deflate;

pub use deflate::ZipPacker;
