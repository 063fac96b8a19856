pub mod basin_reader;

pub use basin_reader::BasinReader;
