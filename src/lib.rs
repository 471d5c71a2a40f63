pub mod accumulator;
pub mod area;
pub mod boundary;
pub mod classes;
pub mod config;
pub mod counting;
pub mod crs;
pub mod export;
pub mod masking;
pub mod pipeline;
pub mod readers;
