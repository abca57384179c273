// Copyright @yucwang 2021

pub mod aov;
pub mod aov_accumulator;
pub mod frame;
pub mod lighting;
pub mod rng;
pub mod shading;
