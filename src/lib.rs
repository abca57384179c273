// Copyright @yucwang 2021

pub mod aovs;
pub mod core;
pub mod io;
pub mod math;
