// Copyright 2020 @TwoCookingMice

pub mod bitmap;
pub mod color;
pub mod constants;
pub mod spectrum;
