/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector2i = nalgebra::Vector2<Int>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Matrix3f = nalgebra::Matrix3<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
