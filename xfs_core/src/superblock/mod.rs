//! Superblock 模块
//!
//! 这个模块提供 XFS superblock 的字节序探测、解码，以及从中派生的几何参数。

mod geometry;
mod read;

pub use geometry::*;
pub use read::*;
