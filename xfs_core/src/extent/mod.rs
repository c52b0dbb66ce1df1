//! Extent 记录模块
//!
//! 这个模块提供 XFS 128 位打包 extent 记录的解码、扫描和字节定位。
//!
//! extent 格式 inode 的数据 fork 中连续存放若干 16 字节记录，
//! 没有计数字段，扫描以全零记录或累计块数为终点。

mod record;
mod scan;

pub use record::*;
pub use scan::*;
