//! 目录块解码模块
//!
//! 这个模块解析 block 形式与多块 data 形式目录的单个目录块，
//! 目录项记录按 8 字节对齐、以 tag 结尾。

mod block;
mod entry;

pub use block::*;
pub use entry::*;
