//! Inode 解码模块
//!
//! 这个模块把定长 inode 缓冲区解码为 `InodeRecord`，负载按数据 fork
//! 格式分为 extent 列表、短格式目录、内联符号链接、空或不支持。

mod read;
mod record;
mod shortform;

pub use read::*;
pub use record::*;
pub use shortform::*;
