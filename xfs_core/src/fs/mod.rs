//! 文件系统高级 API
//!
//! 这个模块把镜像读取、地址换算和各解码器组合为按 inode 编号访问的只读接口。

mod filesystem;

pub use filesystem::{DirContents, FsConfig, XfsFilesystem};
