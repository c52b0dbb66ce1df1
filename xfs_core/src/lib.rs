//! xfs-core: XFS 磁盘元数据解码
//!
//! 这个 crate 从磁盘镜像的原始字节中解析 XFS 的 superblock、inode（含 extent
//! 列表与短格式目录）以及块格式目录项，输出经过校验的结构化结果。
//!
//! 所有解码函数都是纯函数：不持有状态，不修改输入，遇到损坏数据返回错误
//! 而不是越界读取。

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

// 公共模块
pub mod consts;
pub mod types;
pub mod error;
pub mod endian;
pub mod superblock;
pub mod address;
pub mod extent;
pub mod inode;
pub mod dir;
pub mod block;
pub mod fs;

// 重新导出常用类型
pub use consts::*;
pub use error::{Error, ErrorKind, Inconsistency, Result};
pub use types::*;
pub use endian::{format_uuid, ByteReader, Endian};

// 重新导出核心API
pub use superblock::{decode_geometry, decode_superblock, probe_endian, Geometry, Superblock};
pub use address::{
    block_to_byte_offset, inode_to_byte_offset, join_inode_number, split_fsblock,
    split_inode_number, InodeCluster, InodeLocation,
};
pub use extent::{scan_extents, DataRun, Extent, ExtentScan};
pub use inode::{
    decode_inode, parse_shortform, InodeDecodeOptions, InodeFormat, InodePayload, InodeRecord,
    InodeV3, MismatchPolicy, ShortformDir,
};
pub use dir::{
    data_entry_padding, data_entry_size, decode_dir_block, BestFree, DirBlock, DirBlockHeader,
    DirBlockOptions, DirBlockV3, DirEntry,
};
pub use block::{ImageReader, ImageSource};
pub use fs::{DirContents, FsConfig, XfsFilesystem};
