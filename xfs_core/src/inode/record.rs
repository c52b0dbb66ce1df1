//! inode 解码结果与解码配置

use alloc::{string::String, vec::Vec};

use crate::{
    consts::*,
    dir::DirEntry,
    error::Inconsistency,
    extent::Extent,
    superblock::Geometry,
    types::{InodeFlags, InodeFlags2, InodeType, Permissions, Timestamp},
};

/// 数据 fork 格式（di_format）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeFormat {
    /// 设备号
    Dev,
    /// 数据内联在 inode 中
    Local,
    /// extent 列表
    Extents,
    /// B+ 树
    Btree,
    Uuid,
}

impl InodeFormat {
    /// 从磁盘值转换，未知值返回 `None`
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(InodeFormat::Dev),
            1 => Some(InodeFormat::Local),
            2 => Some(InodeFormat::Extents),
            3 => Some(InodeFormat::Btree),
            4 => Some(InodeFormat::Uuid),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            InodeFormat::Dev => 0,
            InodeFormat::Local => 1,
            InodeFormat::Extents => 2,
            InodeFormat::Btree => 3,
            InodeFormat::Uuid => 4,
        }
    }
}

/// inode 编号不一致时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// 记录一条 `InodeNumberMismatch` 警告并继续
    #[default]
    Warn,
    /// 返回 `Inconsistent` 错误
    Reject,
}

/// inode 解码配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeDecodeOptions {
    /// inode 大小（字节），数据 fork 默认延伸到这里
    pub inode_size: usize,
    /// 短格式目录项是否带文件类型字节
    pub has_ftype: bool,
    pub mismatch_policy: MismatchPolicy,
}

impl Default for InodeDecodeOptions {
    fn default() -> Self {
        Self {
            inode_size: XFS_DEFAULT_INODE_SIZE,
            has_ftype: true,
            mismatch_policy: MismatchPolicy::Warn,
        }
    }
}

impl InodeDecodeOptions {
    /// 按几何参数构造
    pub fn from_geometry(geom: &Geometry) -> Self {
        Self {
            inode_size: geom.inode_size as usize,
            has_ftype: geom.has_ftype,
            mismatch_policy: MismatchPolicy::Warn,
        }
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }
}

/// 短格式目录（内联在 inode 数据 fork 中）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortformDir {
    /// 父目录 inode 编号
    pub parent: u64,
    /// 需要 8 字节存放的 inode 编号个数；非零时所有编号都是 8 字节
    pub i8count: u8,
    /// 目录项；`tag` 为磁盘上的 offset 字段
    pub entries: Vec<DirEntry>,
}

/// inode 负载
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InodePayload {
    /// 无数据（大小为零或未分配块）
    Empty,
    Extents(Vec<Extent>),
    Shortform(ShortformDir),
    /// 内联符号链接目标（原始字节）
    Symlink(Vec<u8>),
    /// 头部已解码，但不解析该格式的负载
    Unsupported(InodeFormat),
}

/// v3 inode 特有字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeV3 {
    /// 原样透传，不校验
    pub crc: u32,
    pub change_count: u64,
    pub lsn: u64,
    pub flags2: InodeFlags2,
    pub cow_extsize: u32,
    pub crtime: Timestamp,
    /// inode 体内记录的编号
    pub ino: u64,
    pub uuid: String,
}

/// 解码后的 inode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeRecord {
    /// 调用者请求的编号；未提供时取 v3 记录值，否则为 0
    pub ino: u64,
    pub mode: u16,
    pub inode_type: InodeType,
    pub permissions: Permissions,
    pub version: u8,
    pub format: InodeFormat,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u32,
    pub projid: u32,
    pub size: u64,
    pub nblocks: u64,
    pub extsize: u32,
    /// 数据 fork extent 数（NREXT64 时为 64 位字段）
    pub nextents: u64,
    pub anextents: u32,
    /// 属性 fork 偏移（8 字节单位），0 表示无属性 fork
    pub forkoff: u8,
    pub aformat: u8,
    pub flags: InodeFlags,
    pub gen: u32,
    pub next_unlinked: u32,
    pub atime: Timestamp,
    pub mtime: Timestamp,
    pub ctime: Timestamp,
    pub v3: Option<InodeV3>,
    pub payload: InodePayload,
    pub warnings: Vec<Inconsistency>,
}

impl InodeRecord {
    pub fn is_dir(&self) -> bool {
        self.inode_type == InodeType::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.inode_type == InodeType::Symlink
    }

    pub fn is_regular(&self) -> bool {
        self.inode_type == InodeType::RegularFile
    }

    pub fn has_attr_fork(&self) -> bool {
        self.forkoff != 0
    }

    /// 创建时间（仅 v3）
    pub fn crtime(&self) -> Option<Timestamp> {
        self.v3.as_ref().map(|v3| v3.crtime)
    }

    /// extent 列表（仅 extent 格式）
    pub fn extents(&self) -> Option<&[Extent]> {
        match &self.payload {
            InodePayload::Extents(extents) => Some(extents),
            _ => None,
        }
    }

    /// 短格式目录项（仅内联目录）
    pub fn shortform(&self) -> Option<&ShortformDir> {
        match &self.payload {
            InodePayload::Shortform(dir) => Some(dir),
            _ => None,
        }
    }

    /// 符号链接目标（仅内联符号链接）
    pub fn symlink_target(&self) -> Option<&[u8]> {
        match &self.payload {
            InodePayload::Symlink(target) => Some(target),
            _ => None,
        }
    }
}
