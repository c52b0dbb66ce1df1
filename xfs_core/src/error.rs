//! 错误处理模块

use core::fmt;

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// superblock / inode / 目录块魔数不匹配
    BadMagic,
    /// 缓冲区比字段或记录所需的短
    Truncated,
    /// 地址换算的输入超出几何参数允许的范围
    OutOfRange,
    /// 结构合法但不支持的 inode 格式
    UnsupportedFormat,
    /// 记录的 inode 编号与请求的不一致（按策略拒绝时）
    Inconsistent,
    /// 几何参数或结构字段使解码无法定义
    Corrupted,
    /// 镜像源读取失败
    Io,
}

/// XFS 错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

impl Error {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub(crate) fn truncated(message: &'static str) -> Self {
        Self::new(ErrorKind::Truncated, message)
    }

    pub(crate) fn out_of_range(message: &'static str) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    pub(crate) fn corrupted(message: &'static str) -> Self {
        Self::new(ErrorKind::Corrupted, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xfs error ({:?}): {}", self.kind, self.message)
    }
}

impl core::error::Error for Error {}

/// XFS Result 类型
pub type Result<T> = core::result::Result<T, Error>;

/// 软性不一致
///
/// 解码成功但数据自相矛盾时附加在结果上，调用者决定跳过还是继续使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// inode 体内记录的编号与请求的编号不同
    InodeNumberMismatch { requested: u64, recorded: u64 },
    /// extent 扫描在累计块数达到 nblocks 之前结束
    ExtentScanShort { declared_blocks: u64, found_blocks: u64 },
    /// 非零但块数为 0 的 extent 记录，扫描时跳过
    EmptyExtentRecord { index: usize, startoff: u64 },
    /// 扫描到的 extent 条数与 inode 声明的 nextents 不同
    ExtentCountMismatch { declared: u64, found: u64 },
    /// 目录项尾部 tag 不等于该项在块内的偏移
    DirTagMismatch { offset: usize, tag: u16 },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InodeNumberMismatch { requested, recorded } => {
                write!(f, "inode number mismatch: requested {requested}, recorded {recorded}")
            }
            Self::ExtentScanShort { declared_blocks, found_blocks } => write!(
                f,
                "extent scan ended early: {found_blocks} of {declared_blocks} blocks"
            ),
            Self::EmptyExtentRecord { index, startoff } => {
                write!(f, "extent record {index} at offset {startoff} has zero blocks")
            }
            Self::ExtentCountMismatch { declared, found } => {
                write!(f, "extent count mismatch: declared {declared}, found {found}")
            }
            Self::DirTagMismatch { offset, tag } => {
                write!(f, "directory entry at {offset} carries tag {tag}")
            }
        }
    }
}
