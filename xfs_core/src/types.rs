//! XFS 共享数据类型
//!
//! inode 类型、目录项文件类型、时间戳以及各类标志位。

use bitflags::bitflags;

use crate::consts::*;

/// 时间戳（秒 + 纳秒）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub sec: i64,
    pub nsec: u32,
}

impl Timestamp {
    /// 旧格式：有符号 32 位秒 + 32 位纳秒
    pub fn from_legacy(sec: u32, nsec: u32) -> Self {
        Self {
            sec: sec as i32 as i64,
            nsec,
        }
    }

    /// 大时间戳格式：自 (1970 - 2^31 秒) 起的 64 位纳秒数
    pub fn from_bigtime(raw: u64) -> Self {
        const NSEC_PER_SEC: u64 = 1_000_000_000;
        Self {
            sec: (raw / NSEC_PER_SEC) as i64 - XFS_BIGTIME_EPOCH_OFFSET,
            nsec: (raw % NSEC_PER_SEC) as u32,
        }
    }
}

/// inode 类型（mode 高 4 位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    Fifo,
    CharacterDevice,
    Directory,
    BlockDevice,
    RegularFile,
    Symlink,
    Socket,
    Unknown(u16),
}

impl From<u16> for InodeType {
    fn from(mode: u16) -> Self {
        match mode & S_IFMT {
            S_IFIFO => InodeType::Fifo,
            S_IFCHR => InodeType::CharacterDevice,
            S_IFDIR => InodeType::Directory,
            S_IFBLK => InodeType::BlockDevice,
            S_IFREG => InodeType::RegularFile,
            S_IFLNK => InodeType::Symlink,
            S_IFSOCK => InodeType::Socket,
            other => InodeType::Unknown(other),
        }
    }
}

/// 目录项文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirFileType {
    Unknown,
    RegularFile,
    Directory,
    CharacterDevice,
    BlockDevice,
    Fifo,
    Socket,
    Symlink,
    Whiteout,
    Other(u8),
}

impl From<u8> for DirFileType {
    fn from(value: u8) -> Self {
        match value {
            XFS_DIR3_FT_UNKNOWN => DirFileType::Unknown,
            XFS_DIR3_FT_REG_FILE => DirFileType::RegularFile,
            XFS_DIR3_FT_DIR => DirFileType::Directory,
            XFS_DIR3_FT_CHRDEV => DirFileType::CharacterDevice,
            XFS_DIR3_FT_BLKDEV => DirFileType::BlockDevice,
            XFS_DIR3_FT_FIFO => DirFileType::Fifo,
            XFS_DIR3_FT_SOCK => DirFileType::Socket,
            XFS_DIR3_FT_SYMLINK => DirFileType::Symlink,
            XFS_DIR3_FT_WHT => DirFileType::Whiteout,
            other => DirFileType::Other(other),
        }
    }
}

impl DirFileType {
    /// 磁盘上的原始值
    pub fn raw(self) -> u8 {
        match self {
            DirFileType::Unknown => XFS_DIR3_FT_UNKNOWN,
            DirFileType::RegularFile => XFS_DIR3_FT_REG_FILE,
            DirFileType::Directory => XFS_DIR3_FT_DIR,
            DirFileType::CharacterDevice => XFS_DIR3_FT_CHRDEV,
            DirFileType::BlockDevice => XFS_DIR3_FT_BLKDEV,
            DirFileType::Fifo => XFS_DIR3_FT_FIFO,
            DirFileType::Socket => XFS_DIR3_FT_SOCK,
            DirFileType::Symlink => XFS_DIR3_FT_SYMLINK,
            DirFileType::Whiteout => XFS_DIR3_FT_WHT,
            DirFileType::Other(other) => other,
        }
    }
}

bitflags! {
    /// 权限位（mode 低 12 位）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u16 {
        const SET_UID = 0o4000;
        const SET_GID = 0o2000;
        const STICKY = 0o1000;
        const USER_READ = 0o400;
        const USER_WRITE = 0o200;
        const USER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl Permissions {
    pub fn from_mode(mode: u16) -> Self {
        Self::from_bits_truncate(mode & S_IPERM_MASK)
    }
}

bitflags! {
    /// di_flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InodeFlags: u16 {
        const REALTIME = 0x0001;
        const PREALLOC = 0x0002;
        const NEWRTBM = 0x0004;
        const IMMUTABLE = 0x0008;
        const APPEND = 0x0010;
        const SYNC = 0x0020;
        const NOATIME = 0x0040;
        const NODUMP = 0x0080;
        const RTINHERIT = 0x0100;
        const PROJINHERIT = 0x0200;
        const NOSYMLINKS = 0x0400;
        const EXTSIZE = 0x0800;
        const EXTSZINHERIT = 0x1000;
        const NODEFRAG = 0x2000;
        const FILESTREAM = 0x4000;
    }
}

bitflags! {
    /// di_flags2（仅 v3 inode）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InodeFlags2: u64 {
        const DAX = 1 << 0;
        const REFLINK = 1 << 1;
        const COWEXTSIZE = 1 << 2;
        const BIGTIME = 1 << 3;
        const NREXT64 = 1 << 4;
    }
}

bitflags! {
    /// sb_features_incompat（v5）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IncompatFeatures: u32 {
        const FTYPE = 1 << 0;
        const SPINODES = 1 << 1;
        const META_UUID = 1 << 2;
        const BIGTIME = 1 << 3;
        const NEEDSREPAIR = 1 << 4;
        const NREXT64 = 1 << 5;
    }
}
