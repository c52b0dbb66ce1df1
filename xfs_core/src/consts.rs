//! XFS 常量定义

/// 地址换算使用的扇区（daddr）大小：512 字节
pub const XFS_BB_SIZE: u64 = 512;

/// 扇区大小的 log2
pub const XFS_BB_SHIFT: u32 = 9;

/// Superblock 位置（文件系统区域内的字节偏移）
pub const XFS_SB_OFFSET: u64 = 0;

/// Superblock 解码所需的字节数
pub const XFS_SB_SIZE: usize = 512;

/// Superblock 魔数 ("XFSB")
pub const XFS_SB_MAGIC: u32 = 0x5846_5342;

/// Superblock 版本号掩码（sb_versionnum 低 4 位）
pub const XFS_SB_VERSION_NUMBITS: u16 = 0x000F;

/// v5 superblock（带 CRC 的元数据格式）
pub const XFS_SB_VERSION_5: u16 = 5;

/// sb_versionnum: features2 字段有效
pub const XFS_SB_VERSION_MOREBITSBIT: u16 = 0x8000;

/// sb_features2: 目录项带文件类型字节（v4 文件系统）
pub const XFS_SB_VERSION2_FTYPE: u32 = 0x0000_0200;

/// Inode 魔数 ("IN")
pub const XFS_DINODE_MAGIC: u16 = 0x494E;

/// 默认 inode 大小，也是 inode 缓冲区的最小长度
pub const XFS_DEFAULT_INODE_SIZE: usize = 512;

/// v1/v2 inode core 大小
pub const XFS_DINODE_CORE_SIZE_V2: usize = 100;

/// v3 inode core 大小（data fork 从这里开始）
pub const XFS_DINODE_CORE_SIZE_V3: usize = 176;

/// 属性 fork 偏移单位（di_forkoff 以 8 字节计）
pub const XFS_FORKOFF_SHIFT: u32 = 3;

/// inode 编号最多 56 位
pub const XFS_MAXINUMBER: u64 = (1 << 56) - 1;

/// 短格式目录头中 4 字节 / 8 字节 inode 编号的宽度
pub const XFS_INO32_SIZE: usize = 4;
pub const XFS_INO64_SIZE: usize = 8;

/// 单条 extent 记录大小（128 位）
pub const XFS_BMBT_REC_SIZE: usize = 16;

/// extent 记录各字段的位宽
pub const XFS_BMBT_STARTOFF_BITS: u32 = 54;
pub const XFS_BMBT_STARTBLOCK_BITS: u32 = 52;
pub const XFS_BMBT_BLOCKCOUNT_BITS: u32 = 21;

/// 单条 extent 能描述的最大块数
pub const XFS_MAX_BMBT_EXTLEN: u32 = (1 << XFS_BMBT_BLOCKCOUNT_BITS) - 1;

/// 目录块魔数
pub const XFS_DIR3_BLOCK_MAGIC: u32 = 0x5844_4233; // "XDB3": 单块目录
pub const XFS_DIR3_DATA_MAGIC: u32 = 0x5844_4433; // "XDD3": 多块目录数据块
pub const XFS_DIR2_BLOCK_MAGIC: u32 = 0x5844_3242; // "XD2B": v4 单块目录
pub const XFS_DIR2_DATA_MAGIC: u32 = 0x5844_3244; // "XD2D": v4 多块目录数据块

/// 目录数据块头部大小
pub const XFS_DIR3_DATA_HDR_SIZE: usize = 64;
pub const XFS_DIR2_DATA_HDR_SIZE: usize = 16;

/// 单块目录尾部（count + stale）大小
pub const XFS_DIR2_BLOCK_TAIL_SIZE: usize = 8;

/// 单块目录 leaf 项大小（hashval + address）
pub const XFS_DIR2_LEAF_ENTRY_SIZE: usize = 8;

/// 目录中空闲区域的起始标记
pub const XFS_DIR2_DATA_FREE_TAG: u16 = 0xFFFF;

/// 目录数据段的字节上限，之上是 leaf / free 段
pub const XFS_DIR2_LEAF_OFFSET: u64 = 32 << 30;

/// 目录项文件类型（di_ftype）
pub const XFS_DIR3_FT_UNKNOWN: u8 = 0;
pub const XFS_DIR3_FT_REG_FILE: u8 = 1;
pub const XFS_DIR3_FT_DIR: u8 = 2;
pub const XFS_DIR3_FT_CHRDEV: u8 = 3;
pub const XFS_DIR3_FT_BLKDEV: u8 = 4;
pub const XFS_DIR3_FT_FIFO: u8 = 5;
pub const XFS_DIR3_FT_SOCK: u8 = 6;
pub const XFS_DIR3_FT_SYMLINK: u8 = 7;
pub const XFS_DIR3_FT_WHT: u8 = 8;

/// Inode 模式位
pub const S_IFMT: u16 = 0xF000;
pub const S_IFIFO: u16 = 0x1000;
pub const S_IFCHR: u16 = 0x2000;
pub const S_IFDIR: u16 = 0x4000;
pub const S_IFBLK: u16 = 0x6000;
pub const S_IFREG: u16 = 0x8000;
pub const S_IFLNK: u16 = 0xA000;
pub const S_IFSOCK: u16 = 0xC000;

/// 权限位（含 setuid/setgid/sticky）
pub const S_IPERM_MASK: u16 = 0x0FFF;

/// 大时间戳相对 Unix 纪元的偏移（秒）
pub const XFS_BIGTIME_EPOCH_OFFSET: i64 = 1 << 31;

/// 默认 inode cluster 大小（字节）
pub const XFS_INODE_CLUSTER_SIZE: u32 = 8192;

/// 默认 inode chunk 对齐掩码
pub const XFS_INOALIGN_MASK: u32 = 3;
