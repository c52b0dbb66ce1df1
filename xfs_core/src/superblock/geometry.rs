//! 文件系统几何参数

use alloc::string::String;

use crate::{
    endian::Endian,
    error::{Error, Result},
};

use super::{decode_superblock, Superblock};

/// 几何描述
///
/// 从 superblock 派生，创建后不可变，地址换算与解码调用都以只读引用使用它。
/// `*_log` 字段决定地址拆分；`inodes_per_block` 与 `ag_blocks` 只用于边界检查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: u32,
    pub block_log: u8,
    pub sector_size: u16,
    pub sector_log: u8,
    pub inode_size: u16,
    pub inode_log: u8,
    pub inodes_per_block: u16,
    pub inode_per_block_log: u8,
    pub ag_blocks: u32,
    pub ag_block_log: u8,
    pub ag_count: u32,
    pub root_ino: u64,
    pub uuid: String,
    /// 目录块大小 = block_size << dir_block_log
    pub dir_block_log: u8,
    /// 目录项是否带文件类型字节
    pub has_ftype: bool,
}

impl Geometry {
    /// 从 superblock 构造几何描述
    ///
    /// 拒绝会让地址运算失去意义的参数（返回 `Corrupted`）。
    pub fn from_superblock(sb: &Superblock) -> Result<Self> {
        if !(9..=16).contains(&sb.blocklog) {
            return Err(Error::corrupted("block log outside 9..=16"));
        }
        if sb.blocksize != 1u32 << sb.blocklog {
            return Err(Error::corrupted("block size does not match block log"));
        }
        if sb.inodelog > sb.blocklog || sb.inodesize == 0 {
            return Err(Error::corrupted("inode size exceeds block size"));
        }
        if sb.agcount == 0 || sb.agblocks == 0 {
            return Err(Error::corrupted("empty allocation group geometry"));
        }
        if sb.agblklog as u32 + sb.inopblog as u32 > 32 {
            return Err(Error::corrupted("AG inode number wider than 32 bits"));
        }
        if sb.blocklog as u32 + sb.dirblklog as u32 > 16 {
            return Err(Error::corrupted("directory block larger than 64KiB"));
        }

        Ok(Self {
            block_size: sb.blocksize,
            block_log: sb.blocklog,
            sector_size: sb.sectsize,
            sector_log: sb.sectlog,
            inode_size: sb.inodesize,
            inode_log: sb.inodelog,
            inodes_per_block: sb.inopblock,
            inode_per_block_log: sb.inopblog,
            ag_blocks: sb.agblocks,
            ag_block_log: sb.agblklog,
            ag_count: sb.agcount,
            root_ino: sb.rootino,
            uuid: sb.uuid.clone(),
            dir_block_log: sb.dirblklog,
            has_ftype: sb.has_ftype(),
        })
    }

    /// 目录块大小（字节）
    pub fn dir_block_size(&self) -> usize {
        (self.block_size as usize) << self.dir_block_log
    }

    /// 每个目录块包含的文件系统块数
    pub fn dir_block_fsbs(&self) -> u64 {
        1u64 << self.dir_block_log
    }
}

/// 一步完成 superblock 解码与几何派生
pub fn decode_geometry(buf: &[u8], endian: Endian) -> Result<Geometry> {
    let sb = decode_superblock(buf, endian)?;
    Geometry::from_superblock(&sb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{consts::*, error::ErrorKind, superblock::decode_superblock};
    use alloc::vec;
    use byteorder::{BigEndian, ByteOrder};

    fn sample(blocklog: u8) -> Superblock {
        let mut buf = vec![0u8; XFS_SB_SIZE];
        BigEndian::write_u32(&mut buf[0..], XFS_SB_MAGIC);
        BigEndian::write_u32(&mut buf[4..], 1u32 << blocklog);
        BigEndian::write_u64(&mut buf[56..], 64);
        BigEndian::write_u32(&mut buf[84..], 1000);
        BigEndian::write_u32(&mut buf[88..], 4);
        BigEndian::write_u16(&mut buf[100..], 5);
        BigEndian::write_u16(&mut buf[104..], 512);
        BigEndian::write_u16(&mut buf[106..], 8);
        buf[120] = blocklog;
        buf[122] = 9;
        buf[123] = blocklog.saturating_sub(9);
        buf[124] = 10;
        decode_superblock(&buf, Endian::Big).unwrap()
    }

    #[test]
    fn test_geometry_from_superblock() {
        let geom = Geometry::from_superblock(&sample(12)).unwrap();

        assert_eq!(geom.block_size, 4096);
        assert_eq!(geom.inode_size, 512);
        assert_eq!(geom.inode_per_block_log, 3);
        assert_eq!(geom.ag_blocks, 1000);
        assert_eq!(geom.ag_block_log, 10);
        assert_eq!(geom.ag_count, 4);
        assert_eq!(geom.root_ino, 64);
        assert_eq!(geom.dir_block_size(), 4096);
        assert!(!geom.has_ftype);
    }

    #[test]
    fn test_rejects_bad_block_log() {
        let mut sb = sample(12);
        sb.blocklog = 8;
        sb.blocksize = 256;
        assert_eq!(
            Geometry::from_superblock(&sb).unwrap_err().kind(),
            ErrorKind::Corrupted
        );

        let mut sb = sample(12);
        sb.blocksize = 4000;
        assert!(Geometry::from_superblock(&sb).is_err());
    }

    #[test]
    fn test_rejects_wide_agino() {
        let mut sb = sample(12);
        sb.agblklog = 31;
        assert!(Geometry::from_superblock(&sb).is_err());

        let mut sb = sample(12);
        sb.agcount = 0;
        assert!(Geometry::from_superblock(&sb).is_err());
    }
}
